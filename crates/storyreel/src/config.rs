//! Layered application configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from storyreel.toml)
//! - `~/.config/storyreel/storyreel.toml`
//! - `./storyreel.toml`
//! - An explicit file passed by the caller

use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use storyreel_error::{ConfigError, StoryreelError, StoryreelResult};
use storyreel_models::GeminiConfig;
use storyreel_pipeline::PipelineConfig;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../storyreel.toml");

/// Complete Storyreel configuration.
///
/// # Example
///
/// ```toml
/// [gemini]
/// rpm = 10
///
/// [pipeline]
/// image_concurrency = 2
/// voice_name = "Algenib"
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(default)]
pub struct StoryreelConfig {
    /// Gemini transport settings
    gemini: GeminiConfig,
    /// Stage models, concurrency and audio format
    pipeline: PipelineConfig,
}

impl StoryreelConfig {
    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// ```no_run
    /// use storyreel::StoryreelConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = StoryreelConfig::load()?;
    /// println!("{}", config.pipeline().text_model());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> StoryreelResult<Self> {
        Self::load_with(None)
    }

    /// Load the layered configuration, with `explicit` (if any) on top.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the explicit file is missing or any
    /// source fails to parse.
    #[instrument(skip(explicit), fields(explicit = ?explicit.map(Path::display)))]
    pub fn load_with(explicit: Option<&Path>) -> StoryreelResult<Self> {
        debug!("Loading configuration with precedence: explicit > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyreel/storyreel.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyreel").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        Self::finish(builder)
    }

    /// Load configuration from a single file on top of the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StoryreelResult<Self> {
        debug!("Loading configuration from file");
        Self::finish(Self::defaults().add_source(File::from(path.as_ref())))
    }

    /// Parse a TOML document on top of the bundled defaults.
    pub fn from_toml_str(toml: &str) -> StoryreelResult<Self> {
        Self::finish(Self::defaults().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> StoryreelResult<Self> {
        builder
            .build()
            .map_err(|e| {
                StoryreelError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryreelError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
