//! Top-level error wrapper types.

use crate::{
    AudioError, ConfigError, GeminiError, JsonError, MediaError, PipelineError, StageError,
    StorageError,
};

/// Every error condition raised inside the Storyreel workspace.
///
/// # Examples
///
/// ```
/// use storyreel_error::{StoryreelError, ConfigError};
///
/// let config_err = ConfigError::new("rpm must be positive");
/// let err: StoryreelError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryreelErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// WAV encoder error
    #[from(AudioError)]
    Audio(AudioError),
    /// Data reference error
    #[from(MediaError)]
    Media(MediaError),
    /// Gemini driver error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Pipeline stage error
    #[from(StageError)]
    Stage(StageError),
    /// Orchestrator error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Output storage error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Storyreel error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyreel_error::{StoryreelResult, ConfigError};
///
/// fn might_fail() -> StoryreelResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyreel Error: {}", _0)]
pub struct StoryreelError(Box<StoryreelErrorKind>);

impl StoryreelError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryreelErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryreelErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to StoryreelErrorKind
impl<T> From<T> for StoryreelError
where
    T: Into<StoryreelErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyreel operations.
pub type StoryreelResult<T> = std::result::Result<T, StoryreelError>;
