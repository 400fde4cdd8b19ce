//! Pipeline settings, loaded from the `[pipeline]` table.

use crate::prompts::DEFAULT_STYLE_PROMPT;
use crate::video::DEFAULT_VIDEO_URL;
use serde::{Deserialize, Serialize};
use storyreel_audio::WavSpec;
use storyreel_error::AudioError;

/// PCM format of the speech model's output.
///
/// Defaults match what the speech model returns: mono, 24 kHz, 16-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct AudioConfig {
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            channels: *WavSpec::SPEECH.channels(),
            sample_rate: *WavSpec::SPEECH.sample_rate(),
            bits_per_sample: *WavSpec::SPEECH.bits_per_sample(),
        }
    }
}

impl AudioConfig {
    /// Create an audio configuration.
    pub fn new(channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            channels,
            sample_rate,
            bits_per_sample,
        }
    }

    /// Validate into an encoder spec.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a zero or non-byte-aligned parameter.
    pub fn to_spec(&self) -> Result<WavSpec, AudioError> {
        WavSpec::new(self.channels, self.sample_rate, self.bits_per_sample)
    }
}

/// Model selection and stage tuning.
///
/// # Example
///
/// ```toml
/// [pipeline]
/// text_model = "gemini-2.0-flash"
/// image_model = "gemini-2.0-flash-preview-image-generation"
/// speech_model = "gemini-2.5-flash-preview-tts"
/// voice_name = "Algenib"
/// image_concurrency = 4
///
/// [pipeline.audio]
/// channels = 1
/// sample_rate = 24000
/// bits_per_sample = 16
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model for script analysis and trailer script writing
    text_model: String,
    /// Model for storyboard frames
    image_model: String,
    /// Model for voice synthesis
    speech_model: String,
    /// Prebuilt voice for narration
    voice_name: String,
    /// Maximum image requests in flight (1 = sequential)
    image_concurrency: usize,
    /// Style prompt used when a run supplies none
    default_style_prompt: String,
    /// URL returned by the placeholder video synthesizer
    placeholder_video_url: String,
    /// Speech PCM format
    audio: AudioConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            text_model: "gemini-2.0-flash".to_string(),
            image_model: "gemini-2.0-flash-preview-image-generation".to_string(),
            speech_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice_name: "Algenib".to_string(),
            image_concurrency: 4,
            default_style_prompt: DEFAULT_STYLE_PROMPT.to_string(),
            placeholder_video_url: DEFAULT_VIDEO_URL.to_string(),
            audio: AudioConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Change the image request bound (clamped to at least 1).
    pub fn with_image_concurrency(mut self, limit: usize) -> Self {
        self.image_concurrency = limit.max(1);
        self
    }

    /// Change the speech PCM format.
    pub fn with_audio(mut self, audio: AudioConfig) -> Self {
        self.audio = audio;
        self
    }

    /// Change the default style prompt.
    pub fn with_default_style_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.default_style_prompt = prompt.into();
        self
    }
}
