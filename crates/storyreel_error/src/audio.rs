//! Audio container encoder errors.

/// Specific error conditions for WAV encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AudioErrorKind {
    /// A header parameter is outside the range the container can express
    #[display("Invalid parameter '{}': {}", parameter, reason)]
    InvalidParameter {
        /// Parameter name
        parameter: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Audio encoder error with location tracking.
///
/// # Examples
///
/// ```
/// use storyreel_error::{AudioError, AudioErrorKind};
///
/// let err = AudioError::new(AudioErrorKind::InvalidParameter {
///     parameter: "channels",
///     reason: "must be positive".to_string(),
/// });
/// assert!(format!("{}", err).contains("channels"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Audio Error: {} at line {} in {}", kind, line, file)]
pub struct AudioError {
    /// The specific error condition
    pub kind: AudioErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl AudioError {
    /// Create a new AudioError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AudioErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an [`AudioErrorKind::InvalidParameter`] error.
    #[track_caller]
    pub fn invalid_parameter(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::new(AudioErrorKind::InvalidParameter {
            parameter,
            reason: reason.into(),
        })
    }
}
