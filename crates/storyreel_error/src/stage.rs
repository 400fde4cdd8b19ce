//! Pipeline stage errors.

/// The three generation stages, as named in failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum Stage {
    /// Script analysis
    #[display("Analyzing")]
    Analyzing,
    /// Per-scene image generation
    #[display("Storyboarding")]
    Storyboarding,
    /// Script and voice synthesis
    #[display("Trailering")]
    Trailering,
}

/// Specific failure conditions of a stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StageErrorKind {
    /// The model replied with a shape the stage cannot interpret
    #[display("Model response invalid: {}", _0)]
    ModelResponseInvalid(String),
    /// The model call itself failed or timed out
    #[display("Upstream unavailable: {}", _0)]
    UpstreamUnavailable(String),
    /// Voice synthesis returned no media reference
    #[display("No audio returned by speech model")]
    NoAudioReturned,
}

/// Stage error with location tracking.
///
/// Cloneable so the orchestrator can keep the cause in its `Failed` state.
///
/// # Examples
///
/// ```
/// use storyreel_error::{StageError, StageErrorKind};
///
/// let err = StageError::new(StageErrorKind::NoAudioReturned);
/// assert!(format!("{}", err).contains("No audio"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Stage Error: {} at line {} in {}", kind, line, file)]
pub struct StageError {
    /// The specific error condition
    pub kind: StageErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StageError {
    /// Create a new StageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`StageErrorKind::ModelResponseInvalid`].
    #[track_caller]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(StageErrorKind::ModelResponseInvalid(message.into()))
    }

    /// Shorthand for [`StageErrorKind::UpstreamUnavailable`].
    #[track_caller]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(StageErrorKind::UpstreamUnavailable(message.into()))
    }
}

/// Result type for stage operations.
pub type StageResult<T> = Result<T, StageError>;
