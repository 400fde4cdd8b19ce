//! Orchestrator errors.

use crate::{Stage, StageErrorKind};

/// Specific error conditions for orchestrator operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Operation not permitted in the current state
    #[display("Cannot {} while pipeline is {}", operation, state)]
    InvalidTransition {
        /// Operation that was attempted
        operation: &'static str,
        /// Name of the state the pipeline was in
        state: String,
    },
    /// Submitted script was blank
    #[display("Script must not be empty")]
    EmptyScript,
    /// Frame edit addressed a frame that does not exist
    #[display("Frame {} out of range (storyboard has {} frames)", index, len)]
    FrameOutOfRange {
        /// Requested index
        index: usize,
        /// Number of frames
        len: usize,
    },
    /// A stage finished after the run it belonged to was restarted
    #[display("Result of run {} discarded (current run is {})", run, current)]
    StaleRun {
        /// Run the result belonged to
        run: u64,
        /// Run that is current now
        current: u64,
    },
    /// A stage failed and the pipeline moved to `Failed`
    #[display("Stage {} failed: {}", stage, cause)]
    StageFailed {
        /// Stage that failed
        stage: Stage,
        /// Failure cause
        cause: StageErrorKind,
    },
}

/// Orchestrator error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for orchestrator operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
