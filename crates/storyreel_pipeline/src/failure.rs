//! Mapping collaborator errors onto stage failures.

use storyreel_core::GenerateRequestBuilderError;
use storyreel_error::{GeminiErrorKind, StageError, StoryreelError, StoryreelErrorKind};

/// Classify a failed model call.
///
/// A reply that arrived but could not be decoded is `ModelResponseInvalid`;
/// transport failures, timeouts and HTTP errors are `UpstreamUnavailable`.
#[track_caller]
pub(crate) fn model_failure(err: StoryreelError) -> StageError {
    match err.kind() {
        StoryreelErrorKind::Gemini(e) if matches!(e.kind, GeminiErrorKind::InvalidResponse(_)) => {
            StageError::invalid_response(e.kind.to_string())
        }
        StoryreelErrorKind::Media(e) => StageError::invalid_response(e.kind.to_string()),
        StoryreelErrorKind::Json(e) => StageError::invalid_response(e.message.clone()),
        _ => StageError::upstream(err.to_string()),
    }
}

/// A request that could not be assembled never reaches the model.
#[track_caller]
pub(crate) fn request_failure(err: GenerateRequestBuilderError) -> StageError {
    StageError::upstream(format!("request could not be built: {}", err))
}
