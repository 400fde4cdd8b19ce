//! Trait definitions for external collaborators.

use async_trait::async_trait;
use std::sync::Arc;
use storyreel_core::{GenerateRequest, GenerateResponse, Storyboard};
use storyreel_error::StoryreelResult;

/// Core trait that all model backends must implement.
///
/// One call covers text, structured JSON, image, and speech generation; the
/// request's response modalities and speech configuration select which.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate model output given a multimodal request.
    async fn generate(&self, req: &GenerateRequest) -> StoryreelResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier used when a request names none.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: GenerativeModel + ?Sized> GenerativeModel for Arc<T> {
    async fn generate(&self, req: &GenerateRequest) -> StoryreelResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Produces the video half of a trailer.
#[async_trait]
pub trait VideoSynthesizer: Send + Sync {
    /// Return a reference (URL or data URI) to a video for the storyboard.
    async fn synthesize(&self, storyboard: &Storyboard, script: &str) -> StoryreelResult<String>;
}
