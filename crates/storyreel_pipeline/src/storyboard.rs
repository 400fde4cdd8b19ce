//! Storyboard generation stage.

use crate::failure::{model_failure, request_failure};
use crate::prompts::image_prompt;
use futures::stream::{self, StreamExt};
use storyreel_core::{
    DataUri, FrameImage, GenerateRequest, Input, Message, Modality, Storyboard, StoryboardFrame,
};
use storyreel_error::{StageError, StageResult};
use storyreel_interface::GenerativeModel;
use tracing::{debug, instrument, warn};

/// Illustrates key scenes, one independent image request per scene.
///
/// A scene whose request fails becomes a [`FrameImage::Failed`] frame; the
/// stage itself never fails. Frames come back in input order regardless of
/// completion order.
#[derive(Debug, Clone)]
pub struct StoryboardStage<M> {
    model: M,
    model_id: String,
    concurrency: usize,
}

impl<M: GenerativeModel> StoryboardStage<M> {
    /// Create the stage with at most `concurrency` requests in flight.
    pub fn new(model: M, model_id: impl Into<String>, concurrency: usize) -> Self {
        Self {
            model,
            model_id: model_id.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Generate one frame per scene description.
    #[instrument(skip(self, scenes), fields(model = %self.model_id, scenes = scenes.len(), concurrency = self.concurrency))]
    pub async fn illustrate(&self, scenes: &[String]) -> Storyboard {
        let mut images = vec![FrameImage::Pending; scenes.len()];

        let renders: Vec<_> = scenes
            .iter()
            .enumerate()
            .map(|(index, scene)| async move { (index, self.render(index, scene).await) })
            .collect();
        let mut finished = stream::iter(renders).buffer_unordered(self.concurrency);
        while let Some((index, image)) = finished.next().await {
            images[index] = image;
        }

        let storyboard = Storyboard::new(
            images
                .into_iter()
                .zip(scenes)
                .map(|(image, scene)| StoryboardFrame::new(image, scene.as_str()))
                .collect(),
        );
        debug!(
            frames = storyboard.len(),
            failed = storyboard.failed_count(),
            "Storyboard illustrated"
        );
        storyboard
    }

    async fn render(&self, index: usize, scene: &str) -> FrameImage {
        match self.request_image(scene).await {
            Ok(uri) => FrameImage::Ready(uri),
            Err(e) => {
                warn!(index, scene, error = %e.kind, "Failed to generate image for scene");
                FrameImage::Failed
            }
        }
    }

    async fn request_image(&self, scene: &str) -> StageResult<DataUri> {
        let request = GenerateRequest::builder()
            .messages(vec![Message::user(vec![Input::text(image_prompt(scene))])])
            .model(self.model_id.clone())
            .response_modalities(vec![Modality::Text, Modality::Image])
            .build()
            .map_err(request_failure)?;

        let response = self
            .model
            .generate(&request)
            .await
            .map_err(model_failure)?;

        match response.first_media() {
            Some(uri) if uri.is_image() => {
                uri.decode().map_err(|e| {
                    StageError::invalid_response(format!("image payload did not decode: {}", e))
                })?;
                Ok(uri.clone())
            }
            Some(uri) => Err(StageError::invalid_response(format!(
                "expected image media, got {}",
                uri.mime_type()
            ))),
            None => Err(StageError::invalid_response("reply contained no image")),
        }
    }
}
