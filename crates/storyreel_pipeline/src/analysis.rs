//! Script analysis stage.

use crate::extraction::parse_json;
use crate::failure::{model_failure, request_failure};
use crate::prompts::analysis_prompt;
use storyreel_core::{AnalysisResult, GenerateRequest, Input, Message, Modality, ScriptText};
use storyreel_error::StageResult;
use storyreel_interface::GenerativeModel;
use tracing::{debug, instrument};

/// Decomposes a script into summary, key scenes, and visual elements.
///
/// Stateless; one model call per [`analyze`](Self::analyze), no retries.
#[derive(Debug, Clone)]
pub struct AnalysisStage<M> {
    model: M,
    model_id: String,
}

impl<M: GenerativeModel> AnalysisStage<M> {
    /// Create the stage, sending requests to `model_id`.
    pub fn new(model: M, model_id: impl Into<String>) -> Self {
        Self {
            model,
            model_id: model_id.into(),
        }
    }

    /// Analyze a script.
    ///
    /// # Errors
    ///
    /// - `UpstreamUnavailable` if the model call fails or times out
    /// - `ModelResponseInvalid` if the reply does not decode or is not an
    ///   analysis object
    #[instrument(skip(self, script), fields(model = %self.model_id, script_len = script.as_str().len()))]
    pub async fn analyze(&self, script: &ScriptText) -> StageResult<AnalysisResult> {
        let request = GenerateRequest::builder()
            .messages(vec![Message::user(vec![Input::text(analysis_prompt(
                script.as_str(),
            ))])])
            .model(self.model_id.clone())
            .response_modalities(vec![Modality::Text])
            .response_schema(AnalysisResult::json_schema())
            .build()
            .map_err(request_failure)?;

        let response = self
            .model
            .generate(&request)
            .await
            .map_err(model_failure)?;

        let analysis: AnalysisResult = parse_json(&response.text())?;
        debug!(
            key_scenes = analysis.key_scenes().len(),
            visual_elements = analysis.visual_elements().len(),
            "Script analyzed"
        );
        Ok(analysis)
    }
}
