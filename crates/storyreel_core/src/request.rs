//! Request and response types for model generation.

use crate::{DataUri, Message, Output};
use serde::{Deserialize, Serialize};

/// What kind of content a request asks the model to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Text parts
    #[display("text")]
    Text,
    /// Inline image parts
    #[display("image")]
    Image,
    /// Inline audio parts
    #[display("audio")]
    Audio,
}

/// Voice selection for speech synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct SpeechConfig {
    /// Name of a prebuilt voice, e.g. "Algenib"
    voice_name: String,
}

impl SpeechConfig {
    /// Create a speech configuration for a prebuilt voice.
    pub fn new(voice_name: impl Into<String>) -> Self {
        Self {
            voice_name: voice_name.into(),
        }
    }
}

/// Generic generation request (multimodal-safe).
///
/// # Examples
///
/// ```
/// use storyreel_core::{GenerateRequest, Input, Message, Modality};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::user(vec![Input::text("A red light flashes")])])
///     .model("gemini-2.0-flash-preview-image-generation")
///     .response_modalities(vec![Modality::Text, Modality::Image])
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 1);
/// assert_eq!(request.model().as_deref(), Some("gemini-2.0-flash-preview-image-generation"));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into), default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    messages: Vec<Message>,
    /// Model identifier; the driver's default is used when absent
    #[builder(setter(into, strip_option))]
    model: Option<String>,
    /// Content kinds the model should return (empty means provider default)
    response_modalities: Vec<Modality>,
    /// JSON schema the reply must follow
    #[builder(setter(into, strip_option))]
    response_schema: Option<serde_json::Value>,
    /// Voice configuration for audio replies
    #[builder(setter(into, strip_option))]
    speech: Option<SpeechConfig>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use storyreel_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![Output::Text("Here is the scene.".to_string())],
/// };
///
/// assert_eq!(response.text(), "Here is the scene.");
/// assert!(response.first_media().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Concatenate all text parts in order.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .filter_map(|output| match output {
                Output::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// First media part, if any.
    pub fn first_media(&self) -> Option<&DataUri> {
        self.outputs.iter().find_map(|output| match output {
            Output::Media(uri) => Some(uri),
            _ => None,
        })
    }
}
