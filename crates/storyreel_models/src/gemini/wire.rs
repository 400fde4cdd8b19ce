//! JSON bodies for the `generateContent` REST endpoint.
//!
//! Conversion happens once at the boundary: inbound inline data is parsed
//! into [`DataUri`] here so the pipeline never sees raw wire parts.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use storyreel_core::{
    DataUri, GenerateRequest, GenerateResponse, Input, MediaSource, Message, Modality, Output,
    SpeechConfig,
};
use storyreel_error::{GeminiError, GeminiErrorKind};

/// Fallback when an image part carries no MIME type.
const DEFAULT_IMAGE_MIME: &str = "image/png";

//
// ─── REQUEST ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<WireSpeechConfig>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

impl From<&SpeechConfig> for WireSpeechConfig {
    fn from(speech: &SpeechConfig) -> Self {
        Self {
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig {
                    voice_name: speech.voice_name().clone(),
                },
            },
        }
    }
}

fn modality_name(modality: Modality) -> &'static str {
    match modality {
        Modality::Text => "TEXT",
        Modality::Image => "IMAGE",
        Modality::Audio => "AUDIO",
    }
}

fn input_to_part(input: &Input) -> Part {
    match input {
        Input::Text(text) => Part {
            text: Some(text.clone()),
            inline_data: None,
        },
        Input::Image { mime, source } => {
            let data = match source {
                MediaSource::Base64(payload) => payload.clone(),
                MediaSource::Binary(bytes) => STANDARD.encode(bytes),
            };
            Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: mime.clone().unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
                    data,
                }),
            }
        }
    }
}

fn message_content(message: &Message) -> Content {
    Content {
        role: Some("user".to_string()),
        parts: message.content.iter().map(input_to_part).collect(),
    }
}

impl GenerateContentRequest {
    /// Translate a provider-neutral request into the REST body.
    pub fn from_request(req: &GenerateRequest) -> Self {
        let generation_config = GenerationConfig {
            response_modalities: req
                .response_modalities()
                .iter()
                .map(|m| modality_name(*m).to_string())
                .collect(),
            response_mime_type: req
                .response_schema()
                .as_ref()
                .map(|_| "application/json".to_string()),
            response_schema: req.response_schema().clone(),
            speech_config: req.speech().as_ref().map(WireSpeechConfig::from),
        };

        Self {
            contents: req.messages().iter().map(message_content).collect(),
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
        }
    }
}

//
// ─── RESPONSE ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Collect the first candidate's parts as outputs.
    ///
    /// A response without candidates (e.g. a blocked prompt) yields no
    /// outputs; callers decide whether that is an error.
    pub fn into_response(self) -> Result<GenerateResponse, GeminiError> {
        let Some(content) = self.candidates.into_iter().next().and_then(|c| c.content) else {
            return Ok(GenerateResponse::default());
        };

        let mut outputs = Vec::with_capacity(content.parts.len());
        for part in content.parts {
            if let Some(text) = part.text {
                outputs.push(Output::Text(text));
            }
            if let Some(inline) = part.inline_data {
                let uri = DataUri::from_str(&format!(
                    "data:{};base64,{}",
                    inline.mime_type, inline.data
                ))
                .map_err(|e| {
                    GeminiError::new(GeminiErrorKind::InvalidResponse(format!(
                        "inline data is not a valid data reference: {}",
                        e
                    )))
                })?;
                outputs.push(Output::Media(uri));
            }
        }
        Ok(GenerateResponse { outputs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_with(messages: Vec<Message>) -> GenerateRequest {
        GenerateRequest::builder().messages(messages).build().unwrap()
    }

    #[test]
    fn test_text_only_request_omits_generation_config() {
        let req = request_with(vec![Message::user(vec![Input::text("hello")])]);
        let body = serde_json::to_value(GenerateContentRequest::from_request(&req)).unwrap();

        assert_eq!(
            body,
            json!({"contents": [{"role": "user", "parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn test_schema_sets_json_mime_type() {
        let req = GenerateRequest::builder()
            .messages(vec![Message::user(vec![Input::text("analyze")])])
            .response_schema(json!({"type": "OBJECT"}))
            .build()
            .unwrap();
        let body = serde_json::to_value(GenerateContentRequest::from_request(&req)).unwrap();

        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body["generationConfig"].get("responseModalities").is_none());
    }

    #[test]
    fn test_speech_request_shape() {
        let req = GenerateRequest::builder()
            .messages(vec![Message::user(vec![Input::text("Say it")])])
            .response_modalities(vec![Modality::Audio])
            .speech(SpeechConfig::new("Algenib"))
            .build()
            .unwrap();
        let body = serde_json::to_value(GenerateContentRequest::from_request(&req)).unwrap();

        assert_eq!(body["generationConfig"]["responseModalities"], json!(["AUDIO"]));
        assert_eq!(
            body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Algenib"
        );
    }

    #[test]
    fn test_each_message_is_a_user_turn() {
        let req = request_with(vec![
            Message::user(vec![Input::text("first")]),
            Message::user(vec![Input::text("second"), Input::text("third")]),
        ]);
        let wire = GenerateContentRequest::from_request(&req);

        assert_eq!(wire.contents.len(), 2);
        assert!(wire.contents.iter().all(|c| c.role.as_deref() == Some("user")));
        assert_eq!(wire.contents[1].parts.len(), 2);
    }

    #[test]
    fn test_binary_image_is_base64_encoded() {
        let req = request_with(vec![Message::user(vec![Input::Image {
            mime: None,
            source: MediaSource::Binary(vec![1, 2, 3]),
        }])]);
        let wire = GenerateContentRequest::from_request(&req);
        let inline = wire.contents[0].parts[0].inline_data.clone().unwrap();

        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "AQID");
    }

    #[test]
    fn test_response_parts_become_outputs() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "A capsule drifts."},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                ]},
                "finishReason": "STOP"
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let response = response.into_response().unwrap();

        assert_eq!(response.text(), "A capsule drifts.");
        let media = response.first_media().unwrap();
        assert!(media.is_image());
        assert_eq!(media.payload(), "iVBORw0KGgo=");
    }

    #[test]
    fn test_audio_mime_parameters_are_preserved() {
        let raw = json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAA"}}
            ]}}]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let response = response.into_response().unwrap();
        let media = response.first_media().unwrap();

        assert!(media.is_audio());
        assert_eq!(media.parameter("rate"), Some("24000"));
    }

    #[test]
    fn test_blocked_prompt_yields_no_outputs() {
        let raw = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        assert!(response.into_response().unwrap().outputs.is_empty());
    }
}
