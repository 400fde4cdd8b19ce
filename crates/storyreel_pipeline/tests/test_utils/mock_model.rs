//! Scripted generative model for pipeline tests.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyreel_core::{DataUri, GenerateRequest, GenerateResponse, Input, Output};
use storyreel_error::{GeminiError, GeminiErrorKind, StoryreelError, StoryreelResult};
use storyreel_interface::GenerativeModel;

/// Model ids used by `PipelineConfig::default()`.
pub const TEXT_MODEL: &str = "gemini-2.0-flash";
pub const IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
pub const SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// What the mock returns for a matching request.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A single text part
    Text(String),
    /// A single media part
    Media(DataUri),
    /// A reply with no parts at all
    Empty,
    /// A transport failure
    Error(GeminiErrorKind),
    /// Wait, then reply
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    /// Delay this reply by `millis` milliseconds.
    pub fn after_ms(self, millis: u64) -> Self {
        MockReply::Delayed(Duration::from_millis(millis), Box::new(self))
    }
}

#[derive(Debug, Clone)]
struct Rule {
    model: String,
    prompt_contains: Option<String>,
    reply: MockReply,
}

/// Mock model routing replies by model id and prompt text.
///
/// Prompt-specific rules win over model-wide rules. Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct MockModel {
    rules: Vec<Rule>,
    calls: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl MockModel {
    /// Mock with no rules; every call fails until rules are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to every request for `model`.
    pub fn on_model(mut self, model: &str, reply: MockReply) -> Self {
        self.rules.push(Rule {
            model: model.to_string(),
            prompt_contains: None,
            reply,
        });
        self
    }

    /// Reply to requests for `model` whose prompt text contains `needle`.
    pub fn on_prompt(mut self, model: &str, needle: &str, reply: MockReply) -> Self {
        self.rules.push(Rule {
            model: model.to_string(),
            prompt_contains: Some(needle.to_string()),
            reply,
        });
        self
    }

    /// Total number of generate() calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of calls addressed to `model`.
    pub fn calls_for(&self, model: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.model().as_deref() == Some(model))
            .count()
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn find_reply(&self, req: &GenerateRequest) -> Option<MockReply> {
        let model = req.model().as_deref().unwrap_or_default();
        let prompt = prompt_text(req);

        let by_prompt = self.rules.iter().find(|rule| {
            rule.model == model
                && rule
                    .prompt_contains
                    .as_deref()
                    .is_some_and(|needle| prompt.contains(needle))
        });
        let by_model = || {
            self.rules
                .iter()
                .find(|rule| rule.model == model && rule.prompt_contains.is_none())
        };
        by_prompt.or_else(by_model).map(|rule| rule.reply.clone())
    }
}

/// All text parts of a request, joined by newlines.
pub fn prompt_text(req: &GenerateRequest) -> String {
    req.messages()
        .iter()
        .flat_map(|message| message.content.iter())
        .filter_map(|input| match input {
            Input::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

async fn resolve(reply: MockReply) -> StoryreelResult<GenerateResponse> {
    let mut reply = reply;
    while let MockReply::Delayed(delay, inner) = reply {
        tokio::time::sleep(delay).await;
        reply = *inner;
    }
    match reply {
        MockReply::Text(text) => Ok(GenerateResponse {
            outputs: vec![Output::Text(text)],
        }),
        MockReply::Media(uri) => Ok(GenerateResponse {
            outputs: vec![Output::Media(uri)],
        }),
        MockReply::Empty => Ok(GenerateResponse::default()),
        MockReply::Error(kind) => Err(StoryreelError::from(GeminiError::new(kind))),
        MockReply::Delayed(..) => unreachable!("delays unwrapped above"),
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(&self, req: &GenerateRequest) -> StoryreelResult<GenerateResponse> {
        self.calls.lock().unwrap().push(req.clone());
        let reply = self.find_reply(req).unwrap_or_else(|| {
            MockReply::Error(GeminiErrorKind::ApiRequest(format!(
                "no mock rule for model {:?}",
                req.model()
            )))
        });
        resolve(reply).await
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        TEXT_MODEL
    }
}

//
// ─── FIXTURES ───────────────────────────────────────────────────────────────────
//

/// JSON analysis reply with the given key scenes.
pub fn analysis_reply(summary: &str, scenes: &[&str]) -> MockReply {
    MockReply::Text(
        serde_json::json!({
            "summary": summary,
            "keyScenes": scenes,
            "visualElements": ["capsule", "console", "Earth"],
        })
        .to_string(),
    )
}

/// Image reply carrying a tiny PNG-tagged payload derived from `seed`.
pub fn image_reply(seed: u8) -> MockReply {
    MockReply::Media(DataUri::from_bytes("image/png", &[0x89, b'P', b'N', b'G', seed]))
}

/// JSON trailer script reply.
pub fn script_reply(script: &str) -> MockReply {
    MockReply::Text(serde_json::json!({ "script": script }).to_string())
}

/// Speech reply carrying raw PCM bytes, tagged like the speech model's output.
pub fn audio_reply(pcm: &[u8]) -> MockReply {
    MockReply::Media(DataUri::from_base64("audio/L16", STANDARD.encode(pcm)))
}
