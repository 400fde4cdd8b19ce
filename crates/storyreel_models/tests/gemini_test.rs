// Tests for the Gemini REST driver.
//
// Offline tests cover error classification and client construction. Tests
// marked with `#[cfg_attr(not(feature = "api"), ignore)]` hit the real Gemini
// API and need `GEMINI_API_KEY` (a `.env` file is honored).

use storyreel_core::{AnalysisResult, GenerateRequest, Input, Message, Modality, SpeechConfig};
use storyreel_error::{GeminiError, GeminiErrorKind};
use storyreel_interface::GenerativeModel;
use storyreel_models::{GeminiClient, GeminiConfig};

//
// ─── ERROR HANDLING TESTS ───────────────────────────────────────────────────────
//

#[test]
fn test_gemini_error_display() {
    let error = GeminiError::new(GeminiErrorKind::MissingApiKey);
    let display = format!("{}", error);
    assert!(display.contains("GEMINI_API_KEY environment variable not set"));
    assert!(display.contains("Gemini Error:"));
    assert!(display.contains("at line"));
}

#[test]
fn test_retryable_classification() {
    let retryable = [408u16, 429, 500, 502, 503, 504];
    for status_code in retryable {
        let kind = GeminiErrorKind::HttpError {
            status_code,
            message: String::new(),
        };
        assert!(kind.is_retryable(), "{} should be retryable", status_code);
    }

    let permanent = [400u16, 401, 403, 404];
    for status_code in permanent {
        let kind = GeminiErrorKind::HttpError {
            status_code,
            message: String::new(),
        };
        assert!(!kind.is_retryable(), "{} should not be retryable", status_code);
    }

    assert!(GeminiErrorKind::Timeout("slow".to_string()).is_retryable());
    assert!(!GeminiErrorKind::MissingApiKey.is_retryable());
    assert!(!GeminiErrorKind::InvalidResponse("bad".to_string()).is_retryable());
}

#[test]
fn test_retry_profile_is_backoff_and_ceiling() {
    let rate_limited = GeminiErrorKind::HttpError {
        status_code: 429,
        message: "quota".to_string(),
    };
    assert_eq!(rate_limited.retry_strategy_params(), (5000, 40));
    assert_eq!(
        GeminiErrorKind::Timeout("slow".to_string()).retry_strategy_params(),
        (2000, 30)
    );
}

#[test]
fn test_config_defaults() {
    let config = GeminiConfig::default();
    assert_eq!(config.model(), "gemini-2.0-flash");
    assert_eq!(*config.rpm(), Some(10));
    assert_eq!(*config.max_retries(), 0);
}

#[test]
fn test_config_from_toml_fragment() {
    let config: GeminiConfig = serde_json::from_value(serde_json::json!({
        "base_url": "http://localhost:8080",
        "rpm": null,
        "max_retries": 3
    }))
    .unwrap();

    assert_eq!(config.base_url(), "http://localhost:8080");
    assert_eq!(*config.rpm(), None);
    assert_eq!(*config.max_retries(), 3);
    // Unset fields keep defaults
    assert_eq!(*config.timeout_secs(), 120);
}

#[test]
fn test_client_reports_provider_and_model() {
    let config = GeminiConfig::default().with_model("gemini-2.5-flash");
    let client = GeminiClient::with_api_key("test-key", config).unwrap();

    assert_eq!(client.provider_name(), "gemini");
    assert_eq!(client.model_name(), "gemini-2.5-flash");
}

//
// ─── LIVE API TESTS ─────────────────────────────────────────────────────────────
//

fn live_client() -> GeminiClient {
    let _ = dotenvy::dotenv();
    GeminiClient::new().expect("GEMINI_API_KEY must be set for api tests")
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_structured_analysis() {
    let client = live_client();
    let request = GenerateRequest::builder()
        .messages(vec![Message::user(vec![Input::text(
            "Analyze this script: A lone astronaut drifts in a small capsule.",
        )])])
        .response_schema(AnalysisResult::json_schema())
        .build()
        .unwrap();

    let response = client.generate(&request).await.expect("API call failed");
    let analysis: AnalysisResult =
        serde_json::from_str(&response.text()).expect("reply should follow schema");
    assert!(!analysis.summary().is_empty());
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_image_generation() {
    let client = live_client();
    let request = GenerateRequest::builder()
        .messages(vec![Message::user(vec![Input::text(
            "A small capsule drifting above Earth, cinematic style",
        )])])
        .model("gemini-2.0-flash-preview-image-generation")
        .response_modalities(vec![Modality::Text, Modality::Image])
        .build()
        .unwrap();

    let response = client.generate(&request).await.expect("API call failed");
    let media = response.first_media().expect("image part expected");
    assert!(media.is_image());
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_speech_generation() {
    let client = live_client();
    let request = GenerateRequest::builder()
        .messages(vec![Message::user(vec![Input::text(
            "In a world of silence, one signal changes everything.",
        )])])
        .model("gemini-2.5-flash-preview-tts")
        .response_modalities(vec![Modality::Audio])
        .speech(SpeechConfig::new("Algenib"))
        .build()
        .unwrap();

    let response = client.generate(&request).await.expect("API call failed");
    let media = response.first_media().expect("audio part expected");
    assert!(media.is_audio());
    assert!(!media.decode().unwrap().is_empty());
}
