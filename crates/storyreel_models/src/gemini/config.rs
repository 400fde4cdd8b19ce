//! Gemini transport configuration.

use serde::{Deserialize, Serialize};

/// Transport settings for [`GeminiClient`](super::GeminiClient).
///
/// Usually loaded from the `[gemini]` table of `storyreel.toml`.
///
/// # Example
///
/// ```toml
/// [gemini]
/// base_url = "https://generativelanguage.googleapis.com/v1beta"
/// model = "gemini-2.0-flash"
/// timeout_secs = 120
/// rpm = 10
/// max_retries = 0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct GeminiConfig {
    /// API root, without a trailing slash
    base_url: String,
    /// Model used when a request names none
    model: String,
    /// Per-request timeout in seconds
    timeout_secs: u64,
    /// Requests per minute allowed from this client (`None` = unlimited)
    rpm: Option<u32>,
    /// Retry attempts for transient failures (0 disables retry)
    max_retries: usize,
    /// Override for the initial backoff delay
    retry_backoff_ms: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            timeout_secs: 120,
            rpm: Some(10),
            max_retries: 0,
            retry_backoff_ms: None,
        }
    }
}

impl GeminiConfig {
    /// Point the client at a different API root (e.g. a local proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Change the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Change the request-per-minute limit.
    pub fn with_rpm(mut self, rpm: Option<u32>) -> Self {
        self.rpm = rpm;
        self
    }

    /// Enable retry of transient failures.
    pub fn with_retry(mut self, max_retries: usize, retry_backoff_ms: Option<u64>) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = retry_backoff_ms;
        self
    }
}
