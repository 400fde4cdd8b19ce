//! Gemini REST client implementation.
//!
//! This module provides a client for the `generateContent` endpoint of the Google
//! Gemini API. When a request specifies a model (via `GenerateRequest.model`), the
//! client targets that model; otherwise it falls back to the configured default.
//!
//! # Rate Limiting
//!
//! A single GCRA limiter (requests per minute) is shared by every request sent
//! through one client, including concurrent image requests.
//!
//! # Retry
//!
//! Retry is opt-in (`max_retries > 0`). The first failure decides the backoff
//! profile; non-retryable errors fail immediately.

use super::wire::{GenerateContentRequest, GenerateContentResponse};
use super::{GeminiConfig, GeminiResult};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use storyreel_core::{GenerateRequest, GenerateResponse};
use storyreel_error::{GeminiError, GeminiErrorKind, StoryreelResult};
use storyreel_interface::GenerativeModel;
use tracing::{debug, error, info, instrument, warn};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Upper bound on error body text carried into error messages.
const MAX_ERROR_BODY: usize = 512;

//
// ─── CLIENT ─────────────────────────────────────────────────────────────────────
//

/// Client for the Google Gemini REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and rate limiter.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    config: GeminiConfig,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", self.config.base_url())
            .field("model", self.config.model())
            .field("rpm", self.config.rpm())
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client with default settings.
    ///
    /// Reads the API key from the `GEMINI_API_KEY` environment variable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use storyreel_models::GeminiClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiClient::new()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new")]
    pub fn new() -> GeminiResult<Self> {
        Self::with_config(GeminiConfig::default())
    }

    /// Create a client from configuration, reading the key from the environment.
    #[instrument(name = "gemini_client_with_config", skip(config))]
    pub fn with_config(config: GeminiConfig) -> GeminiResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>, config: GeminiConfig) -> GeminiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        let limiter = (*config.rpm()).and_then(|rpm| {
            NonZeroU32::new(rpm).map(|n| Arc::new(RateLimiter::direct(Quota::per_minute(n))))
        });

        debug!(
            base_url = %config.base_url(),
            model = %config.model(),
            rpm = ?config.rpm(),
            max_retries = config.max_retries(),
            "Created Gemini client"
        );

        Ok(Self {
            http,
            api_key: api_key.into(),
            config,
            limiter,
        })
    }

    /// Transport configuration in effect.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.config.base_url(), model)
    }

    /// Send one request, waiting on the rate limiter first.
    async fn send_once(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeminiError::new(GeminiErrorKind::Timeout(e.to_string()))
                } else {
                    GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| message.is_char_boundary(*i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            error!(status = %status, model, "Gemini API returned error status");
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        response.json::<GenerateContentResponse>().await.map_err(|e| {
            if e.is_timeout() {
                GeminiError::new(GeminiErrorKind::Timeout(e.to_string()))
            } else {
                GeminiError::new(GeminiErrorKind::InvalidResponse(e.to_string()))
            }
        })
    }

    /// Send with the configured retry policy.
    async fn send_with_retry(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};

        let first = self.send_once(model, body).await;
        let max_retries = *self.config.max_retries();
        if max_retries == 0 {
            return first;
        }

        let err = match first {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };
        if !err.kind.is_retryable() {
            warn!(error = %err, "Permanent Gemini error, failing immediately");
            return Err(err);
        }

        // Error-specific profile; the configured attempt count always wins
        let (mut initial_ms, max_delay_secs) = err.kind.retry_strategy_params();
        if let Some(override_backoff) = self.config.retry_backoff_ms() {
            initial_ms = *override_backoff;
        }

        info!(
            error = %err,
            model,
            initial_backoff_ms = initial_ms,
            max_retries,
            max_delay_secs,
            "Gemini request failed, will retry with configured strategy"
        );

        let retry_strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(max_retries);

        Retry::spawn(retry_strategy, move || async move {
            match self.send_once(model, body).await {
                Ok(response) => Ok(response),
                Err(e) if e.kind.is_retryable() => {
                    warn!(error = %e, "Gemini request failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "Permanent Gemini error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await
    }

    /// Generate content for a request.
    #[instrument(
        name = "gemini_generate",
        skip(self, req),
        fields(
            model = req.model().as_deref().unwrap_or(self.config.model().as_str()),
            messages = req.messages().len(),
            modalities = ?req.response_modalities(),
        )
    )]
    pub async fn generate_content(&self, req: &GenerateRequest) -> GeminiResult<GenerateResponse> {
        let model = req.model().as_deref().unwrap_or(self.config.model().as_str());
        let body = GenerateContentRequest::from_request(req);

        let response = self.send_with_retry(model, &body).await?;
        if response.candidates.is_empty() {
            warn!(feedback = ?response.prompt_feedback, "Gemini returned no candidates");
        } else if let Some(reason) = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            debug!(finish_reason = reason, "Gemini candidate finished");
        }

        let response = response.into_response()?;
        debug!(outputs = response.outputs.len(), "Gemini request complete");
        Ok(response)
    }
}

//
// ─── TRAIT IMPL ─────────────────────────────────────────────────────────────────
//

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, req: &GenerateRequest) -> StoryreelResult<GenerateResponse> {
        Ok(self.generate_content(req).await?)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}
