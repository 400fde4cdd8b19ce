//! Google Gemini API client implementation.
//!
//! The REST client supports:
//! - Per-request model selection
//! - Response modalities (text, image, audio) and speech configuration
//! - JSON response schemas for structured output
//! - Client-side request-per-minute limiting
//! - Optional retry with exponential backoff on transient failures

mod client;
mod config;
mod wire;

pub use client::GeminiClient;
pub use config::GeminiConfig;

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, storyreel_error::GeminiError>;
