//! Generative model drivers for Storyreel.
//!
//! # Available Providers
//!
//! - **Gemini** (Google) - REST `generateContent`, covering text, structured
//!   JSON, image generation, and text-to-speech
//!
//! # Example
//!
//! ```no_run
//! use storyreel_models::GeminiClient;
//! use storyreel_interface::GenerativeModel;
//! use storyreel_core::{GenerateRequest, Input, Message};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new()?;
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user(vec![Input::text("Hello")])])
//!     .build()?;
//! let response = client.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig, GeminiResult};
