//! Storyreel - script to storyboard to trailer.
//!
//! Storyreel sends a film script through three generative stages: an
//! analysis that extracts the key scenes, a storyboard with one generated
//! image per scene, and a trailer made of a narration script, a WAV
//! voice-over and a video reference. A human can revise scene descriptions
//! between the storyboard and the trailer.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use storyreel::{GeminiClient, Orchestrator, StoryreelConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryreelConfig::load()?;
//!     let client = GeminiClient::with_config(config.gemini().clone())?;
//!     let pipeline = Orchestrator::from_config(client, config.pipeline())?;
//!
//!     let storyboard = pipeline.submit_script("A lone astronaut drifts...").await?;
//!     println!("{} frames", storyboard.len());
//!
//!     let trailer = pipeline.confirm_storyboard(Some("Make it a thriller")).await?;
//!     println!("Trailer at {}", trailer.video_ref());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `storyreel_error` - Error types
//! - `storyreel_core` - Request, response and pipeline data types
//! - `storyreel_audio` - WAV container encoder
//! - `storyreel_interface` - `GenerativeModel` and `VideoSynthesizer` traits
//! - `storyreel_models` - Gemini REST driver
//! - `storyreel_pipeline` - Stages and the orchestrator state machine
//!
//! This crate (`storyreel`) re-exports everything for convenience and adds
//! layered configuration and logging setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod observability;

pub use config::StoryreelConfig;
pub use observability::{LoggingConfig, init_logging};

pub use storyreel_audio::*;
pub use storyreel_core::*;
pub use storyreel_error::*;
pub use storyreel_interface::*;
pub use storyreel_models::*;
pub use storyreel_pipeline::*;
