//! Error types for the Storyreel pipeline.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Stage failures ([`StageError`]) are the ones the orchestrator records in
//! its `Failed` state; [`AudioError`] never escapes the encoder call site.
//!
//! # Examples
//!
//! ```
//! use storyreel_error::{ConfigError, StoryreelResult};
//!
//! fn fetch_data() -> StoryreelResult<String> {
//!     Err(ConfigError::new("GEMINI_API_KEY is empty"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod audio;
mod config;
mod error;
mod gemini;
mod json;
mod media;
mod pipeline;
mod stage;
mod storage;

pub use audio::{AudioError, AudioErrorKind};
pub use config::ConfigError;
pub use error::{StoryreelError, StoryreelErrorKind, StoryreelResult};
pub use gemini::{GeminiError, GeminiErrorKind, RetryableError};
pub use json::JsonError;
pub use media::{MediaError, MediaErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind, PipelineResult};
pub use stage::{Stage, StageError, StageErrorKind, StageResult};
pub use storage::{StorageError, StorageErrorKind};
