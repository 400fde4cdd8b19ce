//! The Storyreel generation pipeline.
//!
//! Three stateless stages turn a script into a trailer:
//!
//! 1. [`AnalysisStage`] decomposes the script into a summary, key scenes and
//!    visual elements.
//! 2. [`StoryboardStage`] illustrates every key scene, tolerating per-scene
//!    failure.
//! 3. [`TrailerStage`] writes a narration grounded in the storyboard, voices
//!    it, and wraps the returned PCM in a WAV container.
//!
//! The [`Orchestrator`] drives the stages as an explicit state machine and
//! publishes every transition on a watch channel.
//!
//! # Example
//!
//! ```no_run
//! use storyreel_pipeline::{Orchestrator, PipelineConfig};
//! # use storyreel_interface::GenerativeModel;
//! # async fn run<M: GenerativeModel + Clone + 'static>(model: M) -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Orchestrator::from_config(model, &PipelineConfig::default())?;
//! let storyboard = pipeline.submit_script("A lone astronaut drifts...").await?;
//! pipeline.edit_frame(0, "The capsule, tiny against the void")?;
//! let trailer = pipeline.confirm_storyboard(None).await?;
//! println!("{} frames, video at {}", storyboard.len(), trailer.video_ref());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analysis;
mod config;
mod extraction;
mod failure;
mod orchestrator;
mod prompts;
mod storyboard;
mod trailer;
mod video;

pub use analysis::AnalysisStage;
pub use config::{AudioConfig, PipelineConfig};
pub use extraction::{extract_json, parse_json};
pub use orchestrator::{Orchestrator, PipelineState, RunId, Snapshot};
pub use prompts::{DEFAULT_SCRIPT, DEFAULT_STYLE_PROMPT};
pub use storyboard::StoryboardStage;
pub use trailer::TrailerStage;
pub use video::{DEFAULT_VIDEO_URL, PlaceholderVideo};
