//! Trait definitions for the Storyreel pipeline.
//!
//! Stages talk to the outside world only through these traits, so a model
//! backend or video renderer can be swapped without touching pipeline code.

mod traits;

pub use traits::{GenerativeModel, VideoSynthesizer};
