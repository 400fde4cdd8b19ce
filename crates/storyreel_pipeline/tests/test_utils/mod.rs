//! Test utilities for pipeline tests.
//!
//! This module provides a scripted model and fixture builders.

pub mod mock_model;

#[allow(unused_imports)]
pub use mock_model::{
    IMAGE_MODEL, MockModel, MockReply, SPEECH_MODEL, TEXT_MODEL, analysis_reply, audio_reply,
    image_reply, script_reply,
};
