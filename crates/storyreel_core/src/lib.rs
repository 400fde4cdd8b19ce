//! Core data types for the Storyreel generation pipeline.
//!
//! This crate holds the artifacts that flow through a run (analysis,
//! storyboard, trailer) and the provider-agnostic request/response types
//! exchanged with a generative model.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analysis;
mod data_uri;
mod input;
mod media;
mod message;
mod output;
mod request;
mod storyboard;
mod trailer;

pub use analysis::{AnalysisResult, ScriptText};
pub use data_uri::{DataEncoding, DataUri};
pub use input::Input;
pub use media::MediaSource;
pub use message::Message;
pub use output::Output;
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateRequestBuilderError, GenerateResponse,
    Modality, SpeechConfig,
};
pub use storyboard::{FrameImage, Storyboard, StoryboardFrame};
pub use trailer::{EncodedAudioTrack, TrailerResult, WAV_MIME_TYPE};
