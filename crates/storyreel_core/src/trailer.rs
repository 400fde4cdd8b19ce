//! Trailer artifacts.

use crate::DataUri;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use storyreel_error::MediaError;

/// MIME type of every encoded voice track.
pub const WAV_MIME_TYPE: &str = "audio/wav";

/// A voice-over track in WAV form, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct EncodedAudioTrack {
    /// Always `audio/wav`
    mime_type: String,
    /// Base64 of the complete WAV file
    base64_payload: String,
}

impl EncodedAudioTrack {
    /// Wrap a complete WAV file.
    pub fn from_wav_bytes(wav: &[u8]) -> Self {
        Self {
            mime_type: WAV_MIME_TYPE.to_string(),
            base64_payload: STANDARD.encode(wav),
        }
    }

    /// Render as a `data:audio/wav;base64,...` reference.
    pub fn to_data_uri(&self) -> DataUri {
        DataUri::from_base64(self.mime_type.clone(), self.base64_payload.clone())
    }

    /// Decode back to WAV bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, MediaError> {
        self.to_data_uri().decode()
    }
}

/// Terminal artifact of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct TrailerResult {
    /// Reference to the trailer video
    video_ref: String,
    /// Narration track
    audio_track: EncodedAudioTrack,
}

impl TrailerResult {
    /// Create a trailer result.
    pub fn new(video_ref: impl Into<String>, audio_track: EncodedAudioTrack) -> Self {
        Self {
            video_ref: video_ref.into(),
            audio_track,
        }
    }
}
