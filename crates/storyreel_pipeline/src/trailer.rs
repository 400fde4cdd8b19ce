//! Trailer composition stage.

use crate::extraction::parse_json;
use crate::failure::{model_failure, request_failure};
use crate::prompts::{trailer_script_parts, trailer_script_schema};
use crate::video::PlaceholderVideo;
use serde::Deserialize;
use storyreel_audio::WavSpec;
use storyreel_core::{
    EncodedAudioTrack, GenerateRequest, Input, Message, Modality, SpeechConfig, Storyboard,
    TrailerResult,
};
use storyreel_error::{StageError, StageErrorKind, StageResult};
use storyreel_interface::{GenerativeModel, VideoSynthesizer};
use tracing::{debug, error, instrument};

#[derive(Debug, Deserialize)]
struct TrailerScript {
    script: String,
}

/// Writes, voices, and packages a trailer for a storyboard.
///
/// Two model calls: the narration script (text model, with every frame's
/// description and image) and the voice-over (speech model). The returned
/// PCM is wrapped in a WAV container using the stage's [`WavSpec`].
#[derive(Debug, Clone)]
pub struct TrailerStage<M, V = PlaceholderVideo> {
    model: M,
    text_model: String,
    speech_model: String,
    voice: SpeechConfig,
    audio: WavSpec,
    video: V,
}

impl<M: GenerativeModel, V: VideoSynthesizer> TrailerStage<M, V> {
    /// Create the stage.
    ///
    /// `audio` is validated ahead of time so encoding cannot fail on
    /// parameters once a run is under way.
    pub fn new(
        model: M,
        text_model: impl Into<String>,
        speech_model: impl Into<String>,
        voice: SpeechConfig,
        audio: WavSpec,
        video: V,
    ) -> Self {
        Self {
            model,
            text_model: text_model.into(),
            speech_model: speech_model.into(),
            voice,
            audio,
            video,
        }
    }

    /// Compose a trailer for `storyboard` in the given style.
    ///
    /// # Errors
    ///
    /// - `UpstreamUnavailable` if a model call or the video synthesizer fails
    /// - `ModelResponseInvalid` if a reply does not decode, no non-blank script
    ///   comes back, or the audio payload does not decode
    /// - `NoAudioReturned` if the speech reply carries no media
    #[instrument(skip(self, storyboard, style_prompt), fields(frames = storyboard.len()))]
    pub async fn compose_trailer(
        &self,
        storyboard: &Storyboard,
        style_prompt: &str,
    ) -> StageResult<TrailerResult> {
        let script = self.write_script(storyboard, style_prompt).await?;
        let audio_track = self.voice_over(&script).await?;
        let video_ref = self
            .video
            .synthesize(storyboard, &script)
            .await
            .map_err(|e| StageError::upstream(e.to_string()))?;

        debug!(video_ref = %video_ref, "Trailer composed");
        Ok(TrailerResult::new(video_ref, audio_track))
    }

    #[instrument(skip_all, fields(model = %self.text_model))]
    async fn write_script(
        &self,
        storyboard: &Storyboard,
        style_prompt: &str,
    ) -> StageResult<String> {
        let request = GenerateRequest::builder()
            .messages(vec![Message::user(trailer_script_parts(
                storyboard,
                style_prompt,
            ))])
            .model(self.text_model.clone())
            .response_modalities(vec![Modality::Text])
            .response_schema(trailer_script_schema())
            .build()
            .map_err(request_failure)?;

        let response = self
            .model
            .generate(&request)
            .await
            .map_err(model_failure)?;

        let TrailerScript { script } = parse_json(&response.text())?;
        if script.trim().is_empty() {
            error!("Trailer script reply was blank");
            return Err(StageError::invalid_response("trailer script is blank"));
        }
        debug!(script_len = script.len(), "Trailer script written");
        Ok(script)
    }

    #[instrument(skip_all, fields(model = %self.speech_model, voice = %self.voice.voice_name()))]
    async fn voice_over(&self, script: &str) -> StageResult<EncodedAudioTrack> {
        let request = GenerateRequest::builder()
            .messages(vec![Message::user(vec![Input::text(script)])])
            .model(self.speech_model.clone())
            .response_modalities(vec![Modality::Audio])
            .speech(self.voice.clone())
            .build()
            .map_err(request_failure)?;

        let response = self
            .model
            .generate(&request)
            .await
            .map_err(model_failure)?;

        let media = response
            .first_media()
            .ok_or_else(|| StageError::new(StageErrorKind::NoAudioReturned))?;
        let pcm = media.decode().map_err(|e| {
            error!(error = %e, "Voice payload did not decode");
            StageError::invalid_response(format!("audio payload did not decode: {}", e))
        })?;

        let wav = self.audio.encode(&pcm).map_err(|e| {
            StageError::invalid_response(format!("audio payload cannot be containerized: {}", e))
        })?;
        debug!(pcm_bytes = pcm.len(), wav_bytes = wav.len(), "Voice-over encoded");
        Ok(EncodedAudioTrack::from_wav_bytes(&wav))
    }
}
