//! Pipeline state machine.
//!
//! ```text
//! Idle --submit--> Analyzing --ok--> Storyboarding --ok--> Editing
//!      --confirm--> Trailering --ok--> Complete
//! ```
//!
//! Any stage failure moves to `Failed`. `restart` returns to `Idle` from
//! every state. The orchestrator is the only writer of [`PipelineState`];
//! stages never see it.
//!
//! Each submit and restart starts a new run. A stage result is applied only
//! if its run is still current, so a restart while a request is in flight
//! discards that request's result when it lands.

use crate::analysis::AnalysisStage;
use crate::config::PipelineConfig;
use crate::storyboard::StoryboardStage;
use crate::trailer::TrailerStage;
use crate::video::PlaceholderVideo;
use storyreel_core::{AnalysisResult, ScriptText, SpeechConfig, Storyboard, TrailerResult};
use storyreel_error::{
    AudioError, PipelineError, PipelineErrorKind, PipelineResult, Stage, StageError,
};
use storyreel_interface::{GenerativeModel, VideoSynthesizer};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Monotonic run counter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, derive_more::Display,
)]
#[display("run-{}", _0)]
pub struct RunId(u64);

impl RunId {
    /// Raw counter value.
    pub fn value(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Where a pipeline run stands, with the artifacts produced so far.
#[derive(Debug, Clone, Default)]
pub enum PipelineState {
    /// Waiting for a script
    #[default]
    Idle,
    /// Script analysis in flight
    Analyzing,
    /// Scene images in flight
    Storyboarding {
        /// Analysis of the submitted script
        analysis: AnalysisResult,
    },
    /// Storyboard ready; frame descriptions may be edited
    Editing {
        /// Analysis of the submitted script
        analysis: AnalysisResult,
        /// Frames, one per key scene
        storyboard: Storyboard,
    },
    /// Trailer script and voice-over in flight
    Trailering {
        /// Analysis of the submitted script
        analysis: AnalysisResult,
        /// Confirmed storyboard
        storyboard: Storyboard,
    },
    /// Run finished
    Complete {
        /// Analysis of the submitted script
        analysis: AnalysisResult,
        /// Confirmed storyboard
        storyboard: Storyboard,
        /// Finished trailer
        trailer: TrailerResult,
    },
    /// A stage failed; earlier artifacts are discarded
    Failed {
        /// Stage that failed
        stage: Stage,
        /// Failure cause
        cause: StageError,
    },
}

impl PipelineState {
    /// State name, as used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Analyzing => "Analyzing",
            Self::Storyboarding { .. } => "Storyboarding",
            Self::Editing { .. } => "Editing",
            Self::Trailering { .. } => "Trailering",
            Self::Complete { .. } => "Complete",
            Self::Failed { .. } => "Failed",
        }
    }

    /// Whether only `restart` can leave this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Failed { .. })
    }

    /// Analysis, if the run has one.
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Storyboarding { analysis }
            | Self::Editing { analysis, .. }
            | Self::Trailering { analysis, .. }
            | Self::Complete { analysis, .. } => Some(analysis),
            _ => None,
        }
    }

    /// Storyboard, if the run has one.
    pub fn storyboard(&self) -> Option<&Storyboard> {
        match self {
            Self::Editing { storyboard, .. }
            | Self::Trailering { storyboard, .. }
            | Self::Complete { storyboard, .. } => Some(storyboard),
            _ => None,
        }
    }

    /// Trailer, once complete.
    pub fn trailer(&self) -> Option<&TrailerResult> {
        match self {
            Self::Complete { trailer, .. } => Some(trailer),
            _ => None,
        }
    }

    /// Failing stage and cause, if failed.
    pub fn failure(&self) -> Option<(Stage, &StageError)> {
        match self {
            Self::Failed { stage, cause } => Some((*stage, cause)),
            _ => None,
        }
    }
}

/// State paired with the run it belongs to, as published to subscribers.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Current run
    pub run: RunId,
    /// Current state
    pub state: PipelineState,
}

#[track_caller]
fn invalid_transition(operation: &'static str, state: &PipelineState) -> PipelineError {
    PipelineError::new(PipelineErrorKind::InvalidTransition {
        operation,
        state: state.name().to_string(),
    })
}

/// Drives analysis, storyboard, and trailer stages for one session.
///
/// `Send + Sync`; share it behind an `Arc` to observe or restart a run from
/// another task while a stage is in flight.
pub struct Orchestrator<M, V = PlaceholderVideo> {
    analysis: AnalysisStage<M>,
    storyboard: StoryboardStage<M>,
    trailer: TrailerStage<M, V>,
    default_style: String,
    state: watch::Sender<Snapshot>,
}

impl<M, V> std::fmt::Debug for Orchestrator<M, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.state.borrow();
        f.debug_struct("Orchestrator")
            .field("run", &snapshot.run)
            .field("state", &snapshot.state.name())
            .finish_non_exhaustive()
    }
}

impl<M: GenerativeModel + Clone> Orchestrator<M, PlaceholderVideo> {
    /// Build all three stages from configuration, sharing one model client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configured audio format is invalid.
    pub fn from_config(model: M, config: &PipelineConfig) -> Result<Self, AudioError> {
        let video = PlaceholderVideo::new(config.placeholder_video_url());
        Self::with_video(model, config, video)
    }
}

impl<M: GenerativeModel + Clone, V: VideoSynthesizer> Orchestrator<M, V> {
    /// Build from configuration with a custom video synthesizer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configured audio format is invalid.
    pub fn with_video(model: M, config: &PipelineConfig, video: V) -> Result<Self, AudioError> {
        let audio = config.audio().to_spec()?;
        Ok(Self::new(
            AnalysisStage::new(model.clone(), config.text_model()),
            StoryboardStage::new(
                model.clone(),
                config.image_model(),
                *config.image_concurrency(),
            ),
            TrailerStage::new(
                model,
                config.text_model(),
                config.speech_model(),
                SpeechConfig::new(config.voice_name()),
                audio,
                video,
            ),
            config.default_style_prompt(),
        ))
    }
}

impl<M: GenerativeModel, V: VideoSynthesizer> Orchestrator<M, V> {
    /// Assemble from prebuilt stages.
    pub fn new(
        analysis: AnalysisStage<M>,
        storyboard: StoryboardStage<M>,
        trailer: TrailerStage<M, V>,
        default_style: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(Snapshot::default());
        Self {
            analysis,
            storyboard,
            trailer,
            default_style: default_style.into(),
            state,
        }
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.state.borrow().state.clone()
    }

    /// Current run.
    pub fn run_id(&self) -> RunId {
        self.state.borrow().run
    }

    /// Current state and run together.
    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }

    /// Observe every state change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.subscribe()
    }

    /// Analyze a script and illustrate its key scenes.
    ///
    /// Valid only in `Idle`. On success the pipeline is in `Editing` and the
    /// new storyboard is returned.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if not `Idle`
    /// - `EmptyScript` if the script is blank (state stays `Idle`)
    /// - `StageFailed` if analysis fails (state becomes `Failed`)
    /// - `StaleRun` if a restart happened while a stage was in flight
    #[instrument(skip(self, script))]
    pub async fn submit_script(&self, script: impl Into<ScriptText>) -> PipelineResult<Storyboard> {
        let script = script.into();
        let run = self.transition(|snap| {
            if !matches!(snap.state, PipelineState::Idle) {
                return Err(invalid_transition("submit a script", &snap.state));
            }
            if script.is_blank() {
                return Err(PipelineError::new(PipelineErrorKind::EmptyScript));
            }
            snap.run = snap.run.next();
            snap.state = PipelineState::Analyzing;
            Ok(snap.run)
        })?;

        let analysis = match self.analysis.analyze(&script).await {
            Ok(analysis) => analysis,
            Err(cause) => return Err(self.fail(run, Stage::Analyzing, cause)),
        };

        let scenes = analysis.key_scenes().clone();
        self.apply(run, |state| {
            *state = PipelineState::Storyboarding { analysis };
            Ok(())
        })?;

        let storyboard = self.storyboard.illustrate(&scenes).await;
        if storyboard.failed_count() > 0 {
            warn!(
                %run,
                failed = storyboard.failed_count(),
                frames = storyboard.len(),
                "Storyboard has frames without images"
            );
        }

        let ready = storyboard.clone();
        self.apply(run, |state| match std::mem::take(state) {
            PipelineState::Storyboarding { analysis } => {
                *state = PipelineState::Editing {
                    analysis,
                    storyboard,
                };
                Ok(())
            }
            other => {
                let err = invalid_transition("finish the storyboard", &other);
                *state = other;
                Err(err)
            }
        })?;
        Ok(ready)
    }

    /// Replace the description of one frame.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if not `Editing`
    /// - `FrameOutOfRange` if `index` is past the last frame
    pub fn edit_frame(&self, index: usize, description: impl Into<String>) -> PipelineResult<()> {
        let description = description.into();
        self.transition(|snap| match &mut snap.state {
            PipelineState::Editing { storyboard, .. } => {
                storyboard.set_description(index, description)
            }
            other => Err(invalid_transition("edit a frame", other)),
        })
    }

    /// Confirm the storyboard and compose the trailer.
    ///
    /// `style_prompt` falls back to the configured default when `None`.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if not `Editing`
    /// - `StageFailed` if trailer composition fails (state becomes `Failed`)
    /// - `StaleRun` if a restart happened while the stage was in flight
    #[instrument(skip(self, style_prompt))]
    pub async fn confirm_storyboard(
        &self,
        style_prompt: Option<&str>,
    ) -> PipelineResult<TrailerResult> {
        let style = style_prompt.unwrap_or(&self.default_style).to_string();
        let (run, storyboard) = self.transition(|snap| match std::mem::take(&mut snap.state) {
            PipelineState::Editing {
                analysis,
                storyboard,
            } => {
                let confirmed = storyboard.clone();
                snap.state = PipelineState::Trailering {
                    analysis,
                    storyboard,
                };
                Ok((snap.run, confirmed))
            }
            other => {
                let err = invalid_transition("confirm the storyboard", &other);
                snap.state = other;
                Err(err)
            }
        })?;

        let trailer = match self.trailer.compose_trailer(&storyboard, &style).await {
            Ok(trailer) => trailer,
            Err(cause) => return Err(self.fail(run, Stage::Trailering, cause)),
        };

        let finished = trailer.clone();
        self.apply(run, |state| match std::mem::take(state) {
            PipelineState::Trailering {
                analysis,
                storyboard,
            } => {
                *state = PipelineState::Complete {
                    analysis,
                    storyboard,
                    trailer,
                };
                Ok(())
            }
            other => {
                let err = invalid_transition("finish the trailer", &other);
                *state = other;
                Err(err)
            }
        })?;
        Ok(finished)
    }

    /// Discard everything and return to `Idle`.
    ///
    /// Accepted in every state. In-flight requests are not cancelled; their
    /// results are dropped when they arrive.
    pub fn restart(&self) -> RunId {
        let mut run = RunId::default();
        self.state.send_modify(|snap| {
            snap.run = snap.run.next();
            snap.state = PipelineState::Idle;
            run = snap.run;
        });
        info!(%run, "Pipeline restarted");
        run
    }

    /// Atomically inspect and update the snapshot.
    ///
    /// `f` must leave the snapshot untouched when it returns `Err`;
    /// subscribers are notified only on `Ok`.
    fn transition<T>(
        &self,
        f: impl FnOnce(&mut Snapshot) -> PipelineResult<T>,
    ) -> PipelineResult<T> {
        let mut outcome = None;
        self.state.send_if_modified(|snap| {
            let result = f(snap);
            let modified = result.is_ok();
            if modified {
                info!(run = %snap.run, state = snap.state.name(), "Pipeline state changed");
            }
            outcome = Some(result);
            modified
        });
        // send_if_modified always runs its closure exactly once
        outcome.unwrap_or_else(|| {
            Err(PipelineError::new(PipelineErrorKind::InvalidTransition {
                operation: "update state",
                state: self.state.borrow().state.name().to_string(),
            }))
        })
    }

    /// Apply a stage result if `run` is still current.
    fn apply<T>(
        &self,
        run: RunId,
        f: impl FnOnce(&mut PipelineState) -> PipelineResult<T>,
    ) -> PipelineResult<T> {
        self.transition(|snap| {
            if snap.run != run {
                debug!(%run, current = %snap.run, "Discarding stage result from superseded run");
                return Err(PipelineError::new(PipelineErrorKind::StaleRun {
                    run: run.value(),
                    current: snap.run.value(),
                }));
            }
            f(&mut snap.state)
        })
    }

    /// Record a stage failure, returning the error for the caller.
    fn fail(&self, run: RunId, stage: Stage, cause: StageError) -> PipelineError {
        warn!(%run, %stage, cause = %cause.kind, "Pipeline stage failed");
        let kind = PipelineErrorKind::StageFailed {
            stage,
            cause: cause.kind.clone(),
        };
        match self.apply(run, |state| {
            *state = PipelineState::Failed { stage, cause };
            Ok(())
        }) {
            Ok(()) => PipelineError::new(kind),
            Err(stale) => stale,
        }
    }
}
