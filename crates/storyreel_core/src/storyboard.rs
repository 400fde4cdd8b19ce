//! Storyboard frames.

use crate::DataUri;
use serde::{Deserialize, Serialize};
use storyreel_error::{PipelineError, PipelineErrorKind};

/// Image slot of a storyboard frame.
///
/// `Failed` is a recoverable per-frame outcome, not an error: the frame
/// keeps its description and the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "imageRef", rename_all = "lowercase")]
pub enum FrameImage {
    /// Not generated yet
    #[default]
    Pending,
    /// Generated image
    Ready(DataUri),
    /// Generation failed for this frame
    Failed,
}

impl FrameImage {
    /// Whether an image is available.
    pub fn is_ready(&self) -> bool {
        matches!(self, FrameImage::Ready(_))
    }

    /// Whether generation failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, FrameImage::Failed)
    }
}

/// One storyboard entry: an image paired with an editable scene description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardFrame {
    /// Image slot
    image: FrameImage,
    /// Scene description; starts as the key-scene text
    scene_description: String,
}

impl StoryboardFrame {
    /// Create a frame.
    pub fn new(image: FrameImage, scene_description: impl Into<String>) -> Self {
        Self {
            image,
            scene_description: scene_description.into(),
        }
    }

    /// Image reference as a URI string; empty when no image is available.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_core::{FrameImage, StoryboardFrame};
    ///
    /// let frame = StoryboardFrame::new(FrameImage::Failed, "Earth in the distance");
    /// assert_eq!(frame.image_ref(), "");
    /// ```
    pub fn image_ref(&self) -> String {
        match &self.image {
            FrameImage::Ready(uri) => uri.to_string(),
            FrameImage::Pending | FrameImage::Failed => String::new(),
        }
    }
}

/// Ordered storyboard frames.
///
/// The frame count and order are fixed at construction; only descriptions
/// can change afterwards.
///
/// # Examples
///
/// ```
/// use storyreel_core::{FrameImage, Storyboard, StoryboardFrame};
///
/// let mut storyboard = Storyboard::new(vec![
///     StoryboardFrame::new(FrameImage::Failed, "capsule interior"),
///     StoryboardFrame::new(FrameImage::Failed, "red light"),
/// ]);
/// storyboard.set_description(1, "a red warning light pulses").unwrap();
/// assert_eq!(storyboard.frames()[1].scene_description(), "a red warning light pulses");
/// assert!(storyboard.set_description(2, "nope").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Storyboard {
    frames: Vec<StoryboardFrame>,
}

impl Storyboard {
    /// Create a storyboard from frames in scene order.
    pub fn new(frames: Vec<StoryboardFrame>) -> Self {
        Self { frames }
    }

    /// Frames in scene order.
    pub fn frames(&self) -> &[StoryboardFrame] {
        &self.frames
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the storyboard has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames whose image failed to generate.
    pub fn failed_count(&self) -> usize {
        self.frames.iter().filter(|f| f.image.is_failed()).count()
    }

    /// Replace the description of frame `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineErrorKind::FrameOutOfRange`] if `index` is past the end.
    pub fn set_description(
        &mut self,
        index: usize,
        description: impl Into<String>,
    ) -> Result<(), PipelineError> {
        let len = self.frames.len();
        let frame = self
            .frames
            .get_mut(index)
            .ok_or_else(|| PipelineError::new(PipelineErrorKind::FrameOutOfRange { index, len }))?;
        frame.scene_description = description.into();
        Ok(())
    }
}
