//! Placeholder video synthesis.

use async_trait::async_trait;
use storyreel_core::Storyboard;
use storyreel_error::StoryreelResult;
use storyreel_interface::VideoSynthesizer;

/// URL returned when no other video location is configured.
pub const DEFAULT_VIDEO_URL: &str = "https://example.com/dummy-trailer.mp4";

/// Video synthesizer that returns a fixed URL.
///
/// No video is rendered; the trailer's audio track is real, its video
/// reference is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderVideo {
    url: String,
}

impl PlaceholderVideo {
    /// Return `url` for every trailer.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for PlaceholderVideo {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEO_URL)
    }
}

#[async_trait]
impl VideoSynthesizer for PlaceholderVideo {
    async fn synthesize(
        &self,
        _storyboard: &Storyboard,
        _script: &str,
    ) -> StoryreelResult<String> {
        Ok(self.url.clone())
    }
}
