//! Input types for model requests.

use crate::{DataUri, DataEncoding, MediaSource};
use serde::{Deserialize, Serialize};

/// Supported input parts of a request.
///
/// # Examples
///
/// ```
/// use storyreel_core::{Input, MediaSource};
///
/// let text = Input::Text("A lone astronaut drifts".to_string());
///
/// let image = Input::Image {
///     mime: Some("image/png".to_string()),
///     source: MediaSource::Base64("iVBORw0KGgo=".to_string()),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),

    /// Image input (PNG, JPEG, WebP, etc.).
    Image {
        /// MIME type, e.g., "image/png"
        mime: Option<String>,
        /// Media source (base64 or raw bytes)
        source: MediaSource,
    },
}

impl Input {
    /// Build a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Input::Text(text.into())
    }

    /// Build an image part from a parsed data reference.
    ///
    /// Base64 payloads are passed through without re-encoding.
    pub fn image_from_data_uri(uri: &DataUri) -> Self {
        let source = match uri.encoding() {
            DataEncoding::Base64 => MediaSource::Base64(uri.payload().clone()),
            DataEncoding::Plain => MediaSource::Binary(uri.payload().as_bytes().to_vec()),
        };
        Input::Image {
            mime: Some(uri.mime_type().clone()),
            source,
        }
    }
}
