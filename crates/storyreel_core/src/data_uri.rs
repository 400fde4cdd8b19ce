//! Parsed `data:` references.
//!
//! Models hand media back as `data:<mime>[;param]*[;base64],<payload>`
//! strings. Those are parsed once at the collaborator boundary into a
//! [`DataUri`]; nothing downstream scans the raw string again.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use storyreel_error::{MediaError, MediaErrorKind};

/// How the payload of a data reference is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataEncoding {
    /// `;base64` was declared
    Base64,
    /// Payload is carried verbatim
    Plain,
}

/// A validated `data:` reference.
///
/// # Examples
///
/// ```
/// use storyreel_core::{DataEncoding, DataUri};
///
/// let uri: DataUri = "data:audio/L16;codec=pcm;rate=24000;base64,AAEC".parse().unwrap();
/// assert_eq!(uri.mime_type(), "audio/L16");
/// assert_eq!(uri.parameter("rate"), Some("24000"));
/// assert_eq!(*uri.encoding(), DataEncoding::Base64);
/// assert_eq!(uri.decode().unwrap(), vec![0, 1, 2]);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(try_from = "String", into = "String")]
pub struct DataUri {
    /// MIME type, e.g. `image/png`
    mime_type: String,
    /// Header parameters in declaration order, e.g. `("rate", "24000")`
    parameters: Vec<(String, String)>,
    /// Payload encoding
    encoding: DataEncoding,
    /// Payload exactly as it appeared after the delimiter
    payload: String,
}

impl DataUri {
    /// Build a base64 data reference from raw bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::from_base64(mime_type, STANDARD.encode(bytes))
    }

    /// Build a data reference around an already base64-encoded payload.
    pub fn from_base64(mime_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            parameters: Vec::new(),
            encoding: DataEncoding::Base64,
            payload: payload.into(),
        }
    }

    /// Look up a header parameter by name (case-insensitive).
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether the MIME type is an image type.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Whether the MIME type is an audio type.
    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }

    /// Decode the payload into bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MediaErrorKind::Base64Decode`] if a base64 payload is malformed.
    pub fn decode(&self) -> Result<Vec<u8>, MediaError> {
        match self.encoding {
            DataEncoding::Base64 => STANDARD
                .decode(self.payload.trim())
                .map_err(|e| MediaError::new(MediaErrorKind::Base64Decode(e.to_string()))),
            DataEncoding::Plain => Ok(self.payload.as_bytes().to_vec()),
        }
    }
}

impl FromStr for DataUri {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| MediaError::new(MediaErrorKind::MissingScheme))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| MediaError::new(MediaErrorKind::MissingDelimiter))?;

        let mut segments = header.split(';');
        let mime_type = segments.next().unwrap_or_default().trim();
        if mime_type.is_empty() {
            return Err(MediaError::new(MediaErrorKind::MissingMimeType));
        }

        let mut encoding = DataEncoding::Plain;
        let mut parameters = Vec::new();
        for segment in segments {
            let segment = segment.trim();
            if segment.eq_ignore_ascii_case("base64") {
                encoding = DataEncoding::Base64;
            } else if let Some((key, value)) = segment.split_once('=') {
                parameters.push((key.trim().to_string(), value.trim().to_string()));
            } else if !segment.is_empty() {
                parameters.push((segment.to_string(), String::new()));
            }
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            parameters,
            encoding,
            payload: payload.to_string(),
        })
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{}", self.mime_type)?;
        for (key, value) in &self.parameters {
            if value.is_empty() {
                write!(f, ";{}", key)?;
            } else {
                write!(f, ";{}={}", key, value)?;
            }
        }
        if self.encoding == DataEncoding::Base64 {
            f.write_str(";base64")?;
        }
        write!(f, ",{}", self.payload)
    }
}

impl TryFrom<String> for DataUri {
    type Error = MediaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataUri> for String {
    fn from(uri: DataUri) -> Self {
        uri.to_string()
    }
}
