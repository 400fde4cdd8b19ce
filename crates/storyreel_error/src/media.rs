//! Media reference errors.

/// Problems parsing or decoding a `data:` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MediaErrorKind {
    /// The string does not start with the `data:` scheme
    #[display("Missing 'data:' scheme")]
    MissingScheme,
    /// No comma separates the header from the payload
    #[display("Missing ',' delimiter between header and payload")]
    MissingDelimiter,
    /// The header declared no MIME type
    #[display("Missing MIME type")]
    MissingMimeType,
    /// Payload is not valid base64
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
}

/// Media error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The specific error condition
    pub kind: MediaErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl MediaError {
    /// Create a new MediaError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
