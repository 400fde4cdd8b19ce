//! Output types from model responses.

use crate::DataUri;
use serde::{Deserialize, Serialize};

/// Supported output parts of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),

    /// Generated media (image or audio) as a parsed data reference.
    Media(DataUri),
}
