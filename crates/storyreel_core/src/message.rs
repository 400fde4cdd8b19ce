//! Message types for model requests.

use crate::Input;
use serde::{Deserialize, Serialize};

/// A multimodal user turn.
///
/// Every stage sends a single self-contained prompt, so a message carries
/// content only.
///
/// # Examples
///
/// ```
/// use storyreel_core::{Message, Input};
///
/// let message = Message::user(vec![Input::Text("Hello!".to_string())]);
///
/// assert_eq!(message.content.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The content of the message (can be multimodal)
    pub content: Vec<Input>,
}

impl Message {
    /// Create a user message.
    pub fn user(content: Vec<Input>) -> Self {
        Self { content }
    }
}
