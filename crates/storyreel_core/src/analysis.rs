//! Script input and analysis result.

use serde::{Deserialize, Serialize};

/// Free-text script or story prompt submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct ScriptText(String);

impl ScriptText {
    /// Wrap a script.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Whether the script has no visible content.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Borrow the script text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScriptText {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ScriptText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Structured decomposition of a script.
///
/// Every field is required when deserializing; a model reply missing any of
/// them is rejected.
///
/// # Examples
///
/// ```
/// use storyreel_core::AnalysisResult;
///
/// let json = r#"{"summary":"s","keyScenes":["a","b"],"visualElements":["red light"]}"#;
/// let analysis: AnalysisResult = serde_json::from_str(json).unwrap();
/// assert_eq!(analysis.key_scenes().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Short summary of the script
    summary: String,
    /// Key scenes in story order, one storyboard frame each
    key_scenes: Vec<String>,
    /// Notable visual elements
    visual_elements: Vec<String>,
}

impl AnalysisResult {
    /// Create an analysis result.
    pub fn new(
        summary: impl Into<String>,
        key_scenes: Vec<String>,
        visual_elements: Vec<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            key_scenes,
            visual_elements,
        }
    }

    /// JSON schema of this type, for structured-output requests.
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "summary": { "type": "STRING" },
                "keyScenes": { "type": "ARRAY", "items": { "type": "STRING" } },
                "visualElements": { "type": "ARRAY", "items": { "type": "STRING" } }
            },
            "required": ["summary", "keyScenes", "visualElements"]
        })
    }
}
