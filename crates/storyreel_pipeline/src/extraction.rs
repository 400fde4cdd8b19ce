//! Pulling JSON objects out of model replies.
//!
//! Even with a response schema attached, models occasionally wrap the object
//! in a markdown fence or add a sentence before it. Both stages that expect
//! structured replies go through [`parse_json`].

use serde::de::DeserializeOwned;
use storyreel_error::{StageError, StageResult};

/// Locate the JSON object in a model reply.
///
/// Tries, in order: the whole reply, a fenced code block (```` ```json ````
/// or bare ```` ``` ````), then the first balanced `{ ... }` span.
///
/// # Errors
///
/// Returns [`ModelResponseInvalid`](storyreel_error::StageErrorKind::ModelResponseInvalid)
/// if the reply contains no object.
///
/// # Examples
///
/// ```
/// use storyreel_pipeline::extract_json;
///
/// let reply = "Here you go:\n```json\n{\"script\": \"In a world...\"}\n```";
/// assert_eq!(extract_json(reply).unwrap(), "{\"script\": \"In a world...\"}");
/// ```
pub fn extract_json(reply: &str) -> StageResult<&str> {
    let trimmed = reply.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Ok(trimmed);
    }

    if let Some(fenced) = fenced_block(trimmed).filter(|body| body.starts_with('{')) {
        return Ok(fenced);
    }

    if let Some(object) = balanced_object(trimmed) {
        return Ok(object);
    }

    tracing::error!(reply_length = reply.len(), "No JSON object found in model reply");
    Err(StageError::invalid_response(format!(
        "no JSON object in reply (length {})",
        reply.len()
    )))
}

/// Extract and deserialize a JSON object from a model reply.
///
/// # Errors
///
/// Returns [`ModelResponseInvalid`](storyreel_error::StageErrorKind::ModelResponseInvalid)
/// if no object is found or it does not match `T` (missing fields, wrong
/// types).
pub fn parse_json<T: DeserializeOwned>(reply: &str) -> StageResult<T> {
    let json = extract_json(reply)?;
    serde_json::from_str(json).map_err(|e| {
        tracing::error!(
            error = %e,
            target_type = std::any::type_name::<T>(),
            "Model reply did not match expected shape"
        );
        StageError::invalid_response(format!("reply does not match expected shape: {}", e))
    })
}

/// Body of the first fenced code block. An unterminated fence runs to the end.
fn fenced_block(reply: &str) -> Option<&str> {
    let start = reply.find("```")? + 3;
    // Skip the info string ("json", "JSON", ...)
    let body_start = reply[start..]
        .find('\n')
        .map(|n| start + n + 1)
        .unwrap_or(start);
    let body = match reply[body_start..].find("```") {
        Some(end) => &reply[body_start..body_start + end],
        None => &reply[body_start..],
    };
    Some(body.trim())
}

/// First `{ ... }` span with balanced braces, ignoring braces inside strings.
fn balanced_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in reply[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&reply[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}
