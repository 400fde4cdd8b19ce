//! Prompt text for each model call.

use serde_json::{Value, json};
use storyreel_core::{FrameImage, Input, Storyboard};

/// Style prompt used when the caller supplies none.
pub const DEFAULT_STYLE_PROMPT: &str = "Create a dramatic and suspenseful trailer, similar to trailers for science fiction films like 'Interstellar' or 'Gravity'.";

/// Sample script offered when the caller supplies none.
pub const DEFAULT_SCRIPT: &str = "A lone astronaut drifts in a small capsule, silence broken only by the crackle of the radio. Earth is a distant blue marble. Suddenly, a red light flashes on the console. An alien signal.";

pub(crate) fn analysis_prompt(script: &str) -> String {
    format!(
        "You are a script analyst for the film industry. Analyze the following script or \
         story prompt and identify key scenes and visual elements.\n\n\
         Script/Prompt:\n{}\n\n\
         Provide a summary of the script, a list of key scenes, and a list of visual elements.",
        script
    )
}

pub(crate) fn image_prompt(scene: &str) -> String {
    format!(
        "Generate a visual representation of the following scene description: {}. \
         The image should be in a cinematic style.",
        scene.trim_end_matches('.')
    )
}

/// Parts of the trailer-script request: every frame's description followed
/// by its image when one was generated.
pub(crate) fn trailer_script_parts(storyboard: &Storyboard, style_prompt: &str) -> Vec<Input> {
    let mut parts = Vec::with_capacity(storyboard.len() * 2 + 2);
    parts.push(Input::text(
        "You are an expert trailer creator. Based on the following storyboard and trailer \
         prompt create a compelling script for the trailer.\n\nStoryboard:",
    ));
    for frame in storyboard.frames() {
        parts.push(Input::text(format!(
            "Scene Description: {}",
            frame.scene_description()
        )));
        if let FrameImage::Ready(uri) = frame.image() {
            parts.push(Input::image_from_data_uri(uri));
        }
    }
    parts.push(Input::text(format!(
        "Trailer Prompt: {}\n\nReply with the trailer script as JSON: {{\"script\": \"...\"}}",
        style_prompt
    )));
    parts
}

pub(crate) fn trailer_script_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "script": {"type": "STRING", "description": "The script for the trailer."}
        },
        "required": ["script"]
    })
}
