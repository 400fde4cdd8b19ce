//! Full pipeline command handler.

use super::commands::GenerateArgs;
use serde::Serialize;
use std::path::{Path, PathBuf};
use storyreel::{
    AnalysisResult, DEFAULT_SCRIPT, FrameImage, GeminiClient, JsonError, Orchestrator, Storyboard,
    StorageError, StorageErrorKind, StoryreelConfig, StoryreelResult, TrailerResult,
};
use tokio::io::AsyncReadExt;
use tracing::{info, instrument, warn};

/// Summary written next to the generated media.
#[derive(Debug, Serialize)]
struct TrailerManifest<'a> {
    video_ref: &'a str,
    voice_over: &'static str,
    style_prompt: &'a str,
    frames: Vec<FrameManifest<'a>>,
}

#[derive(Debug, Serialize)]
struct FrameManifest<'a> {
    index: usize,
    scene_description: &'a str,
    image: Option<String>,
}

/// Run analysis, storyboard, edits and trailer, writing every artifact to `args.out`.
///
/// # Errors
///
/// Returns an error if the script cannot be read, the client cannot be
/// built, any stage fails, or an output file cannot be written.
#[instrument(skip_all, fields(out = %args.out.display()))]
pub async fn run_generate(config: &StoryreelConfig, args: GenerateArgs) -> StoryreelResult<()> {
    let script = read_script(args.script.as_deref()).await?;

    let client = GeminiClient::with_config(config.gemini().clone())?;
    let pipeline = Orchestrator::from_config(client, config.pipeline())?;

    info!(script_len = script.len(), "Submitting script");
    let storyboard = pipeline.submit_script(script).await?;
    info!(
        frames = storyboard.len(),
        failed = storyboard.failed_count(),
        "Storyboard ready"
    );

    for edit in args.edits {
        info!(index = edit.index, "Editing frame");
        pipeline.edit_frame(edit.index, edit.description)?;
    }

    let style = args
        .style
        .unwrap_or_else(|| config.pipeline().default_style_prompt().clone());
    let trailer = pipeline.confirm_storyboard(Some(style.as_str())).await?;

    let state = pipeline.state();
    let (Some(analysis), Some(storyboard)) = (state.analysis(), state.storyboard()) else {
        warn!(state = state.name(), "Pipeline finished without a storyboard");
        return Ok(());
    };

    write_outputs(&args.out, analysis, storyboard, &trailer, &style).await?;
    println!("Trailer written to {}", args.out.display());
    Ok(())
}

async fn read_script(source: Option<&Path>) -> StoryreelResult<String> {
    match source {
        None => Ok(DEFAULT_SCRIPT.to_string()),
        Some(path) if path == Path::new("-") => {
            let mut script = String::new();
            tokio::io::stdin()
                .read_to_string(&mut script)
                .await
                .map_err(|e| {
                    StorageError::new(StorageErrorKind::FileRead(format!("stdin: {}", e)))
                })?;
            Ok(script)
        }
        Some(path) => Ok(tokio::fs::read_to_string(path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?),
    }
}

async fn write_outputs(
    out: &Path,
    analysis: &AnalysisResult,
    storyboard: &Storyboard,
    trailer: &TrailerResult,
    style_prompt: &str,
) -> StoryreelResult<()> {
    tokio::fs::create_dir_all(out).await.map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "{}: {}",
            out.display(),
            e
        )))
    })?;

    let analysis_json = serde_json::to_vec_pretty(analysis).map_err(JsonError::from)?;
    write_file(out.join("analysis.json"), analysis_json).await?;

    let mut frames = Vec::with_capacity(storyboard.len());
    for (index, frame) in storyboard.frames().iter().enumerate() {
        let image = match frame.image() {
            FrameImage::Ready(uri) => {
                let name = format!("frame_{}.{}", index, extension_for(uri.mime_type()));
                write_file(out.join(&name), uri.decode()?).await?;
                Some(name)
            }
            FrameImage::Pending | FrameImage::Failed => None,
        };
        frames.push(FrameManifest {
            index,
            scene_description: frame.scene_description(),
            image,
        });
    }

    write_file(out.join("voiceover.wav"), trailer.audio_track().decode()?).await?;

    let manifest = TrailerManifest {
        video_ref: trailer.video_ref(),
        voice_over: "voiceover.wav",
        style_prompt,
        frames,
    };
    let manifest_json = serde_json::to_vec_pretty(&manifest).map_err(JsonError::from)?;
    write_file(out.join("trailer.json"), manifest_json).await?;
    Ok(())
}

async fn write_file(path: PathBuf, bytes: Vec<u8>) -> StoryreelResult<()> {
    tokio::fs::write(&path, bytes).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!("{}: {}", path.display(), e)))
    })?;
    info!(path = %path.display(), "Wrote output");
    Ok(())
}

/// File extension for an image MIME type.
fn extension_for(mime_type: &str) -> &str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/svg+xml" => "svg",
        other => other
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .filter(|subtype| !subtype.is_empty())
            .unwrap_or("bin"),
    }
}
