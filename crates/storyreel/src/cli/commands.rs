//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Storyreel - turn a film script into a storyboard and a narrated trailer
#[derive(Parser, Debug)]
#[command(name = "storyreel")]
#[command(about = "Turn a film script into a storyboard and a narrated trailer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file applied on top of all other sources
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: analysis, storyboard, edits, trailer
    Generate(GenerateArgs),

    /// Wrap a raw PCM file in a WAV container
    Wav(WavArgs),
}

/// Arguments for `storyreel generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Script file, or `-` for stdin (defaults to a sample script)
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Trailer style prompt (defaults to the configured style)
    #[arg(long)]
    pub style: Option<String>,

    /// Replace a frame's scene description before the trailer is made
    #[arg(long = "edit", value_name = "N=TEXT")]
    pub edits: Vec<FrameEdit>,

    /// Directory that receives the generated files
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,
}

/// Arguments for `storyreel wav`.
///
/// Omitted format flags fall back to `[pipeline.audio]`.
#[derive(Args, Debug)]
pub struct WavArgs {
    /// Raw little-endian PCM input
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// WAV file to write
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    /// Channel count
    #[arg(long)]
    pub channels: Option<u16>,

    /// Samples per second
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Bits per sample
    #[arg(long = "bits")]
    pub bits_per_sample: Option<u16>,
}

/// A `N=TEXT` frame edit; `N` is the 0-based frame index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameEdit {
    /// Frame index
    pub index: usize,
    /// New scene description
    pub description: String,
}

impl FromStr for FrameEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, description) = s
            .split_once('=')
            .ok_or_else(|| format!("expected N=TEXT, got '{}'", s))?;
        let index = index
            .trim()
            .parse()
            .map_err(|e| format!("invalid frame index '{}': {}", index, e))?;
        Ok(Self {
            index,
            description: description.to_string(),
        })
    }
}
