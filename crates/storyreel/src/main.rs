//! Storyreel CLI binary.
//!
//! This binary provides command-line access to Storyreel's functionality:
//! - Generate a storyboard and trailer from a script
//! - Wrap raw PCM audio in a WAV container

use clap::Parser;
use storyreel::{LoggingConfig, StoryreelConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_generate, run_wav};

    // GEMINI_API_KEY may live in a .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    init_logging(
        &LoggingConfig::default()
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )?;

    let config = StoryreelConfig::load_with(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate(args) => {
            run_generate(&config, args).await?;
        }

        Commands::Wav(args) => {
            run_wav(&config, args)?;
        }
    }

    Ok(())
}
