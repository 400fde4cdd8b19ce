//! Raw PCM to WAV command handler.

use super::commands::WavArgs;
use storyreel::{
    AudioConfig, StorageError, StorageErrorKind, StoryreelConfig, StoryreelResult,
};
use tracing::{info, instrument};

/// Wrap `args.input` in a WAV header and write it to `args.out`.
///
/// Format flags that are not given fall back to the configured speech format.
#[instrument(skip_all, fields(input = %args.input.display(), out = %args.out.display()))]
pub fn run_wav(config: &StoryreelConfig, args: WavArgs) -> StoryreelResult<()> {
    let audio = resolve_format(config.pipeline().audio(), &args);
    let spec = audio.to_spec()?;

    let pcm = std::fs::read(&args.input).map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            args.input.display(),
            e
        )))
    })?;
    let wav = spec.encode(&pcm)?;

    std::fs::write(&args.out, &wav).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            args.out.display(),
            e
        )))
    })?;

    info!(pcm_bytes = pcm.len(), wav_bytes = wav.len(), "WAV written");
    Ok(())
}

fn resolve_format(defaults: &AudioConfig, args: &WavArgs) -> AudioConfig {
    AudioConfig::new(
        args.channels.unwrap_or(*defaults.channels()),
        args.sample_rate.unwrap_or(*defaults.sample_rate()),
        args.bits_per_sample.unwrap_or(*defaults.bits_per_sample()),
    )
}
