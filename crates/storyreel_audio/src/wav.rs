//! RIFF/WAVE header construction.

use storyreel_error::AudioError;

/// Length of the canonical PCM WAV header.
pub const WAV_HEADER_LEN: usize = 44;

/// Format tag for uncompressed linear PCM.
const FORMAT_PCM: u16 = 1;
/// Size of the `fmt ` chunk body for PCM.
const FMT_CHUNK_LEN: u32 = 16;
/// Bytes of header counted by the RIFF size field (everything after it, minus the data).
const RIFF_OVERHEAD: u32 = 36;

/// Validated PCM stream parameters.
///
/// Construction checks every constraint the header can express, so
/// [`WavSpec::encode`] only has to reject payloads too large for the
/// 32-bit size fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_getters::Getters)]
pub struct WavSpec {
    /// Interleaved channel count
    channels: u16,
    /// Samples per second per channel
    sample_rate: u32,
    /// Bits per sample; a multiple of 8
    bits_per_sample: u16,
}

impl WavSpec {
    /// Mono, 24 kHz, 16-bit: what speech models return.
    pub const SPEECH: WavSpec = WavSpec {
        channels: 1,
        sample_rate: 24_000,
        bits_per_sample: 16,
    };

    /// Validate stream parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if any value is zero, `bits_per_sample` is
    /// not a multiple of 8, or the derived block align / byte rate overflow
    /// their header fields.
    pub fn new(
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
    ) -> Result<Self, AudioError> {
        if channels == 0 {
            return Err(AudioError::invalid_parameter("channels", "must be positive"));
        }
        if sample_rate == 0 {
            return Err(AudioError::invalid_parameter("sample_rate", "must be positive"));
        }
        if bits_per_sample == 0 || bits_per_sample % 8 != 0 {
            return Err(AudioError::invalid_parameter(
                "bits_per_sample",
                format!("must be a positive multiple of 8, got {}", bits_per_sample),
            ));
        }

        let block_align = u32::from(channels) * u32::from(bits_per_sample / 8);
        if block_align > u32::from(u16::MAX) {
            return Err(AudioError::invalid_parameter(
                "channels",
                format!("block align {} does not fit in 16 bits", block_align),
            ));
        }
        if sample_rate.checked_mul(block_align).is_none() {
            return Err(AudioError::invalid_parameter(
                "sample_rate",
                "byte rate does not fit in 32 bits",
            ));
        }

        Ok(Self {
            channels,
            sample_rate,
            bits_per_sample,
        })
    }

    /// Bytes per sample frame (all channels).
    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    /// Bytes per second.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }

    /// Wrap `samples` in a WAV container.
    ///
    /// The data chunk length equals `samples.len()` exactly; no padding byte
    /// is appended, so the output is always `44 + samples.len()` bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the payload is too large for the RIFF
    /// size field.
    pub fn encode(&self, samples: &[u8]) -> Result<Vec<u8>, AudioError> {
        let data_len = u32::try_from(samples.len())
            .ok()
            .filter(|len| len.checked_add(RIFF_OVERHEAD).is_some())
            .ok_or_else(|| {
                AudioError::invalid_parameter(
                    "samples",
                    format!("{} bytes exceeds the RIFF size limit", samples.len()),
                )
            })?;

        let mut bytes = Vec::with_capacity(WAV_HEADER_LEN + samples.len());

        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(RIFF_OVERHEAD + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");

        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
        bytes.extend_from_slice(&FORMAT_PCM.to_le_bytes());
        bytes.extend_from_slice(&self.channels.to_le_bytes());
        bytes.extend_from_slice(&self.sample_rate.to_le_bytes());
        bytes.extend_from_slice(&self.byte_rate().to_le_bytes());
        bytes.extend_from_slice(&self.block_align().to_le_bytes());
        bytes.extend_from_slice(&self.bits_per_sample.to_le_bytes());

        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.extend_from_slice(samples);

        tracing::trace!(
            channels = self.channels,
            sample_rate = self.sample_rate,
            bits_per_sample = self.bits_per_sample,
            data_len,
            "Encoded WAV container"
        );

        Ok(bytes)
    }
}

/// Encode `samples` as a WAV file with the given stream parameters.
///
/// # Errors
///
/// Returns `InvalidParameter` for zero channels or sample rate, for
/// `bits_per_sample` that is zero or not a multiple of 8, and for payloads
/// too large for the container.
pub fn encode(
    samples: &[u8],
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
) -> Result<Vec<u8>, AudioError> {
    WavSpec::new(channels, sample_rate, bits_per_sample)?.encode(samples)
}

/// Fields read back from a canonical 44-byte PCM WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct WavHeader {
    /// RIFF chunk size (file length minus 8)
    riff_len: u32,
    /// Audio format tag
    format: u16,
    /// Stream parameters
    spec: WavSpec,
    /// Declared byte rate
    byte_rate: u32,
    /// Declared block align
    block_align: u16,
    /// Declared data chunk length
    data_len: u32,
}

impl WavHeader {
    /// Read the canonical header at the start of `bytes`.
    ///
    /// Only the fixed layout produced by [`WavSpec::encode`] is understood.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is shorter than 44 bytes, a chunk tag
    /// does not match, or the stream parameters are invalid.
    pub fn parse(bytes: &[u8]) -> Result<Self, AudioError> {
        if bytes.len() < WAV_HEADER_LEN {
            return Err(AudioError::invalid_parameter(
                "header",
                format!("{} bytes is shorter than a WAV header", bytes.len()),
            ));
        }
        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(AudioError::invalid_parameter("header", "missing RIFF/WAVE tags"));
        }
        if &bytes[12..16] != b"fmt " || &bytes[36..40] != b"data" {
            return Err(AudioError::invalid_parameter("header", "unexpected chunk layout"));
        }

        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        Ok(Self {
            riff_len: u32_at(4),
            format: u16_at(20),
            spec: WavSpec::new(u16_at(22), u32_at(24), u16_at(34))?,
            byte_rate: u32_at(28),
            block_align: u16_at(32),
            data_len: u32_at(40),
        })
    }
}
