//! WAV container encoder.
//!
//! Wraps a raw linear-PCM buffer in the canonical 44-byte RIFF/WAVE header.
//! Encoding is a pure transform: no I/O, no shared state, deterministic
//! output.
//!
//! # Examples
//!
//! ```
//! use storyreel_audio::{WavSpec, encode, WAV_HEADER_LEN};
//!
//! let pcm = vec![0u8; 480];
//! let wav = encode(&pcm, 1, 24_000, 16).unwrap();
//! assert_eq!(wav.len(), WAV_HEADER_LEN + pcm.len());
//! assert_eq!(&wav[0..4], b"RIFF");
//!
//! let spec = WavSpec::new(1, 24_000, 16).unwrap();
//! assert_eq!(spec.encode(&pcm).unwrap(), wav);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod wav;

pub use wav::{WAV_HEADER_LEN, WavHeader, WavSpec, encode};
