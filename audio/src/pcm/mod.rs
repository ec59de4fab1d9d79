//! PCM (Pulse Code Modulation) audio handling.
//!
//! # Key Types
//!
//! - [`Format`]: sample rate and channel layout of 16-bit PCM
//! - [`PlayableBuffer`]: decoded, normalized samples ready for an output device
//! - [`decode_pcm`]: raw speech-service bytes into a [`PlayableBuffer`]
//!
//! The speech service always answers with 16-bit little-endian mono PCM at
//! 24 kHz ([`OUTPUT_FORMAT`]). The payload carries no header, so the format
//! is assumed rather than detected.

mod buffer;
mod decode;
mod format;

pub use buffer::PlayableBuffer;
pub use decode::{decode_pcm, decode_pcm_with, DecodeError};
pub use format::{Format, OUTPUT_FORMAT};
