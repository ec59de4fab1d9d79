//! Raw PCM decoding.

use thiserror::Error;

use super::{Format, OUTPUT_FORMAT, PlayableBuffer};
use crate::device::OutputContext;

/// Error type for PCM decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The byte length is not a whole number of frames.
    #[error("pcm length {len} is not a multiple of {frame_bytes} bytes")]
    Misaligned { len: usize, frame_bytes: usize },
}

/// Decodes speech-service audio (16-bit LE mono PCM at 24 kHz).
///
/// The buffer is allocated through `ctx`. An odd byte count fails with
/// [`DecodeError::Misaligned`].
pub fn decode_pcm(data: &[u8], ctx: &dyn OutputContext) -> Result<PlayableBuffer, DecodeError> {
    decode_pcm_with(data, OUTPUT_FORMAT, ctx)
}

/// Decodes interleaved 16-bit LE PCM of the given format into planar
/// channels, dividing every sample by 32768.
pub fn decode_pcm_with(
    data: &[u8],
    format: Format,
    ctx: &dyn OutputContext,
) -> Result<PlayableBuffer, DecodeError> {
    let frame_bytes = format.frame_bytes();
    if data.len() % frame_bytes != 0 {
        return Err(DecodeError::Misaligned {
            len: data.len(),
            frame_bytes,
        });
    }

    let channels = format.channels() as usize;
    let frames = data.len() / frame_bytes;
    let mut buffer = ctx.create_buffer(channels, frames, format.sample_rate);

    for channel in 0..channels {
        let Some(dst) = buffer.channel_data_mut(channel) else {
            continue;
        };
        let samples = data
            .chunks_exact(2)
            .skip(channel)
            .step_by(channels)
            .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0);
        for (out, sample) in dst.iter_mut().zip(samples) {
            *out = sample;
        }
    }

    Ok(buffer)
}
