//! Sample containers produced by the recorder.
//!
//! A [`ContainerEncoder`] turns captured PCM blocks into encoded chunks as
//! they arrive and assembles the final container from those chunks when
//! recording stops.

use std::io::Cursor;

use thiserror::Error;

use crate::pcm::Format;

/// Error type for container encoding.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    /// A chunk was not produced by this encoder.
    #[error("invalid chunk: {0}")]
    InvalidChunk(String),
}

/// Packages captured PCM into a single container blob.
pub trait ContainerEncoder: Send {
    /// Returns the MIME type of the finished container.
    fn mime_type(&self) -> &str;

    /// Encodes one block of interleaved samples into a chunk.
    fn encode(&mut self, block: &[i16]) -> Result<Vec<u8>, ContainerError>;

    /// Assembles the container from every chunk in emission order.
    fn finish(self: Box<Self>, chunks: &[Vec<u8>]) -> Result<Vec<u8>, ContainerError>;
}

/// Encodes captured audio as a 16-bit PCM WAV file (`audio/wav`).
#[derive(Debug, Clone)]
pub struct WavEncoder {
    format: Format,
}

impl WavEncoder {
    pub const MIME_TYPE: &'static str = "audio/wav";

    pub fn new(format: Format) -> Self {
        Self { format }
    }
}

impl ContainerEncoder for WavEncoder {
    fn mime_type(&self) -> &str {
        Self::MIME_TYPE
    }

    fn encode(&mut self, block: &[i16]) -> Result<Vec<u8>, ContainerError> {
        Ok(block.iter().flat_map(|s| s.to_le_bytes()).collect())
    }

    fn finish(self: Box<Self>, chunks: &[Vec<u8>]) -> Result<Vec<u8>, ContainerError> {
        let spec = hound::WavSpec {
            channels: self.format.channels() as u16,
            sample_rate: self.format.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
            for chunk in chunks {
                if chunk.len() % 2 != 0 {
                    return Err(ContainerError::InvalidChunk(format!(
                        "odd chunk length {}",
                        chunk.len()
                    )));
                }
                for b in chunk.chunks_exact(2) {
                    writer.write_sample(i16::from_le_bytes([b[0], b[1]]))?;
                }
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_back(data: &[u8]) -> (hound::WavSpec, Vec<i16>) {
        let reader = hound::WavReader::new(Cursor::new(data)).unwrap();
        let spec = reader.spec();
        let samples = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        (spec, samples)
    }

    #[test]
    fn test_wav_encoder_concatenates_chunks() {
        let mut enc = Box::new(WavEncoder::new(Format::MONO_16K));
        let a = enc.encode(&[1, 2, 3]).unwrap();
        let b = enc.encode(&[-4, 5]).unwrap();
        assert_eq!(a.len(), 6);

        let data = enc.finish(&[a, b]).unwrap();
        assert_eq!(&data[..4], b"RIFF");
        assert_eq!(&data[8..12], b"WAVE");

        let (spec, samples) = read_back(&data);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.channels, 1);
        assert_eq!(samples, vec![1, 2, 3, -4, 5]);
    }

    #[test]
    fn test_wav_encoder_empty() {
        let enc = Box::new(WavEncoder::new(Format::MONO_16K));
        assert_eq!(enc.mime_type(), "audio/wav");
        let data = enc.finish(&[]).unwrap();
        let (_, samples) = read_back(&data);
        assert!(samples.is_empty());
    }

    #[test]
    fn test_wav_encoder_rejects_odd_chunk() {
        let enc = Box::new(WavEncoder::new(Format::MONO_16K));
        let err = enc.finish(&[vec![1, 2, 3]]).unwrap_err();
        assert!(matches!(err, ContainerError::InvalidChunk(_)));
    }
}
