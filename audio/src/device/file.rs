//! WAV file output.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::debug;

use super::{DeviceError, FinishedSource, OutputContext, OutputFactory, SourceHandle};
use crate::pcm::PlayableBuffer;

/// An output context that renders each started buffer into a WAV file.
///
/// Later buffers overwrite earlier ones, matching the single active
/// source of a speaker output.
#[derive(Debug)]
pub struct FileOutput {
    path: PathBuf,
    sample_rate: u32,
    closed: AtomicBool,
    rendered: AtomicUsize,
}

impl FileOutput {
    pub fn new(path: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self {
            path: path.into(),
            sample_rate,
            closed: AtomicBool::new(false),
            rendered: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns how many buffers have been written.
    pub fn rendered(&self) -> usize {
        self.rendered.load(Ordering::SeqCst)
    }
}

impl OutputContext for FileOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start(&self, buffer: Arc<PlayableBuffer>) -> Result<Box<dyn SourceHandle>, DeviceError> {
        if self.is_closed() {
            return Err(DeviceError::Closed);
        }

        let spec = hound::WavSpec {
            channels: buffer.number_of_channels() as u16,
            sample_rate: buffer.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&self.path, spec).map_err(io::Error::other)?;
        for sample in buffer.to_i16_interleaved() {
            writer.write_sample(sample).map_err(io::Error::other)?;
        }
        writer.finalize().map_err(io::Error::other)?;

        self.rendered.fetch_add(1, Ordering::SeqCst);
        debug!(path = %self.path.display(), frames = buffer.length(), "file output: wrote buffer");
        Ok(Box::new(FinishedSource))
    }

    fn close(&self) -> Result<(), DeviceError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Opens [`FileOutput`] contexts targeting one path.
#[derive(Debug, Clone)]
pub struct FileOutputFactory {
    path: PathBuf,
}

impl FileOutputFactory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputFactory for FileOutputFactory {
    fn open(&self, sample_rate: u32) -> Result<Arc<dyn OutputContext>, DeviceError> {
        Ok(Arc::new(FileOutput::new(self.path.clone(), sample_rate)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::decode_pcm;

    #[test]
    fn test_file_output_writes_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speech.wav");
        let ctx = FileOutput::new(&path, 24000);

        let pcm: Vec<u8> = [0i16, 16384, -16384, 32767]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let buffer = decode_pcm(&pcm, &ctx).unwrap();
        let handle = ctx.start(Arc::new(buffer)).unwrap();
        assert!(!handle.is_playing());
        assert_eq!(ctx.rendered(), 1);

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 24000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 16384, -16384, 32767]);
    }

    #[test]
    fn test_file_output_closed() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = FileOutput::new(dir.path().join("x.wav"), 24000);
        ctx.close().unwrap();
        ctx.close().unwrap();
        let Err(err) = ctx.start(Arc::new(PlayableBuffer::new(1, 1, 24000))) else {
            panic!("closed output accepted a buffer");
        };
        assert!(matches!(err, DeviceError::Closed));
    }
}
