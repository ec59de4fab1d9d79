//! Device trait implementations over PortAudio streams.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::{Direction, Stream};
use crate::device::{
    DeviceError, InputStream, Microphone, OutputContext, OutputFactory, SourceHandle,
    ThreadSource,
};
use crate::pcm::{Format, PlayableBuffer};

/// Output block size: 20ms at 24kHz.
const OUTPUT_FRAMES: usize = 480;

/// Plays buffers on the default output device.
///
/// Every started source gets its own blocking stream on a worker thread.
/// Stopping a source aborts its stream and waits for the worker, so the
/// next source never overlaps it.
pub struct PortAudioOutput {
    sample_rate: u32,
    closed: Arc<AtomicBool>,
}

impl PortAudioOutput {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl OutputContext for PortAudioOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start(&self, buffer: Arc<PlayableBuffer>) -> Result<Box<dyn SourceHandle>, DeviceError> {
        if self.is_closed() {
            return Err(DeviceError::Closed);
        }

        let channels = buffer.number_of_channels() as u32;
        let mut stream = Stream::open(Direction::Output, channels, buffer.sample_rate(), OUTPUT_FRAMES)
            .map_err(|e| DeviceError::Unavailable(e.to_string()))?;

        let closed = self.closed.clone();
        let source = ThreadSource::spawn("portaudio-output", move |stop| {
            let samples = buffer.to_i16_interleaved();
            let block = stream.frames_per_buffer() * stream.channels();
            for chunk in samples.chunks(block) {
                if stop.load(Ordering::SeqCst) || closed.load(Ordering::SeqCst) {
                    stream.abort();
                    break;
                }
                if let Err(e) = stream.write(chunk) {
                    warn!(error = %e, "portaudio output: write failed");
                    break;
                }
            }
            stream.close();
        })?;

        Ok(Box::new(source))
    }

    fn close(&self) -> Result<(), DeviceError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Opens [`PortAudioOutput`] contexts.
#[derive(Debug, Default, Clone)]
pub struct PortAudioOutputFactory;

impl OutputFactory for PortAudioOutputFactory {
    fn open(&self, sample_rate: u32) -> Result<Arc<dyn OutputContext>, DeviceError> {
        super::initialize().map_err(|e| DeviceError::Unavailable(e.to_string()))?;
        Ok(Arc::new(PortAudioOutput::new(sample_rate)))
    }
}

/// Captures from the default input device.
#[derive(Debug, Default, Clone)]
pub struct PortAudioMicrophone;

struct PortAudioInput {
    format: Format,
    rx: mpsc::Receiver<Vec<i16>>,
    stop: Arc<AtomicBool>,
}

#[async_trait]
impl Microphone for PortAudioMicrophone {
    async fn open(&self, format: Format) -> Result<Box<dyn InputStream>, DeviceError> {
        // 20ms blocks
        let frames = (format.sample_rate as usize / 50).max(1);
        let (ready_tx, ready_rx) = oneshot::channel::<io::Result<()>>();
        let (tx, rx) = mpsc::channel(64);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        thread::Builder::new()
            .name("portaudio-input".into())
            .spawn(move || {
                let mut stream =
                    match Stream::open(Direction::Input, format.channels(), format.sample_rate, frames) {
                        Ok(stream) => {
                            let _ = ready_tx.send(Ok(()));
                            stream
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(e));
                            return;
                        }
                    };
                while !stop_flag.load(Ordering::SeqCst) {
                    match stream.read() {
                        Ok(block) => {
                            if tx.blocking_send(block).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "portaudio input: read failed");
                            break;
                        }
                    }
                }
                stream.close();
                debug!("portaudio input: released");
            })?;

        match ready_rx.await {
            Ok(Ok(())) => Ok(Box::new(PortAudioInput { format, rx, stop })),
            Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {
                Err(DeviceError::Unavailable(e.to_string()))
            }
            Ok(Err(e)) => Err(DeviceError::PermissionDenied(e.to_string())),
            Err(_) => Err(DeviceError::Closed),
        }
    }
}

#[async_trait]
impl InputStream for PortAudioInput {
    fn format(&self) -> Format {
        self.format
    }

    async fn read_block(&mut self) -> Result<Option<Vec<i16>>, DeviceError> {
        Ok(self.rx.recv().await)
    }

    fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

impl Drop for PortAudioInput {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}
