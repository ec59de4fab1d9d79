//! Microphone capture with live spectrum visualization.
//!
//! A [`CaptureEngine`] moves through
//! `Idle -> RequestingPermission -> Recording -> Stopped`. While recording
//! it runs three tasks tied to one [`CancellationToken`]:
//!
//! - the recorder, which reads PCM blocks, feeds the analyser and encodes
//!   container chunks
//! - the visualization loop, which renders a [`SpectrumFrame`] every
//!   frame interval
//! - the elapsed-seconds timer
//!
//! [`CaptureEngine::stop`] cancels all three, waits for them, and assembles
//! the chunks into an [`AudioSample`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vocalstudio_audio::container::{ContainerEncoder, WavEncoder};
use vocalstudio_audio::device::{DeviceError, InputStream, Microphone};
use vocalstudio_audio::pcm::Format;
use vocalstudio_audio::spectrum::{Analyser, DEFAULT_FFT_SIZE};

use crate::error::CaptureError;
use crate::lock;

/// Capture engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    RequestingPermission,
    Recording,
    Stopped,
}

/// Capture settings.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Format requested from the microphone.
    pub format: Format,
    /// Length shown as the recording limit.
    pub max_duration: Duration,
    /// When set, samples past `max_duration` are discarded.
    pub enforce_max_duration: bool,
    /// Visualization refresh period.
    pub frame_interval: Duration,
    pub fft_size: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            format: Format::MONO_16K,
            max_duration: Duration::from_secs(10),
            enforce_max_duration: false,
            frame_interval: Duration::from_millis(16),
            fft_size: DEFAULT_FFT_SIZE,
        }
    }
}

/// An immutable recorded voice sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSample {
    data: Bytes,
    mime_type: String,
    duration: Duration,
}

impl AudioSample {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>, duration: Duration) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
            duration,
        }
    }

    /// Returns the container bytes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns an async reader over the container bytes.
    pub fn reader(&self) -> std::io::Cursor<Bytes> {
        std::io::Cursor::new(self.data.clone())
    }
}

/// One bar of a spectrum drawing, in canvas coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

/// A snapshot of byte frequency data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectrumFrame {
    bins: Vec<u8>,
}

impl SpectrumFrame {
    pub fn new(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    /// Returns the peak bin value.
    pub fn level(&self) -> u8 {
        self.bins.iter().copied().max().unwrap_or(0)
    }

    /// Lays the bins out as bars on a `width` x `height` canvas.
    ///
    /// Bars are `2.5 * width / bins` wide with a 1 unit gap and grow up
    /// from the bottom edge to half the bin value. Bars starting past the
    /// right edge are omitted.
    pub fn bars(&self, width: f64, height: f64) -> Vec<Bar> {
        if self.bins.is_empty() {
            return Vec::new();
        }
        let bar_width = width / self.bins.len() as f64 * 2.5;
        let mut bars = Vec::new();
        let mut x = 0.0;
        for &value in &self.bins {
            if x >= width {
                break;
            }
            let bar_height = value as f64 / 2.0;
            bars.push(Bar {
                x,
                y: height - bar_height,
                width: bar_width,
                height: bar_height,
                alpha: (bar_height / 100.0).min(1.0),
            });
            x += bar_width + 1.0;
        }
        bars
    }
}

/// Receives spectrum frames while a recording is running.
pub trait Visualizer: Send + Sync {
    fn render(&self, frame: &SpectrumFrame);

    /// Called once when the visualization loop ends.
    fn clear(&self) {}
}

type RecordedCallback = Box<dyn Fn(&AudioSample) + Send + Sync>;

struct Recording {
    encoder: Box<dyn ContainerEncoder>,
    chunks: Vec<Vec<u8>>,
    frames: usize,
}

struct Session {
    cancel: CancellationToken,
    format: Format,
    recorder: JoinHandle<Result<Recording, CaptureError>>,
    visualizer: Option<JoinHandle<()>>,
    timer: JoinHandle<()>,
}

/// Records voice samples from a [`Microphone`].
pub struct CaptureEngine {
    microphone: Arc<dyn Microphone>,
    config: CaptureConfig,
    visualizer: Option<Arc<dyn Visualizer>>,
    on_recorded: Option<RecordedCallback>,
    state: watch::Sender<CaptureState>,
    elapsed: Arc<watch::Sender<u64>>,
    session: Option<Session>,
}

impl CaptureEngine {
    pub fn new(microphone: Arc<dyn Microphone>) -> Self {
        Self::with_config(microphone, CaptureConfig::default())
    }

    pub fn with_config(microphone: Arc<dyn Microphone>, config: CaptureConfig) -> Self {
        Self {
            microphone,
            config,
            visualizer: None,
            on_recorded: None,
            state: watch::Sender::new(CaptureState::Idle),
            elapsed: Arc::new(watch::Sender::new(0)),
            session: None,
        }
    }

    /// Sets the visualizer driven while recording.
    pub fn set_visualizer(&mut self, visualizer: Arc<dyn Visualizer>) {
        self.visualizer = Some(visualizer);
    }

    /// Registers the callback invoked with every finished sample.
    pub fn on_recorded(&mut self, callback: impl Fn(&AudioSample) + Send + Sync + 'static) {
        self.on_recorded = Some(Box::new(callback));
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn state(&self) -> CaptureState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<CaptureState> {
        self.state.subscribe()
    }

    /// Returns a receiver of whole seconds recorded so far. It reads 0
    /// whenever no recording is running.
    pub fn elapsed(&self) -> watch::Receiver<u64> {
        self.elapsed.subscribe()
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Opens the microphone and starts recording.
    ///
    /// Fails with [`CaptureError::AlreadyRecording`] while a session is
    /// active and with [`CaptureError::PermissionDenied`] when access is
    /// refused; the engine then returns to idle.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.session.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }

        self.state.send_replace(CaptureState::RequestingPermission);
        let stream = match self.microphone.open(self.config.format).await {
            Ok(stream) => stream,
            Err(err) => {
                self.state.send_replace(CaptureState::Idle);
                return Err(match err {
                    DeviceError::PermissionDenied(msg) => {
                        warn!(%msg, "capture: microphone permission denied");
                        CaptureError::PermissionDenied(msg)
                    }
                    other => CaptureError::Device(other),
                });
            }
        };

        let format = stream.format();
        let cancel = CancellationToken::new();
        let analyser = Arc::new(Mutex::new(Analyser::new(self.config.fft_size)));
        let limit = self
            .config
            .enforce_max_duration
            .then(|| format.frames_in_duration(self.config.max_duration));

        let recorder = tokio::spawn(record(
            stream,
            Box::new(WavEncoder::new(format)),
            analyser.clone(),
            cancel.clone(),
            limit,
        ));
        let visualizer = self.visualizer.clone().map(|visualizer| {
            tokio::spawn(visualize(
                analyser,
                visualizer,
                self.config.frame_interval,
                cancel.clone(),
            ))
        });
        self.elapsed.send_replace(0);
        let timer = tokio::spawn(tick_elapsed(self.elapsed.clone(), cancel.clone()));

        self.session = Some(Session {
            cancel,
            format,
            recorder,
            visualizer,
            timer,
        });
        self.state.send_replace(CaptureState::Recording);
        info!(
            sample_rate = format.sample_rate,
            channels = format.channels(),
            "capture: recording"
        );
        Ok(())
    }

    /// Stops recording and returns the finished sample.
    ///
    /// Returns `Ok(None)` when nothing is recording, so repeated calls are
    /// harmless.
    pub async fn stop(&mut self) -> Result<Option<AudioSample>, CaptureError> {
        let Some(session) = self.session.take() else {
            return Ok(None);
        };
        session.cancel.cancel();

        let recorded = session.recorder.await;
        if let Some(visualizer) = session.visualizer {
            let _ = visualizer.await;
        }
        let _ = session.timer.await;
        self.elapsed.send_replace(0);

        let recording = match recorded {
            Ok(Ok(recording)) => recording,
            Ok(Err(err)) => {
                self.state.send_replace(CaptureState::Idle);
                return Err(err);
            }
            Err(err) => {
                self.state.send_replace(CaptureState::Idle);
                return Err(CaptureError::Aborted(err.to_string()));
            }
        };

        let mime_type = recording.encoder.mime_type().to_string();
        let duration = session.format.frames_duration(recording.frames);
        let chunks = recording.chunks.len();
        let data = match recording.encoder.finish(&recording.chunks) {
            Ok(data) => data,
            Err(err) => {
                self.state.send_replace(CaptureState::Idle);
                return Err(err.into());
            }
        };
        let sample = AudioSample::new(data, mime_type, duration);

        self.state.send_replace(CaptureState::Stopped);
        info!(
            bytes = sample.len(),
            chunks,
            duration_ms = duration.as_millis() as u64,
            "capture: stopped"
        );
        if let Some(callback) = &self.on_recorded {
            callback(&sample);
        }
        Ok(Some(sample))
    }
}

impl Drop for CaptureEngine {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel.cancel();
        }
    }
}

/// Reads blocks until the stream ends, encoding each one.
///
/// On cancellation the stream is stopped and its buffered blocks are still
/// drained into the recording.
async fn record(
    mut stream: Box<dyn InputStream>,
    mut encoder: Box<dyn ContainerEncoder>,
    analyser: Arc<Mutex<Analyser>>,
    cancel: CancellationToken,
    limit: Option<usize>,
) -> Result<Recording, CaptureError> {
    let result = read_blocks(stream.as_mut(), encoder.as_mut(), &analyser, &cancel, limit).await;
    // Release the microphone however the loop ended.
    stream.stop();

    let (chunks, frames) = result.inspect_err(|err| {
        warn!(error = %err, "capture: recorder failed");
        cancel.cancel();
    })?;
    Ok(Recording {
        encoder,
        chunks,
        frames,
    })
}

async fn read_blocks(
    stream: &mut dyn InputStream,
    encoder: &mut dyn ContainerEncoder,
    analyser: &Mutex<Analyser>,
    cancel: &CancellationToken,
    limit: Option<usize>,
) -> Result<(Vec<Vec<u8>>, usize), CaptureError> {
    let channels = stream.format().channels() as usize;
    let mut chunks = Vec::new();
    let mut frames = 0usize;
    let mut stopping = false;

    loop {
        let block = if stopping {
            stream.read_block().await
        } else {
            tokio::select! {
                _ = cancel.cancelled() => {
                    stream.stop();
                    stopping = true;
                    continue;
                }
                block = stream.read_block() => block,
            }
        };
        let Some(mut block) = block? else {
            break;
        };

        if let Some(limit) = limit {
            let remaining = limit.saturating_sub(frames);
            if block.len() / channels >= remaining {
                block.truncate(remaining * channels);
                if !stopping {
                    debug!("capture: duration limit reached");
                    stream.stop();
                    stopping = true;
                }
            }
        }
        if block.is_empty() {
            continue;
        }

        frames += block.len() / channels;
        lock(analyser).push(&block);
        let chunk = encoder.encode(&block)?;
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
    }

    Ok((chunks, frames))
}

async fn visualize(
    analyser: Arc<Mutex<Analyser>>,
    visualizer: Arc<dyn Visualizer>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let bins = lock(&analyser).byte_frequency_data();
                visualizer.render(&SpectrumFrame::new(bins));
            }
        }
    }
    lock(&analyser).reset();
    visualizer.clear();
}

async fn tick_elapsed(elapsed: Arc<watch::Sender<u64>>, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                elapsed.send_modify(|secs| *secs += 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_geometry() {
        let frame = SpectrumFrame::new(vec![200, 100, 0, 255]);
        let bars = frame.bars(16.0, 100.0);
        // bar width = 16 / 4 * 2.5 = 10; second bar starts at 11, third at 22
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].x, 0.0);
        assert_eq!(bars[0].width, 10.0);
        assert_eq!(bars[0].height, 100.0);
        assert_eq!(bars[0].y, 0.0);
        assert_eq!(bars[0].alpha, 1.0);
        assert_eq!(bars[1].x, 11.0);
        assert_eq!(bars[1].height, 50.0);
        assert_eq!(bars[1].y, 50.0);
        assert_eq!(bars[1].alpha, 0.5);
    }

    #[test]
    fn test_bars_canvas_width() {
        let frame = SpectrumFrame::new(vec![128; 128]);
        let bars = frame.bars(400.0, 100.0);
        let bar_width: f64 = 400.0 / 128.0 * 2.5;
        assert!(bars.iter().all(|b| b.x < 400.0));
        assert_eq!(bars.len(), (400.0 / (bar_width + 1.0)).ceil() as usize);
        assert_eq!(frame.level(), 128);
    }

    #[test]
    fn test_bars_empty_frame() {
        assert!(SpectrumFrame::new(Vec::new()).bars(400.0, 100.0).is_empty());
        assert_eq!(SpectrumFrame::new(Vec::new()).level(), 0);
    }

    #[test]
    fn test_audio_sample_accessors() {
        let sample = AudioSample::new(vec![1u8, 2, 3], "audio/wav", Duration::from_millis(20));
        assert_eq!(sample.len(), 3);
        assert!(!sample.is_empty());
        assert_eq!(sample.mime_type(), "audio/wav");
        assert_eq!(sample.reader().into_inner().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_default_config() {
        let config = CaptureConfig::default();
        assert_eq!(config.max_duration, Duration::from_secs(10));
        assert!(!config.enforce_max_duration);
        assert_eq!(config.fft_size, 256);
    }
}
