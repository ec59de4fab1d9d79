//! Synthesis orchestration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vocalstudio_audio::PlayableBuffer;
use vocalstudio_audio::device::{OutputContext, OutputFactory};
use vocalstudio_audio::pcm::{OUTPUT_FORMAT, decode_pcm};
use vocalstudio_encoding::{decode, read_to_text};

use crate::capture::AudioSample;
use crate::error::SynthesisError;
use crate::lock;
use crate::playback::PlaybackEngine;
use crate::service::SpeechService;
use crate::voice::{Mode, SpeakerConfig, VoiceName, find_language};

/// Studio settings.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Upper bound on one round trip to the speech service.
    pub request_timeout: Duration,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// What to synthesize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisRequest {
    Single {
        text: String,
        voice: VoiceName,
    },
    Multi {
        text: String,
        speakers: Vec<SpeakerConfig>,
    },
    /// Speak `text` in the voice of the stored sample. `language` is a
    /// language id; unknown ids mean English.
    Mirror { text: String, language: String },
}

impl SynthesisRequest {
    pub fn mode(&self) -> Mode {
        match self {
            SynthesisRequest::Single { .. } => Mode::Single,
            SynthesisRequest::Multi { .. } => Mode::Multi,
            SynthesisRequest::Mirror { .. } => Mode::Mirror,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            SynthesisRequest::Single { text, .. }
            | SynthesisRequest::Multi { text, .. }
            | SynthesisRequest::Mirror { text, .. } => text,
        }
    }
}

/// Clears the in-flight flag when a request ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A voice studio session.
///
/// Owns the session's output context, the playback engine and the most
/// recent voice sample, and runs one synthesis request at a time.
/// `Studio` is `Send + Sync`; share it behind an `Arc`.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use vocalstudio::{Studio, SynthesisRequest, VoiceName};
/// use vocalstudio_audio::device::file::FileOutputFactory;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = vocalstudio_gemini::Client::new("api-key")?;
/// let studio = Studio::new(Arc::new(client), Arc::new(FileOutputFactory::new("out.wav")));
/// let buffer = studio
///     .synthesize(SynthesisRequest::Single {
///         text: "Hi".into(),
///         voice: VoiceName::Kore,
///     })
///     .await?;
/// println!("{:?}", buffer.duration());
/// # Ok(())
/// # }
/// ```
pub struct Studio {
    service: Arc<dyn SpeechService>,
    outputs: Arc<dyn OutputFactory>,
    output: Mutex<Option<Arc<dyn OutputContext>>>,
    playback: PlaybackEngine,
    sample: Mutex<Option<AudioSample>>,
    mode: Mutex<Mode>,
    pending: Mutex<CancellationToken>,
    in_flight: AtomicBool,
    closed: AtomicBool,
    config: StudioConfig,
}

impl Studio {
    pub fn new(service: Arc<dyn SpeechService>, outputs: Arc<dyn OutputFactory>) -> Self {
        Self::with_config(service, outputs, StudioConfig::default())
    }

    pub fn with_config(
        service: Arc<dyn SpeechService>,
        outputs: Arc<dyn OutputFactory>,
        config: StudioConfig,
    ) -> Self {
        Self {
            service,
            outputs,
            output: Mutex::new(None),
            playback: PlaybackEngine::new(),
            sample: Mutex::new(None),
            mode: Mutex::new(Mode::default()),
            pending: Mutex::new(CancellationToken::new()),
            in_flight: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            config,
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn playback(&self) -> &PlaybackEngine {
        &self.playback
    }

    /// Returns the output context if one has been opened.
    pub fn output(&self) -> Option<Arc<dyn OutputContext>> {
        lock(&self.output).clone()
    }

    /// Returns true while a request is outstanding.
    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn mode(&self) -> Mode {
        *lock(&self.mode)
    }

    /// Switches mode. Switching to a different mode abandons the request
    /// in flight, if any.
    pub fn set_mode(&self, mode: Mode) {
        let previous = std::mem::replace(&mut *lock(&self.mode), mode);
        if previous != mode {
            debug!(from = %previous, to = %mode, "studio: mode switch");
            self.cancel_pending();
        }
    }

    /// Abandons the request in flight. Its caller gets
    /// [`SynthesisError::Cancelled`] and nothing is played.
    pub fn cancel_pending(&self) {
        lock(&self.pending).cancel();
    }

    /// Stores the sample used by mirror requests, replacing any previous one.
    pub fn set_sample(&self, sample: AudioSample) {
        debug!(bytes = sample.len(), mime_type = sample.mime_type(), "studio: sample set");
        *lock(&self.sample) = Some(sample);
    }

    pub fn clear_sample(&self) {
        *lock(&self.sample) = None;
    }

    pub fn sample(&self) -> Option<AudioSample> {
        lock(&self.sample).clone()
    }

    /// Runs one synthesis request and plays the result.
    ///
    /// Requests are validated before anything else happens: empty text and
    /// an empty cast fail with [`SynthesisError::Validation`], mirroring
    /// without a stored sample fails with [`SynthesisError::MissingSample`].
    /// While another request is outstanding this fails with
    /// [`SynthesisError::Busy`]. On any failure the current playback is
    /// left alone.
    pub async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<Arc<PlayableBuffer>, SynthesisError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SynthesisError::Closed);
        }
        let sample = self.validate(&request)?;
        let _in_flight = InFlight::acquire(&self.in_flight).ok_or(SynthesisError::Busy)?;

        let token = CancellationToken::new();
        *lock(&self.pending) = token.clone();
        *lock(&self.mode) = request.mode();

        let ctx = self.ensure_output()?;
        let mode = request.mode();
        info!(%mode, chars = request.text().len(), "studio: synthesize");

        let payload = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(SynthesisError::Cancelled),
            result = tokio::time::timeout(self.config.request_timeout, self.dispatch(&request, sample)) => {
                match result {
                    Ok(payload) => payload?,
                    Err(_) => {
                        warn!(%mode, timeout = ?self.config.request_timeout, "studio: request timed out");
                        return Err(SynthesisError::TimedOut(self.config.request_timeout));
                    }
                }
            }
        };

        if token.is_cancelled() {
            warn!(%mode, "studio: discarding response for abandoned request");
            return Err(SynthesisError::Cancelled);
        }

        let bytes = decode(&payload).map_err(SynthesisError::failed)?;
        let buffer = decode_pcm(&bytes, ctx.as_ref()).map_err(SynthesisError::failed)?;
        let buffer = Arc::new(buffer);
        self.playback
            .play(buffer.clone(), ctx.as_ref())
            .map_err(SynthesisError::failed)?;

        debug!(
            frames = buffer.length(),
            duration_ms = buffer.duration().as_millis() as u64,
            "studio: playing"
        );
        Ok(buffer)
    }

    /// The missing-sample check comes first so a mirror request without a
    /// sample always reports [`SynthesisError::MissingSample`].
    fn validate(&self, request: &SynthesisRequest) -> Result<Option<AudioSample>, SynthesisError> {
        let sample = match request {
            SynthesisRequest::Mirror { .. } => {
                Some(self.sample().ok_or(SynthesisError::MissingSample)?)
            }
            _ => None,
        };
        if request.text().trim().is_empty() {
            return Err(SynthesisError::Validation("text must not be empty".to_string()));
        }
        if let SynthesisRequest::Multi { speakers, .. } = request {
            if speakers.is_empty() {
                return Err(SynthesisError::Validation(
                    "at least one speaker is required".to_string(),
                ));
            }
        }
        Ok(sample)
    }

    async fn dispatch(
        &self,
        request: &SynthesisRequest,
        sample: Option<AudioSample>,
    ) -> Result<String, SynthesisError> {
        let result = match request {
            SynthesisRequest::Single { text, voice } => {
                self.service.synthesize_single(text, *voice).await
            }
            SynthesisRequest::Multi { text, speakers } => {
                self.service.synthesize_multi(text, speakers).await
            }
            SynthesisRequest::Mirror { text, language } => {
                let sample = sample.ok_or(SynthesisError::MissingSample)?;
                let encoded = read_to_text(sample.reader())
                    .await
                    .map_err(SynthesisError::failed)?;
                let language = find_language(language);
                self.service
                    .mirror_voice(text, &encoded, sample.mime_type(), language.name)
                    .await
            }
        };
        result.map_err(|err| {
            warn!(error = %err, "studio: speech service failed");
            SynthesisError::failed(err)
        })
    }

    /// Opens the output context on first use and reuses it afterwards.
    fn ensure_output(&self) -> Result<Arc<dyn OutputContext>, SynthesisError> {
        let mut output = lock(&self.output);
        if let Some(ctx) = output.as_ref() {
            return Ok(ctx.clone());
        }
        let ctx = self
            .outputs
            .open(OUTPUT_FORMAT.sample_rate)
            .map_err(SynthesisError::failed)?;
        debug!(sample_rate = ctx.sample_rate(), "studio: output opened");
        *output = Some(ctx.clone());
        Ok(ctx)
    }

    /// Stops playback, abandons the pending request and releases the
    /// output context. Later requests fail with [`SynthesisError::Closed`].
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.cancel_pending();
        self.playback.stop();
        if let Some(ctx) = lock(&self.output).take() {
            if let Err(err) = ctx.close() {
                warn!(error = %err, "studio: failed to close output");
            }
        }
        info!("studio: closed");
    }
}

impl Drop for Studio {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_mode_and_text() {
        let request = SynthesisRequest::Mirror {
            text: "Namaste".into(),
            language: "hindi".into(),
        };
        assert_eq!(request.mode(), Mode::Mirror);
        assert_eq!(request.text(), "Namaste");
    }

    #[test]
    fn test_in_flight_guard() {
        let flag = AtomicBool::new(false);
        let guard = InFlight::acquire(&flag).unwrap();
        assert!(InFlight::acquire(&flag).is_none());
        drop(guard);
        assert!(InFlight::acquire(&flag).is_some());
    }

    #[test]
    fn test_default_config() {
        assert_eq!(StudioConfig::default().request_timeout, Duration::from_secs(120));
    }
}
