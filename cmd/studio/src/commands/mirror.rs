//! Voice mirroring command.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use vocalstudio::voice::{language, mirror_text};
use vocalstudio::{AudioSample, Studio, SynthesisRequest};

use super::speak::perform;
use super::{build_studio, get_context, print_info};
use crate::Cli;

/// Speak text in your own voice.
///
/// The voice sample comes from a file (--sample) or from the microphone
/// (--record, needs the 'portaudio' feature). Without a sample the request
/// is refused before anything is sent.
#[derive(Args)]
pub struct MirrorCommand {
    /// Text to speak (a greeting in the target language when omitted)
    text: Option<String>,

    /// Target language id (see 'vocalstudio languages')
    #[arg(short = 'l', long)]
    language: Option<String>,

    /// Voice sample file
    #[arg(long, conflicts_with = "record")]
    sample: Option<String>,

    /// MIME type of the sample file (guessed from the extension)
    #[arg(long, requires = "sample")]
    mime: Option<String>,

    /// Record the voice sample from the microphone
    #[arg(long)]
    record: bool,

    /// Stop recording at the 10 second limit instead of showing it only
    #[arg(long, requires = "record")]
    hard_limit: bool,

    /// Also write the recorded sample to this file
    #[arg(long, requires = "record")]
    save_sample: Option<String>,
}

impl MirrorCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let language_id = self
            .language
            .clone()
            .or_else(|| Some(ctx.default_language.clone()).filter(|l| !l.is_empty()))
            .unwrap_or_else(|| "english".to_string());
        let Some(target) = language(&language_id) else {
            anyhow::bail!(
                "unknown language '{}', see 'vocalstudio languages'",
                language_id
            );
        };
        let text = self
            .text
            .clone()
            .unwrap_or_else(|| mirror_text(target.id).to_string());

        let studio = Arc::new(build_studio(cli, &ctx)?);
        if let Some(path) = &self.sample {
            studio.set_sample(load_sample(path, self.mime.as_deref())?);
        } else if self.record {
            self.record_sample(&studio).await?;
        }

        print_info(&format!("Mirroring your voice in {}...", target.name));
        let request = SynthesisRequest::Mirror {
            text,
            language: target.id.to_string(),
        };
        perform(cli, &studio, request).await
    }

    #[cfg(feature = "portaudio")]
    async fn record_sample(&self, studio: &Arc<Studio>) -> anyhow::Result<()> {
        use super::meter::LevelMeter;
        use super::print_success;
        use vocalstudio::{CaptureConfig, CaptureEngine};
        use vocalstudio_audio::portaudio::PortAudioMicrophone;

        let config = CaptureConfig {
            enforce_max_duration: self.hard_limit,
            ..Default::default()
        };
        let limit = config.max_duration;
        let mut engine = CaptureEngine::with_config(Arc::new(PortAudioMicrophone), config);
        engine.set_visualizer(Arc::new(LevelMeter::new(engine.elapsed(), limit)));
        let target = studio.clone();
        engine.on_recorded(move |sample| target.set_sample(sample.clone()));

        engine.start().await?;
        print_info("Recording, press Enter to stop");
        let enter = enter_pressed();
        if self.hard_limit {
            tokio::select! {
                _ = enter => {}
                _ = tokio::time::sleep(limit) => {}
            }
        } else {
            let _ = enter.await;
        }

        let Some(sample) = engine.stop().await? else {
            return Ok(());
        };
        print_success(&format!(
            "Recorded {:.1}s ({} bytes)",
            sample.duration().as_secs_f64(),
            sample.len()
        ));
        if let Some(path) = &self.save_sample {
            std::fs::write(path, sample.data())?;
            print_success(&format!("Sample saved to {}", path));
        }
        Ok(())
    }

    #[cfg(not(feature = "portaudio"))]
    async fn record_sample(&self, _studio: &Arc<Studio>) -> anyhow::Result<()> {
        anyhow::bail!("recording needs the 'portaudio' feature, use --sample FILE instead")
    }
}

/// Resolves once a line is read from stdin.
///
/// Reads on a detached thread so a pending read never holds up exit.
#[cfg(feature = "portaudio")]
fn enter_pressed() -> tokio::sync::oneshot::Receiver<()> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
        let _ = tx.send(());
    });
    rx
}

/// Reads a voice sample from disk.
fn load_sample(path: &str, mime: Option<&str>) -> anyhow::Result<AudioSample> {
    let mime_type = match mime {
        Some(mime) => mime.to_string(),
        None => guess_mime(Path::new(path))
            .ok_or_else(|| anyhow::anyhow!("cannot tell the type of '{}', use --mime", path))?
            .to_string(),
    };
    let data = std::fs::read(path)?;
    if data.is_empty() {
        anyhow::bail!("sample file '{}' is empty", path);
    }
    Ok(AudioSample::new(data, mime_type, Duration::ZERO))
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "mp3" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        "flac" => "audio/flac",
        _ => return None,
    })
}
