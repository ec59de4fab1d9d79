//! Single-voice and multi-speaker synthesis commands.

use std::sync::Arc;

use clap::Args;

use vocalstudio::voice::{SAMPLE_TEXT_MULTI, SAMPLE_TEXT_SINGLE, default_speakers};
use vocalstudio::{SpeakerConfig, Studio, SynthesisRequest, VoiceName};
use vocalstudio_audio::PlayableBuffer;

use super::{build_studio, get_context, print_info, print_success, wait_playback};
use crate::Cli;

/// Read text aloud with one prebuilt voice.
#[derive(Args)]
pub struct SpeakCommand {
    /// Text to speak (a built-in greeting when omitted)
    text: Option<String>,

    /// Voice name (Kore, Puck, Charon, Fenrir, Zephyr)
    #[arg(long)]
    voice: Option<VoiceName>,
}

/// Perform a dialogue script.
///
/// Each line of the script starts with a speaker name followed by a colon.
/// Every speaker named in the script needs a voice.
#[derive(Args)]
pub struct DialogueCommand {
    /// Script text (a built-in three-person scene when omitted)
    text: Option<String>,

    /// Speaker and voice as NAME=VOICE, repeatable
    /// (defaults to Narrator=Charon, Aria=Zephyr, Leo=Puck)
    #[arg(long = "speaker", value_name = "NAME=VOICE")]
    speakers: Vec<SpeakerConfig>,
}

impl SpeakCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let voice = match self.voice {
            Some(voice) => voice,
            None if !ctx.default_voice.is_empty() => ctx.default_voice.parse()?,
            None => VoiceName::default(),
        };
        let text = self.text.as_deref().unwrap_or(SAMPLE_TEXT_SINGLE);

        print_info(&format!("Speaking with {}...", voice));
        let studio = build_studio(cli, &ctx)?;
        let request = SynthesisRequest::Single {
            text: text.to_string(),
            voice,
        };
        perform(cli, &studio, request).await
    }
}

impl DialogueCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let speakers = if self.speakers.is_empty() {
            default_speakers()
        } else {
            self.speakers.clone()
        };
        let text = self.text.as_deref().unwrap_or(SAMPLE_TEXT_MULTI);

        let cast: Vec<String> = speakers
            .iter()
            .map(|s| format!("{} ({})", s.speaker_name, s.voice))
            .collect();
        print_info(&format!("Performing with {}...", cast.join(", ")));

        let studio = build_studio(cli, &ctx)?;
        let request = SynthesisRequest::Multi {
            text: text.to_string(),
            speakers,
        };
        perform(cli, &studio, request).await
    }
}

/// Runs one request and waits for its playback to finish.
pub(super) async fn perform(
    cli: &Cli,
    studio: &Studio,
    request: SynthesisRequest,
) -> anyhow::Result<()> {
    let buffer = studio.synthesize(request).await?;
    report(cli, &buffer);
    wait_playback(studio).await;
    studio.close();
    Ok(())
}

fn report(cli: &Cli, buffer: &Arc<PlayableBuffer>) {
    let secs = buffer.duration().as_secs_f64();
    match &cli.output {
        Some(path) => print_success(&format!("Audio saved to {} ({:.1}s)", path, secs)),
        None => print_success(&format!("Played {:.1}s of audio", secs)),
    }
}
