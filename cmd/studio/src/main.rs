//! vocalstudio - speak text, script dialogues and mirror your own voice.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[cfg(feature = "portaudio")]
use commands::DevicesCommand;
use commands::{
    ConfigCommand, DialogueCommand, LanguagesCommand, MirrorCommand, SpeakCommand, VoicesCommand,
};

/// vocalstudio - a command line voice studio.
///
/// Generates speech with the Gemini speech models in three modes:
///   - speak: one prebuilt voice reads the text
///   - dialogue: a script with one voice per speaker
///   - mirror: the text is spoken in your own recorded voice, in any
///     supported language
///
/// Configuration is stored in ~/.vocalstudio/studio/ and supports multiple
/// contexts, similar to kubectl's context management. Without a context the
/// API key is read from GEMINI_API_KEY (or API_KEY).
#[derive(Parser)]
#[command(name = "vocalstudio")]
#[command(about = "Command line voice studio")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.vocalstudio/studio/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Write audio to this WAV file instead of the speakers
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Print listings as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// List the prebuilt voices
    Voices(VoicesCommand),
    /// List the mirroring target languages
    Languages(LanguagesCommand),
    /// Read text aloud with one voice
    Speak(SpeakCommand),
    /// Perform a multi-speaker script
    Dialogue(DialogueCommand),
    /// Speak text in the voice of a recorded sample
    Mirror(MirrorCommand),
    /// List audio devices
    #[cfg(feature = "portaudio")]
    Devices(DevicesCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Voices(cmd) => cmd.run(&cli).await,
        Commands::Languages(cmd) => cmd.run(&cli).await,
        Commands::Speak(cmd) => cmd.run(&cli).await,
        Commands::Dialogue(cmd) => cmd.run(&cli).await,
        Commands::Mirror(cmd) => cmd.run(&cli).await,
        #[cfg(feature = "portaudio")]
        Commands::Devices(cmd) => cmd.run(&cli).await,
    }
}
