//! Utility functions for CLI commands.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use vocalstudio::{Studio, StudioConfig};
use vocalstudio_audio::device::OutputFactory;
use vocalstudio_audio::device::file::FileOutputFactory;
use vocalstudio_cli::{Config, Context, Output, OutputFormat, load_config};
use vocalstudio_gemini::Client;

use crate::Cli;

const APP_NAME: &str = "studio";

/// Environment variables consulted when no context is configured.
const API_KEY_ENV: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(APP_NAME, cli.config.as_deref())
}

/// Gets the context configuration to use.
///
/// Without a configured context the API key comes from the environment.
pub fn get_context(cli: &Cli) -> anyhow::Result<Context> {
    let cfg = get_config(cli)?;

    if let Some(ctx) = cfg.resolve_context(cli.context.as_deref())? {
        debug!(context = %ctx.name, "using configured context");
        return Ok(ctx.clone());
    }

    let api_key = API_KEY_ENV
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()));
    match api_key {
        Some(api_key) => {
            debug!("using API key from environment");
            Ok(Context {
                name: "env".to_string(),
                api_key,
                ..Default::default()
            })
        }
        None => anyhow::bail!(
            "no context specified. Use -c flag, set a default context with 'vocalstudio config use-context', or export GEMINI_API_KEY"
        ),
    }
}

/// Creates a Gemini API client from context configuration.
pub fn create_client(ctx: &Context) -> anyhow::Result<Client> {
    let mut builder = Client::builder(&ctx.api_key);

    if !ctx.base_url.is_empty() {
        builder = builder.base_url(&ctx.base_url);
    }
    if let Some(timeout) = ctx.timeout() {
        builder = builder.timeout(timeout);
    }
    if !ctx.tts_model.is_empty() {
        builder = builder.tts_model(&ctx.tts_model);
    }
    if !ctx.native_audio_model.is_empty() {
        builder = builder.native_audio_model(&ctx.native_audio_model);
    }

    Ok(builder.build()?)
}

/// Picks where synthesized audio goes: the `-o` file, else the speakers.
pub fn output_factory(cli: &Cli) -> anyhow::Result<Arc<dyn OutputFactory>> {
    if let Some(path) = &cli.output {
        return Ok(Arc::new(FileOutputFactory::new(path)));
    }

    #[cfg(feature = "portaudio")]
    {
        Ok(Arc::new(vocalstudio_audio::portaudio::PortAudioOutputFactory))
    }
    #[cfg(not(feature = "portaudio"))]
    {
        anyhow::bail!("speaker playback needs the 'portaudio' feature, use -o to write a WAV file")
    }
}

/// Builds a studio session for the resolved context.
pub fn build_studio(cli: &Cli, ctx: &Context) -> anyhow::Result<Studio> {
    let client = create_client(ctx)?;
    let mut config = StudioConfig::default();
    if let Some(timeout) = ctx.timeout() {
        config.request_timeout = timeout;
    }
    Ok(Studio::with_config(
        Arc::new(client),
        output_factory(cli)?,
        config,
    ))
}

/// Waits until the studio has nothing left to play.
pub async fn wait_playback(studio: &Studio) {
    while studio.playback().is_playing() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Returns the structured output for listings.
pub fn output(cli: &Cli) -> Output {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Yaml
    };
    Output::new(format, None)
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints info message.
pub fn print_info(msg: &str) {
    eprintln!("\x1b[34mℹ\x1b[0m {}", msg);
}
