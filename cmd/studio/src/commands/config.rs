//! Configuration management commands.

use clap::{Args, Subcommand};

use vocalstudio::VoiceName;
use vocalstudio::voice::language;
use vocalstudio_cli::{Context as CliContext, mask_api_key};

use super::{get_config, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Contexts allow you to manage multiple API configurations,
/// similar to kubectl's context management.
///
/// Configuration is stored in ~/.vocalstudio/studio/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add a new context
    #[command(name = "add-context")]
    AddContext {
        /// Context name
        name: String,
        /// API key (required)
        #[arg(long)]
        api_key: String,
        /// API base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Model for speak and dialogue
        #[arg(long)]
        tts_model: Option<String>,
        /// Model for mirror
        #[arg(long)]
        native_audio_model: Option<String>,
        /// Default voice for speak
        #[arg(long)]
        default_voice: Option<VoiceName>,
        /// Default language id for mirror
        #[arg(long)]
        default_language: Option<String>,
    },
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// Display the current context
    #[command(name = "get-context")]
    GetContext,
    /// List all contexts
    #[command(name = "list-contexts", alias = "get-contexts")]
    ListContexts,
    /// View the current configuration
    View,
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::AddContext {
                name,
                api_key,
                base_url,
                timeout,
                tts_model,
                native_audio_model,
                default_voice,
                default_language,
            } => {
                if let Some(id) = default_language {
                    if language(id).is_none() {
                        anyhow::bail!("unknown language '{}', see 'vocalstudio languages'", id);
                    }
                }

                let mut cfg = get_config(cli)?;
                let ctx = CliContext {
                    api_key: api_key.clone(),
                    base_url: base_url.clone().unwrap_or_default(),
                    timeout: timeout.unwrap_or(0),
                    tts_model: tts_model.clone().unwrap_or_default(),
                    native_audio_model: native_audio_model.clone().unwrap_or_default(),
                    default_voice: default_voice.map(|v| v.to_string()).unwrap_or_default(),
                    default_language: default_language.clone().unwrap_or_default(),
                    ..Default::default()
                };

                cfg.add_context(name, ctx)?;
                print_success(&format!("Context \"{}\" added successfully", name));
                Ok(())
            }

            ConfigSubcommand::DeleteContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::GetContext => {
                let cfg = get_config(cli)?;
                if cfg.current_context.is_empty() {
                    println!("No current context set");
                } else {
                    println!("{}", cfg.current_context);
                }
                Ok(())
            }

            ConfigSubcommand::ListContexts => {
                let cfg = get_config(cli)?;

                if cfg.contexts.is_empty() {
                    println!("No contexts configured");
                    return Ok(());
                }

                println!("{:<8} {:<20} {:<30} {}", "CURRENT", "NAME", "BASE_URL", "TTS_MODEL");
                for name in cfg.list_contexts() {
                    let Some(ctx) = cfg.get_context(name) else {
                        continue;
                    };
                    let current = if name == cfg.current_context { "*" } else { "" };
                    let base_url = if ctx.base_url.is_empty() {
                        "(default)"
                    } else {
                        &ctx.base_url
                    };
                    let model = if ctx.tts_model.is_empty() {
                        "(default)"
                    } else {
                        &ctx.tts_model
                    };
                    println!("{:<8} {:<20} {:<30} {}", current, name, base_url, model);
                }

                Ok(())
            }

            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;

                println!("Config file: {}", cfg.path().display());
                println!("Current context: {}", cfg.current_context);
                println!("Contexts: {}", cfg.contexts.len());

                if cfg.contexts.is_empty() {
                    return Ok(());
                }
                println!("\nContext details:");

                for name in cfg.list_contexts() {
                    let Some(ctx) = cfg.get_context(name) else {
                        continue;
                    };
                    println!("\n  {}:", name);
                    println!("    API Key: {}", mask_api_key(&ctx.api_key));
                    let optional = [
                        ("Base URL", ctx.base_url.as_str()),
                        ("TTS Model", ctx.tts_model.as_str()),
                        ("Native Audio Model", ctx.native_audio_model.as_str()),
                        ("Default Voice", ctx.default_voice.as_str()),
                        ("Default Language", ctx.default_language.as_str()),
                    ];
                    for (label, value) in optional {
                        if !value.is_empty() {
                            println!("    {}: {}", label, value);
                        }
                    }
                    if ctx.timeout > 0 {
                        println!("    Timeout: {}s", ctx.timeout);
                    }
                }

                Ok(())
            }
        }
    }
}
