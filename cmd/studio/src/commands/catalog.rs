//! Voice and language listings.

use clap::Args;
use serde::Serialize;

use vocalstudio::voice::{LANGUAGES, VOICES, mirror_text};

use super::output;
use crate::Cli;

/// List the prebuilt voices.
#[derive(Args)]
pub struct VoicesCommand {}

/// List the languages mirror can speak.
#[derive(Args)]
pub struct LanguagesCommand {}

#[derive(Serialize)]
struct LanguageRow {
    id: &'static str,
    name: &'static str,
    sample: &'static str,
}

impl VoicesCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        output(cli).write(&VOICES)
    }
}

impl LanguagesCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let rows: Vec<LanguageRow> = LANGUAGES
            .iter()
            .map(|l| LanguageRow {
                id: l.id,
                name: l.name,
                sample: mirror_text(l.id),
            })
            .collect();
        output(cli).write(&rows)
    }
}
