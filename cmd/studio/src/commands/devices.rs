//! Audio device listing.

use clap::Args;
use serde::Serialize;

use vocalstudio_audio::portaudio::list_devices;

use crate::Cli;

/// List PortAudio input and output devices.
#[derive(Args)]
pub struct DevicesCommand {}

#[derive(Serialize)]
struct DeviceRow {
    index: usize,
    name: String,
    inputs: u32,
    outputs: u32,
    sample_rate: f64,
    default: String,
}

impl DevicesCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let devices = list_devices()?;
        if devices.is_empty() {
            println!("No audio devices found");
            return Ok(());
        }

        let rows: Vec<DeviceRow> = devices
            .into_iter()
            .map(|d| {
                let default = match (d.is_default_input, d.is_default_output) {
                    (true, true) => "input,output",
                    (true, false) => "input",
                    (false, true) => "output",
                    (false, false) => "",
                };
                DeviceRow {
                    index: d.index,
                    name: d.name,
                    inputs: d.max_input_channels,
                    outputs: d.max_output_channels,
                    sample_rate: d.default_sample_rate,
                    default: default.to_string(),
                }
            })
            .collect();

        if cli.json {
            return super::output(cli).write(&rows);
        }

        println!("{:<6} {:<40} {:<4} {:<4} {:<8} {}", "INDEX", "NAME", "IN", "OUT", "RATE", "DEFAULT");
        for row in rows {
            println!(
                "{:<6} {:<40} {:<4} {:<4} {:<8} {}",
                row.index, row.name, row.inputs, row.outputs, row.sample_rate, row.default
            );
        }
        Ok(())
    }
}
