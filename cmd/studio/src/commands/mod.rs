//! CLI commands module.

mod catalog;
mod config;
#[cfg(feature = "portaudio")]
mod devices;
#[cfg(feature = "portaudio")]
mod meter;
mod mirror;
mod speak;
mod util;

pub use catalog::{LanguagesCommand, VoicesCommand};
pub use config::ConfigCommand;
#[cfg(feature = "portaudio")]
pub use devices::DevicesCommand;
pub use mirror::MirrorCommand;
pub use speak::{DialogueCommand, SpeakCommand};

pub(crate) use util::*;
