//! CLI utilities for vocalstudio.
//!
//! This crate provides persistent configuration (named contexts holding
//! API credentials and defaults) and structured output for the
//! `vocalstudio` command.

pub mod config;
pub mod output;

pub use config::{Config, Context, load_config, mask_api_key};
pub use output::{Output, OutputFormat};
