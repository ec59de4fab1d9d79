//! Gemini speech generation API SDK for Rust.
//!
//! This crate provides a client for the `generateContent` endpoint of the
//! Gemini API, restricted to audio responses:
//!
//! - single-speaker text-to-speech with a prebuilt voice
//! - multi-speaker scripted dialogue
//! - voice mirroring from a short reference sample
//!
//! Every operation returns the Base64 text of the generated audio, which is
//! raw 16-bit little-endian mono PCM at 24 kHz.

mod client;
mod error;
pub mod http;
mod speech;
mod types;

pub use client::{
    Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_NATIVE_AUDIO_MODEL, DEFAULT_TIMEOUT,
    DEFAULT_TTS_MODEL,
};
pub use error::{Error, Result};
pub use speech::{SpeakerVoice, SpeechService, mirror_prompt};
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Modality, MultiSpeakerVoiceConfig, Part, PrebuiltVoiceConfig,
    SpeakerVoiceConfig, SpeechConfig, UsageMetadata, VoiceConfig,
};
