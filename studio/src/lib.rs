//! Voice studio: microphone capture, playback and speech synthesis.
//!
//! This crate ties the pieces of the studio together:
//!
//! - [`CaptureEngine`]: records a short voice sample and drives a live
//!   spectrum [`Visualizer`]
//! - [`PlaybackEngine`]: plays one decoded buffer at a time
//! - [`Studio`]: validates a [`SynthesisRequest`], calls the
//!   [`SpeechService`], decodes the answer and plays it
//! - [`voice`]: voice, speaker, mode and language catalogs
//!
//! The speech service is reached through the [`SpeechService`] trait,
//! implemented for [`vocalstudio_gemini::Client`].

mod capture;
mod error;
mod playback;
mod service;
mod studio;
pub mod voice;

pub use capture::{
    AudioSample, Bar, CaptureConfig, CaptureEngine, CaptureState, SpectrumFrame, Visualizer,
};
pub use error::{CaptureError, CatalogError, ServiceError, SynthesisError};
pub use playback::PlaybackEngine;
pub use service::SpeechService;
pub use studio::{Studio, StudioConfig, SynthesisRequest};
pub use voice::{Language, Mode, SpeakerConfig, VoiceName, VoiceOption};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the data from a poisoned lock.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
