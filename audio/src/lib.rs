//! Audio processing for the studio pipeline.
//!
//! This crate provides:
//!
//! - `pcm`: PCM format handling, [`PlayableBuffer`] and the raw PCM decoder
//! - `spectrum`: frequency-domain analyser driving capture visualization
//! - `container`: encoders that package captured PCM into a sample container
//! - `device`: output/input device traits and a WAV file output
//! - `portaudio`: PortAudio microphone and speaker backends (feature `portaudio`)
//!
//! # Example
//!
//! ```rust
//! use vocalstudio_audio::device::file::FileOutput;
//! use vocalstudio_audio::pcm::{decode_pcm, OUTPUT_FORMAT};
//!
//! let ctx = FileOutput::new("out.wav", OUTPUT_FORMAT.sample_rate);
//! let buffer = decode_pcm(&[0x00, 0x00, 0xff, 0x7f], &ctx).unwrap();
//! assert_eq!(buffer.length(), 2);
//! assert_eq!(buffer.sample_rate(), 24000);
//! ```

pub mod container;
pub mod device;
pub mod pcm;
pub mod spectrum;

#[cfg(feature = "portaudio")]
pub mod portaudio;

pub use pcm::{Format, PlayableBuffer};
