//! Audio device abstractions.
//!
//! The studio never talks to hardware directly. Playback goes through an
//! [`OutputContext`] (one per session, opened by an [`OutputFactory`]) and
//! capture goes through a [`Microphone`]. Backends:
//!
//! - [`file::FileOutput`]: writes every started buffer to a WAV file
//! - `portaudio::{PortAudioOutput, PortAudioMicrophone}` (feature `portaudio`),
//!   whose sources run on [`ThreadSource`] workers

pub mod file;
mod thread;

pub use thread::ThreadSource;

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::pcm::{Format, PlayableBuffer};

/// Error type for device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The user or the OS refused access to the device.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// No usable device exists.
    #[error("device unavailable: {0}")]
    Unavailable(String),

    /// The context or stream was already closed.
    #[error("device closed")]
    Closed,

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Handle on one sounding output node.
pub trait SourceHandle: Send {
    /// Stops output. Stopping a finished or stopped source is a no-op.
    fn stop(&mut self);

    /// Returns true while the source is still producing sound.
    fn is_playing(&self) -> bool;
}

/// An audio output clock/device shared by every playback of a session.
pub trait OutputContext: Send + Sync {
    /// Returns the context's native sample rate.
    fn sample_rate(&self) -> u32;

    /// Allocates a silent buffer bound to this context.
    fn create_buffer(&self, channels: usize, length: usize, sample_rate: u32) -> PlayableBuffer {
        PlayableBuffer::new(channels, length, sample_rate)
    }

    /// Creates a source for `buffer`, connects it to the destination and
    /// starts it immediately.
    fn start(&self, buffer: Arc<PlayableBuffer>) -> Result<Box<dyn SourceHandle>, DeviceError>;

    /// Releases the device. Closing twice is a no-op.
    fn close(&self) -> Result<(), DeviceError>;

    fn is_closed(&self) -> bool;
}

/// Opens output contexts.
pub trait OutputFactory: Send + Sync {
    fn open(&self, sample_rate: u32) -> Result<Arc<dyn OutputContext>, DeviceError>;
}

/// A capture device. Opening it is the permission request.
#[async_trait]
pub trait Microphone: Send + Sync {
    async fn open(&self, format: Format) -> Result<Box<dyn InputStream>, DeviceError>;
}

/// A live capture stream.
#[async_trait]
pub trait InputStream: Send {
    fn format(&self) -> Format;

    /// Waits for the next block of interleaved samples.
    ///
    /// After [`stop`](Self::stop), buffered blocks are still returned;
    /// `Ok(None)` marks the end of the stream.
    async fn read_block(&mut self) -> Result<Option<Vec<i16>>, DeviceError>;

    /// Stops the hardware and releases it. Idempotent.
    fn stop(&mut self);
}

/// A source handle for output that has already completed.
#[derive(Debug, Default)]
pub struct FinishedSource;

impl SourceHandle for FinishedSource {
    fn stop(&mut self) {}

    fn is_playing(&self) -> bool {
        false
    }
}
