//! 16-bit PCM format description.

use std::time::Duration;

/// Describes a 16-bit signed integer PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Sample rate in Hz (e.g., 16000, 24000).
    pub sample_rate: u32,
    /// True for stereo (2 channels), false for mono (1 channel).
    pub stereo: bool,
}

impl Format {
    /// Creates a mono format with the given sample rate.
    pub const fn mono(sample_rate: u32) -> Self {
        Self { sample_rate, stereo: false }
    }

    /// Creates a stereo format with the given sample rate.
    pub const fn stereo(sample_rate: u32) -> Self {
        Self { sample_rate, stereo: true }
    }

    /// Returns the number of channels (1 for mono, 2 for stereo).
    pub fn channels(&self) -> u32 {
        if self.stereo { 2 } else { 1 }
    }

    /// Returns the number of bytes in one frame (one sample per channel).
    pub fn frame_bytes(&self) -> usize {
        2 * self.channels() as usize
    }

    /// Returns the number of bytes needed to hold `duration` of audio.
    pub fn bytes_in_duration(&self, duration: Duration) -> u64 {
        let frames = duration.as_nanos() * self.sample_rate as u128 / 1_000_000_000;
        frames as u64 * self.frame_bytes() as u64
    }

    /// Returns the number of frames needed to hold `duration` of audio.
    pub fn frames_in_duration(&self, duration: Duration) -> usize {
        (duration.as_nanos() * self.sample_rate as u128 / 1_000_000_000) as usize
    }

    /// Returns the playback duration of `bytes` of audio.
    pub fn duration(&self, bytes: u64) -> Duration {
        let frames = bytes / self.frame_bytes() as u64;
        self.frames_duration(frames as usize)
    }

    /// Returns the playback duration of `frames` frames.
    pub fn frames_duration(&self, frames: usize) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(frames as u64 * 1_000_000_000 / self.sample_rate as u64)
    }
}

// Common format presets
impl Format {
    /// 16kHz mono (microphone capture default)
    pub const MONO_16K: Format = Format::mono(16000);
    /// 24kHz mono (speech service output)
    pub const MONO_24K: Format = Format::mono(24000);
    /// 48kHz mono
    pub const MONO_48K: Format = Format::mono(48000);
    /// 48kHz stereo
    pub const STEREO_48K: Format = Format::stereo(48000);
}

/// Format of every audio payload returned by the speech service.
pub const OUTPUT_FORMAT: Format = Format::MONO_24K;
