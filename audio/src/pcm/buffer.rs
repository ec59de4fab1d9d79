//! Decoded in-memory sample buffer.

use std::time::Duration;

/// A planar buffer of normalized `f32` samples in `[-1.0, 1.0]`.
///
/// Buffers are allocated through [`OutputContext::create_buffer`] so that
/// their sample rate matches the context that will play them.
///
/// [`OutputContext::create_buffer`]: crate::device::OutputContext::create_buffer
#[derive(Debug, Clone, PartialEq)]
pub struct PlayableBuffer {
    sample_rate: u32,
    length: usize,
    channels: Vec<Vec<f32>>,
}

impl PlayableBuffer {
    /// Allocates a silent buffer of `length` frames per channel.
    pub fn new(channels: usize, length: usize, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            length,
            channels: vec![vec![0.0; length]; channels.max(1)],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the number of frames per channel.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn number_of_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.length as f64 / self.sample_rate as f64)
    }

    pub fn channel_data(&self, channel: usize) -> Option<&[f32]> {
        self.channels.get(channel).map(Vec::as_slice)
    }

    pub fn channel_data_mut(&mut self, channel: usize) -> Option<&mut [f32]> {
        self.channels.get_mut(channel).map(Vec::as_mut_slice)
    }

    /// Converts back to interleaved 16-bit samples for device output.
    pub fn to_i16_interleaved(&self) -> Vec<i16> {
        let mut out = Vec::with_capacity(self.length * self.channels.len());
        for frame in 0..self.length {
            for channel in &self.channels {
                let scaled = (channel[frame] * 32768.0).round();
                out.push(scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_silent() {
        let buf = PlayableBuffer::new(2, 4, 24000);
        assert_eq!(buf.number_of_channels(), 2);
        assert_eq!(buf.length(), 4);
        assert!(buf.channel_data(1).unwrap().iter().all(|&s| s == 0.0));
        assert!(buf.channel_data(2).is_none());
    }

    #[test]
    fn test_duration() {
        let buf = PlayableBuffer::new(1, 12000, 24000);
        assert_eq!(buf.duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_to_i16_interleaved() {
        let mut buf = PlayableBuffer::new(2, 2, 24000);
        buf.channel_data_mut(0).unwrap().copy_from_slice(&[-1.0, 0.5]);
        buf.channel_data_mut(1).unwrap().copy_from_slice(&[1.0, 0.0]);
        assert_eq!(buf.to_i16_interleaved(), vec![-32768, 32767, 16384, 0]);
    }
}
