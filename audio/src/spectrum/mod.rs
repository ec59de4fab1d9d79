//! Frequency-domain analysis for live capture visualization.
//!
//! [`Analyser`] keeps the most recent `fft_size` samples of the capture
//! stream and reports per-bin energy as bytes, the way a browser
//! `AnalyserNode` does for `getByteFrequencyData`:
//!
//! 1. Blackman window over the latest `fft_size` samples
//! 2. FFT, magnitude scaled by `1 / fft_size`
//! 3. exponential smoothing against the previous frame
//! 4. decibels mapped linearly from `[min_db, max_db]` onto `0..=255`

mod fft;

/// Default FFT size used by the capture visualizer (128 bins).
pub const DEFAULT_FFT_SIZE: usize = 256;

/// Default smoothing time constant.
pub const DEFAULT_SMOOTHING: f64 = 0.8;

/// Default lower bound of the byte scale, in dBFS.
pub const DEFAULT_MIN_DB: f64 = -100.0;

/// Default upper bound of the byte scale, in dBFS.
pub const DEFAULT_MAX_DB: f64 = -30.0;

/// Rolling spectrum analyser.
#[derive(Debug, Clone)]
pub struct Analyser {
    fft_size: usize,
    smoothing: f64,
    min_db: f64,
    max_db: f64,
    window: Vec<f64>,
    ring: Vec<f32>,
    pos: usize,
    smoothed: Vec<f64>,
}

impl Default for Analyser {
    fn default() -> Self {
        Self::new(DEFAULT_FFT_SIZE)
    }
}

impl Analyser {
    /// Creates an analyser. `fft_size` is rounded up to a power of two in
    /// `32..=32768`.
    pub fn new(fft_size: usize) -> Self {
        let fft_size = fft_size.clamp(32, 32768).next_power_of_two();
        Self {
            fft_size,
            smoothing: DEFAULT_SMOOTHING,
            min_db: DEFAULT_MIN_DB,
            max_db: DEFAULT_MAX_DB,
            window: blackman(fft_size),
            ring: vec![0.0; fft_size],
            pos: 0,
            smoothed: vec![0.0; fft_size / 2],
        }
    }

    /// Sets the smoothing constant, clamped to `[0, 1]`.
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    /// Sets the decibel range mapped onto the byte scale.
    pub fn with_decibels(mut self, min_db: f64, max_db: f64) -> Self {
        if min_db < max_db {
            self.min_db = min_db;
            self.max_db = max_db;
        }
        self
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Returns the number of frequency bins (`fft_size / 2`).
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Appends captured samples to the analysis window.
    pub fn push(&mut self, samples: &[i16]) {
        for &s in samples {
            self.ring[self.pos] = s as f32 / 32768.0;
            self.pos = (self.pos + 1) % self.fft_size;
        }
    }

    /// Clears the window and the smoothing history.
    pub fn reset(&mut self) {
        self.ring.iter_mut().for_each(|v| *v = 0.0);
        self.smoothed.iter_mut().for_each(|v| *v = 0.0);
        self.pos = 0;
    }

    /// Computes the current smoothed spectrum as bytes, one per bin.
    pub fn byte_frequency_data(&mut self) -> Vec<u8> {
        let n = self.fft_size;
        let mut real: Vec<f64> = (0..n)
            .map(|i| self.ring[(self.pos + i) % n] as f64 * self.window[i])
            .collect();
        let mut imag = vec![0.0; n];
        fft::fft(&mut real, &mut imag);

        let scale = 255.0 / (self.max_db - self.min_db);
        let tau = self.smoothing;
        let mut out = Vec::with_capacity(n / 2);
        for (k, prev) in self.smoothed.iter_mut().enumerate() {
            let magnitude = (real[k] * real[k] + imag[k] * imag[k]).sqrt() / n as f64;
            *prev = tau * *prev + (1.0 - tau) * magnitude;
            if *prev <= 0.0 {
                out.push(0);
                continue;
            }
            let db = 20.0 * prev.log10();
            out.push((scale * (db - self.min_db)).clamp(0.0, 255.0) as u8);
        }
        out
    }
}

fn blackman(n: usize) -> Vec<f64> {
    use std::f64::consts::PI;
    const A0: f64 = 0.42;
    const A1: f64 = 0.5;
    const A2: f64 = 0.08;
    (0..n)
        .map(|i| {
            let x = i as f64 / n as f64;
            A0 - A1 * (2.0 * PI * x).cos() + A2 * (4.0 * PI * x).cos()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(bin: usize, fft_size: usize, amplitude: f64, len: usize) -> Vec<i16> {
        (0..len)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * bin as f64 * i as f64 / fft_size as f64;
                (phase.sin() * amplitude * 32767.0) as i16
            })
            .collect()
    }

    #[test]
    fn test_fft_size_rounding() {
        assert_eq!(Analyser::new(256).fft_size(), 256);
        assert_eq!(Analyser::new(200).fft_size(), 256);
        assert_eq!(Analyser::new(1).fft_size(), 32);
        assert_eq!(Analyser::new(256).frequency_bin_count(), 128);
    }

    #[test]
    fn test_silence_is_zero() {
        let mut analyser = Analyser::default();
        analyser.push(&[0; 512]);
        let bins = analyser.byte_frequency_data();
        assert_eq!(bins.len(), 128);
        assert!(bins.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tone_peaks_at_its_bin() {
        // A 0 dB ceiling keeps the main lobe below saturation.
        let mut analyser = Analyser::default().with_decibels(-100.0, 0.0);
        analyser.push(&sine(16, 256, 0.5, 1024));

        let mut bins = Vec::new();
        for _ in 0..20 {
            bins = analyser.byte_frequency_data();
        }
        let value = bins[16];
        assert!(bins.iter().enumerate().all(|(i, &v)| i == 16 || v < value));
        assert!(value > 180, "peak value {}", value);
        assert!(bins[100] < value / 2);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut analyser = Analyser::default();
        analyser.push(&sine(8, 256, 0.9, 256));
        analyser.byte_frequency_data();
        analyser.reset();
        assert!(analyser.byte_frequency_data().iter().all(|&b| b == 0));
    }
}
