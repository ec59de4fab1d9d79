//! In-place radix-2 Cooley-Tukey FFT.

use std::f64::consts::PI;

/// Transforms `real`/`imag` in place. Both must share a power-of-two length.
pub(super) fn fft(real: &mut [f64], imag: &mut [f64]) {
    let n = real.len();
    if n <= 1 || imag.len() != n {
        return;
    }

    bit_reverse(real, imag);

    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let step = -2.0 * PI / size as f64;
        for k in 0..half {
            let (w_i, w_r) = (step * k as f64).sin_cos();
            for start in (0..n).step_by(size) {
                let u = start + k;
                let v = u + half;
                let t_r = w_r * real[v] - w_i * imag[v];
                let t_i = w_r * imag[v] + w_i * real[v];
                real[v] = real[u] - t_r;
                imag[v] = imag[u] - t_i;
                real[u] += t_r;
                imag[u] += t_i;
            }
        }
        size *= 2;
    }
}

fn bit_reverse(real: &mut [f64], imag: &mut [f64]) {
    let n = real.len();
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if i < j {
            real.swap(i, j);
            imag.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_impulse() {
        // FFT of unit impulse should be all 1s
        let mut real = vec![0.0; 8];
        let mut imag = vec![0.0; 8];
        real[0] = 1.0;

        fft(&mut real, &mut imag);

        assert!(real.iter().all(|v| (v - 1.0).abs() < 1e-10));
        assert!(imag.iter().all(|v| v.abs() < 1e-10));
    }

    #[test]
    fn test_fft_cosine_bin() {
        let n = 16;
        let mut real: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 3.0 * i as f64 / n as f64).cos())
            .collect();
        let mut imag = vec![0.0; n];

        fft(&mut real, &mut imag);

        // A cosine at bin 3 puts n/2 at bins 3 and n-3.
        for k in 0..n {
            let mag = (real[k] * real[k] + imag[k] * imag[k]).sqrt();
            let expected = if k == 3 || k == n - 3 { 8.0 } else { 0.0 };
            assert!((mag - expected).abs() < 1e-9, "bin {}: {}", k, mag);
        }
    }
}
