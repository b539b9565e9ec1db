//! Real FFT along a longitude ring via a half-length complex transform.
//!
//! A real row of length `nlon` is packed into a complex sequence of length
//! `nlon / 2`, run through an iterative radix-2 Cooley-Tukey transform with
//! precomputed twiddles and bit-reversal table, and post-shuffled into the
//! half-spectrum `F_m`, `m = 0..=nlon/2`. The forward transform divides by
//! `nlon`; the inverse does not, so the pair round-trips exactly.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Precomputed plan for real-row transforms of a fixed length.
#[derive(Debug, Clone)]
pub(crate) struct RealRowFft {
    nlon: usize,
    half: usize,
    /// Bit-reversal permutation for the half-length complex transform.
    bitrev: Vec<usize>,
    /// `exp(-2 pi i k / half)` for `k < half / 2`.
    twiddles: Vec<Complex64>,
    /// `exp(-2 pi i m / nlon)` for `m <= half`, used by the real shuffle.
    shuffle: Vec<Complex64>,
}

impl RealRowFft {
    /// Build a plan for rows of length `nlon`. The caller guarantees that
    /// `nlon / 2` is a power of two and at least 2.
    pub(crate) fn new(nlon: usize) -> Self {
        let half = nlon / 2;
        let bits = half.trailing_zeros();
        let bitrev = (0..half)
            .map(|i| (i.reverse_bits() >> (usize::BITS - bits)) as usize)
            .collect();
        let twiddles = (0..half / 2)
            .map(|k| Complex64::from_polar(1.0, -2.0 * PI * k as f64 / half as f64))
            .collect();
        let shuffle = (0..=half)
            .map(|m| Complex64::from_polar(1.0, -2.0 * PI * m as f64 / nlon as f64))
            .collect();
        Self {
            nlon,
            half,
            bitrev,
            twiddles,
            shuffle,
        }
    }

    /// In-place iterative radix-2 transform of the half-length sequence.
    fn complex_fft(&self, data: &mut [Complex64], inverse: bool) {
        let n = data.len();
        for i in 0..n {
            let j = self.bitrev[i];
            if i < j {
                data.swap(i, j);
            }
        }

        let mut len = 2;
        while len <= n {
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for k in 0..len / 2 {
                    let mut w = self.twiddles[k * stride];
                    if inverse {
                        w = w.conj();
                    }
                    let t = data[start + k + len / 2] * w;
                    let a = data[start + k];
                    data[start + k] = a + t;
                    data[start + k + len / 2] = a - t;
                }
            }
            len <<= 1;
        }
    }

    /// Forward transform of one real row into the half-spectrum
    /// `spectrum[m]`, `m = 0..=nlon/2`, scaled by `1 / nlon`.
    pub(crate) fn forward(&self, row: &[f64], spectrum: &mut [Complex64]) {
        debug_assert_eq!(row.len(), self.nlon);
        debug_assert_eq!(spectrum.len(), self.half + 1);

        // Pack adjacent real samples into complex pairs.
        let mut z: Vec<Complex64> = (0..self.half)
            .map(|k| Complex64::new(row[2 * k], row[2 * k + 1]))
            .collect();
        self.complex_fft(&mut z, false);

        let scale = 1.0 / self.nlon as f64;
        let z0 = z[0];
        spectrum[0] = Complex64::new((z0.re + z0.im) * scale, 0.0);
        spectrum[self.half] = Complex64::new((z0.re - z0.im) * scale, 0.0);
        for m in 1..self.half {
            let mirrored = z[self.half - m].conj();
            // Even- and odd-sample sub-spectra recovered from Hermitian
            // symmetry of the packed transform.
            let even = 0.5 * (z[m] + mirrored);
            let odd = Complex64::new(0.0, -0.5) * (z[m] - mirrored);
            spectrum[m] = (even + self.shuffle[m] * odd) * scale;
        }
    }

    /// Inverse transform of a half-spectrum (Hermitian extension implied)
    /// back to one real row. No normalization is applied.
    pub(crate) fn inverse(&self, spectrum: &[Complex64], row: &mut [f64]) {
        debug_assert_eq!(spectrum.len(), self.half + 1);
        debug_assert_eq!(row.len(), self.nlon);

        let mut z = Vec::with_capacity(self.half);
        let first = spectrum[0];
        let nyquist = spectrum[self.half];
        let even = first + nyquist;
        let odd = first - nyquist;
        z.push(even + Complex64::new(0.0, 1.0) * odd);
        for m in 1..self.half {
            let mirrored = spectrum[self.half - m].conj();
            let even = spectrum[m] + mirrored;
            let odd = self.shuffle[m].conj() * (spectrum[m] - mirrored);
            z.push(even + Complex64::new(0.0, 1.0) * odd);
        }
        self.complex_fft(&mut z, true);

        for (k, value) in z.iter().enumerate() {
            row[2 * k] = value.re;
            row[2 * k + 1] = value.im;
        }
    }
}
