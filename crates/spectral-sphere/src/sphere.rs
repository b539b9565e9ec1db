//! The spectral transform object: precomputed tables plus the scalar
//! transform façade.
//!
//! A [`SpectralSphere`] is built once for a fixed geometry and is immutable
//! afterwards, so it can be shared freely across threads. Buffer layouts are
//! part of the public contract:
//!
//! - grid fields are `f64` of length `nlon * nlat`, entry `(i, j)` at
//!   `j * nlon + i` (latitude ring `j` contiguous, north ring first);
//! - Fourier fields are `Complex64` of length `(ntrunc + 1) * nlat`, entry
//!   `(m, j)` at `m * nlat + j` (zonal wavenumber row contiguous);
//! - spectral fields are `Complex64` of length `nmdim` in the canonical
//!   ordering: outer `m = 0..=ntrunc`, inner `n = m..=ntrunc`.

use num_complex::Complex64;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{Result, SpectralError};
use crate::fft::RealRowFft;
use crate::gauss;
use crate::legendre;
use crate::types::{Direction, SphereGeometry};

/// Spherical harmonic transform engine on a Gaussian grid.
///
/// Holds every grid-dependent table needed to move fields between physical
/// and spectral space: Gaussian nodes and weights, normalized associated
/// Legendre function values and their latitudinal derivatives, Laplacian
/// eigenvalues, and the longitude FFT plan.
pub struct SpectralSphere {
    pub(crate) nlon: usize,
    pub(crate) nlat: usize,
    pub(crate) ntrunc: usize,
    pub(crate) radius: f64,
    pub(crate) nmdim: usize,
    /// Sines of the Gaussian latitudes, north to south.
    pub(crate) gaussian_latitudes: Vec<f64>,
    /// Quadrature weights; they sum to 2.
    pub(crate) gaussian_weights: Vec<f64>,
    /// Normalized associated Legendre values, entry `(k, j)` at `k * nlat + j`.
    pub(crate) legendre: Vec<f64>,
    /// `(1 - mu^2) dP/dmu`, same layout as `legendre`.
    pub(crate) d_legendre: Vec<f64>,
    /// Total wavenumber `n` for each spectral position.
    pub(crate) index_n: Vec<usize>,
    /// Zonal wavenumber `m` for each spectral position.
    pub(crate) index_m: Vec<usize>,
    /// Laplacian eigenvalues `-n (n + 1) / radius^2`.
    pub(crate) laplacian: Vec<f64>,
    /// Reciprocal eigenvalues, zero for the `n = 0` mode.
    pub(crate) inv_laplacian: Vec<f64>,
    pub(crate) fft: RealRowFft,
}

impl SpectralSphere {
    /// Build the transform engine for the given geometry, precomputing all
    /// tables. Fails with `InvalidGeometry` for unusable parameters and
    /// `ConvergenceFailure` if the Gaussian root finding breaks down.
    pub fn new(nlon: usize, nlat: usize, ntrunc: usize, radius: f64) -> Result<Self> {
        Self::from_geometry(&SphereGeometry::new(nlon, nlat, ntrunc, radius))
    }

    /// Build the transform engine from a geometry specification.
    pub fn from_geometry(geometry: &SphereGeometry) -> Result<Self> {
        geometry.validate()?;
        let nlon = geometry.nlon;
        let nlat = geometry.nlat;
        let ntrunc = geometry.ntrunc;
        let radius = geometry.radius;
        let nmdim = geometry.nmdim();

        let (gaussian_latitudes, gaussian_weights) = gauss::legendre_roots_and_weights(nlat)?;
        debug!(nlat, "gaussian quadrature nodes and weights computed");

        let (legendre, d_legendre) =
            legendre::associated_legendre_tables(ntrunc, &gaussian_latitudes);
        debug!(ntrunc, nlat, "associated legendre tables computed");

        let (index_n, index_m) = legendre::build_index_arrays(ntrunc);
        let mut laplacian = vec![0.0; nmdim];
        let mut inv_laplacian = vec![0.0; nmdim];
        for (k, &n) in index_n.iter().enumerate() {
            laplacian[k] = -((n * (n + 1)) as f64) / (radius * radius);
            if n > 0 {
                inv_laplacian[k] = 1.0 / laplacian[k];
            }
        }

        let fft = RealRowFft::new(nlon);

        info!(nlon, nlat, ntrunc, nmdim, "spectral sphere initialized");
        Ok(Self {
            nlon,
            nlat,
            ntrunc,
            radius,
            nmdim,
            gaussian_latitudes,
            gaussian_weights,
            legendre,
            d_legendre,
            index_n,
            index_m,
            laplacian,
            inv_laplacian,
            fft,
        })
    }

    /// Number of longitudes.
    pub fn nlon(&self) -> usize {
        self.nlon
    }

    /// Number of Gaussian latitudes.
    pub fn nlat(&self) -> usize {
        self.nlat
    }

    /// Triangular truncation limit.
    pub fn ntrunc(&self) -> usize {
        self.ntrunc
    }

    /// Planetary radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of spectral coefficients.
    pub fn nmdim(&self) -> usize {
        self.nmdim
    }

    /// Sines of the Gaussian latitudes, ordered north to south.
    pub fn gaussian_latitudes(&self) -> &[f64] {
        &self.gaussian_latitudes
    }

    /// Gaussian quadrature weights.
    pub fn gaussian_weights(&self) -> &[f64] {
        &self.gaussian_weights
    }

    /// Normalized associated Legendre values, entry `(k, j)` at `k * nlat + j`.
    pub fn legendre(&self) -> &[f64] {
        &self.legendre
    }

    /// Latitudinal derivative table `(1 - mu^2) dP/dmu`, same layout.
    pub fn d_legendre(&self) -> &[f64] {
        &self.d_legendre
    }

    /// Total wavenumber `n` at each spectral position.
    pub fn index_n(&self) -> &[usize] {
        &self.index_n
    }

    /// Zonal wavenumber `m` at each spectral position.
    pub fn index_m(&self) -> &[usize] {
        &self.index_m
    }

    /// Laplacian eigenvalues `-n (n + 1) / radius^2` per spectral position.
    pub fn laplacian(&self) -> &[f64] {
        &self.laplacian
    }

    /// Reciprocal Laplacian eigenvalues, zero at `n = 0`.
    pub fn inv_laplacian(&self) -> &[f64] {
        &self.inv_laplacian
    }

    /// Position of the `(n, m)` coefficient in the spectral ordering, if the
    /// pair is inside the truncation.
    pub fn spectral_index(&self, n: usize, m: usize) -> Option<usize> {
        if m > n || n > self.ntrunc {
            return None;
        }
        Some(legendre::spectral_position(self.ntrunc, n, m))
    }

    pub(crate) fn check_grid(&self, buffer: &[f64], what: &'static str) -> Result<()> {
        let expected = self.nlon * self.nlat;
        if buffer.len() != expected {
            return Err(SpectralError::shape_mismatch(what, expected, buffer.len()));
        }
        Ok(())
    }

    pub(crate) fn check_fourier(&self, buffer: &[Complex64], what: &'static str) -> Result<()> {
        let expected = (self.ntrunc + 1) * self.nlat;
        if buffer.len() != expected {
            return Err(SpectralError::shape_mismatch(what, expected, buffer.len()));
        }
        Ok(())
    }

    pub(crate) fn check_spectral(&self, buffer: &[Complex64], what: &'static str) -> Result<()> {
        if buffer.len() != self.nmdim {
            return Err(SpectralError::shape_mismatch(
                what,
                self.nmdim,
                buffer.len(),
            ));
        }
        Ok(())
    }

    /// Real FFT of every latitude ring.
    ///
    /// `Forward` fills `fourier` from `grid`, keeping zonal wavenumbers up to
    /// `ntrunc` and discarding the rest; `Inverse` fills `grid` from
    /// `fourier`, treating wavenumbers beyond `ntrunc` as zero.
    pub fn real_fft_rows(
        &self,
        grid: &mut [f64],
        fourier: &mut [Complex64],
        direction: Direction,
    ) -> Result<()> {
        self.check_grid(grid, "grid field")?;
        self.check_fourier(fourier, "fourier field")?;
        match direction {
            Direction::Forward => self.fourier_forward(grid, fourier),
            Direction::Inverse => self.fourier_inverse(fourier, grid),
        }
        Ok(())
    }

    /// Full scalar transform between grid and spectral space.
    ///
    /// `Forward` is FFT followed by Legendre analysis and fills `spectral`;
    /// `Inverse` is Legendre synthesis followed by the inverse FFT and fills
    /// `grid`.
    pub fn scalar_transform(
        &self,
        grid: &mut [f64],
        spectral: &mut [Complex64],
        direction: Direction,
    ) -> Result<()> {
        self.check_grid(grid, "grid field")?;
        self.check_spectral(spectral, "spectral coefficients")?;
        let mut fourier = vec![Complex64::new(0.0, 0.0); (self.ntrunc + 1) * self.nlat];
        match direction {
            Direction::Forward => {
                self.fourier_forward(grid, &mut fourier);
                self.legendre_analysis(&fourier, spectral);
            }
            Direction::Inverse => {
                self.legendre_synthesis(spectral, &mut fourier);
                self.fourier_inverse(&fourier, grid);
            }
        }
        Ok(())
    }

    /// Forward FFT of every ring into the retained zonal wavenumbers.
    /// Rows are independent, so they run in parallel.
    pub(crate) fn fourier_forward(&self, grid: &[f64], fourier: &mut [Complex64]) {
        let half = self.nlon / 2;
        let mut rows = vec![Complex64::new(0.0, 0.0); (half + 1) * self.nlat];
        rows.par_chunks_mut(half + 1)
            .zip(grid.par_chunks(self.nlon))
            .for_each(|(spectrum, ring)| self.fft.forward(ring, spectrum));

        // Transpose the retained modes into the wavenumber-major layout.
        for m in 0..=self.ntrunc {
            let out = &mut fourier[m * self.nlat..(m + 1) * self.nlat];
            for (j, slot) in out.iter_mut().enumerate() {
                *slot = rows[j * (half + 1) + m];
            }
        }
    }

    /// Inverse FFT of every ring from the retained zonal wavenumbers.
    pub(crate) fn fourier_inverse(&self, fourier: &[Complex64], grid: &mut [f64]) {
        let half = self.nlon / 2;
        let nlat = self.nlat;
        grid.par_chunks_mut(self.nlon)
            .enumerate()
            .for_each(|(j, ring)| {
                let mut padded = vec![Complex64::new(0.0, 0.0); half + 1];
                for m in 0..=self.ntrunc {
                    padded[m] = fourier[m * nlat + j];
                }
                self.fft.inverse(&padded, ring);
            });
    }

    /// Legendre analysis: project Fourier coefficients onto the spectral
    /// basis with the Gaussian weights.
    pub(crate) fn legendre_analysis(&self, fourier: &[Complex64], spectral: &mut [Complex64]) {
        let nlat = self.nlat;
        for m in 0..=self.ntrunc {
            let frow = &fourier[m * nlat..(m + 1) * nlat];
            for n in m..=self.ntrunc {
                let k = legendre::spectral_position(self.ntrunc, n, m);
                let prow = &self.legendre[k * nlat..(k + 1) * nlat];
                let mut acc = Complex64::new(0.0, 0.0);
                for j in 0..nlat {
                    acc += self.gaussian_weights[j] * prow[j] * frow[j];
                }
                spectral[k] = acc;
            }
        }
    }

    /// Legendre synthesis: evaluate the spectral expansion at every
    /// latitude, one zonal wavenumber at a time.
    pub(crate) fn legendre_synthesis(&self, spectral: &[Complex64], fourier: &mut [Complex64]) {
        let nlat = self.nlat;
        fourier.fill(Complex64::new(0.0, 0.0));
        for m in 0..=self.ntrunc {
            let frow = &mut fourier[m * nlat..(m + 1) * nlat];
            for n in m..=self.ntrunc {
                let k = legendre::spectral_position(self.ntrunc, n, m);
                let prow = &self.legendre[k * nlat..(k + 1) * nlat];
                let coeff = spectral[k];
                for j in 0..nlat {
                    frow[j] += coeff * prow[j];
                }
            }
        }
    }
}
