//! Core types describing a spectral transform geometry.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectralError};

/// Direction of a transform operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Physical grid space to spectral (or Fourier) space.
    Forward,
    /// Spectral (or Fourier) space back to the physical grid.
    Inverse,
}

/// Specification of a Gaussian-grid / triangular-truncation geometry.
///
/// `nlon` evenly spaced longitudes, `nlat` Gaussian latitudes, triangular
/// truncation `ntrunc`, planetary radius `radius` in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereGeometry {
    /// Number of longitudes. Must be at least 4 with `nlon / 2` a power of
    /// two (the longitude transform runs a radix-2 FFT of half length).
    pub nlon: usize,
    /// Number of Gaussian latitudes. Must be at least `ntrunc + 1`.
    pub nlat: usize,
    /// Triangular truncation limit: modes with `m <= n <= ntrunc` are kept.
    pub ntrunc: usize,
    /// Planetary radius. Must be positive and finite.
    pub radius: f64,
}

impl SphereGeometry {
    /// Create a new geometry specification.
    pub fn new(nlon: usize, nlat: usize, ntrunc: usize, radius: f64) -> Self {
        Self {
            nlon,
            nlat,
            ntrunc,
            radius,
        }
    }

    /// Number of spectral coefficients retained by the truncation.
    pub fn nmdim(&self) -> usize {
        (self.ntrunc + 1) * (self.ntrunc + 2) / 2
    }

    /// Check that the geometry is usable.
    pub fn validate(&self) -> Result<()> {
        if self.nlon < 4 || self.nlon % 2 != 0 {
            return Err(SpectralError::invalid_geometry(format!(
                "nlon must be even and at least 4, got {}",
                self.nlon
            )));
        }
        let half = self.nlon / 2;
        if !half.is_power_of_two() {
            return Err(SpectralError::invalid_geometry(format!(
                "nlon / 2 must be a power of two for the radix-2 longitude FFT, got nlon = {}",
                self.nlon
            )));
        }
        if self.nlat < self.ntrunc + 1 {
            return Err(SpectralError::invalid_geometry(format!(
                "nlat must be at least ntrunc + 1, got nlat = {} for ntrunc = {}",
                self.nlat, self.ntrunc
            )));
        }
        if self.ntrunc > half {
            return Err(SpectralError::invalid_geometry(format!(
                "ntrunc must not exceed nlon / 2, got ntrunc = {} for nlon = {}",
                self.ntrunc, self.nlon
            )));
        }
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(SpectralError::invalid_geometry(format!(
                "radius must be positive and finite, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}
