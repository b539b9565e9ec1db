//! Spectral operators on vector fields.
//!
//! The velocity routines work on `u cos(phi)` / `v cos(phi)` grids and
//! vorticity / divergence spectral coefficients. The streamfunction and
//! velocity potential never leave these routines: the `n = 0` mode carries no
//! wind, and the latitudinal derivative coupling comes straight from the
//! precomputed `(1 - mu^2) dP/dmu` table.

use num_complex::Complex64;

use crate::error::Result;
use crate::legendre::spectral_position;
use crate::sphere::SpectralSphere;

/// Four-quadrant arctangent that returns 0 at the origin.
///
/// Coordinate rotations produce exactly `(0, 0)` at the poles, where
/// `f64::atan2` would return an arbitrary angle depending on the signs of the
/// zeros. Callers building rotated initial states use this to keep the poles
/// well defined.
pub fn guarded_atan2(y: f64, x: f64) -> f64 {
    if x == 0.0 && y == 0.0 {
        0.0
    } else {
        y.atan2(x)
    }
}

impl SpectralSphere {
    /// Synthesize `u cos(phi)` and `v cos(phi)` grids from spectral
    /// vorticity and divergence.
    ///
    /// The zonal part multiplies by `i m`, the meridional part uses the
    /// derivative table, and both are scaled by the inverse Laplacian to go
    /// through the streamfunction and velocity potential.
    pub fn velocities_from_vorticity_divergence(
        &self,
        vorticity: &[Complex64],
        divergence: &[Complex64],
        u_cos: &mut [f64],
        v_cos: &mut [f64],
    ) -> Result<()> {
        self.check_spectral(vorticity, "vorticity coefficients")?;
        self.check_spectral(divergence, "divergence coefficients")?;
        self.check_grid(u_cos, "zonal velocity grid")?;
        self.check_grid(v_cos, "meridional velocity grid")?;

        let nlat = self.nlat;
        let inv_radius = 1.0 / self.radius;
        let mut um = vec![Complex64::new(0.0, 0.0); (self.ntrunc + 1) * nlat];
        let mut vm = vec![Complex64::new(0.0, 0.0); (self.ntrunc + 1) * nlat];

        for m in 0..=self.ntrunc {
            let urow = &mut um[m * nlat..(m + 1) * nlat];
            let vrow = &mut vm[m * nlat..(m + 1) * nlat];
            let im = Complex64::new(0.0, m as f64);
            for n in m..=self.ntrunc {
                let k = spectral_position(self.ntrunc, n, m);
                let inv_lap = self.inv_laplacian[k];
                if inv_lap == 0.0 {
                    continue;
                }
                let psi = vorticity[k] * inv_lap;
                let chi = divergence[k] * inv_lap;
                let zonal_u = im * chi;
                let zonal_v = im * psi;
                let prow = &self.legendre[k * nlat..(k + 1) * nlat];
                let hrow = &self.d_legendre[k * nlat..(k + 1) * nlat];
                for j in 0..nlat {
                    urow[j] += zonal_u * prow[j] - psi * hrow[j];
                    vrow[j] += zonal_v * prow[j] + chi * hrow[j];
                }
            }
            for j in 0..nlat {
                urow[j] *= inv_radius;
                vrow[j] *= inv_radius;
            }
        }

        self.fourier_inverse(&um, u_cos);
        self.fourier_inverse(&vm, v_cos);
        Ok(())
    }

    /// Analyze `u cos(phi)` and `v cos(phi)` grids into spectral vorticity
    /// and divergence. Exact inverse of
    /// [`velocities_from_vorticity_divergence`](Self::velocities_from_vorticity_divergence)
    /// for band-limited fields.
    pub fn vorticity_divergence_from_velocities(
        &self,
        u_cos: &[f64],
        v_cos: &[f64],
        vorticity: &mut [Complex64],
        divergence: &mut [Complex64],
    ) -> Result<()> {
        self.check_grid(u_cos, "zonal velocity grid")?;
        self.check_grid(v_cos, "meridional velocity grid")?;
        self.check_spectral(vorticity, "vorticity coefficients")?;
        self.check_spectral(divergence, "divergence coefficients")?;

        let size = (self.ntrunc + 1) * self.nlat;
        let mut um = vec![Complex64::new(0.0, 0.0); size];
        let mut vm = vec![Complex64::new(0.0, 0.0); size];
        self.fourier_forward(u_cos, &mut um);
        self.fourier_forward(v_cos, &mut vm);

        self.combine_into(&um, &vm, vorticity, 1.0, 1.0);
        self.combine_into(&vm, &um, divergence, -1.0, 1.0);
        Ok(())
    }

    /// Common analysis kernel for tendency evaluation:
    ///
    /// `X_k = sum_j w_j (sign_a H_k A[m,j] + sign_b i m P_k B[m,j])
    ///        / (radius (1 - mu_j^2))`.
    ///
    /// Vorticity is `combine(U, V, +1, +1)` and divergence is
    /// `combine(V, U, -1, +1)`.
    pub fn combine_fourier_to_spectral(
        &self,
        a: &[Complex64],
        b: &[Complex64],
        spectral: &mut [Complex64],
        sign_a: f64,
        sign_b: f64,
    ) -> Result<()> {
        self.check_fourier(a, "first fourier field")?;
        self.check_fourier(b, "second fourier field")?;
        self.check_spectral(spectral, "spectral coefficients")?;
        self.combine_into(a, b, spectral, sign_a, sign_b);
        Ok(())
    }

    pub(crate) fn combine_into(
        &self,
        a: &[Complex64],
        b: &[Complex64],
        spectral: &mut [Complex64],
        sign_a: f64,
        sign_b: f64,
    ) {
        let nlat = self.nlat;
        let factor: Vec<f64> = (0..nlat)
            .map(|j| {
                let mu = self.gaussian_latitudes[j];
                self.gaussian_weights[j] / (self.radius * (1.0 - mu * mu))
            })
            .collect();

        for m in 0..=self.ntrunc {
            let arow = &a[m * nlat..(m + 1) * nlat];
            let brow = &b[m * nlat..(m + 1) * nlat];
            let im_signed = Complex64::new(0.0, sign_b * m as f64);
            for n in m..=self.ntrunc {
                let k = spectral_position(self.ntrunc, n, m);
                let prow = &self.legendre[k * nlat..(k + 1) * nlat];
                let hrow = &self.d_legendre[k * nlat..(k + 1) * nlat];
                let mut acc = Complex64::new(0.0, 0.0);
                for j in 0..nlat {
                    let meridional = sign_a * hrow[j];
                    acc += factor[j] * (arow[j] * meridional + im_signed * brow[j] * prow[j]);
                }
                spectral[k] = acc;
            }
        }
    }

    /// Synthesize the components of `cos(phi)` times the gradient of a
    /// spectral scalar: zonal `(1/a) dX/dlambda` and meridional
    /// `(cos(phi)/a) dX/dphi` on the grid.
    pub fn cos_gradient(
        &self,
        spectral: &[Complex64],
        grad_lon: &mut [f64],
        grad_lat: &mut [f64],
    ) -> Result<()> {
        self.check_spectral(spectral, "spectral coefficients")?;
        self.check_grid(grad_lon, "zonal gradient grid")?;
        self.check_grid(grad_lat, "meridional gradient grid")?;

        let nlat = self.nlat;
        let inv_radius = 1.0 / self.radius;
        let mut lon_m = vec![Complex64::new(0.0, 0.0); (self.ntrunc + 1) * nlat];
        let mut lat_m = vec![Complex64::new(0.0, 0.0); (self.ntrunc + 1) * nlat];

        for m in 0..=self.ntrunc {
            let lon_row = &mut lon_m[m * nlat..(m + 1) * nlat];
            let lat_row = &mut lat_m[m * nlat..(m + 1) * nlat];
            let im = Complex64::new(0.0, m as f64);
            for n in m..=self.ntrunc {
                let k = spectral_position(self.ntrunc, n, m);
                let coeff = spectral[k];
                let zonal = im * coeff;
                let prow = &self.legendre[k * nlat..(k + 1) * nlat];
                let hrow = &self.d_legendre[k * nlat..(k + 1) * nlat];
                for j in 0..nlat {
                    lon_row[j] += zonal * prow[j];
                    lat_row[j] += coeff * hrow[j];
                }
            }
            for j in 0..nlat {
                lon_row[j] *= inv_radius;
                lat_row[j] *= inv_radius;
            }
        }

        self.fourier_inverse(&lon_m, grad_lon);
        self.fourier_inverse(&lat_m, grad_lat);
        Ok(())
    }

    /// Apply an isotropic spectral filter: every coefficient is scaled by
    /// `factor[n]` for its total wavenumber `n`. `factor` must have
    /// `ntrunc + 1` entries.
    pub fn spectral_smoothing(&self, spectral: &mut [Complex64], factor: &[f64]) -> Result<()> {
        self.check_spectral(spectral, "spectral coefficients")?;
        if factor.len() != self.ntrunc + 1 {
            return Err(crate::error::SpectralError::shape_mismatch(
                "smoothing factor per total wavenumber",
                self.ntrunc + 1,
                factor.len(),
            ));
        }
        for (k, value) in spectral.iter_mut().enumerate() {
            *value *= factor[self.index_n[k]];
        }
        Ok(())
    }
}
