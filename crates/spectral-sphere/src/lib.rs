//! Spherical harmonic transforms on a Gaussian grid.
//!
//! This crate is the numerical core of a spectral shallow-water solver: it
//! moves scalar and vector fields between a physical longitude x
//! Gaussian-latitude grid and a triangularly truncated spherical-harmonic
//! spectral space. It provides:
//! - Gaussian quadrature nodes and weights to machine precision
//! - normalized associated Legendre function tables with stable recurrences
//! - a real FFT along longitude via a half-length complex transform
//! - Legendre analysis/synthesis between Fourier and spectral coefficients
//! - spectral vector operators (vorticity/divergence to and from velocities)
//!
//! All tables are precomputed once by [`SpectralSphere::new`]; every
//! operation afterwards is read-only on the object, so one sphere can be
//! shared across threads while each caller supplies its own buffers.
//!
//! ```
//! use num_complex::Complex64;
//! use spectral_sphere::{Direction, SpectralSphere};
//!
//! let sphere = SpectralSphere::new(16, 9, 7, 6.37122e6).unwrap();
//! let mut grid = vec![1.0; 16 * 9];
//! let mut spectral = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
//! sphere
//!     .scalar_transform(&mut grid, &mut spectral, Direction::Forward)
//!     .unwrap();
//! // A constant field projects entirely onto the (n, m) = (0, 0) mode.
//! assert!((spectral[0].re - 2.0_f64.sqrt()).abs() < 1e-12);
//! ```

pub mod error;
pub mod operators;
pub mod sphere;
pub mod types;

mod fft;
mod gauss;
mod legendre;

pub use error::{Result, SpectralError};
pub use operators::guarded_atan2;
pub use sphere::SpectralSphere;
pub use types::{Direction, SphereGeometry};
