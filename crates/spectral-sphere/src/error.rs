//! Error types for the spectral transform engine.

use thiserror::Error;

/// Errors surfaced by transform construction and transform operations.
#[derive(Error, Debug)]
pub enum SpectralError {
    /// The requested grid/truncation geometry is unusable.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A caller-supplied buffer does not match the sizes declared by the sphere.
    #[error("shape mismatch for {what}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Gaussian root finding did not converge within the iteration budget,
    /// or the computed quadrature failed verification.
    #[error("quadrature convergence failure: {0}")]
    ConvergenceFailure(String),
}

impl SpectralError {
    /// Create an InvalidGeometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Create a ConvergenceFailure error.
    pub fn convergence_failure(msg: impl Into<String>) -> Self {
        Self::ConvergenceFailure(msg.into())
    }
}

/// Result type for spectral transform operations.
pub type Result<T> = std::result::Result<T, SpectralError>;
