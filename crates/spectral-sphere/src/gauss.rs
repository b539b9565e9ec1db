//! Gaussian quadrature on (-1, 1).
//!
//! Computes the roots of the Legendre polynomial `P_nlat` and the associated
//! quadrature weights. The roots are the sines of the Gaussian latitudes and
//! the weights integrate polynomials up to degree `2 * nlat - 1` exactly.

use std::f64::consts::PI;

use crate::error::{Result, SpectralError};

/// Newton iterations allowed per root before giving up.
const MAX_NEWTON_ITER: usize = 64;

/// Evaluate `P_degree(x)` and its derivative via the three-term recurrence
/// `(n + 1) P_{n+1} = (2n + 1) x P_n - n P_{n-1}`.
///
/// The derivative uses `P'_n = n (x P_n - P_{n-1}) / (x^2 - 1)`, valid for
/// interior points.
fn legendre_value_and_derivative(degree: usize, x: f64) -> (f64, f64) {
    if degree == 0 {
        return (1.0, 0.0);
    }

    let mut p_prev = 1.0; // P_{n-1}
    let mut p = x; // P_n
    for n in 1..degree {
        let nf = n as f64;
        let p_next = ((2.0 * nf + 1.0) * x * p - nf * p_prev) / (nf + 1.0);
        p_prev = p;
        p = p_next;
    }

    let nf = degree as f64;
    let dp = nf * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}

/// Compute the `nlat` roots of `P_nlat` and the Gaussian weights
/// `w_j = 2 / ((1 - x_j^2) P'_nlat(x_j)^2)`.
///
/// Roots are returned in descending order (north pole first). The weight sum
/// is verified against its exact value of 2.
pub(crate) fn legendre_roots_and_weights(nlat: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    let tolerance = 10.0 * f64::EPSILON;
    let mut roots = vec![0.0; nlat];
    let mut weights = vec![0.0; nlat];

    for j in 0..nlat {
        // Asymptotic seed for the (j+1)-th root, counted from x = +1.
        let mut x = (PI * (j as f64 + 0.75) / (nlat as f64 + 0.5)).cos();

        let mut converged = false;
        for _ in 0..MAX_NEWTON_ITER {
            let (p, dp) = legendre_value_and_derivative(nlat, x);
            let delta = p / dp;
            x -= delta;
            if delta.abs() < tolerance {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(SpectralError::convergence_failure(format!(
                "root {} of P_{} did not converge within {} Newton iterations",
                j, nlat, MAX_NEWTON_ITER
            )));
        }

        let (_, dp) = legendre_value_and_derivative(nlat, x);
        roots[j] = x;
        weights[j] = 2.0 / ((1.0 - x * x) * dp * dp);
    }

    let weight_sum: f64 = weights.iter().sum();
    if (weight_sum - 2.0).abs() > 1e-12 {
        return Err(SpectralError::convergence_failure(format!(
            "quadrature weights for nlat = {} sum to {}, expected 2",
            nlat, weight_sum
        )));
    }

    Ok((roots, weights))
}
