//! Normalized associated Legendre functions and the canonical spectral
//! ordering.
//!
//! Functions are normalized so that they are orthonormal under the Gaussian
//! quadrature sum: `sum_j w_j P(n1,m) P(n2,m) = delta(n1,n2)`. That is
//! `P(n,m) = sqrt((2n+1) (n-m)! / (2 (n+m)!)) * P_nm` with no Condon-Shortley
//! phase, which makes the unweighted Legendre analysis/synthesis pair exactly
//! self-inverse on band-limited fields.

use std::f64::consts::LN_2;

/// Position of the `(n, m)` coefficient in the canonical spectral ordering:
/// outer `m = 0..=ntrunc`, inner `n = m..=ntrunc`. Equivalent to
/// `m (ntrunc + 1) - m (m - 1) / 2 + (n - m)`, rearranged to stay in
/// unsigned arithmetic.
#[inline]
pub(crate) fn spectral_position(ntrunc: usize, n: usize, m: usize) -> usize {
    m * (2 * ntrunc + 3 - m) / 2 + (n - m)
}

/// Build the `index_n` / `index_m` lookup arrays for the canonical ordering.
pub(crate) fn build_index_arrays(ntrunc: usize) -> (Vec<usize>, Vec<usize>) {
    let nmdim = (ntrunc + 1) * (ntrunc + 2) / 2;
    let mut index_n = Vec::with_capacity(nmdim);
    let mut index_m = Vec::with_capacity(nmdim);
    for m in 0..=ntrunc {
        for n in m..=ntrunc {
            index_n.push(n);
            index_m.push(m);
        }
    }
    (index_n, index_m)
}

/// Build the `P(n,m)` table and the derivative table
/// `H(n,m) = (1 - mu^2) dP/dmu` at every quadrature node.
///
/// Both tables are laid out with coefficient row `k` contiguous over
/// latitudes: entry `(k, j)` lives at `k * nlat + j`.
///
/// Recurrences:
/// - sectoral seed computed in log space to stay finite at large `m`;
/// - `P(m+1,m) = mu * sqrt(2m + 3) * P(m,m)`;
/// - `P(n,m) = a(n,m) (mu P(n-1,m) - b(n,m) P(n-2,m))` with
///   `a = sqrt((2n+1)(2n-1) / ((n-m)(n+m)))` and
///   `b = sqrt((n-1-m)(n-1+m) / ((2n-3)(2n-1)))`;
/// - `H(n,m) = -n mu P(n,m) + c(n,m) P(n-1,m)` with
///   `c = sqrt((n^2 - m^2)(2n+1) / (2n-1))`.
pub(crate) fn associated_legendre_tables(ntrunc: usize, mu: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let nlat = mu.len();
    let nmdim = (ntrunc + 1) * (ntrunc + 2) / 2;
    let mut pnm = vec![0.0; nmdim * nlat];
    let mut hnm = vec![0.0; nmdim * nlat];

    for (j, &mu_j) in mu.iter().enumerate() {
        let sin2 = 1.0 - mu_j * mu_j;
        let ln_sin2 = sin2.ln();

        // Running logs of (2m+1)!! and (2m)!! for the sectoral seed.
        let mut ln_odd = 0.0;
        let mut ln_even = 0.0;

        for m in 0..=ntrunc {
            if m > 0 {
                ln_odd += ((2 * m + 1) as f64).ln();
                ln_even += ((2 * m) as f64).ln();
            }
            let pmm = (0.5 * (ln_odd - LN_2 - ln_even) + 0.5 * m as f64 * ln_sin2).exp();
            pnm[spectral_position(ntrunc, m, m) * nlat + j] = pmm;

            if m < ntrunc {
                pnm[spectral_position(ntrunc, m + 1, m) * nlat + j] =
                    mu_j * ((2 * m + 3) as f64).sqrt() * pmm;
            }
            for n in (m + 2)..=ntrunc {
                let nf = n as f64;
                let mf = m as f64;
                let a = ((2.0 * nf + 1.0) * (2.0 * nf - 1.0) / ((nf - mf) * (nf + mf))).sqrt();
                let b =
                    ((nf - 1.0 - mf) * (nf - 1.0 + mf) / ((2.0 * nf - 3.0) * (2.0 * nf - 1.0)))
                        .sqrt();
                let p1 = pnm[spectral_position(ntrunc, n - 1, m) * nlat + j];
                let p2 = pnm[spectral_position(ntrunc, n - 2, m) * nlat + j];
                pnm[spectral_position(ntrunc, n, m) * nlat + j] = a * (mu_j * p1 - b * p2);
            }
        }

        for m in 0..=ntrunc {
            for n in m..=ntrunc {
                let k = spectral_position(ntrunc, n, m);
                let value = pnm[k * nlat + j];
                if n == m {
                    hnm[k * nlat + j] = -(n as f64) * mu_j * value;
                } else {
                    let c = (((n * n - m * m) * (2 * n + 1)) as f64 / (2 * n - 1) as f64).sqrt();
                    let below = pnm[spectral_position(ntrunc, n - 1, m) * nlat + j];
                    hnm[k * nlat + j] = -(n as f64) * mu_j * value + c * below;
                }
            }
        }
    }

    (pnm, hnm)
}
