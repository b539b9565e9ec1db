//! Integration tests for the vector operators:
//! 1. Spectral round-trip of the vorticity/divergence <-> velocity pair
//! 2. Rigid-body rotation recovered through both operators
//! 3. Steady rotated jet (nonlinear geostrophic balance construction)
//! 4. Gradient operator consistency with the velocity machinery

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spectral_sphere::SpectralSphere;

const EARTH_RADIUS: f64 = 6.37122e6;

/// Random spectral field valid for a real grid (real coefficients at m = 0
/// and the Nyquist wavenumber) with the global-mean mode removed.
fn random_windy_spectral(sphere: &SpectralSphere, rng: &mut StdRng) -> Vec<Complex64> {
    (0..sphere.nmdim())
        .map(|k| {
            if sphere.index_n()[k] == 0 {
                return Complex64::new(0.0, 0.0);
            }
            let re = rng.gen_range(-1.0..1.0);
            let m = sphere.index_m()[k];
            if m == 0 || m == sphere.nlon() / 2 {
                Complex64::new(re, 0.0)
            } else {
                Complex64::new(re, rng.gen_range(-1.0..1.0))
            }
        })
        .collect()
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
}

// ============================================================================
// Round-trips
// ============================================================================

#[test]
fn vector_round_trip_is_identity_on_spectral_input() {
    let sphere = SpectralSphere::new(64, 33, 21, EARTH_RADIUS).unwrap();
    let mut rng = StdRng::seed_from_u64(29);
    // Scale to wind-like magnitudes so the tolerances are meaningful.
    let vort_in: Vec<Complex64> = random_windy_spectral(&sphere, &mut rng)
        .iter()
        .map(|&c| c * 1e-5)
        .collect();
    let div_in: Vec<Complex64> = random_windy_spectral(&sphere, &mut rng)
        .iter()
        .map(|&c| c * 1e-6)
        .collect();

    let mut u_cos = vec![0.0; 64 * 33];
    let mut v_cos = vec![0.0; 64 * 33];
    sphere
        .velocities_from_vorticity_divergence(&vort_in, &div_in, &mut u_cos, &mut v_cos)
        .unwrap();

    let mut vort_out = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
    let mut div_out = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
    sphere
        .vorticity_divergence_from_velocities(&u_cos, &v_cos, &mut vort_out, &mut div_out)
        .unwrap();

    let scale = 1e-5;
    for k in 0..sphere.nmdim() {
        assert!(
            (vort_out[k] - vort_in[k]).norm() < 1e-10 * scale,
            "vorticity coefficient {}: {} vs {}",
            k,
            vort_out[k],
            vort_in[k]
        );
        assert!(
            (div_out[k] - div_in[k]).norm() < 1e-10 * scale,
            "divergence coefficient {}: {} vs {}",
            k,
            div_out[k],
            div_in[k]
        );
    }
}

#[test]
fn rigid_body_rotation_round_trips() {
    // u = U cos(phi), v = 0 at T42 resolution.
    let sphere = SpectralSphere::new(128, 65, 42, EARTH_RADIUS).unwrap();
    let nlon = sphere.nlon();
    let nlat = sphere.nlat();
    let u0 = 40.0;

    let mut u_cos = vec![0.0; nlon * nlat];
    let v_cos = vec![0.0; nlon * nlat];
    for j in 0..nlat {
        let mu = sphere.gaussian_latitudes()[j];
        for i in 0..nlon {
            u_cos[j * nlon + i] = u0 * (1.0 - mu * mu);
        }
    }

    let mut vorticity = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
    let mut divergence = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
    sphere
        .vorticity_divergence_from_velocities(&u_cos, &v_cos, &mut vorticity, &mut divergence)
        .unwrap();

    let mut u_back = vec![0.0; nlon * nlat];
    let mut v_back = vec![0.0; nlon * nlat];
    sphere
        .velocities_from_vorticity_divergence(&vorticity, &divergence, &mut u_back, &mut v_back)
        .unwrap();

    let scale = max_abs(&u_cos);
    for i in 0..nlon * nlat {
        assert!(
            (u_back[i] - u_cos[i]).abs() < 1e-7 * scale,
            "zonal wind at {}: {} vs {}",
            i,
            u_back[i],
            u_cos[i]
        );
        assert!(v_back[i].abs() < 1e-7 * scale);
    }
}

// ============================================================================
// Rotated jet (Williamson et al. shallow-water test case 3 construction)
// ============================================================================

fn bump(x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else {
        (-1.0 / x).exp()
    }
}

/// Zonal jet profile in rotated coordinates: compactly supported between
/// phi_b = -pi/6 and phi_e = pi/2, peak amplitude `u0`.
fn jet_profile(phi_rot: f64, u0: f64) -> f64 {
    let x_e = 0.3;
    let phi_b = -std::f64::consts::FRAC_PI_6;
    let phi_e = std::f64::consts::FRAC_PI_2;
    let x = x_e * (phi_rot - phi_b) / (phi_e - phi_b);
    u0 * bump(x) * bump(x_e - x) * (4.0 / x_e).exp()
}

#[test]
fn rotated_jet_round_trips() {
    let sphere = SpectralSphere::new(128, 65, 42, EARTH_RADIUS).unwrap();
    let nlon = sphere.nlon();
    let nlat = sphere.nlat();
    let u0 = 40.0;
    let alpha = std::f64::consts::FRAC_PI_3;
    let (sin_a, cos_a) = alpha.sin_cos();

    let mut u_cos = vec![0.0; nlon * nlat];
    let mut v_cos = vec![0.0; nlon * nlat];
    for j in 0..nlat {
        let mu = sphere.gaussian_latitudes()[j];
        let cos_phi = (1.0 - mu * mu).sqrt();
        for i in 0..nlon {
            let lambda = 2.0 * std::f64::consts::PI * i as f64 / nlon as f64;
            let sin_rot = (mu * cos_a - cos_phi * lambda.cos() * sin_a).clamp(-1.0, 1.0);
            let cos_rot = (1.0 - sin_rot * sin_rot).sqrt();
            if cos_rot < 1e-12 {
                continue;
            }
            let u_rot = jet_profile(sin_rot.asin(), u0);
            let u = u_rot * (cos_a * cos_phi + sin_a * lambda.cos() * mu) / cos_rot;
            let v = -u_rot * sin_a * lambda.sin() / cos_rot;
            u_cos[j * nlon + i] = u * cos_phi;
            v_cos[j * nlon + i] = v * cos_phi;
        }
    }

    let mut vorticity = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
    let mut divergence = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
    sphere
        .vorticity_divergence_from_velocities(&u_cos, &v_cos, &mut vorticity, &mut divergence)
        .unwrap();

    let mut u_back = vec![0.0; nlon * nlat];
    let mut v_back = vec![0.0; nlon * nlat];
    sphere
        .velocities_from_vorticity_divergence(&vorticity, &divergence, &mut u_back, &mut v_back)
        .unwrap();

    let scale = max_abs(&u_cos);
    for i in 0..nlon * nlat {
        assert!(
            (u_back[i] - u_cos[i]).abs() < 1e-7 * scale,
            "zonal wind at {}: {} vs {}",
            i,
            u_back[i],
            u_cos[i]
        );
        assert!(
            (v_back[i] - v_cos[i]).abs() < 1e-7 * scale,
            "meridional wind at {}: {} vs {}",
            i,
            v_back[i],
            v_cos[i]
        );
    }
}

// ============================================================================
// Operator consistency
// ============================================================================

#[test]
fn cos_gradient_matches_divergent_flow_synthesis() {
    // The gradient of X is the purely divergent flow whose divergence is
    // laplacian(X), so both code paths must synthesize the same grids.
    let sphere = SpectralSphere::new(64, 33, 21, EARTH_RADIUS).unwrap();
    let mut rng = StdRng::seed_from_u64(31);
    let chi = random_windy_spectral(&sphere, &mut rng);

    let mut grad_lon = vec![0.0; 64 * 33];
    let mut grad_lat = vec![0.0; 64 * 33];
    sphere.cos_gradient(&chi, &mut grad_lon, &mut grad_lat).unwrap();

    let zero = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
    let divergence: Vec<Complex64> = (0..sphere.nmdim())
        .map(|k| chi[k] * sphere.laplacian()[k])
        .collect();
    let mut u_cos = vec![0.0; 64 * 33];
    let mut v_cos = vec![0.0; 64 * 33];
    sphere
        .velocities_from_vorticity_divergence(&zero, &divergence, &mut u_cos, &mut v_cos)
        .unwrap();

    let scale = max_abs(&grad_lon).max(max_abs(&grad_lat)).max(1e-30);
    for i in 0..64 * 33 {
        assert!(
            (grad_lon[i] - u_cos[i]).abs() < 1e-12 * scale,
            "zonal gradient at {}: {} vs {}",
            i,
            grad_lon[i],
            u_cos[i]
        );
        assert!(
            (grad_lat[i] - v_cos[i]).abs() < 1e-12 * scale,
            "meridional gradient at {}: {} vs {}",
            i,
            grad_lat[i],
            v_cos[i]
        );
    }
}

#[test]
fn combine_kernel_builds_vorticity_and_divergence() {
    // combine(U, V, +1, +1) and combine(V, U, -1, +1) must agree with the
    // composite analysis operation.
    let sphere = SpectralSphere::new(32, 17, 10, EARTH_RADIUS).unwrap();
    let nlat = sphere.nlat();
    let mut rng = StdRng::seed_from_u64(37);
    let vort_in: Vec<Complex64> = random_windy_spectral(&sphere, &mut rng)
        .iter()
        .map(|&c| c * 1e-5)
        .collect();
    let div_in: Vec<Complex64> = random_windy_spectral(&sphere, &mut rng)
        .iter()
        .map(|&c| c * 1e-5)
        .collect();

    let mut u_cos = vec![0.0; 32 * 17];
    let mut v_cos = vec![0.0; 32 * 17];
    sphere
        .velocities_from_vorticity_divergence(&vort_in, &div_in, &mut u_cos, &mut v_cos)
        .unwrap();

    let mut um = vec![Complex64::new(0.0, 0.0); (sphere.ntrunc() + 1) * nlat];
    let mut vm = vec![Complex64::new(0.0, 0.0); (sphere.ntrunc() + 1) * nlat];
    sphere
        .real_fft_rows(&mut u_cos, &mut um, spectral_sphere::Direction::Forward)
        .unwrap();
    sphere
        .real_fft_rows(&mut v_cos, &mut vm, spectral_sphere::Direction::Forward)
        .unwrap();

    let mut vorticity = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
    let mut divergence = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
    sphere
        .combine_fourier_to_spectral(&um, &vm, &mut vorticity, 1.0, 1.0)
        .unwrap();
    sphere
        .combine_fourier_to_spectral(&vm, &um, &mut divergence, -1.0, 1.0)
        .unwrap();

    for k in 0..sphere.nmdim() {
        assert!((vorticity[k] - vort_in[k]).norm() < 1e-15);
        assert!((divergence[k] - div_in[k]).norm() < 1e-15);
    }
}
