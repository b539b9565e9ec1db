//! Transform a synthetic wind field and print its rotational kinetic energy
//! per total wavenumber.
//!
//! Run with: cargo run --package spectral-sphere --example energy_spectrum

use num_complex::Complex64;
use spectral_sphere::SpectralSphere;

fn main() {
    let sphere = SpectralSphere::new(128, 64, 42, 6.37122e6).unwrap();
    let nlon = sphere.nlon();
    let nlat = sphere.nlat();

    // A zonal jet plus a wavenumber-4 meander, in u cos(phi) / v cos(phi).
    let mut u_cos = vec![0.0; nlon * nlat];
    let mut v_cos = vec![0.0; nlon * nlat];
    for j in 0..nlat {
        let mu = sphere.gaussian_latitudes()[j];
        let cos_phi = (1.0 - mu * mu).sqrt();
        for i in 0..nlon {
            let lambda = 2.0 * std::f64::consts::PI * i as f64 / nlon as f64;
            let jet = 30.0 * (3.0 * mu * mu - 1.0) * cos_phi;
            let meander = 8.0 * (4.0 * lambda).cos() * cos_phi * mu;
            u_cos[j * nlon + i] = (jet + meander) * cos_phi;
            v_cos[j * nlon + i] = 8.0 * (4.0 * lambda).sin() * cos_phi * cos_phi;
        }
    }

    let mut vorticity = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
    let mut divergence = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
    sphere
        .vorticity_divergence_from_velocities(&u_cos, &v_cos, &mut vorticity, &mut divergence)
        .unwrap();

    // Rotational kinetic energy per total wavenumber:
    // E_n = (a^2 / (4 n (n + 1))) sum_m c_m |zeta(n, m)|^2, with m > 0
    // counted twice for the conjugate modes.
    let mut energy = vec![0.0; sphere.ntrunc() + 1];
    for k in 0..sphere.nmdim() {
        let n = sphere.index_n()[k];
        if n == 0 {
            continue;
        }
        let count = if sphere.index_m()[k] == 0 { 1.0 } else { 2.0 };
        let a2 = sphere.radius() * sphere.radius();
        energy[n] += count * a2 / (4.0 * (n * (n + 1)) as f64) * vorticity[k].norm_sqr();
    }

    println!("rotational kinetic energy per total wavenumber");
    println!("{:>4}  {:>14}", "n", "energy (J/kg)");
    for (n, e) in energy.iter().enumerate() {
        if *e > 1e-12 {
            println!("{:>4}  {:>14.6e}", n, e);
        }
    }
}
