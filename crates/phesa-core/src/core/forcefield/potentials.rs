//! Pair and bonded potentials as `(energy, dE/dx)` for a scalar coordinate.

/// `k·(x - x0)²`.
#[inline]
pub fn harmonic(x: f64, x0: f64, k: f64) -> (f64, f64) {
    let delta = x - x0;
    (k * delta * delta, 2.0 * k * delta)
}

/// Harmonic beyond `radius`, zero inside it.
#[inline]
pub fn flat_bottom_harmonic(x: f64, radius: f64, k: f64) -> (f64, f64) {
    if x <= radius {
        (0.0, 0.0)
    } else {
        harmonic(x, radius, k)
    }
}

#[inline]
pub fn lennard_jones_12_6(dist: f64, r_min: f64, well_depth: f64) -> f64 {
    lennard_jones_12_6_with_derivative(dist, r_min, well_depth).0
}

#[inline]
pub fn lennard_jones_12_6_with_derivative(dist: f64, r_min: f64, well_depth: f64) -> (f64, f64) {
    if dist < 1e-6 {
        return (1e10, 0.0);
    }
    let rho = r_min / dist;
    let rho6 = rho.powi(6);
    let rho12 = rho6 * rho6;
    (
        well_depth * (rho12 - 2.0 * rho6),
        12.0 * well_depth * (rho6 - rho12) / dist,
    )
}
