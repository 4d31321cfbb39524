//! Conversions between droplet radius and liquid water content.
//!
//! # Physics
//!
//! A population of `N` droplets of radius `r` grown on dry nuclei of radius
//! `r_min` carries the liquid water mixing ratio
//!
//! ```text
//! qc = 4/3 π (r³ − r_min³) ρ_w / ρ_air · N
//! ```
//!
//! [`radius`] inverts this relation, adding the nucleus volume back in so
//! that an activated particle with `qc = 0` still has the dry radius.

use crate::constants::{PI, RHO_H2O};

/// Mean droplet radius of a population.
///
/// # Arguments
///
/// * `qc` - Liquid water mixing ratio (kg/kg)
/// * `n` - Multiplicity (number of real droplets)
/// * `r_min` - Dry nucleus radius (m)
/// * `rho` - Air density (kg/m³)
///
/// # Returns
///
/// Radius in meters. Not finite when `n` is zero.
///
/// # Examples
///
/// ```
/// use microphysics::constants::RHO_AIR;
/// use microphysics::thermodynamics::{cloud_water, radius};
///
/// let qc = cloud_water(1000.0, 10e-6, 0.1e-6, RHO_AIR);
/// let r = radius(qc, 1000.0, 0.1e-6, RHO_AIR);
/// assert!((r - 10e-6).abs() < 1e-15);
/// ```
pub fn radius(qc: f64, n: f64, r_min: f64, rho: f64) -> f64 {
    let total = qc + cloud_water(n, r_min, 0.0, rho);
    (3.0 / (4.0 * PI) * total * rho / RHO_H2O / n).cbrt()
}

/// Liquid water mixing ratio held between radius `r_min` and `r`.
///
/// # Arguments
///
/// * `n` - Multiplicity
/// * `r` - Outer droplet radius (m)
/// * `r_min` - Inner radius (m), usually the dry nucleus
/// * `rho` - Air density (kg/m³)
pub fn cloud_water(n: f64, r: f64, r_min: f64, rho: f64) -> f64 {
    sphere_water(n, r, rho) - sphere_water(n, r_min, rho)
}

fn sphere_water(n: f64, r: f64, rho: f64) -> f64 {
    4.0 / 3.0 * PI * r * r * r * RHO_H2O / rho * n
}
