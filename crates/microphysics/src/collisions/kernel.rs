//! The Hall collision kernel.
//!
//! # Physics
//!
//! The rate at which one droplet of radius `R` sweeps up droplets of radius
//! `r` is the geometric cross-section times the relative fall speed times the
//! collision efficiency:
//!
//! ```text
//! K(r, R) = π (R + r)² |V(R) − V(r)| E(R, r/R)
//! ```

use crate::constants::{MICROMETERS_PER_METER, PI};
use crate::efficiency::CollisionEfficiency;

/// Evaluate the Hall kernel for a pair of droplets.
///
/// The arguments may be given in either order: the larger radius is always
/// used as the collector when looking up the efficiency, so the kernel is
/// symmetric in its two droplets.
///
/// A non-positive collector radius is physically meaningless. It is logged
/// and the degenerate value is returned unchanged.
///
/// # Arguments
///
/// * `r` - Radius of the first droplet (m)
/// * `big_r` - Radius of the second droplet (m)
/// * `fs` - Fall speed of the first droplet (m/s)
/// * `big_fs` - Fall speed of the second droplet (m/s)
/// * `efficiency` - Collision efficiency provider
///
/// # Returns
///
/// Collision rate per droplet pair (m³/s)
///
/// # Examples
///
/// ```
/// use microphysics::collisions::hall_kernel;
/// use microphysics::efficiency::ConstantEfficiency;
///
/// let e = ConstantEfficiency::new(1.0);
/// let k = hall_kernel(10e-6, 20e-6, 0.0119, 0.0476, &e);
/// assert!(k > 0.0);
/// assert_eq!(k, hall_kernel(20e-6, 10e-6, 0.0476, 0.0119, &e));
/// ```
pub fn hall_kernel<E>(r: f64, big_r: f64, fs: f64, big_fs: f64, efficiency: &E) -> f64
where
    E: CollisionEfficiency + ?Sized,
{
    let (r, big_r, fs, big_fs) = if r > big_r {
        (big_r, r, big_fs, fs)
    } else {
        (r, big_r, fs, big_fs)
    };
    if big_r <= 0.0 {
        log::warn!("non-positive collector radius in Hall kernel: R = {big_r} m");
    }

    let e = efficiency.collision_efficiency(big_r * MICROMETERS_PER_METER, r / big_r);
    PI * (big_r + r) * (big_r + r) * (big_fs - fs).abs() * e
}
