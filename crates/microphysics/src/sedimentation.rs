//! Terminal fall speed of droplets.
//!
//! # Physics
//!
//! [`RogersFallSpeed`] uses the piecewise approximation from Rogers & Yau,
//! *A Short Course in Cloud Physics* (p. 126):
//!
//! ```text
//! v(r) = k1 r²     r < 40 µm          (Stokes regime)
//!      = k2 r      40 µm ≤ r < 0.6 mm
//!      = k3 √r     r ≥ 0.6 mm
//! ```
//!
//! The fit is only meant for drops up to 2 mm. Larger radii are still
//! evaluated; [`FallSpeed::in_valid_range`] lets callers report them.

use units::{Length, Velocity};

/// Stokes-regime coefficient (m⁻¹ s⁻¹)
const K1: f64 = 1.19e8;
/// Intermediate-regime coefficient (s⁻¹)
const K2: f64 = 8e3;
/// Large-drop coefficient (m^½ s⁻¹)
const K3: f64 = 2.01e2;

const STOKES_LIMIT: f64 = 40e-6;
const LINEAR_LIMIT: f64 = 0.6e-3;

/// Largest radius the Rogers fit is valid for (m)
pub const MAX_VALID_RADIUS: f64 = 2e-3;

/// Provider of terminal fall speeds.
///
/// Implementations must be pure functions of the radius.
pub trait FallSpeed: Send + Sync {
    /// Terminal fall speed of a droplet with the given radius.
    fn fall_speed(&self, radius: Length) -> Velocity;

    /// Whether `radius` lies in the range the provider was fitted for.
    fn in_valid_range(&self, _radius: Length) -> bool {
        true
    }
}

/// Three-regime fall speed law for liquid drops.
///
/// # Examples
///
/// ```
/// use microphysics::sedimentation::{FallSpeed, RogersFallSpeed};
/// use units::Length;
///
/// let v = RogersFallSpeed.fall_speed(Length::from_microns(10.0));
/// assert!((v.to_cm_per_sec() - 1.19).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RogersFallSpeed;

impl FallSpeed for RogersFallSpeed {
    fn fall_speed(&self, radius: Length) -> Velocity {
        let r = radius.to_meters();
        if r > MAX_VALID_RADIUS {
            log::trace!("fall speed fit not valid for r = {r} m");
        }

        let v = if r < STOKES_LIMIT {
            K1 * r * r
        } else if r < LINEAR_LIMIT {
            K2 * r
        } else {
            K3 * r.sqrt()
        };
        Velocity::from_meters_per_sec(v)
    }

    fn in_valid_range(&self, radius: Length) -> bool {
        radius.to_meters() <= MAX_VALID_RADIUS
    }
}

/// The same fall speed for every radius.
///
/// Two populations falling at equal speed never meet, so this mostly serves
/// to switch collisions off in tests while keeping the Hall machinery.
#[derive(Debug, Clone, Copy)]
pub struct ConstantFallSpeed(pub Velocity);

impl FallSpeed for ConstantFallSpeed {
    fn fall_speed(&self, _radius: Length) -> Velocity {
        self.0
    }
}
