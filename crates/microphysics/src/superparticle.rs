//! The superparticle record.
//!
//! A superparticle stands in for `multiplicity` real droplets that share a
//! radius and a height. Its radius is not stored: it is derived from the
//! liquid water content, the multiplicity and the dry nucleus radius.

use serde::{Deserialize, Serialize};
use units::{Density, Length, Mass};

#[cfg(feature = "tsify")]
use tsify_next::Tsify;

use crate::constants::{RHO_AIR, RHO_H2O};
use crate::thermodynamics::{cloud_water, radius};

/// One computational droplet population.
///
/// # Examples
///
/// ```
/// use microphysics::Superparticle;
/// use units::Length;
///
/// let sp = Superparticle::from_radius(
///     150.0,
///     Length::from_microns(12.0),
///     1e5,
///     Length::from_microns(0.1),
/// );
/// assert!(sp.is_nucleated);
/// assert!((sp.radius().to_microns() - 12.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "tsify", derive(Tsify))]
#[cfg_attr(feature = "tsify", tsify(into_wasm_abi, from_wasm_abi))]
pub struct Superparticle {
    /// Height above the surface (m)
    pub z: f64,
    /// Liquid water mixing ratio carried by the population (kg/kg)
    pub qc: f64,
    /// Number of real droplets represented
    pub multiplicity: f64,
    /// Dry aerosol radius (m)
    pub dry_radius: f64,
    /// Activated droplets take part in collisions, haze particles do not
    pub is_nucleated: bool,
}

impl Superparticle {
    /// Build a nucleated superparticle whose droplets have the given radius.
    ///
    /// The water content is whatever fills the shell between the dry nucleus
    /// and `radius`, so [`Superparticle::radius`] returns `radius` again.
    pub fn from_radius(z: f64, radius: Length, multiplicity: f64, dry_radius: Length) -> Self {
        let qc = cloud_water(multiplicity, radius.to_meters(), dry_radius.to_meters(), RHO_AIR);
        Self {
            z,
            qc,
            multiplicity,
            dry_radius: dry_radius.to_meters(),
            is_nucleated: true,
        }
    }

    /// An unactivated aerosol particle with no liquid water.
    pub fn haze(z: f64, multiplicity: f64, dry_radius: Length) -> Self {
        Self {
            z,
            qc: 0.0,
            multiplicity,
            dry_radius: dry_radius.to_meters(),
            is_nucleated: false,
        }
    }

    /// Droplet radius derived from `qc`, `multiplicity` and the dry radius.
    pub fn radius(&self) -> Length {
        Length::from_meters(radius(self.qc, self.multiplicity, self.dry_radius, RHO_AIR))
    }

    /// Mass of a single liquid droplet of this population.
    pub fn droplet_mass(&self) -> Mass {
        Mass::of_sphere(self.radius(), Density::from_kg_per_m3(RHO_H2O))
    }

    /// Whether the multiplicity describes at least part of a droplet.
    pub fn has_population(&self) -> bool {
        self.multiplicity.is_finite() && self.multiplicity > 0.0
    }
}
