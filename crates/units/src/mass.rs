use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Div, Mul, Sub};

use crate::{Density, Length};

const KG_TO_GRAMS: f64 = 1_000.0;
const KG_TO_MICROGRAMS: f64 = 1e9;

/// A physical mass quantity using f64 precision.
///
/// The `Mass` struct represents mass values with kilograms as the base unit.
/// Single cloud droplets weigh nanograms, so microgram conversions are
/// provided alongside grams.
///
/// # Examples
///
/// ```rust
/// use units::{Density, Length, Mass};
///
/// let droplet = Mass::of_sphere(Length::from_microns(10.0), Density::from_kg_per_m3(1000.0));
/// assert!(droplet.to_micrograms() < 1e-2);
///
/// let bucket = Mass::from_kg(10.0);
/// let grams = bucket.to_grams();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mass(f64); // Base unit: kg

impl Mass {
    /// Creates a zero mass value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Mass` from a value in kilograms.
    pub fn from_kg(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Mass` from a value in grams.
    pub fn from_grams(value: f64) -> Self {
        Self(value / KG_TO_GRAMS)
    }

    /// Creates a new `Mass` from a value in micrograms.
    pub fn from_micrograms(value: f64) -> Self {
        Self(value / KG_TO_MICROGRAMS)
    }

    /// Mass of a homogeneous sphere: m = (4/3) π r³ ρ
    pub fn of_sphere(radius: Length, density: Density) -> Self {
        Self(4.0 / 3.0 * PI * radius.cubed() * density.to_kg_per_m3())
    }

    /// Returns the mass in kilograms.
    pub fn to_kg(&self) -> f64 {
        self.0
    }

    /// Converts the mass to grams.
    pub fn to_grams(&self) -> f64 {
        self.0 * KG_TO_GRAMS
    }

    /// Converts the mass to micrograms.
    pub fn to_micrograms(&self) -> f64 {
        self.0 * KG_TO_MICROGRAMS
    }
}

impl Add for Mass {
    type Output = Mass;

    fn add(self, rhs: Mass) -> Mass {
        Mass(self.0 + rhs.0)
    }
}

impl Sub for Mass {
    type Output = Mass;

    fn sub(self, rhs: Mass) -> Mass {
        Mass(self.0 - rhs.0)
    }
}

impl Mul<f64> for Mass {
    type Output = Mass;

    fn mul(self, rhs: f64) -> Mass {
        Mass(self.0 * rhs)
    }
}

impl Div<f64> for Mass {
    type Output = Mass;

    fn div(self, rhs: f64) -> Mass {
        Mass(self.0 / rhs)
    }
}

/// Division of Mass by Mass returns a dimensionless ratio
impl Div for Mass {
    type Output = f64;

    fn div(self, rhs: Mass) -> f64 {
        self.0 / rhs.0
    }
}
