use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

pub const METERS_TO_MICRONS: f64 = 1e6;
pub const METERS_TO_MM: f64 = 1e3;
pub const METERS_TO_CM: f64 = 1e2;
pub const KM_TO_METERS: f64 = 1e3;

/// A physical length quantity using f64 precision.
///
/// The `Length` struct represents length values with meters as the base unit.
/// Droplet radii are usually quoted in microns and layer heights in meters or
/// kilometers, so both ends of the scale have dedicated constructors.
///
/// # Examples
///
/// ```rust
/// use units::Length;
///
/// // Create lengths using different units
/// let cloud_droplet = Length::from_microns(10.0);
/// let drizzle_drop = Length::from_mm(0.1);
/// let cloud_base = Length::from_km(1.2);
///
/// // Convert between units
/// let radius_m = cloud_droplet.to_meters();
/// let base_m = cloud_base.to_meters();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Length(f64); // Base unit: meters

impl Length {
    /// Creates a zero length value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Length` from a value in meters.
    pub fn from_meters(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Length` from a value in kilometers.
    pub fn from_km(value: f64) -> Self {
        Self(value * KM_TO_METERS)
    }

    /// Creates a new `Length` from a value in centimeters.
    pub fn from_cm(value: f64) -> Self {
        Self(value / METERS_TO_CM)
    }

    /// Creates a new `Length` from a value in millimeters.
    pub fn from_mm(value: f64) -> Self {
        Self(value / METERS_TO_MM)
    }

    /// Creates a new `Length` from a value in microns.
    pub fn from_microns(value: f64) -> Self {
        Self(value / METERS_TO_MICRONS)
    }

    /// Returns the length in meters.
    pub fn to_meters(&self) -> f64 {
        self.0
    }

    /// Converts the length to kilometers.
    pub fn to_km(&self) -> f64 {
        self.0 / KM_TO_METERS
    }

    /// Converts the length to centimeters.
    pub fn to_cm(&self) -> f64 {
        self.0 * METERS_TO_CM
    }

    /// Converts the length to millimeters.
    pub fn to_mm(&self) -> f64 {
        self.0 * METERS_TO_MM
    }

    /// Converts the length to microns.
    pub fn to_microns(&self) -> f64 {
        self.0 * METERS_TO_MICRONS
    }

    /// Returns the minimum of two lengths.
    pub fn min(self, other: Self) -> Self {
        if self.0 < other.0 {
            self
        } else {
            other
        }
    }

    /// Returns the maximum of two lengths.
    pub fn max(self, other: Self) -> Self {
        if self.0 > other.0 {
            self
        } else {
            other
        }
    }

    /// True for finite, strictly positive lengths.
    pub fn is_positive(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    /// Raise to integer power (returns dimensionless f64 for dimensional consistency)
    pub fn powi(&self, n: i32) -> f64 {
        self.0.powi(n)
    }

    /// Cube of the length in m³, the volume measure used by coalescence.
    pub fn cubed(&self) -> f64 {
        self.0 * self.0 * self.0
    }

    /// Square root
    pub fn sqrt(&self) -> f64 {
        self.0.sqrt()
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl Mul<f64> for Length {
    type Output = Length;

    fn mul(self, rhs: f64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<f64> for Length {
    type Output = Length;

    fn div(self, rhs: f64) -> Length {
        Length(self.0 / rhs)
    }
}

/// Division of Length by Length returns a dimensionless ratio
impl Div for Length {
    type Output = f64;

    fn div(self, rhs: Self) -> f64 {
        self.0 / rhs.0
    }
}

/// Allow f64 * Length (commutative multiplication)
impl Mul<Length> for f64 {
    type Output = Length;

    fn mul(self, rhs: Length) -> Length {
        rhs * self
    }
}
