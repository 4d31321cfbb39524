use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

pub(crate) const SECONDS_PER_MINUTE: f64 = 60.0;
pub(crate) const SECONDS_PER_HOUR: f64 = 3_600.0;

/// A physical time quantity using f64 precision.
///
/// The `Time` struct represents time with seconds as the base unit,
/// which is natural for microphysical timesteps and cloud lifetimes.
///
/// # Examples
///
/// ```rust
/// use units::Time;
///
/// // Create times in different units
/// let dt = Time::from_seconds(1.0);
/// let spin_up = Time::from_minutes(10.0);
/// let cloud_lifetime = Time::from_hours(2.0);
///
/// // Convert between units
/// let seconds = spin_up.to_seconds();
/// let minutes = cloud_lifetime.to_minutes();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(f64); // Base unit: seconds

impl Time {
    /// Creates a zero time value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Time` from a value in seconds.
    pub fn from_seconds(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Time` from a value in minutes.
    pub fn from_minutes(value: f64) -> Self {
        Self(value * SECONDS_PER_MINUTE)
    }

    /// Creates a new `Time` from a value in hours.
    pub fn from_hours(value: f64) -> Self {
        Self(value * SECONDS_PER_HOUR)
    }

    /// Returns the time in seconds.
    pub fn to_seconds(&self) -> f64 {
        self.0
    }

    /// Converts the time to minutes.
    pub fn to_minutes(&self) -> f64 {
        self.0 / SECONDS_PER_MINUTE
    }

    /// Converts the time to hours.
    pub fn to_hours(&self) -> f64 {
        self.0 / SECONDS_PER_HOUR
    }

    /// True for finite, strictly positive durations (a usable timestep).
    pub fn is_positive(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl Mul<f64> for Time {
    type Output = Time;

    fn mul(self, rhs: f64) -> Time {
        Time(self.0 * rhs)
    }
}

impl Div<f64> for Time {
    type Output = Time;

    fn div(self, rhs: f64) -> Time {
        Time(self.0 / rhs)
    }
}

/// Division of Time by Time returns a dimensionless ratio
impl Div for Time {
    type Output = f64;

    fn div(self, rhs: Time) -> f64 {
        self.0 / rhs.0
    }
}

/// Allow f64 * Time (commutative multiplication)
impl Mul<Time> for f64 {
    type Output = Time;

    fn mul(self, rhs: Time) -> Time {
        rhs * self
    }
}
