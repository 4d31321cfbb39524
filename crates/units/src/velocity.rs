use std::ops::{Add, Div, Mul, Sub};

use crate::length::METERS_TO_CM;

/// A speed in m/s.
///
/// Used for droplet terminal fall speeds; relative speeds between two
/// populations are obtained by subtraction and [`Velocity::abs`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Velocity(f64); // Base unit: m/s

impl Velocity {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_meters_per_sec(value: f64) -> Self {
        Self(value)
    }

    pub fn from_cm_per_sec(value: f64) -> Self {
        Self(value / METERS_TO_CM)
    }

    pub fn to_meters_per_sec(&self) -> f64 {
        self.0
    }

    pub fn to_cm_per_sec(&self) -> f64 {
        self.0 * METERS_TO_CM
    }

    pub fn abs(self) -> Velocity {
        Velocity(self.0.abs())
    }
}

impl Add for Velocity {
    type Output = Velocity;

    fn add(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 + rhs.0)
    }
}

impl Sub for Velocity {
    type Output = Velocity;

    fn sub(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 - rhs.0)
    }
}

impl Mul<f64> for Velocity {
    type Output = Velocity;

    fn mul(self, rhs: f64) -> Velocity {
        Velocity(self.0 * rhs)
    }
}

impl Div<f64> for Velocity {
    type Output = Velocity;

    fn div(self, rhs: f64) -> Velocity {
        Velocity(self.0 / rhs)
    }
}
