//! Physical constants shared by the microphysics routines.
//!
//! All values are SI.

pub use std::f64::consts::PI;

/// Density of liquid water (kg/m³)
pub const RHO_H2O: f64 = 1_000.0;

/// Reference density of air (kg/m³)
///
/// Liquid water content is carried as a mixing ratio (kg water per kg air),
/// so converting between droplet volume and `qc` needs an air density.
pub const RHO_AIR: f64 = 1.225;

/// Collision efficiencies are tabulated against collector radius in µm.
pub const MICROMETERS_PER_METER: f64 = 1e6;
