//! Error types for microphysics setup and state updates.
//!
//! The collision pass itself never fails: problems found while colliding
//! are reported as [`CollisionDiagnostic`](crate::collisions::CollisionDiagnostic)
//! values. The errors here cover invalid input handed to constructors and
//! to the step driver.

use thiserror::Error;

/// Errors raised while building grids, tables and schemes, or applying results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MicrophysicsError {
    /// Level boundaries are not finite or not non-decreasing.
    #[error("invalid grid levels: {0}")]
    InvalidGrid(String),

    /// Timestep was zero, negative or not finite.
    #[error("timestep must be positive and finite, got {0} s")]
    InvalidTimestep(f64),

    /// Efficiency table shape or axes are malformed.
    #[error("invalid efficiency table: {0}")]
    InvalidEfficiencyTable(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tendencies are not index-aligned with the ensemble.
    #[error("got {tendencies} tendencies for {superparticles} superparticles")]
    LengthMismatch {
        tendencies: usize,
        superparticles: usize,
    },
}

/// Result alias for microphysics operations.
pub type Result<T> = std::result::Result<T, MicrophysicsError>;
