//! Collision-coalescence of superparticles.
//!
//! This module provides the Hall collision kernel, the per-layer collider
//! and the schemes the step driver chooses between.

pub mod collider;
pub mod diagnostic;
pub mod kernel;
pub mod report;
pub mod scheme;

#[cfg(test)]
mod collider_test;

pub use collider::{Collider, PopulationLossPolicy};
pub use diagnostic::CollisionDiagnostic;
pub use kernel::hall_kernel;
pub use report::{CollisionReport, Tendency};
pub use scheme::{CollisionScheme, HallCollisions, NoCollisions, layer_ranges};
