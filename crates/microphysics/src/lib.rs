//! Warm-rain collision-coalescence for superparticle cloud models.
//!
//! Each [`Superparticle`] represents many real droplets sharing a radius and
//! a height. Within every layer of a vertical [`Grid`] the Hall collision
//! kernel merges droplet populations, producing per-particle changes of
//! liquid water and multiplicity.
//!
//! # Modules
//!
//! - [`collisions`]: Hall kernel, per-layer collider and collision schemes
//! - [`sedimentation`]: droplet fall speeds
//! - [`efficiency`]: tabulated collision efficiencies
//! - [`partition`]: grouping of particles by layer
//! - [`ensemble`]: sorting, seeding and applying tendencies
//! - [`driver`]: running collision steps over a column
//! - [`config`]: serde configuration of the collision scheme
//!
//! # Example
//!
//! ```
//! use microphysics::config::CollisionConfig;
//! use microphysics::driver::RainColumn;
//! use microphysics::ensemble::{EnsembleConfig, seed_ensemble};
//! use microphysics::Grid;
//! use rand::SeedableRng;
//! use rand_chacha::ChaChaRng;
//! use units::{Length, Time};
//!
//! let grid = Grid::uniform(20, Length::from_meters(50.0));
//! let mut rng = ChaChaRng::seed_from_u64(42);
//! let ensemble = seed_ensemble(&EnsembleConfig::default(), &grid, &mut rng).unwrap();
//!
//! let scheme = CollisionConfig::default().build_scheme().unwrap();
//! let mut column = RainColumn::new(grid, ensemble, scheme);
//! let history = column.run(Time::from_seconds(1.0), 10).unwrap();
//! assert_eq!(history.len(), 10);
//! ```

pub mod collisions;
pub mod config;
pub mod constants;
pub mod driver;
pub mod efficiency;
pub mod ensemble;
pub mod error;
pub mod grid;
pub mod partition;
pub mod sedimentation;
pub mod superparticle;
pub mod thermodynamics;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod grid_test;
#[cfg(test)]
mod partition_test;

pub use collisions::{CollisionReport, CollisionScheme, Tendency};
pub use error::{MicrophysicsError, Result};
pub use grid::Grid;
pub use superparticle::Superparticle;
