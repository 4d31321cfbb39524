//! SI physical quantities for cloud microphysics.
//!
//! Each quantity is a transparent `f64` newtype with a fixed base unit
//! (meters, seconds, m/s, kg/m³, kg) and explicit conversion methods, so
//! droplet radii in microns and layer heights in kilometers cannot be mixed
//! up silently.

pub mod density;
pub mod length;
pub mod mass;
pub mod time;
pub mod velocity;


pub use density::Density;
pub use length::Length;
pub use mass::Mass;
pub use time::Time;
pub use velocity::Velocity;
