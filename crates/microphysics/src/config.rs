//! Collision scheme configuration.
//!
//! Configurations are plain serde structs supplied by the embedding
//! application (for example as a JavaScript object through the wasm
//! bindings). Missing fields take their defaults.

use serde::{Deserialize, Serialize};

#[cfg(feature = "tsify")]
use tsify_next::Tsify;

use crate::collisions::{CollisionScheme, HallCollisions, NoCollisions, PopulationLossPolicy};
use crate::efficiency::{ConstantEfficiency, HallEfficiencyTable};
use crate::error::{MicrophysicsError, Result};
use crate::sedimentation::RogersFallSpeed;

/// Which collision scheme to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "tsify", derive(Tsify))]
#[cfg_attr(feature = "tsify", tsify(into_wasm_abi, from_wasm_abi))]
pub enum SchemeKind {
    /// Collisions switched off
    None,
    /// Hall kernel collisions per layer
    #[default]
    Hall,
}

/// Source of collision efficiencies for the Hall scheme.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[cfg_attr(feature = "tsify", derive(Tsify))]
#[cfg_attr(feature = "tsify", tsify(into_wasm_abi, from_wasm_abi))]
pub enum EfficiencySource {
    /// Hall (1980) table
    #[default]
    HallTable,
    /// Same efficiency for every pair
    Constant { value: f64 },
}

/// Configuration of the collision step.
///
/// # Examples
///
/// ```
/// use microphysics::config::{CollisionConfig, SchemeKind};
///
/// let config = CollisionConfig::default();
/// assert_eq!(config.scheme, SchemeKind::Hall);
///
/// let scheme = config.build_scheme().unwrap();
/// assert!(scheme.needs_sorted_superparticles());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "tsify", derive(Tsify))]
#[cfg_attr(feature = "tsify", tsify(into_wasm_abi, from_wasm_abi))]
pub struct CollisionConfig {
    pub scheme: SchemeKind,
    pub efficiency: EfficiencySource,
    /// Process layers on the rayon thread pool
    pub parallel_layers: bool,
    pub population_loss: PopulationLossPolicy,
}

impl CollisionConfig {
    /// Configuration with collisions switched off.
    pub fn disabled() -> Self {
        Self {
            scheme: SchemeKind::None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let EfficiencySource::Constant { value } = self.efficiency {
            if !(0.0..=1.0).contains(&value) {
                return Err(MicrophysicsError::InvalidConfig(format!(
                    "constant collision efficiency must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Build the configured scheme.
    pub fn build_scheme(&self) -> Result<Box<dyn CollisionScheme>> {
        self.validate()?;
        let scheme: Box<dyn CollisionScheme> = match (self.scheme, self.efficiency) {
            (SchemeKind::None, _) => Box::new(NoCollisions),
            (SchemeKind::Hall, EfficiencySource::HallTable) => Box::new(
                HallCollisions::new(RogersFallSpeed, HallEfficiencyTable::default())
                    .with_parallel_layers(self.parallel_layers)
                    .with_loss_policy(self.population_loss),
            ),
            (SchemeKind::Hall, EfficiencySource::Constant { value }) => Box::new(
                HallCollisions::new(RogersFallSpeed, ConstantEfficiency::new(value))
                    .with_parallel_layers(self.parallel_layers)
                    .with_loss_policy(self.population_loss),
            ),
        };
        log::debug!("built {} collision scheme", scheme.name());
        Ok(scheme)
    }
}
