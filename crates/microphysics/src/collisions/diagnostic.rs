//! Non-fatal findings of a collision pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "tsify")]
use tsify_next::Tsify;

/// Something odd the collision pass noticed and worked around.
///
/// Indices refer to positions in the ensemble handed to the pass.
#[derive(Error, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[cfg_attr(feature = "tsify", derive(Tsify))]
#[cfg_attr(feature = "tsify", tsify(into_wasm_abi, from_wasm_abi))]
pub enum CollisionDiagnostic {
    /// Nucleated particle whose radius is not a positive finite number.
    /// It was left out of the collision pass.
    #[error("superparticle {index} has non-positive radius {radius} m and was skipped")]
    NonPositiveRadius { index: usize, radius: f64 },

    /// Nucleated particle with no droplets. It was left out of the pass.
    #[error("superparticle {index} has multiplicity {multiplicity} and was skipped")]
    EmptyPopulation { index: usize, multiplicity: f64 },

    /// Collisions would remove more droplets than the particle holds.
    #[error("superparticle {index} would lose {requested} of {available} droplets")]
    PopulationExhausted {
        index: usize,
        requested: f64,
        available: f64,
    },

    /// Radius beyond the range of the fall speed provider.
    #[error("superparticle {index} radius {radius} m is outside the fall speed fit")]
    LargeDrop { index: usize, radius: f64 },
}

impl CollisionDiagnostic {
    /// Ensemble index of the affected superparticle.
    pub fn index(&self) -> usize {
        match *self {
            Self::NonPositiveRadius { index, .. }
            | Self::EmptyPopulation { index, .. }
            | Self::PopulationExhausted { index, .. }
            | Self::LargeDrop { index, .. } => index,
        }
    }

    /// Whether the particle was excluded from the pass.
    pub fn is_exclusion(&self) -> bool {
        matches!(self, Self::NonPositiveRadius { .. } | Self::EmptyPopulation { .. })
    }
}
