//! Tendencies and the report returned by a collision pass.

use serde::{Deserialize, Serialize};

#[cfg(feature = "tsify")]
use tsify_next::Tsify;

use super::CollisionDiagnostic;

/// Change of one superparticle produced by a collision pass.
///
/// `dn` always holds a whole number of droplets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tsify", derive(Tsify))]
#[cfg_attr(feature = "tsify", tsify(into_wasm_abi, from_wasm_abi))]
pub struct Tendency {
    /// Liquid water change (kg/kg)
    pub dqc: f64,
    /// Multiplicity change
    pub dn: f64,
}

impl Tendency {
    pub fn is_zero(&self) -> bool {
        self.dqc == 0.0 && self.dn == 0.0
    }
}

/// Output of [`CollisionScheme::collide`](super::CollisionScheme::collide).
///
/// `tendencies` is index-aligned with the ensemble that was passed in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tsify", derive(Tsify))]
#[cfg_attr(feature = "tsify", tsify(into_wasm_abi, from_wasm_abi))]
pub struct CollisionReport {
    pub tendencies: Vec<Tendency>,
    pub diagnostics: Vec<CollisionDiagnostic>,
}

impl CollisionReport {
    pub fn new(tendencies: Vec<Tendency>, diagnostics: Vec<CollisionDiagnostic>) -> Self {
        Self {
            tendencies,
            diagnostics,
        }
    }

    /// All-zero tendencies for `len` superparticles.
    pub fn zeros(len: usize) -> Self {
        Self::new(vec![Tendency::default(); len], Vec::new())
    }

    pub fn len(&self) -> usize {
        self.tendencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tendencies.is_empty()
    }

    /// True when the pass raised no diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_tendencies(self) -> Vec<Tendency> {
        self.tendencies
    }

    /// Sum of `dqc` over all superparticles.
    pub fn total_water_change(&self) -> f64 {
        self.tendencies.iter().map(|t| t.dqc).sum()
    }

    /// Sum of `dn` over all superparticles.
    pub fn total_multiplicity_change(&self) -> f64 {
        self.tendencies.iter().map(|t| t.dn).sum()
    }
}
