//! Operations on the whole superparticle ensemble.
//!
//! Sorting, applying collision tendencies, conserved totals and random
//! seeding of ensembles for demos and tests.

use rand::Rng;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use units::Length;

#[cfg(feature = "tsify")]
use tsify_next::Tsify;

use crate::collisions::Tendency;
use crate::error::{MicrophysicsError, Result};
use crate::grid::Grid;
use crate::superparticle::Superparticle;

/// Sort the ensemble by ascending height, keeping the order of equal heights.
pub fn sort_by_height(superparticles: &mut [Superparticle]) {
    superparticles.sort_by(|a, b| a.z.total_cmp(&b.z));
}

/// Ensemble indices in ascending height order.
///
/// `height_order(sps)[k]` is the ensemble index of the particle that ends
/// up at position `k` after [`sort_by_height`].
pub fn height_order(superparticles: &[Superparticle]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..superparticles.len()).collect();
    order.sort_by(|&a, &b| superparticles[a].z.total_cmp(&superparticles[b].z));
    order
}

pub fn is_sorted_by_height(superparticles: &[Superparticle]) -> bool {
    superparticles.windows(2).all(|w| w[0].z.total_cmp(&w[1].z).is_le())
}

/// Add collision tendencies to the ensemble.
///
/// Multiplicity and water content are clamped at zero; a particle whose
/// multiplicity reaches zero keeps its dry radius but is no longer nucleated.
///
/// # Errors
///
/// [`MicrophysicsError::LengthMismatch`] if the tendencies are not
/// index-aligned with the ensemble. The ensemble is left unchanged.
pub fn apply_tendencies(
    superparticles: &mut [Superparticle],
    tendencies: &[Tendency],
) -> Result<()> {
    if superparticles.len() != tendencies.len() {
        return Err(MicrophysicsError::LengthMismatch {
            tendencies: tendencies.len(),
            superparticles: superparticles.len(),
        });
    }

    for (sp, t) in superparticles.iter_mut().zip(tendencies) {
        sp.multiplicity = (sp.multiplicity + t.dn).max(0.0);
        sp.qc = (sp.qc + t.dqc).max(0.0);
        if sp.multiplicity == 0.0 {
            sp.qc = 0.0;
            sp.is_nucleated = false;
        }
    }
    Ok(())
}

/// Total liquid water mixing ratio of the ensemble.
pub fn total_water(superparticles: &[Superparticle]) -> f64 {
    superparticles.iter().map(|sp| sp.qc).sum()
}

/// Total number of real droplets represented by the ensemble.
pub fn total_multiplicity(superparticles: &[Superparticle]) -> f64 {
    superparticles.iter().map(|sp| sp.multiplicity).sum()
}

/// Parameters for random ensemble generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "tsify", derive(Tsify))]
#[cfg_attr(feature = "tsify", tsify(into_wasm_abi, from_wasm_abi))]
pub struct EnsembleConfig {
    /// Number of superparticles
    pub count: usize,
    /// Droplets per superparticle
    pub multiplicity: f64,
    /// Smallest droplet radius (µm)
    pub min_radius_um: f64,
    /// Largest droplet radius (µm)
    pub max_radius_um: f64,
    /// Dry nucleus radius (µm)
    pub dry_radius_um: f64,
    /// Probability that a superparticle is activated
    pub nucleated_fraction: f64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            count: 200,
            multiplicity: 1e6,
            min_radius_um: 5.0,
            max_radius_um: 40.0,
            dry_radius_um: 0.1,
            nucleated_fraction: 1.0,
        }
    }
}

impl EnsembleConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(MicrophysicsError::InvalidConfig(msg));
        if !(self.multiplicity.is_finite() && self.multiplicity > 0.0) {
            return invalid(format!("multiplicity must be positive, got {}", self.multiplicity));
        }
        if !(self.dry_radius_um.is_finite() && self.dry_radius_um >= 0.0) {
            return invalid(format!(
                "dry radius must be non-negative, got {} µm",
                self.dry_radius_um
            ));
        }
        if !(self.min_radius_um > self.dry_radius_um && self.max_radius_um >= self.min_radius_um)
            || !self.max_radius_um.is_finite()
        {
            return invalid(format!(
                "radius range [{}, {}] µm must lie above the dry radius {} µm",
                self.min_radius_um, self.max_radius_um, self.dry_radius_um
            ));
        }
        if !(0.0..=1.0).contains(&self.nucleated_fraction) {
            return invalid(format!(
                "nucleated fraction must be in [0, 1], got {}",
                self.nucleated_fraction
            ));
        }
        Ok(())
    }
}

/// Generate a random ensemble spread over the grid.
///
/// Heights are uniform over the grid, radii log-uniform over the configured
/// range. The ensemble is returned sorted by height. Identical seeds give
/// identical ensembles.
///
/// # Examples
///
/// ```
/// use microphysics::ensemble::{EnsembleConfig, is_sorted_by_height, seed_ensemble};
/// use microphysics::Grid;
/// use rand::SeedableRng;
/// use rand_chacha::ChaChaRng;
/// use units::Length;
///
/// let grid = Grid::uniform(10, Length::from_meters(50.0));
/// let mut rng = ChaChaRng::seed_from_u64(42);
/// let ensemble = seed_ensemble(&EnsembleConfig::default(), &grid, &mut rng).unwrap();
/// assert_eq!(ensemble.len(), 200);
/// assert!(is_sorted_by_height(&ensemble));
/// ```
pub fn seed_ensemble(
    config: &EnsembleConfig,
    grid: &Grid,
    rng: &mut ChaChaRng,
) -> Result<Vec<Superparticle>> {
    config.validate()?;
    let levels = grid.level_boundaries();
    let (Some(&bottom), Some(&top)) = (levels.first(), levels.last()) else {
        return Err(MicrophysicsError::InvalidGrid(
            "cannot seed an ensemble on an empty grid".to_string(),
        ));
    };
    if top <= bottom {
        return Err(MicrophysicsError::InvalidGrid(format!(
            "grid has no thickness ({bottom} m to {top} m)"
        )));
    }

    let dry_radius = Length::from_microns(config.dry_radius_um);
    let (ln_min, ln_max) = (config.min_radius_um.ln(), config.max_radius_um.ln());

    let mut ensemble: Vec<Superparticle> = (0..config.count)
        .map(|_| {
            let z = rng.random_range(bottom..top);
            let nucleated = rng.random_bool(config.nucleated_fraction);
            let ln_r = if ln_max > ln_min {
                rng.random_range(ln_min..ln_max)
            } else {
                ln_min
            };
            if nucleated {
                Superparticle::from_radius(
                    z,
                    Length::from_microns(ln_r.exp()),
                    config.multiplicity,
                    dry_radius,
                )
            } else {
                Superparticle::haze(z, config.multiplicity, dry_radius)
            }
        })
        .collect();

    sort_by_height(&mut ensemble);
    log::debug!("seeded {} superparticles between {bottom} m and {top} m", ensemble.len());
    Ok(ensemble)
}
