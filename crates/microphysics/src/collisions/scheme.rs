//! Collision schemes selectable by the step driver.
//!
//! Provides two implementations:
//! - NoCollisions: collisions switched off
//! - HallCollisions: Hall kernel applied layer by layer

use std::ops::Range;

use rayon::prelude::*;
use units::Time;

use super::{Collider, CollisionDiagnostic, CollisionReport, PopulationLossPolicy, Tendency};
use crate::efficiency::{CollisionEfficiency, HallEfficiencyTable};
use crate::grid::Grid;
use crate::sedimentation::{FallSpeed, RogersFallSpeed};
use crate::superparticle::Superparticle;

/// Strategy for computing collision tendencies.
///
/// A scheme only reads the ensemble; the caller applies the returned
/// tendencies once the pass has finished.
pub trait CollisionScheme: Send + Sync {
    /// Compute one tendency per superparticle for a step of length `dt`.
    fn collide(&self, superparticles: &[Superparticle], grid: &Grid, dt: Time) -> CollisionReport;

    /// Whether `collide` expects the ensemble sorted by ascending height.
    ///
    /// Callers must sort before calling when this returns true. The order
    /// is not checked again inside `collide`.
    fn needs_sorted_superparticles(&self) -> bool;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Collisions switched off: every tendency is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCollisions;

impl CollisionScheme for NoCollisions {
    fn collide(
        &self,
        superparticles: &[Superparticle],
        _grid: &Grid,
        _dt: Time,
    ) -> CollisionReport {
        CollisionReport::zeros(superparticles.len())
    }

    fn needs_sorted_superparticles(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Hall-kernel collisions within each grid layer.
///
/// The ensemble must be sorted by height. Each layer is then a contiguous
/// slice found by binary search on the level boundaries, and layers are
/// independent of each other, so they can be processed in parallel.
///
/// # Examples
///
/// ```
/// use microphysics::collisions::{CollisionScheme, HallCollisions};
/// use microphysics::{Grid, Superparticle};
/// use units::{Length, Time};
///
/// let grid = Grid::uniform(2, Length::from_meters(100.0));
/// let ensemble = vec![
///     Superparticle::from_radius(10.0, Length::from_microns(10.0), 1000.0, Length::zero()),
///     Superparticle::from_radius(20.0, Length::from_microns(30.0), 100.0, Length::zero()),
///     Superparticle::from_radius(150.0, Length::from_microns(20.0), 500.0, Length::zero()),
/// ];
///
/// let scheme: HallCollisions = HallCollisions::default();
/// let report = scheme.collide(&ensemble, &grid, Time::from_seconds(1.0));
/// assert_eq!(report.len(), 3);
/// assert!(report.tendencies[2].is_zero()); // alone in the upper layer
/// ```
#[derive(Debug, Clone)]
pub struct HallCollisions<F = RogersFallSpeed, E = HallEfficiencyTable> {
    fall_speed: F,
    efficiency: E,
    parallel_layers: bool,
    loss_policy: PopulationLossPolicy,
}

impl Default for HallCollisions {
    fn default() -> Self {
        Self::new(RogersFallSpeed, HallEfficiencyTable::default())
    }
}

impl<F: FallSpeed, E: CollisionEfficiency> HallCollisions<F, E> {
    pub fn new(fall_speed: F, efficiency: E) -> Self {
        Self {
            fall_speed,
            efficiency,
            parallel_layers: false,
            loss_policy: PopulationLossPolicy::default(),
        }
    }

    /// Process layers on the rayon thread pool.
    pub fn with_parallel_layers(mut self, parallel: bool) -> Self {
        self.parallel_layers = parallel;
        self
    }

    pub fn with_loss_policy(mut self, policy: PopulationLossPolicy) -> Self {
        self.loss_policy = policy;
        self
    }

    pub fn parallel_layers(&self) -> bool {
        self.parallel_layers
    }

    pub fn loss_policy(&self) -> PopulationLossPolicy {
        self.loss_policy
    }

    fn collide_layer(
        &self,
        layer: &[Superparticle],
        out: &mut [Tendency],
        offset: usize,
        dt: Time,
    ) -> Vec<CollisionDiagnostic> {
        if layer.len() < 2 {
            return Vec::new();
        }
        Collider::new(layer, dt, &self.fall_speed, &self.efficiency, offset)
            .calculate(out, self.loss_policy)
    }
}

impl<F: FallSpeed, E: CollisionEfficiency> CollisionScheme for HallCollisions<F, E> {
    fn collide(&self, superparticles: &[Superparticle], grid: &Grid, dt: Time) -> CollisionReport {
        let mut tendencies = vec![Tendency::default(); superparticles.len()];
        let levels = grid.level_boundaries();
        if levels.is_empty() {
            return CollisionReport::new(tendencies, Vec::new());
        }

        let ranges = layer_ranges(superparticles, levels);
        let work: Vec<(Range<usize>, &mut [Tendency])> = ranges
            .iter()
            .cloned()
            .zip(split_layers(&mut tendencies, &ranges))
            .collect();

        let diagnostics: Vec<CollisionDiagnostic> = if self.parallel_layers {
            let per_layer: Vec<Vec<CollisionDiagnostic>> = work
                .into_par_iter()
                .map(|(range, out)| {
                    self.collide_layer(&superparticles[range.clone()], out, range.start, dt)
                })
                .collect();
            per_layer.into_iter().flatten().collect()
        } else {
            work.into_iter()
                .flat_map(|(range, out)| {
                    self.collide_layer(&superparticles[range.clone()], out, range.start, dt)
                })
                .collect()
        };

        for diagnostic in &diagnostics {
            log::warn!("{diagnostic}");
        }
        let report = CollisionReport::new(tendencies, diagnostics);
        log::debug!(
            "hall collisions over {} layers: dqc = {:.3e}, dN = {}, {} diagnostics",
            ranges.len(),
            report.total_water_change(),
            report.total_multiplicity_change(),
            report.diagnostics.len()
        );
        report
    }

    fn needs_sorted_superparticles(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "hall"
    }
}

/// Index range of each layer in a height-sorted ensemble.
///
/// Layer `i` holds the particles with `levels[i] <= z < levels[i + 1]`.
/// Particles below the first or at/above the last level fall in no range.
/// The result is meaningless if `superparticles` is not sorted by `z`.
pub fn layer_ranges(superparticles: &[Superparticle], levels: &[f64]) -> Vec<Range<usize>> {
    let Some((&bottom, upper)) = levels.split_first() else {
        return Vec::new();
    };
    let mut start = superparticles.partition_point(|sp| sp.z < bottom);
    upper
        .iter()
        .map(|&level| {
            let end = start + superparticles[start..].partition_point(|sp| sp.z < level);
            let range = start..end;
            start = end;
            range
        })
        .collect()
}

/// Split `tendencies` into the disjoint slices covered by `ranges`.
fn split_layers<'t>(
    tendencies: &'t mut [Tendency],
    ranges: &[Range<usize>],
) -> Vec<&'t mut [Tendency]> {
    let mut layers = Vec::with_capacity(ranges.len());
    let mut rest = tendencies;
    let mut consumed = 0;
    for range in ranges {
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(range.start - consumed);
        let (layer, tail) = tail.split_at_mut(range.len());
        layers.push(layer);
        rest = tail;
        consumed = range.end;
    }
    layers
}
