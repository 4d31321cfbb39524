//! Step driver for the collision process.
//!
//! The driver owns the ensemble. Each step it honours the ordering the
//! scheme asks for, runs the read-only collision pass and only then applies
//! the tendencies.

use serde::{Deserialize, Serialize};
use units::{Mass, Time};

use crate::collisions::{CollisionReport, CollisionScheme};
use crate::ensemble::{apply_tendencies, sort_by_height, total_multiplicity, total_water};
use crate::error::{MicrophysicsError, Result};
use crate::grid::Grid;
use crate::partition::layer_populations;
use crate::superparticle::Superparticle;

/// Run one collision step and apply its tendencies.
///
/// Sorts the ensemble by height first if the scheme needs it, so indices in
/// the returned report refer to the ensemble as it is after the call.
///
/// # Errors
///
/// [`MicrophysicsError::InvalidTimestep`] if `dt` is not positive and finite.
///
/// # Examples
///
/// ```
/// use microphysics::collisions::HallCollisions;
/// use microphysics::driver::collision_step;
/// use microphysics::{Grid, Superparticle};
/// use units::{Length, Time};
///
/// let grid = Grid::uniform(1, Length::from_meters(100.0));
/// let mut ensemble = vec![
///     Superparticle::from_radius(60.0, Length::from_microns(30.0), 100.0, Length::zero()),
///     Superparticle::from_radius(10.0, Length::from_microns(10.0), 1000.0, Length::zero()),
/// ];
/// let scheme: HallCollisions = HallCollisions::default();
///
/// let report = collision_step(&scheme, &mut ensemble, &grid, Time::from_seconds(1.0)).unwrap();
/// assert_eq!(report.len(), 2);
/// assert_eq!(ensemble[0].z, 10.0);
/// ```
pub fn collision_step(
    scheme: &dyn CollisionScheme,
    superparticles: &mut [Superparticle],
    grid: &Grid,
    dt: Time,
) -> Result<CollisionReport> {
    let dt_seconds = dt.to_seconds();
    if !(dt_seconds.is_finite() && dt_seconds > 0.0) {
        return Err(MicrophysicsError::InvalidTimestep(dt_seconds));
    }

    if scheme.needs_sorted_superparticles() {
        sort_by_height(superparticles);
    }
    if log::log_enabled!(log::Level::Trace) {
        log::trace!(
            "nucleated superparticles per layer: {:?}",
            layer_populations(superparticles, grid)
        );
    }

    let report = scheme.collide(superparticles, grid, dt);
    apply_tendencies(superparticles, &report.tendencies)?;

    log::debug!(
        "{} collision step of {dt_seconds} s: dqc = {:.3e}, dN = {}",
        scheme.name(),
        report.total_water_change(),
        report.total_multiplicity_change()
    );
    Ok(report)
}

/// Totals recorded after each step of a [`RainColumn`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    /// Simulated time after the step (s)
    pub time: f64,
    pub total_water: f64,
    pub total_multiplicity: f64,
    pub nucleated: usize,
    /// Droplet-weighted mean mass of activated droplets (µg)
    pub mean_droplet_mass_ug: f64,
    pub diagnostics: usize,
}

/// A column of superparticles evolving under collisions only.
pub struct RainColumn {
    grid: Grid,
    superparticles: Vec<Superparticle>,
    scheme: Box<dyn CollisionScheme>,
    time: Time,
}

impl RainColumn {
    pub fn new(
        grid: Grid,
        superparticles: Vec<Superparticle>,
        scheme: Box<dyn CollisionScheme>,
    ) -> Self {
        Self {
            grid,
            superparticles,
            scheme,
            time: Time::zero(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn superparticles(&self) -> &[Superparticle] {
        &self.superparticles
    }

    pub fn scheme(&self) -> &dyn CollisionScheme {
        self.scheme.as_ref()
    }

    /// Simulated time so far.
    pub fn time(&self) -> Time {
        self.time
    }

    /// Advance the column by `dt`.
    pub fn step(&mut self, dt: Time) -> Result<CollisionReport> {
        let report = collision_step(
            self.scheme.as_ref(),
            &mut self.superparticles,
            &self.grid,
            dt,
        )?;
        self.time = self.time + dt;
        Ok(report)
    }

    /// Advance `steps` times by `dt`, recording totals after each step.
    pub fn run(&mut self, dt: Time, steps: usize) -> Result<Vec<StepSummary>> {
        let mut history = Vec::with_capacity(steps);
        for _ in 0..steps {
            let report = self.step(dt)?;
            history.push(self.summary(report.diagnostics.len()));
        }
        Ok(history)
    }

    fn summary(&self, diagnostics: usize) -> StepSummary {
        let activated = self
            .superparticles
            .iter()
            .filter(|sp| sp.is_nucleated && sp.has_population());
        let (droplets, mass) = activated.fold((0.0, Mass::zero()), |(n, m), sp| {
            (n + sp.multiplicity, m + sp.droplet_mass() * sp.multiplicity)
        });
        let mean_droplet_mass_ug = if droplets > 0.0 {
            (mass / droplets).to_micrograms()
        } else {
            0.0
        };

        StepSummary {
            time: self.time.to_seconds(),
            total_water: total_water(&self.superparticles),
            total_multiplicity: total_multiplicity(&self.superparticles),
            nucleated: self.superparticles.iter().filter(|sp| sp.is_nucleated).count(),
            mean_droplet_mass_ug,
            diagnostics,
        }
    }
}
