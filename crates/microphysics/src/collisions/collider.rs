//! Per-layer collision-coalescence of superparticles.
//!
//! # Physics
//!
//! Inside one well-mixed layer the particles are ordered by radius. Every
//! particle `i` except the largest loses droplets to its own size class and to
//! every larger class `j`:
//!
//! ```text
//! dN_i/dt = −½ K_ii N_i (N_i − 1) − Σ_{j>i} K_ij N_i N_j
//! ```
//!
//! and its per-droplet volume gains from smaller classes and loses to larger
//! ones:
//!
//! ```text
//! m_i = dt · ( r_i³ + Σ_{j<i} K_ij N_j r_j³ − Σ_{j>i} K_ij N_j r_i³ )
//! ```
//!
//! The droplet loss is floored to a whole number of droplets. The largest
//! particle never loses droplets; it only collects `m` from the rest.

use serde::{Deserialize, Serialize};
use units::{Length, Time};

#[cfg(feature = "tsify")]
use tsify_next::Tsify;

use super::{CollisionDiagnostic, Tendency, hall_kernel};
use crate::constants::{PI, RHO_H2O};
use crate::efficiency::CollisionEfficiency;
use crate::sedimentation::FallSpeed;
use crate::superparticle::Superparticle;

/// What to do when collisions would remove more droplets than a particle has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "tsify", derive(Tsify))]
#[cfg_attr(feature = "tsify", tsify(into_wasm_abi, from_wasm_abi))]
pub enum PopulationLossPolicy {
    /// Limit the loss to the whole droplets present. A fractional remainder
    /// of the multiplicity stays with the particle.
    #[default]
    Clamp,
    /// Keep the floored rate even if the multiplicity goes negative.
    Unbounded,
}

/// Collision calculation for the superparticles of a single layer.
///
/// Only nucleated particles with a positive multiplicity and radius take
/// part; the rest are skipped and keep a zero tendency.
///
/// # Examples
///
/// ```
/// use microphysics::Superparticle;
/// use microphysics::collisions::{Collider, PopulationLossPolicy, Tendency};
/// use microphysics::efficiency::ConstantEfficiency;
/// use microphysics::sedimentation::RogersFallSpeed;
/// use units::{Length, Time};
///
/// let layer = [
///     Superparticle::from_radius(5.0, Length::from_microns(30.0), 100.0, Length::zero()),
///     Superparticle::from_radius(5.0, Length::from_microns(10.0), 1000.0, Length::zero()),
/// ];
/// let efficiency = ConstantEfficiency::new(1.0);
/// let collider = Collider::new(&layer, Time::from_seconds(1.0), &RogersFallSpeed, &efficiency, 0);
///
/// let mut out = [Tendency::default(); 2];
/// let diagnostics = collider.calculate(&mut out, PopulationLossPolicy::Clamp);
/// assert!(diagnostics.is_empty());
/// assert_eq!(out[0].dn, 0.0);
/// assert!(out[1].dn <= 0.0);
/// ```
pub struct Collider<'a, E: CollisionEfficiency + ?Sized> {
    particles: &'a [Superparticle],
    /// (radius, local index), ascending by radius
    ridx: Vec<(f64, usize)>,
    /// Fall speeds aligned with `ridx`
    fall_speeds: Vec<f64>,
    dt: f64,
    efficiency: &'a E,
    offset: usize,
    diagnostics: Vec<CollisionDiagnostic>,
}

impl<'a, E: CollisionEfficiency + ?Sized> Collider<'a, E> {
    /// Prepare the radius ordering and fall speeds of one layer.
    ///
    /// # Arguments
    ///
    /// * `particles` - Superparticles of the layer, in any order
    /// * `dt` - Timestep
    /// * `fall_speed` - Fall speed provider, evaluated once per particle
    /// * `efficiency` - Collision efficiency provider
    /// * `offset` - Ensemble index of `particles[0]`, used in diagnostics
    pub fn new<F: FallSpeed + ?Sized>(
        particles: &'a [Superparticle],
        dt: Time,
        fall_speed: &F,
        efficiency: &'a E,
        offset: usize,
    ) -> Self {
        let mut diagnostics = Vec::new();
        let mut ridx = Vec::with_capacity(particles.len());

        for (local, sp) in particles.iter().enumerate() {
            if !sp.is_nucleated {
                continue;
            }
            let index = offset + local;
            if !sp.has_population() {
                diagnostics.push(CollisionDiagnostic::EmptyPopulation {
                    index,
                    multiplicity: sp.multiplicity,
                });
                continue;
            }
            let radius = sp.radius();
            if !(radius.to_meters().is_finite() && radius.is_positive()) {
                diagnostics.push(CollisionDiagnostic::NonPositiveRadius {
                    index,
                    radius: radius.to_meters(),
                });
                continue;
            }
            if !fall_speed.in_valid_range(radius) {
                diagnostics.push(CollisionDiagnostic::LargeDrop {
                    index,
                    radius: radius.to_meters(),
                });
            }
            ridx.push((radius.to_meters(), local));
        }

        ridx.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let fall_speeds = ridx
            .iter()
            .map(|&(r, _)| fall_speed.fall_speed(Length::from_meters(r)).to_meters_per_sec())
            .collect();

        Self {
            particles,
            ridx,
            fall_speeds,
            dt: dt.to_seconds(),
            efficiency,
            offset,
            diagnostics,
        }
    }

    /// Number of particles taking part in collisions.
    pub fn len(&self) -> usize {
        self.ridx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ridx.is_empty()
    }

    /// Local indices of the colliding particles, smallest radius first.
    pub fn sorted_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.ridx.iter().map(|&(_, i)| i)
    }

    /// Write the tendencies of this layer into `out`.
    ///
    /// `out` is aligned with the `particles` slice given to [`Collider::new`].
    /// Fewer than two colliding particles leave `out` untouched.
    ///
    /// # Returns
    ///
    /// Diagnostics raised while preparing and colliding the layer
    ///
    /// # Panics
    ///
    /// If `out` is shorter than the layer.
    pub fn calculate(
        mut self,
        out: &mut [Tendency],
        policy: PopulationLossPolicy,
    ) -> Vec<CollisionDiagnostic> {
        let pc = self.len();
        let mut diagnostics = std::mem::take(&mut self.diagnostics);
        if pc < 2 {
            return diagnostics;
        }
        log::trace!("colliding {pc} superparticles from ensemble index {}", self.offset);

        for i in 0..pc - 1 {
            let isp = self.ridx[i].1;
            let available = self.particles[isp].multiplicity;
            let mut dn = self.weights(i);
            if dn < -available {
                diagnostics.push(CollisionDiagnostic::PopulationExhausted {
                    index: self.offset + isp,
                    requested: -dn,
                    available,
                });
                if policy == PopulationLossPolicy::Clamp {
                    dn = -available.floor();
                }
            }
            out[isp] = Tendency {
                dqc: self.water_change(i, dn),
                dn,
            };
        }

        let isp = self.ridx[pc - 1].1;
        out[isp] = Tendency {
            dqc: self.mass(pc - 1),
            dn: 0.0,
        };
        diagnostics
    }

    fn kernel(&self, i: usize, j: usize) -> f64 {
        hall_kernel(
            self.ridx[i].0,
            self.ridx[j].0,
            self.fall_speeds[i],
            self.fall_speeds[j],
            self.efficiency,
        )
    }

    fn multiplicity(&self, i: usize) -> f64 {
        self.particles[self.ridx[i].1].multiplicity
    }

    /// Droplets lost per second by sorted particle `i`, as a negative rate.
    pub(crate) fn loss_rate(&self, i: usize) -> f64 {
        let n = self.multiplicity(i);
        let internal = -self.kernel(i, i) * 0.5 * n * (n - 1.0);
        let external: f64 = (i + 1..self.len())
            .map(|j| self.kernel(i, j) * n * self.multiplicity(j))
            .sum();
        internal - external
    }

    /// Whole droplets lost by sorted particle `i` during one step.
    pub(crate) fn weights(&self, i: usize) -> f64 {
        (self.dt * self.loss_rate(i)).floor()
    }

    /// Per-droplet volume of sorted particle `i` after exchange, times `dt`.
    pub(crate) fn mass(&self, i: usize) -> f64 {
        let ri = self.ridx[i].0;
        let ri3 = ri * ri * ri;
        let from_smaller: f64 = (0..i)
            .map(|j| {
                let rj = self.ridx[j].0;
                self.kernel(i, j) * self.multiplicity(j) * rj * rj * rj
            })
            .sum();
        let to_larger: f64 = (i + 1..self.len())
            .map(|j| self.kernel(i, j) * self.multiplicity(j) * ri3)
            .sum();
        self.dt * (ri3 + from_smaller - to_larger)
    }

    /// Water change of sorted particle `i` when it loses `-dn` droplets.
    ///
    /// The water of the `N + dn` remaining droplets is rescaled by
    /// `1 / (1 − dn/N)` so the mean droplet mass stays consistent.
    pub(crate) fn water_change(&self, i: usize, dn: f64) -> f64 {
        let sp = &self.particles[self.ridx[i].1];
        let n = sp.multiplicity;
        4.0 / 3.0 * PI * RHO_H2O * (n + dn) * self.mass(i) / (1.0 - dn / n) - sp.qc
    }
}
