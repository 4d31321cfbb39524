//! Tests for the per-layer collider.

use approx::assert_relative_eq;
use units::{Length, Time};

use crate::Superparticle;
use crate::collisions::{Collider, CollisionDiagnostic, PopulationLossPolicy, Tendency};
use crate::efficiency::ConstantEfficiency;
use crate::sedimentation::{ConstantFallSpeed, RogersFallSpeed};

fn droplet(radius_um: f64, multiplicity: f64) -> Superparticle {
    Superparticle::from_radius(50.0, Length::from_microns(radius_um), multiplicity, Length::zero())
}

/// 10, 20 and 30 µm droplets, deliberately out of radius order.
fn three_droplets() -> Vec<Superparticle> {
    vec![droplet(30.0, 100.0), droplet(10.0, 1000.0), droplet(20.0, 500.0)]
}

fn collide(layer: &[Superparticle], dt: f64) -> (Vec<Tendency>, Vec<CollisionDiagnostic>) {
    let efficiency = ConstantEfficiency::new(1.0);
    let collider = Collider::new(layer, Time::from_seconds(dt), &RogersFallSpeed, &efficiency, 0);
    let mut out = vec![Tendency::default(); layer.len()];
    let diagnostics = collider.calculate(&mut out, PopulationLossPolicy::Clamp);
    (out, diagnostics)
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn particles_are_processed_smallest_first() {
    let layer = three_droplets();
    let efficiency = ConstantEfficiency::new(1.0);
    let collider = Collider::new(&layer, Time::from_seconds(1.0), &RogersFallSpeed, &efficiency, 0);
    assert_eq!(collider.sorted_indices().collect::<Vec<_>>(), vec![1, 2, 0]);
}

#[test]
fn equal_radii_keep_input_order() {
    let layer = vec![droplet(15.0, 10.0), droplet(15.0, 10.0), droplet(5.0, 30.0)];
    let efficiency = ConstantEfficiency::new(1.0);
    let collider = Collider::new(&layer, Time::from_seconds(1.0), &RogersFallSpeed, &efficiency, 0);
    assert_eq!(collider.sorted_indices().collect::<Vec<_>>(), vec![2, 0, 1]);
}

// =============================================================================
// Population and mass rules
// =============================================================================

#[test]
fn largest_particle_keeps_its_droplets() {
    let (out, diagnostics) = collide(&three_droplets(), 1.0);
    assert!(diagnostics.is_empty());
    assert_eq!(out[0].dn, 0.0);
    assert!(out[0].dqc >= 0.0);
}

#[test]
fn smaller_particles_lose_whole_droplets() {
    let (out, _) = collide(&three_droplets(), 1.0);
    // Loss rates are ~1e-4 /s, which floors to a single droplet
    assert_eq!(out[1].dn, -1.0);
    assert_eq!(out[2].dn, -1.0);
}

#[test]
fn largest_particle_collects_mass_from_smaller() {
    let layer = three_droplets();
    let efficiency = ConstantEfficiency::new(1.0);
    let collider = Collider::new(&layer, Time::from_seconds(1.0), &RogersFallSpeed, &efficiency, 0);
    let expected = collider.mass(2);
    assert!(expected > (30e-6_f64).powi(3));

    let mut out = vec![Tendency::default(); 3];
    collider.calculate(&mut out, PopulationLossPolicy::Clamp);
    assert_eq!(out[0].dqc, expected);
}

#[test]
fn smallest_particle_only_loses_volume() {
    let layer = three_droplets();
    let efficiency = ConstantEfficiency::new(1.0);
    let collider = Collider::new(&layer, Time::from_seconds(1.0), &RogersFallSpeed, &efficiency, 0);
    assert!(collider.mass(0) < (10e-6_f64).powi(3));
    assert!(collider.loss_rate(0) < 0.0);
}

#[test]
fn equal_fall_speeds_produce_no_loss() {
    let layer = three_droplets();
    let efficiency = ConstantEfficiency::new(1.0);
    let fall_speed = ConstantFallSpeed(units::Velocity::from_meters_per_sec(0.1));
    let collider = Collider::new(&layer, Time::from_seconds(1.0), &fall_speed, &efficiency, 0);
    for i in 0..collider.len() {
        assert_eq!(collider.loss_rate(i), 0.0);
        assert_eq!(collider.weights(i), 0.0);
    }
}

#[test]
fn truncation_error_shrinks_with_timestep() {
    let layer = three_droplets();
    let efficiency = ConstantEfficiency::new(1.0);

    let truncation_error = |dt: f64| -> f64 {
        let collider = Collider::new(
            &layer,
            Time::from_seconds(dt),
            &RogersFallSpeed,
            &efficiency,
            0,
        );
        (0..collider.len() - 1)
            .map(|i| {
                let floored = collider.water_change(i, collider.weights(i));
                let continuous = collider.water_change(i, dt * collider.loss_rate(i));
                (floored - continuous).abs()
            })
            .sum()
    };

    let coarse = truncation_error(1.0);
    let fine = truncation_error(0.1);
    assert!(coarse > 0.0);
    assert!(fine < coarse);
    assert_relative_eq!(fine / coarse, 0.1, max_relative = 0.05);
}

// =============================================================================
// Trivial layers and exclusions
// =============================================================================

#[test]
fn single_particle_layer_is_untouched() {
    let (out, diagnostics) = collide(&[droplet(10.0, 1000.0)], 1.0);
    assert!(diagnostics.is_empty());
    assert!(out[0].is_zero());
}

#[test]
fn empty_layer_is_untouched() {
    let (out, diagnostics) = collide(&[], 1.0);
    assert!(out.is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn haze_particles_are_excluded() {
    let mut layer = three_droplets();
    layer.push(Superparticle::haze(50.0, 1e8, Length::from_microns(0.1)));

    let efficiency = ConstantEfficiency::new(1.0);
    let collider = Collider::new(&layer, Time::from_seconds(1.0), &RogersFallSpeed, &efficiency, 0);
    assert_eq!(collider.len(), 3);

    let mut out = vec![Tendency::default(); layer.len()];
    let diagnostics = collider.calculate(&mut out, PopulationLossPolicy::Clamp);
    assert!(diagnostics.is_empty());
    assert!(out[3].is_zero());
    assert_eq!(out[0].dn, 0.0);
}

#[test]
fn empty_population_is_reported_with_ensemble_index() {
    let mut layer = three_droplets();
    layer[2].multiplicity = 0.0;

    let efficiency = ConstantEfficiency::new(1.0);
    let collider = Collider::new(
        &layer,
        Time::from_seconds(1.0),
        &RogersFallSpeed,
        &efficiency,
        40,
    );
    assert_eq!(collider.len(), 2);

    let mut out = vec![Tendency::default(); 3];
    let diagnostics = collider.calculate(&mut out, PopulationLossPolicy::Clamp);
    assert_eq!(
        diagnostics,
        vec![CollisionDiagnostic::EmptyPopulation {
            index: 42,
            multiplicity: 0.0
        }]
    );
    assert!(out[2].is_zero());
}

#[test]
fn non_positive_radius_is_excluded() {
    let mut layer = three_droplets();
    layer[1].qc = -2.0 * layer[1].qc;

    let (out, diagnostics) = collide(&layer, 1.0);
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics[0],
        CollisionDiagnostic::NonPositiveRadius { index: 1, .. }
    ));
    assert!(out[1].is_zero());
    // The two remaining particles still collide
    assert_eq!(out[0].dn, 0.0);
    assert_eq!(out[2].dn, -1.0);
}

#[test]
fn oversized_drop_is_flagged_but_collides() {
    let layer = vec![droplet(10.0, 100.0), droplet(2500.0, 1.0)];
    let (out, diagnostics) = collide(&layer, 1.0);
    assert!(matches!(diagnostics[0], CollisionDiagnostic::LargeDrop { index: 1, .. }));
    assert!(out[1].dqc > 0.0);
}

// =============================================================================
// Population exhaustion
// =============================================================================

/// A few cloud droplets under a dense curtain of 1 mm drops.
fn exhausted_layer() -> Vec<Superparticle> {
    vec![droplet(10.0, 2.0), droplet(1000.0, 1e9)]
}

#[test]
fn clamp_policy_limits_loss_to_available_droplets() {
    let layer = exhausted_layer();
    let (out, diagnostics) = collide(&layer, 1.0);

    assert_eq!(out[0].dn, -2.0);
    assert_relative_eq!(out[0].dqc, -layer[0].qc, max_relative = 1e-12);
    match diagnostics.as_slice() {
        [CollisionDiagnostic::PopulationExhausted { index, requested, available }] => {
            assert_eq!(*index, 0);
            assert_eq!(*available, 2.0);
            assert!(*requested > 2.0);
        }
        other => panic!("unexpected diagnostics: {other:?}"),
    }
}

#[test]
fn clamp_policy_removes_only_whole_droplets() {
    let layer = vec![droplet(10.0, 2.5), droplet(1000.0, 1e9)];
    let (out, diagnostics) = collide(&layer, 1.0);

    assert_eq!(out[0].dn, -2.0);
    assert_eq!(out[0].dn, out[0].dn.floor());
    assert!(matches!(
        diagnostics.as_slice(),
        [CollisionDiagnostic::PopulationExhausted { index: 0, available, .. }] if *available == 2.5
    ));
    assert_eq!(layer[0].multiplicity + out[0].dn, 0.5);
}

#[test]
fn unbounded_policy_keeps_floored_loss() {
    let layer = exhausted_layer();
    let efficiency = ConstantEfficiency::new(1.0);
    let collider = Collider::new(&layer, Time::from_seconds(1.0), &RogersFallSpeed, &efficiency, 0);
    let mut out = vec![Tendency::default(); 2];
    let diagnostics = collider.calculate(&mut out, PopulationLossPolicy::Unbounded);

    assert_eq!(diagnostics.len(), 1);
    assert!(out[0].dn < -2.0);
    assert_eq!(out[0].dn, out[0].dn.floor());
}
