//! Integration tests for the collision pass over whole columns.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use units::{Length, Time};

use microphysics::collisions::{CollisionScheme, HallCollisions, NoCollisions};
use microphysics::config::{CollisionConfig, EfficiencySource};
use microphysics::driver::RainColumn;
use microphysics::efficiency::ConstantEfficiency;
use microphysics::ensemble::{EnsembleConfig, seed_ensemble, sort_by_height, total_multiplicity};
use microphysics::partition::partition_layers;
use microphysics::sedimentation::RogersFallSpeed;
use microphysics::{Grid, Superparticle};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn droplet(z: f64, radius_um: f64, multiplicity: f64) -> Superparticle {
    Superparticle::from_radius(z, Length::from_microns(radius_um), multiplicity, Length::zero())
}

fn seeded_column(seed: u64) -> (Grid, Vec<Superparticle>) {
    let grid = Grid::uniform(12, Length::from_meters(25.0));
    let config = EnsembleConfig {
        count: 240,
        multiplicity: 5e3,
        nucleated_fraction: 0.8,
        ..EnsembleConfig::default()
    };
    let ensemble = seed_ensemble(&config, &grid, &mut ChaChaRng::seed_from_u64(seed)).unwrap();
    (grid, ensemble)
}

// =============================================================================
// Reference scenario
// =============================================================================

#[test]
fn three_droplet_scenario() {
    init_logger();
    let grid = Grid::uniform(1, Length::from_meters(100.0));
    let scheme = HallCollisions::new(RogersFallSpeed, ConstantEfficiency::new(1.0));
    let dt = Time::from_seconds(1.0);

    let ensemble = vec![
        droplet(10.0, 10.0, 1000.0),
        droplet(20.0, 20.0, 500.0),
        droplet(30.0, 30.0, 100.0),
    ];
    let report = scheme.collide(&ensemble, &grid, dt);
    assert_eq!(report.len(), 3);
    assert!(report.tendencies[0].dn <= 0.0);
    assert!(report.tendencies[1].dn <= 0.0);
    assert_eq!(report.tendencies[2].dn, 0.0);
    assert!(report.tendencies[2].dqc >= 0.0);

    let alone = scheme.collide(&ensemble[..1], &grid, dt);
    assert_eq!(alone.len(), 1);
    assert!(alone.tendencies[0].is_zero());
}

// =============================================================================
// Whole-column properties
// =============================================================================

#[test]
fn tendencies_respect_per_layer_rules() {
    init_logger();
    let (grid, ensemble) = seeded_column(42);
    let scheme: HallCollisions = HallCollisions::default();
    let report = scheme.collide(&ensemble, &grid, Time::from_seconds(1.0));

    assert_eq!(report.len(), ensemble.len());
    for layer in partition_layers(&ensemble, &grid) {
        match layer.as_slice() {
            [] => {}
            [single] => assert!(report.tendencies[single.index].is_zero()),
            [smaller @ .., largest] => {
                assert_eq!(report.tendencies[largest.index].dn, 0.0);
                for p in smaller {
                    assert!(report.tendencies[p.index].dn <= 0.0);
                }
            }
        }
    }
    for (sp, t) in ensemble.iter().zip(&report.tendencies) {
        if !sp.is_nucleated {
            assert!(t.is_zero());
        }
    }
}

#[test]
fn parallel_and_sequential_passes_agree() {
    init_logger();
    let (grid, ensemble) = seeded_column(7);
    let sequential: HallCollisions = HallCollisions::default();
    let parallel = sequential.clone().with_parallel_layers(true);

    let dt = Time::from_seconds(5.0);
    assert_eq!(sequential.collide(&ensemble, &grid, dt), parallel.collide(&ensemble, &grid, dt));
}

#[test]
fn seeded_runs_are_reproducible() {
    init_logger();
    let run = || {
        let (grid, ensemble) = seeded_column(123);
        let scheme = CollisionConfig::default().build_scheme().unwrap();
        let mut column = RainColumn::new(grid, ensemble, scheme);
        column.run(Time::from_seconds(1.0), 20).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn droplet_count_never_grows() {
    init_logger();
    let (grid, ensemble) = seeded_column(99);
    let initial = total_multiplicity(&ensemble);
    let config = CollisionConfig {
        efficiency: EfficiencySource::Constant { value: 1.0 },
        ..CollisionConfig::default()
    };
    let mut column = RainColumn::new(grid, ensemble, config.build_scheme().unwrap());

    let history = column.run(Time::from_seconds(2.0), 15).unwrap();
    let mut previous = initial;
    for summary in &history {
        assert!(summary.total_multiplicity <= previous);
        previous = summary.total_multiplicity;
    }
}

#[test]
fn unsorted_input_is_sorted_by_driver_only() {
    init_logger();
    let (grid, mut ensemble) = seeded_column(5);
    ensemble.reverse();

    let mut sorted = ensemble.clone();
    sort_by_height(&mut sorted);
    let scheme: HallCollisions = HallCollisions::default();
    let expected = scheme.collide(&sorted, &grid, Time::from_seconds(1.0));

    let mut column = RainColumn::new(grid, ensemble, Box::new(scheme));
    let report = column.step(Time::from_seconds(1.0)).unwrap();
    assert_eq!(report, expected);
}

#[test]
fn no_collisions_leave_column_unchanged() {
    init_logger();
    let (grid, ensemble) = seeded_column(11);
    let mut column = RainColumn::new(grid, ensemble.clone(), Box::new(NoCollisions));
    column.run(Time::from_seconds(1.0), 3).unwrap();
    assert_eq!(column.superparticles(), ensemble.as_slice());
}
