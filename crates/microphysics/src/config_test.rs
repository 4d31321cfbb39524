//! Tests for collision configuration.

use units::{Length, Time};

use crate::Superparticle;
use crate::collisions::PopulationLossPolicy;
use crate::config::{CollisionConfig, EfficiencySource, SchemeKind};
use crate::error::MicrophysicsError;
use crate::grid::Grid;

#[test]
fn default_config_selects_hall_table() {
    let config = CollisionConfig::default();
    assert_eq!(config.scheme, SchemeKind::Hall);
    assert_eq!(config.efficiency, EfficiencySource::HallTable);
    assert!(!config.parallel_layers);
    assert_eq!(config.population_loss, PopulationLossPolicy::Clamp);
}

#[test]
fn missing_fields_take_defaults() {
    let config: CollisionConfig = serde_json::from_str(r#"{ "parallelLayers": true }"#).unwrap();
    assert!(config.parallel_layers);
    assert_eq!(config.scheme, SchemeKind::Hall);
}

#[test]
fn parses_full_config() {
    let json = r#"{
        "scheme": "hall",
        "efficiency": { "kind": "constant", "value": 0.8 },
        "parallelLayers": false,
        "populationLoss": "unbounded"
    }"#;
    let config: CollisionConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.efficiency, EfficiencySource::Constant { value: 0.8 });
    assert_eq!(config.population_loss, PopulationLossPolicy::Unbounded);
}

#[test]
fn disabled_config_builds_no_collisions() {
    let scheme = CollisionConfig::disabled().build_scheme().unwrap();
    assert_eq!(scheme.name(), "none");
    assert!(!scheme.needs_sorted_superparticles());
}

#[test]
fn constant_efficiency_out_of_range_is_rejected() {
    let config = CollisionConfig {
        efficiency: EfficiencySource::Constant { value: 1.5 },
        ..CollisionConfig::default()
    };
    assert!(matches!(config.validate(), Err(MicrophysicsError::InvalidConfig(_))));
    assert!(config.build_scheme().is_err());

    let nan = CollisionConfig {
        efficiency: EfficiencySource::Constant { value: f64::NAN },
        ..CollisionConfig::default()
    };
    assert!(nan.validate().is_err());
}

#[test]
fn zero_efficiency_scheme_produces_no_collisions() {
    let config = CollisionConfig {
        efficiency: EfficiencySource::Constant { value: 0.0 },
        ..CollisionConfig::default()
    };
    let scheme = config.build_scheme().unwrap();
    let grid = Grid::uniform(1, Length::from_meters(100.0));
    let ensemble = vec![
        Superparticle::from_radius(10.0, Length::from_microns(10.0), 1000.0, Length::zero()),
        Superparticle::from_radius(20.0, Length::from_microns(30.0), 100.0, Length::zero()),
    ];
    let report = scheme.collide(&ensemble, &grid, Time::from_seconds(1.0));
    // No droplets lost, only the volume bookkeeping remains
    assert_eq!(report.tendencies[0].dn, 0.0);
    assert_eq!(report.tendencies[1].dn, 0.0);
}
