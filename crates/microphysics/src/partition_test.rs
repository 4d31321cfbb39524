//! Tests for the layer partitioner.

use units::Length;

use crate::Superparticle;
use crate::grid::Grid;
use crate::partition::{layer_populations, partition_layers};

fn droplet(z: f64, radius_um: f64) -> Superparticle {
    Superparticle::from_radius(z, Length::from_microns(radius_um), 100.0, Length::zero())
}

#[test]
fn groups_by_layer_and_sorts_by_radius() {
    let grid = Grid::uniform(3, Length::from_meters(10.0));
    let ensemble = vec![
        droplet(25.0, 12.0),
        droplet(3.0, 30.0),
        droplet(8.0, 5.0),
        droplet(21.0, 4.0),
        droplet(4.0, 18.0),
    ];

    let layers = partition_layers(&ensemble, &grid);
    assert_eq!(layers.len(), 3);

    let indices: Vec<Vec<usize>> = layers
        .iter()
        .map(|l| l.iter().map(|p| p.index).collect())
        .collect();
    assert_eq!(indices, vec![vec![2, 4, 1], vec![], vec![3, 0]]);
    assert_eq!(layers[2][1].superparticle, ensemble[0]);
}

#[test]
fn haze_particles_are_excluded() {
    let grid = Grid::uniform(1, Length::from_meters(10.0));
    let ensemble = vec![
        Superparticle::haze(1.0, 1e6, Length::from_microns(0.1)),
        droplet(2.0, 10.0),
    ];
    let layers = partition_layers(&ensemble, &grid);
    assert_eq!(layers[0].len(), 1);
    assert_eq!(layers[0][0].index, 1);
}

#[test]
fn particles_outside_grid_are_excluded() {
    let grid = Grid::uniform(2, Length::from_meters(10.0));
    let ensemble = vec![droplet(-1.0, 10.0), droplet(20.0, 10.0), droplet(19.0, 10.0)];
    assert_eq!(layer_populations(&ensemble, &grid), vec![0, 1]);
}

#[test]
fn equal_radii_keep_ensemble_order() {
    let grid = Grid::uniform(1, Length::from_meters(10.0));
    let ensemble = vec![
        droplet(1.0, 10.0),
        droplet(2.0, 5.0),
        droplet(3.0, 10.0),
        droplet(4.0, 10.0),
    ];

    let first = partition_layers(&ensemble, &grid);
    let second = partition_layers(&ensemble, &grid);
    let indices: Vec<usize> = first[0].iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![1, 0, 2, 3]);
    assert_eq!(first, second);
}

#[test]
fn empty_grid_has_no_layers() {
    let ensemble = vec![droplet(1.0, 10.0)];
    assert!(partition_layers(&ensemble, &Grid::empty()).is_empty());
}
