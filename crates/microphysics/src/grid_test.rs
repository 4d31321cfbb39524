//! Tests for the vertical grid.

use units::Length;

use crate::error::MicrophysicsError;
use crate::grid::Grid;

// =============================================================================
// Construction
// =============================================================================

#[test]
fn uniform_grid_has_expected_levels() {
    let grid = Grid::uniform(3, Length::from_meters(100.0));
    assert_eq!(grid.level_boundaries(), &[0.0, 100.0, 200.0, 300.0]);
    assert_eq!(grid.layer_count(), 3);
}

#[test]
#[should_panic(expected = "layer thickness")]
fn uniform_grid_rejects_negative_thickness() {
    Grid::uniform(2, Length::from_meters(-10.0));
}

#[test]
fn uniform_grid_levels_pass_validation() {
    let grid = Grid::uniform(5, Length::from_meters(25.0));
    let rebuilt = Grid::from_levels(grid.level_boundaries().to_vec()).unwrap();
    assert_eq!(rebuilt, grid);
}

#[test]
fn empty_grid_has_no_layers() {
    let grid = Grid::empty();
    assert!(grid.is_empty());
    assert_eq!(grid.layer_count(), 0);
    assert_eq!(grid.layer_index(0.0), None);
}

#[test]
fn single_level_has_no_layers() {
    let grid = Grid::from_levels(vec![10.0]).unwrap();
    assert_eq!(grid.layer_count(), 0);
    assert_eq!(grid.layer_index(10.0), None);
}

#[test]
fn decreasing_levels_are_rejected() {
    let err = Grid::from_levels(vec![0.0, 50.0, 40.0]).unwrap_err();
    assert!(matches!(err, MicrophysicsError::InvalidGrid(_)));
}

#[test]
fn non_finite_levels_are_rejected() {
    assert!(Grid::from_levels(vec![0.0, f64::NAN]).is_err());
    assert!(Grid::from_levels(vec![0.0, f64::INFINITY]).is_err());
}

#[test]
fn deserializing_validates_levels() {
    let grid: Grid = serde_json::from_str("[0.0, 25.0, 50.0]").unwrap();
    assert_eq!(grid.layer_count(), 2);
    assert!(serde_json::from_str::<Grid>("[5.0, 1.0]").is_err());
}

// =============================================================================
// Layer lookup
// =============================================================================

#[test]
fn layer_index_uses_half_open_layers() {
    let grid = Grid::uniform(4, Length::from_meters(10.0));
    assert_eq!(grid.layer_index(0.0), Some(0));
    assert_eq!(grid.layer_index(9.999), Some(0));
    assert_eq!(grid.layer_index(10.0), Some(1));
    assert_eq!(grid.layer_index(39.9), Some(3));
}

#[test]
fn layer_index_outside_grid_is_none() {
    let grid = Grid::uniform(4, Length::from_meters(10.0));
    assert_eq!(grid.layer_index(-0.1), None);
    assert_eq!(grid.layer_index(40.0), None);
    assert_eq!(grid.layer_index(f64::NAN), None);
}

#[test]
fn repeated_levels_skip_empty_layer() {
    let grid = Grid::from_levels(vec![0.0, 10.0, 10.0, 20.0]).unwrap();
    assert_eq!(grid.layer_count(), 3);
    assert_eq!(grid.layer_index(10.0), Some(2));
    assert_eq!(grid.layer_index(5.0), Some(0));
}

#[test]
fn layer_bounds_match_levels() {
    let grid = Grid::from_levels(vec![0.0, 30.0, 75.0]).unwrap();
    assert_eq!(grid.layer_bounds(1), Some((30.0, 75.0)));
    assert_eq!(grid.layer_bounds(2), None);
}
