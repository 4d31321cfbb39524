//! Grouping of superparticles by layer.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::superparticle::Superparticle;

/// A superparticle together with its position in the ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexedSuperparticle {
    pub index: usize,
    pub superparticle: Superparticle,
}

/// Nucleated superparticles of each layer, smallest radius first.
///
/// The ensemble may be in any order. Haze particles and particles outside
/// the grid are left out. Equal radii keep their ensemble order.
///
/// # Examples
///
/// ```
/// use microphysics::partition::partition_layers;
/// use microphysics::{Grid, Superparticle};
/// use units::Length;
///
/// let grid = Grid::uniform(2, Length::from_meters(10.0));
/// let ensemble = [
///     Superparticle::from_radius(15.0, Length::from_microns(20.0), 10.0, Length::zero()),
///     Superparticle::from_radius(5.0, Length::from_microns(30.0), 10.0, Length::zero()),
///     Superparticle::from_radius(6.0, Length::from_microns(10.0), 10.0, Length::zero()),
/// ];
///
/// let layers = partition_layers(&ensemble, &grid);
/// let lower: Vec<usize> = layers[0].iter().map(|p| p.index).collect();
/// assert_eq!(lower, vec![2, 1]);
/// assert_eq!(layers[1].len(), 1);
/// ```
pub fn partition_layers(
    superparticles: &[Superparticle],
    grid: &Grid,
) -> Vec<Vec<IndexedSuperparticle>> {
    let mut layers = vec![Vec::new(); grid.layer_count()];
    for (index, &superparticle) in superparticles.iter().enumerate() {
        if !superparticle.is_nucleated {
            continue;
        }
        if let Some(layer) = grid.layer_index(superparticle.z) {
            layers[layer].push(IndexedSuperparticle { index, superparticle });
        }
    }

    for layer in &mut layers {
        layer.sort_by(|a, b| {
            a.superparticle
                .radius()
                .to_meters()
                .total_cmp(&b.superparticle.radius().to_meters())
        });
    }
    layers
}

/// Number of nucleated superparticles in each layer.
pub fn layer_populations(superparticles: &[Superparticle], grid: &Grid) -> Vec<usize> {
    partition_layers(superparticles, grid).iter().map(Vec::len).collect()
}
