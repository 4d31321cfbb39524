//! Vertical grid of level boundaries.
//!
//! Layer `i` spans heights `[levels[i], levels[i + 1])`. Heights below the
//! first level or at/above the last one are outside the grid.

use serde::{Deserialize, Serialize};
use units::Length;

use crate::error::{MicrophysicsError, Result};

/// Immutable, non-decreasing sequence of level heights (m).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Grid {
    levels: Vec<f64>,
}

impl Grid {
    /// Grid with no levels. Every collision pass over it is a no-op.
    pub fn empty() -> Self {
        Self { levels: Vec::new() }
    }

    /// Evenly spaced layers starting at the surface.
    ///
    /// # Examples
    ///
    /// ```
    /// use microphysics::Grid;
    /// use units::Length;
    ///
    /// let grid = Grid::uniform(4, Length::from_meters(50.0));
    /// assert_eq!(grid.layer_count(), 4);
    /// assert_eq!(grid.layer_index(120.0), Some(2));
    /// assert_eq!(grid.layer_index(200.0), None);
    /// ```
    ///
    /// # Panics
    ///
    /// If `thickness` is negative or not finite. Use [`Grid::from_levels`]
    /// for levels that come from user input.
    pub fn uniform(layers: usize, thickness: Length) -> Self {
        let dz = thickness.to_meters();
        assert!(
            dz.is_finite() && dz >= 0.0,
            "layer thickness must be finite and non-negative, got {dz} m"
        );
        let levels = (0..=layers).map(|i| i as f64 * dz).collect();
        Self { levels }
    }

    /// Grid from explicit level heights in meters.
    ///
    /// Levels must be finite and non-decreasing. Repeated levels give
    /// zero-thickness layers that never contain a particle.
    pub fn from_levels(levels: Vec<f64>) -> Result<Self> {
        if let Some(bad) = levels.iter().find(|l| !l.is_finite()) {
            return Err(MicrophysicsError::InvalidGrid(format!("level {bad} is not finite")));
        }
        if let Some(i) = levels.windows(2).position(|w| w[1] < w[0]) {
            return Err(MicrophysicsError::InvalidGrid(format!(
                "level {} ({} m) lies below level {} ({} m)",
                i + 1,
                levels[i + 1],
                i,
                levels[i]
            )));
        }
        Ok(Self { levels })
    }

    /// Level heights in ascending order.
    pub fn level_boundaries(&self) -> &[f64] {
        &self.levels
    }

    /// Number of layers between consecutive levels.
    pub fn layer_count(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Layer containing height `z`, or `None` outside the grid.
    pub fn layer_index(&self, z: f64) -> Option<usize> {
        let (first, last) = (*self.levels.first()?, *self.levels.last()?);
        if !(z >= first && z < last) {
            return None;
        }
        // Number of levels at or below z, minus one.
        Some(self.levels.partition_point(|&level| level <= z) - 1)
    }

    /// Lower and upper bound of layer `index`.
    pub fn layer_bounds(&self, index: usize) -> Option<(f64, f64)> {
        let lower = *self.levels.get(index)?;
        let upper = *self.levels.get(index + 1)?;
        Some((lower, upper))
    }
}

impl TryFrom<Vec<f64>> for Grid {
    type Error = MicrophysicsError;

    fn try_from(levels: Vec<f64>) -> Result<Self> {
        Self::from_levels(levels)
    }
}

impl From<Grid> for Vec<f64> {
    fn from(grid: Grid) -> Self {
        grid.levels
    }
}
