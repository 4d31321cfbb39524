//! Collision efficiencies.
//!
//! # Physics
//!
//! Not every geometric encounter between a collector drop of radius `R` and
//! a smaller droplet of radius `r` ends in coalescence: the small droplet is
//! partly swept around the collector by the flow. The collision efficiency
//! `E(R, r/R)` is the fraction of encounters that do collide.
//!
//! [`HallEfficiencyTable`] holds the values tabulated by Hall (1980) for
//! collector radii of 6–300 µm and radius ratios 0–1 in steps of 0.05.
//!
//! # References
//!
//! - Hall (1980) - A detailed microphysical model within a two-dimensional
//!   dynamic framework, J. Atmos. Sci. 37
//! - Bott (1998) - A flux method for the numerical solution of the
//!   stochastic collection equation

use crate::error::{MicrophysicsError, Result};

/// Provider of collision efficiencies.
///
/// Implementations must be deterministic and return values in `[0, 1]`.
pub trait CollisionEfficiency: Send + Sync {
    /// Efficiency for a collector of `radius_um` micrometers and a collected
    /// droplet `ratio` times its size.
    fn collision_efficiency(&self, radius_um: f64, ratio: f64) -> f64;
}

/// Collector radii of the Hall table (µm)
const HALL_RADII_UM: [f64; 15] = [
    6.0, 8.0, 10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0, 60.0, 70.0, 100.0, 150.0, 200.0, 300.0,
];

/// One row per radius ratio 0.00, 0.05, ..., 1.00; one column per collector radius.
#[rustfmt::skip]
const HALL_EFFICIENCIES: [[f64; 15]; 21] = [
    [0.001, 0.001, 0.001, 0.001, 0.001, 0.001, 0.001, 0.001, 0.001, 0.001, 0.001, 0.001, 0.001, 0.001, 0.001],
    [0.003, 0.003, 0.003, 0.004, 0.005, 0.005, 0.005, 0.010, 0.100, 0.050, 0.200, 0.500, 0.770, 0.870, 0.970],
    [0.007, 0.007, 0.007, 0.008, 0.009, 0.010, 0.010, 0.070, 0.400, 0.430, 0.580, 0.790, 0.930, 0.960, 1.000],
    [0.009, 0.009, 0.009, 0.012, 0.015, 0.010, 0.020, 0.280, 0.600, 0.640, 0.750, 0.910, 0.970, 0.980, 1.000],
    [0.014, 0.014, 0.014, 0.015, 0.016, 0.030, 0.060, 0.500, 0.700, 0.770, 0.840, 0.950, 0.970, 1.000, 1.000],
    [0.017, 0.017, 0.017, 0.020, 0.022, 0.060, 0.100, 0.620, 0.780, 0.840, 0.880, 0.950, 1.000, 1.000, 1.000],
    [0.030, 0.030, 0.024, 0.022, 0.032, 0.062, 0.200, 0.680, 0.830, 0.870, 0.900, 0.950, 1.000, 1.000, 1.000],
    [0.025, 0.025, 0.025, 0.036, 0.043, 0.130, 0.270, 0.740, 0.860, 0.890, 0.920, 1.000, 1.000, 1.000, 1.000],
    [0.027, 0.027, 0.027, 0.040, 0.052, 0.200, 0.400, 0.780, 0.880, 0.900, 0.940, 1.000, 1.000, 1.000, 1.000],
    [0.030, 0.030, 0.030, 0.047, 0.064, 0.250, 0.500, 0.800, 0.900, 0.910, 0.950, 1.000, 1.000, 1.000, 1.000],
    [0.040, 0.040, 0.033, 0.037, 0.068, 0.240, 0.550, 0.800, 0.900, 0.910, 0.950, 1.000, 1.000, 1.000, 1.000],
    [0.035, 0.035, 0.035, 0.055, 0.079, 0.290, 0.580, 0.800, 0.900, 0.910, 0.950, 1.000, 1.000, 1.000, 1.000],
    [0.037, 0.037, 0.037, 0.062, 0.082, 0.290, 0.590, 0.780, 0.900, 0.910, 0.950, 1.000, 1.000, 1.000, 1.000],
    [0.037, 0.037, 0.037, 0.060, 0.080, 0.290, 0.580, 0.770, 0.890, 0.910, 0.950, 1.000, 1.000, 1.000, 1.000],
    [0.037, 0.037, 0.037, 0.041, 0.075, 0.250, 0.540, 0.760, 0.880, 0.920, 0.950, 1.000, 1.000, 1.000, 1.000],
    [0.037, 0.037, 0.037, 0.052, 0.067, 0.250, 0.510, 0.770, 0.880, 0.930, 0.970, 1.000, 1.000, 1.000, 1.000],
    [0.037, 0.037, 0.037, 0.047, 0.057, 0.250, 0.490, 0.770, 0.890, 0.950, 1.000, 1.000, 1.000, 1.000, 1.000],
    [0.036, 0.036, 0.036, 0.042, 0.048, 0.230, 0.470, 0.780, 0.920, 1.000, 1.020, 1.020, 1.020, 1.020, 1.020],
    [0.040, 0.040, 0.035, 0.033, 0.040, 0.112, 0.450, 0.790, 1.010, 1.030, 1.040, 1.040, 1.040, 1.040, 1.040],
    [0.033, 0.033, 0.033, 0.033, 0.033, 0.119, 0.470, 0.950, 1.300, 1.700, 2.300, 2.300, 2.300, 2.300, 2.300],
    [0.027, 0.027, 0.027, 0.027, 0.027, 0.125, 0.520, 1.400, 2.300, 3.000, 4.000, 4.000, 4.000, 4.000, 4.000],
];

/// Tabulated efficiencies with bilinear interpolation.
///
/// Inputs outside the table are clamped to its edges and the result is
/// clamped to `[0, 1]`, which cuts off the wake-capture values above one
/// that Hall lists for near-equal sizes.
///
/// # Examples
///
/// ```
/// use microphysics::efficiency::{CollisionEfficiency, HallEfficiencyTable};
///
/// let table = HallEfficiencyTable::default();
/// assert!((table.collision_efficiency(50.0, 0.5) - 0.9).abs() < 1e-12);
/// assert_eq!(table.collision_efficiency(300.0, 1.0), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HallEfficiencyTable {
    radii_um: Vec<f64>,
    ratios: Vec<f64>,
    /// `values[ratio][radius]`
    values: Vec<Vec<f64>>,
}

impl Default for HallEfficiencyTable {
    fn default() -> Self {
        Self {
            radii_um: HALL_RADII_UM.to_vec(),
            ratios: (0..HALL_EFFICIENCIES.len()).map(|i| i as f64 / 20.0).collect(),
            values: HALL_EFFICIENCIES.iter().map(|row| row.to_vec()).collect(),
        }
    }
}

impl HallEfficiencyTable {
    /// Build a table from custom axes.
    ///
    /// # Arguments
    ///
    /// * `radii_um` - Strictly increasing collector radii in µm
    /// * `ratios` - Strictly increasing radius ratios
    /// * `values` - One row per ratio, each with one value per radius
    pub fn from_parts(radii_um: Vec<f64>, ratios: Vec<f64>, values: Vec<Vec<f64>>) -> Result<Self> {
        validate_axis("radius", &radii_um)?;
        validate_axis("ratio", &ratios)?;
        if values.len() != ratios.len() {
            return Err(MicrophysicsError::InvalidEfficiencyTable(format!(
                "{} rows for {} ratios",
                values.len(),
                ratios.len()
            )));
        }
        if let Some((i, row)) = values
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != radii_um.len())
        {
            return Err(MicrophysicsError::InvalidEfficiencyTable(format!(
                "row {i} has {} values for {} radii",
                row.len(),
                radii_um.len()
            )));
        }
        if values.iter().flatten().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(MicrophysicsError::InvalidEfficiencyTable(
                "efficiencies must be finite and non-negative".to_string(),
            ));
        }
        Ok(Self { radii_um, ratios, values })
    }

    pub fn radii_um(&self) -> &[f64] {
        &self.radii_um
    }

    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    /// Raw tabulated value, not clamped.
    pub fn value(&self, ratio_index: usize, radius_index: usize) -> Option<f64> {
        self.values.get(ratio_index)?.get(radius_index).copied()
    }
}

impl CollisionEfficiency for HallEfficiencyTable {
    fn collision_efficiency(&self, radius_um: f64, ratio: f64) -> f64 {
        let (i, ti) = bracket(&self.ratios, ratio);
        let (j, tj) = bracket(&self.radii_um, radius_um);

        let lower = lerp(self.values[i][j], self.values[i][j + 1], tj);
        let upper = lerp(self.values[i + 1][j], self.values[i + 1][j + 1], tj);
        lerp(lower, upper, ti).clamp(0.0, 1.0)
    }
}

/// Same efficiency for every pair.
///
/// Used to isolate the kernel geometry from the efficiency table in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantEfficiency(f64);

impl ConstantEfficiency {
    /// Constant efficiency, clamped to `[0, 1]`.
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl CollisionEfficiency for ConstantEfficiency {
    fn collision_efficiency(&self, _radius_um: f64, _ratio: f64) -> f64 {
        self.0
    }
}

fn validate_axis(name: &str, axis: &[f64]) -> Result<()> {
    if axis.len() < 2 {
        return Err(MicrophysicsError::InvalidEfficiencyTable(format!(
            "{name} axis needs at least two points"
        )));
    }
    if axis.iter().any(|v| !v.is_finite()) || axis.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MicrophysicsError::InvalidEfficiencyTable(format!(
            "{name} axis must be finite and strictly increasing"
        )));
    }
    Ok(())
}

/// Lower cell index and fractional position of `x` on `axis`, clamped.
fn bracket(axis: &[f64], x: f64) -> (usize, f64) {
    let last = axis.len() - 1;
    let x = x.clamp(axis[0], axis[last]);
    let i = axis.partition_point(|&a| a <= x).saturating_sub(1).min(last - 1);
    let t = (x - axis[i]) / (axis[i + 1] - axis[i]);
    (i, t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
