//! WASM bindings for the superparticle collision engine.
//!
//! This crate exposes the collision pass, the fall speed law and the Hall
//! efficiency table to JavaScript/TypeScript.
//!
//! # Architecture
//!
//! Stateless functions (`collision_pass`, `fall_speed`, ...) take and return
//! plain objects. Evolving columns are kept in thread-local storage (WASM is
//! single-threaded) and referenced by opaque IDs.
//!
//! # Example Usage (JavaScript)
//!
//! ```javascript
//! // One collision pass over a caller-owned ensemble
//! const { tendencies, diagnostics, order } = collision_pass({
//!   superparticles: [
//!     { z: 10, qc: 3.4e-9, multiplicity: 1000, dryRadius: 0, isNucleated: true },
//!     { z: 20, qc: 9.2e-9, multiplicity: 100, dryRadius: 0, isNucleated: true },
//!   ],
//!   levels: [0, 100],
//!   dtSeconds: 1.0,
//!   config: { scheme: "hall" },
//! });
//!
//! // A seeded column evolved inside WASM
//! const columnId = column_create([0, 50, 100, 150], { count: 100 }, 42, {});
//! const history = column_run(columnId, 1.0, 30);
//! column_delete(columnId);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use microphysics::collisions::Tendency;
use microphysics::config::CollisionConfig;
use microphysics::driver::{RainColumn, StepSummary};
use microphysics::efficiency::{CollisionEfficiency, HallEfficiencyTable};
use microphysics::ensemble::{EnsembleConfig, height_order, seed_ensemble};
use microphysics::sedimentation::{FallSpeed, RogersFallSpeed};
use microphysics::{Grid, MicrophysicsError, Superparticle};
use units::{Length, Time};

// =============================================================================
// Serialization helpers
// =============================================================================

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&e.to_string()))
}

/// Config objects may be omitted on the JavaScript side.
fn from_js_or_default<T: serde::de::DeserializeOwned + Default>(
    value: JsValue,
) -> Result<T, JsError> {
    if value.is_undefined() || value.is_null() {
        Ok(T::default())
    } else {
        from_js(value)
    }
}

fn js_error(error: MicrophysicsError) -> JsError {
    JsError::new(&error.to_string())
}

// =============================================================================
// Thread-local storage for columns
// =============================================================================

thread_local! {
    static COLUMNS: RefCell<HashMap<u32, RainColumn>> = RefCell::new(HashMap::new());
    static NEXT_COLUMN_ID: RefCell<u32> = const { RefCell::new(0) };
    static HALL_TABLE: HallEfficiencyTable = HallEfficiencyTable::default();
}

fn with_column<T>(
    column_id: u32,
    f: impl FnOnce(&mut RainColumn) -> Result<T, JsError>,
) -> Result<T, JsError> {
    COLUMNS.with(|columns| {
        let mut columns = columns.borrow_mut();
        let column = columns
            .get_mut(&column_id)
            .ok_or_else(|| JsError::new(&format!("Column {} not found", column_id)))?;
        f(column)
    })
}

// =============================================================================
// Serializable types for JavaScript interop
// =============================================================================

/// Input of a single collision pass
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionPassInput {
    /// Ensemble in any order
    pub superparticles: Vec<Superparticle>,
    /// Level heights in meters, non-decreasing
    pub levels: Vec<f64>,
    /// Timestep in seconds
    pub dt_seconds: f64,
    /// Scheme configuration, defaults to Hall collisions
    #[serde(default)]
    pub config: CollisionConfig,
}

/// Result of a single collision pass
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionPassOutput {
    /// Tendencies in processing order
    pub tendencies: Vec<Tendency>,
    /// Human-readable diagnostics
    pub diagnostics: Vec<String>,
    /// `order[k]` is the input index of `tendencies[k]`
    pub order: Vec<usize>,
}

/// Column state snapshot for JavaScript
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSnapshot {
    /// Simulated time in seconds
    pub time: f64,
    /// Name of the collision scheme
    pub scheme: String,
    /// Level heights in meters
    pub levels: Vec<f64>,
    pub superparticles: Vec<Superparticle>,
}

// =============================================================================
// Stateless functions
// =============================================================================

/// Run one collision pass without keeping any state.
///
/// When the configured scheme needs height-sorted input the ensemble is
/// sorted first; `order` maps each output position back to the input.
#[wasm_bindgen]
pub fn collision_pass(input: JsValue) -> Result<JsValue, JsError> {
    let input: CollisionPassInput = from_js(input)?;
    let grid = Grid::from_levels(input.levels).map_err(js_error)?;
    if !(input.dt_seconds.is_finite() && input.dt_seconds > 0.0) {
        return Err(js_error(MicrophysicsError::InvalidTimestep(input.dt_seconds)));
    }
    let scheme = input.config.build_scheme().map_err(js_error)?;

    let order: Vec<usize> = if scheme.needs_sorted_superparticles() {
        height_order(&input.superparticles)
    } else {
        (0..input.superparticles.len()).collect()
    };
    let ensemble: Vec<Superparticle> = order.iter().map(|&i| input.superparticles[i]).collect();

    let report = scheme.collide(&ensemble, &grid, Time::from_seconds(input.dt_seconds));
    let output = CollisionPassOutput {
        diagnostics: report.diagnostics.iter().map(ToString::to_string).collect(),
        tendencies: report.tendencies,
        order,
    };
    to_js(&output)
}

/// Terminal fall speed in m/s for a droplet radius in µm.
#[wasm_bindgen]
pub fn fall_speed(radius_um: f64) -> f64 {
    RogersFallSpeed
        .fall_speed(Length::from_microns(radius_um))
        .to_meters_per_sec()
}

/// Hall collision efficiency for a collector radius in µm and a radius ratio.
#[wasm_bindgen]
pub fn hall_efficiency(radius_um: f64, ratio: f64) -> f64 {
    HALL_TABLE.with(|table| table.collision_efficiency(radius_um, ratio))
}

/// Layer containing height `z`, or -1 outside the grid.
#[wasm_bindgen]
pub fn grid_layer_index(levels: Vec<f64>, z: f64) -> Result<i32, JsError> {
    let grid = Grid::from_levels(levels).map_err(js_error)?;
    Ok(grid.layer_index(z).map_or(-1, |i| i as i32))
}

// =============================================================================
// Column management
// =============================================================================

/// Create a column with a randomly seeded ensemble.
///
/// # Arguments
/// * `levels` - Level heights in meters
/// * `ensemble` - Ensemble configuration object (missing fields use defaults)
/// * `seed` - Random seed
/// * `config` - Collision configuration object
///
/// # Returns
/// A column ID for use with the other `column_*` functions
#[wasm_bindgen]
pub fn column_create(
    levels: Vec<f64>,
    ensemble: JsValue,
    seed: u32,
    config: JsValue,
) -> Result<u32, JsError> {
    let ensemble_config: EnsembleConfig = from_js_or_default(ensemble)?;
    let config: CollisionConfig = from_js_or_default(config)?;

    let grid = Grid::from_levels(levels).map_err(js_error)?;
    let mut rng = ChaChaRng::seed_from_u64(u64::from(seed));
    let superparticles = seed_ensemble(&ensemble_config, &grid, &mut rng).map_err(js_error)?;
    let scheme = config.build_scheme().map_err(js_error)?;
    let column = RainColumn::new(grid, superparticles, scheme);

    let id = NEXT_COLUMN_ID.with(|next_id| {
        let mut id = next_id.borrow_mut();
        let current = *id;
        *id += 1;
        current
    });

    COLUMNS.with(|columns| {
        columns.borrow_mut().insert(id, column);
    });
    log::debug!("created column {id}");

    Ok(id)
}

/// Delete a column to free memory.
#[wasm_bindgen]
pub fn column_delete(column_id: u32) {
    COLUMNS.with(|columns| {
        columns.borrow_mut().remove(&column_id);
    });
}

/// Advance a column by one collision step.
///
/// # Returns
/// Diagnostics raised during the step, as strings
#[wasm_bindgen]
pub fn column_step(column_id: u32, dt_seconds: f64) -> Result<JsValue, JsError> {
    with_column(column_id, |column| {
        let report = column.step(Time::from_seconds(dt_seconds)).map_err(js_error)?;
        let messages: Vec<String> = report.diagnostics.iter().map(ToString::to_string).collect();
        to_js(&messages)
    })
}

/// Advance a column by `steps` collision steps.
///
/// # Returns
/// One summary (time, totalWater, totalMultiplicity, nucleated, diagnostics) per step
#[wasm_bindgen]
pub fn column_run(column_id: u32, dt_seconds: f64, steps: u32) -> Result<JsValue, JsError> {
    with_column(column_id, |column| {
        let history: Vec<StepSummary> = column
            .run(Time::from_seconds(dt_seconds), steps as usize)
            .map_err(js_error)?;
        to_js(&history)
    })
}

/// Get the full state of a column.
#[wasm_bindgen]
pub fn column_snapshot(column_id: u32) -> Result<JsValue, JsError> {
    with_column(column_id, |column| {
        let snapshot = ColumnSnapshot {
            time: column.time().to_seconds(),
            scheme: column.scheme().name().to_string(),
            levels: column.grid().level_boundaries().to_vec(),
            superparticles: column.superparticles().to_vec(),
        };
        to_js(&snapshot)
    })
}

/// Number of columns currently stored.
#[wasm_bindgen]
pub fn column_count() -> u32 {
    COLUMNS.with(|columns| columns.borrow().len() as u32)
}
