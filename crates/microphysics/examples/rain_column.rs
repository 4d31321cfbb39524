//! Collision-only evolution of a seeded rain column.
//!
//! Run with `RUST_LOG=debug` to see per-step scheme summaries.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use units::{Length, Time};

use microphysics::config::CollisionConfig;
use microphysics::driver::RainColumn;
use microphysics::ensemble::{EnsembleConfig, seed_ensemble};
use microphysics::partition::layer_populations;
use microphysics::{Grid, Result};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let grid = Grid::uniform(40, Length::from_meters(25.0));
    let ensemble_config = EnsembleConfig {
        count: 2_000,
        multiplicity: 1e5,
        min_radius_um: 4.0,
        max_radius_um: 45.0,
        ..EnsembleConfig::default()
    };
    let mut rng = ChaChaRng::seed_from_u64(42);
    let ensemble = seed_ensemble(&ensemble_config, &grid, &mut rng)?;
    log::info!("populations per layer: {:?}", layer_populations(&ensemble, &grid));

    let config = CollisionConfig {
        parallel_layers: true,
        ..CollisionConfig::default()
    };
    let mut column = RainColumn::new(grid, ensemble, config.build_scheme()?);

    println!(
        "{:>8} {:>14} {:>16} {:>10} {:>14} {:>12}",
        "t (s)", "qc total", "droplets", "nucleated", "mean m (µg)", "diagnostics"
    );
    for summary in column.run(Time::from_seconds(1.0), 60)? {
        println!(
            "{:>8.1} {:>14.6e} {:>16.6e} {:>10} {:>14.4e} {:>12}",
            summary.time,
            summary.total_water,
            summary.total_multiplicity,
            summary.nucleated,
            summary.mean_droplet_mass_ug,
            summary.diagnostics
        );
    }
    Ok(())
}
