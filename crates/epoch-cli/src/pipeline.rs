// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Pipeline
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Validate, sample, write, and optionally plot one run.

use epoch_core::particles::{summarize, BatchSummary};
use epoch_core::preview::preview;
use epoch_core::profiles::build_field;
use epoch_core::progress::{LogProgress, NoProgress, ProgressSink};
use epoch_core::sampler::GridSampler;
use epoch_io::particle_files::write_particle_files;
use epoch_io::plot::plot_distribution;
use epoch_types::config::RunConfig;
use epoch_types::error::{EpochError, EpochResult};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: BatchSummary,
    pub files: Vec<PathBuf>,
    pub plot: Option<PathBuf>,
}

/// Execute a full generation run.
///
/// The configuration is validated before any sampling or file output.
pub fn run(config: &RunConfig) -> EpochResult<RunReport> {
    config.validate()?;
    match config.dimensions {
        1 => run_dim::<1>(config),
        2 => run_dim::<2>(config),
        3 => run_dim::<3>(config),
        d => Err(EpochError::ConfigError(format!(
            "dimensions must be 1, 2 or 3, got {d}"
        ))),
    }
}

fn run_dim<const D: usize>(config: &RunConfig) -> EpochResult<RunReport> {
    info!("Generating {D}D particle distribution.");
    let grid = config.grid::<D>()?;
    let spec = config.field_spec();
    debug!("Density field: {spec:?}");
    let field = build_field::<D>(&spec)?;

    let mut sampler = GridSampler::new(config.particles_per_cell)?
        .with_threshold(config.density_threshold)?;
    if let Some(seed) = config.seed {
        sampler = sampler.with_seed(seed);
    }

    let mut progress: Box<dyn ProgressSink> = if config.progress {
        Box::new(LogProgress::default())
    } else {
        Box::new(NoProgress)
    };
    let batch = sampler.sample_with_progress(&grid, field.as_ref(), progress.as_mut())?;
    let summary = summarize(&batch);
    if batch.is_empty() {
        warn!("No cell reached nmin = {:e}; output files are empty.", config.density_threshold);
    }

    let files = write_particle_files(&batch, &config.output_dir)?;

    let plot = if !config.plot {
        None
    } else if D > 2 {
        warn!("Visualisation not currently implemented for {D}D.");
        None
    } else {
        let lattice = preview(&grid, field.as_ref(), config.preview_resolution::<D>())?;
        match plot_distribution(&lattice, &batch, &config.output_dir) {
            Ok(path) => Some(path),
            Err(EpochError::Unsupported(msg)) => {
                warn!("{msg}");
                None
            }
            Err(e) => return Err(e),
        }
    };

    info!(
        "Done: {} particle(s), mean weight {:e}",
        summary.count, summary.mean_weight
    );
    Ok(RunReport {
        summary,
        files,
        plot,
    })
}
