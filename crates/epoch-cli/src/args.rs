// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Arguments
// License: MIT
// ─────────────────────────────────────────────────────────────────────
use clap::Parser;
use epoch_types::config::{FieldSpec, RunConfig};
use epoch_types::defaults::{DEFAULT_DENSITY_THRESHOLD, DEFAULT_PREVIEW_SAMPLES};
use epoch_types::error::{EpochError, EpochResult};
use epoch_types::grid::AxisSpec;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "epoch-gen", version)]
#[command(about = "Generate binary files of particles to be passed to EPOCH.")]
pub struct Args {
    /// Dimensionality of the simulation (1, 2 or 3).
    #[arg(
        short = 'd',
        long,
        value_parser = clap::value_parser!(u8).range(1..=3),
        required_unless_present = "config"
    )]
    pub dimensions: Option<u8>,

    /// Directory in which to write the files. Defaults to current directory.
    #[arg(short = 'o', long)]
    pub outdir: Option<PathBuf>,

    /// Minimum x-coordinate.
    #[arg(long, allow_negative_numbers = true, required_unless_present = "config")]
    pub xmin: Option<f64>,

    /// Maximum x-coordinate.
    #[arg(long, allow_negative_numbers = true, required_unless_present = "config")]
    pub xmax: Option<f64>,

    /// Minimum y-coordinate. Required if d is 2 or 3.
    #[arg(long, allow_negative_numbers = true)]
    pub ymin: Option<f64>,

    /// Maximum y-coordinate. Required if d is 2 or 3.
    #[arg(long, allow_negative_numbers = true)]
    pub ymax: Option<f64>,

    /// Minimum z-coordinate. Required if d is 3.
    #[arg(long, allow_negative_numbers = true)]
    pub zmin: Option<f64>,

    /// Maximum z-coordinate. Required if d is 3.
    #[arg(long, allow_negative_numbers = true)]
    pub zmax: Option<f64>,

    /// Particles per cell.
    #[arg(long, required_unless_present = "config")]
    pub ppc: Option<usize>,

    /// Number of cells in the x-direction.
    #[arg(long, required_unless_present = "config")]
    pub nx: Option<usize>,

    /// Number of cells in the y-direction. Required if d is 2 or 3.
    #[arg(long)]
    pub ny: Option<usize>,

    /// Number of cells in the z-direction. Required if d is 3.
    #[arg(long)]
    pub nz: Option<usize>,

    /// Minimum number density to generate particles.
    #[arg(long, default_value_t = DEFAULT_DENSITY_THRESHOLD)]
    pub nmin: f64,

    /// Plot the generated distribution.
    #[arg(short = 'p', long)]
    pub plot: bool,

    /// Points to plot in x.
    #[arg(long, default_value_t = DEFAULT_PREVIEW_SAMPLES)]
    pub visx: usize,

    /// Points to plot in y.
    #[arg(long, default_value_t = DEFAULT_PREVIEW_SAMPLES)]
    pub visy: usize,

    /// Log sampling progress.
    #[arg(short = 'P', long)]
    pub progress: bool,

    /// Seed for reproducible particle positions.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Built-in density distribution: gaussian or uniform.
    #[arg(long, default_value = "gaussian")]
    pub field: String,

    /// JSON file describing the density distribution. Overrides --field.
    #[arg(long)]
    pub field_config: Option<PathBuf>,

    /// JSON file holding a complete run configuration. Other flags are ignored.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn missing(dims: usize, what: &str) -> EpochError {
    EpochError::ConfigError(format!("{dims}D but missing {what}."))
}

impl Args {
    /// Resolve the arguments into a run configuration.
    ///
    /// Axis checks follow the chosen dimensionality; general validation is
    /// left to [`RunConfig::validate`].
    pub fn into_config(self) -> EpochResult<RunConfig> {
        if let Some(path) = &self.config {
            return RunConfig::from_file(path);
        }
        let dims = self
            .dimensions
            .map(usize::from)
            .ok_or_else(|| EpochError::ConfigError("missing --dimensions".to_string()))?;
        let ppc = self
            .ppc
            .ok_or_else(|| EpochError::ConfigError("missing --ppc".to_string()))?;

        let x = match (self.xmin, self.xmax, self.nx) {
            (Some(lower), Some(upper), Some(cells)) => AxisSpec::new(lower, upper, cells),
            _ => return Err(missing(dims, "xmin, xmax and/or nx")),
        };
        let mut axes = vec![x];
        match dims {
            1 => {}
            2 => {
                let (ymin, ymax) = self
                    .ymin
                    .zip(self.ymax)
                    .ok_or_else(|| missing(dims, "ymin and/or ymax"))?;
                let ny = self.ny.ok_or_else(|| missing(dims, "ny"))?;
                axes.push(AxisSpec::new(ymin, ymax, ny));
            }
            _ => {
                // Bounds are reported as a group before the cell counts.
                let ((ymin, ymax), (zmin, zmax)) = self
                    .ymin
                    .zip(self.ymax)
                    .zip(self.zmin.zip(self.zmax))
                    .ok_or_else(|| missing(dims, "ymin, ymax, zmin and/or zmax"))?;
                let (ny, nz) = self
                    .ny
                    .zip(self.nz)
                    .ok_or_else(|| missing(dims, "ny or nz"))?;
                axes.push(AxisSpec::new(ymin, ymax, ny));
                axes.push(AxisSpec::new(zmin, zmax, nz));
            }
        }

        let field = match &self.field_config {
            Some(path) => FieldSpec::from_file(path)?,
            None => FieldSpec::preset(&self.field, dims)?,
        };

        Ok(RunConfig {
            dimensions: dims,
            axes,
            particles_per_cell: ppc,
            density_threshold: self.nmin,
            seed: self.seed,
            preview_samples: vec![self.visx, self.visy],
            field: Some(field),
            output_dir: self.outdir.unwrap_or_else(|| PathBuf::from(".")),
            plot: self.plot,
            progress: self.progress,
        })
    }
}
