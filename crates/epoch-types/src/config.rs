// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Config
// License: MIT
// ─────────────────────────────────────────────────────────────────────
use crate::defaults::{
    AXIS_NAMES, DEFAULT_DENSITY_THRESHOLD, DEFAULT_PEAK_DENSITY, DEFAULT_PREVIEW_SAMPLES,
    GAUSSIAN_CENTRE_M, GAUSSIAN_WAIST_M, MAX_DIMENSIONS,
};
use crate::error::{EpochError, EpochResult};
use crate::grid::{AxisSpec, GridSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Analytic number density profile, selected by `kind` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSpec {
    /// Same density everywhere.
    Constant { value: f64 },
    /// `peak * Π exp(-(x_i - centre_i)^2 / waist_i^2)`, one centre/waist per axis.
    Gaussian {
        peak: f64,
        centre: Vec<f64>,
        waist: Vec<f64>,
    },
    /// Linear ramp along `axis` from `start` to `end`, clamped outside.
    Ramp {
        axis: usize,
        start: f64,
        end: f64,
        start_density: f64,
        end_density: f64,
    },
}

impl FieldSpec {
    /// Built-in Gaussian distribution for the given dimensionality.
    pub fn default_gaussian(dimensions: usize) -> Self {
        let d = dimensions.clamp(1, MAX_DIMENSIONS);
        let (centre, waist) = if d == 1 {
            (vec![0.0], vec![GAUSSIAN_WAIST_M[0]])
        } else {
            (GAUSSIAN_CENTRE_M[..d].to_vec(), GAUSSIAN_WAIST_M[..d].to_vec())
        };
        FieldSpec::Gaussian {
            peak: DEFAULT_PEAK_DENSITY,
            centre,
            waist,
        }
    }

    /// Look up a named preset.
    pub fn preset(name: &str, dimensions: usize) -> EpochResult<Self> {
        match name {
            "gaussian" => Ok(Self::default_gaussian(dimensions)),
            "uniform" => Ok(FieldSpec::Constant {
                value: DEFAULT_PEAK_DENSITY,
            }),
            other => Err(EpochError::FieldLoad(format!(
                "unknown distribution preset '{other}' (expected 'gaussian' or 'uniform')"
            ))),
        }
    }

    /// Load a profile definition from a JSON file.
    pub fn from_file(path: &Path) -> EpochResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EpochError::FieldLoad(format!("cannot read '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            EpochError::FieldLoad(format!("cannot parse '{}': {e}", path.display()))
        })
    }
}

fn default_threshold() -> f64 {
    DEFAULT_DENSITY_THRESHOLD
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// One complete generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub dimensions: usize,
    /// One entry per dimension, in x, y, z order.
    pub axes: Vec<AxisSpec>,
    pub particles_per_cell: usize,
    #[serde(default = "default_threshold")]
    pub density_threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Preview points per axis; missing entries fall back to the default.
    #[serde(default)]
    pub preview_samples: Vec<usize>,
    /// When absent, the dimension's Gaussian preset is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldSpec>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub plot: bool,
    #[serde(default)]
    pub progress: bool,
}

impl RunConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &Path) -> EpochResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Check everything that can be checked before sampling starts.
    pub fn validate(&self) -> EpochResult<()> {
        if !(1..=MAX_DIMENSIONS).contains(&self.dimensions) {
            return Err(EpochError::ConfigError(format!(
                "dimensions must be 1, 2 or 3, got {}",
                self.dimensions
            )));
        }
        if self.axes.len() != self.dimensions {
            return Err(EpochError::ConfigError(format!(
                "{}D but {} axis definition(s) given",
                self.dimensions,
                self.axes.len()
            )));
        }
        for (axis, name) in self.axes.iter().zip(AXIS_NAMES) {
            axis.validate(name)?;
        }
        if self.particles_per_cell == 0 {
            return Err(EpochError::ConfigError("ppc must be >= 1".to_string()));
        }
        if !self.density_threshold.is_finite() || self.density_threshold < 0.0 {
            return Err(EpochError::ConfigError(format!(
                "nmin must be finite and >= 0, got {}",
                self.density_threshold
            )));
        }
        if self.preview_samples.iter().any(|&n| n == 0) {
            return Err(EpochError::ConfigError(
                "preview samples per axis must be >= 1".to_string(),
            ));
        }
        if !self.output_dir.is_dir() {
            return Err(EpochError::ConfigError(format!(
                "Proposed output directory '{}' does not exist.",
                self.output_dir.display()
            )));
        }
        Ok(())
    }

    /// Validated grid for a compile-time dimensionality matching `dimensions`.
    pub fn grid<const D: usize>(&self) -> EpochResult<GridSpec<D>> {
        if self.dimensions != D || self.axes.len() != D {
            return Err(EpochError::ConfigError(format!(
                "requested a {D}D grid from a {}D configuration",
                self.dimensions
            )));
        }
        let axes: [AxisSpec; D] = std::array::from_fn(|k| self.axes[k]);
        GridSpec::new(axes)
    }

    /// Preview resolution per axis with defaults filled in.
    pub fn preview_resolution<const D: usize>(&self) -> [usize; D] {
        std::array::from_fn(|k| {
            self.preview_samples
                .get(k)
                .copied()
                .unwrap_or(DEFAULT_PREVIEW_SAMPLES)
        })
    }

    /// The configured profile, or the dimension's Gaussian preset.
    pub fn field_spec(&self) -> FieldSpec {
        self.field
            .clone()
            .unwrap_or_else(|| FieldSpec::default_gaussian(self.dimensions))
    }
}
