// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Grid
// License: MIT
// ─────────────────────────────────────────────────────────────────────
use crate::defaults::AXIS_NAMES;
use crate::error::{EpochError, EpochResult};
use serde::{Deserialize, Serialize};

/// Bounds and cell count along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub lower: f64,
    pub upper: f64,
    pub cells: usize,
}

impl AxisSpec {
    pub fn new(lower: f64, upper: f64, cells: usize) -> Self {
        AxisSpec {
            lower,
            upper,
            cells,
        }
    }

    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn cell_size(&self) -> f64 {
        self.length() / self.cells as f64
    }

    /// Lower edge of cell `i`. Index-based, so no drift accumulates.
    pub fn cell_lower(&self, i: usize) -> f64 {
        self.lower + i as f64 * self.cell_size()
    }

    /// Check bounds and cell count; `name` labels the axis in messages.
    pub fn validate(&self, name: &str) -> EpochResult<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(EpochError::ConfigError(format!(
                "{name}-axis bounds must be finite, got [{}, {}]",
                self.lower, self.upper
            )));
        }
        if self.upper <= self.lower {
            return Err(EpochError::ConfigError(format!(
                "{name}max ({}) must be greater than {name}min ({})",
                self.upper, self.lower
            )));
        }
        if self.cells == 0 {
            return Err(EpochError::ConfigError(format!(
                "n{name} must be >= 1"
            )));
        }
        let size = self.cell_size();
        if !size.is_finite() || size <= 0.0 {
            return Err(EpochError::ConfigError(format!(
                "{name}-axis cell size must be finite and > 0, got {size}"
            )));
        }
        Ok(())
    }
}

/// Structured grid over a D-dimensional box.
///
/// Cell `i` along an axis spans `[lower + i*size, lower + (i+1)*size)`.
/// Cell sizes and volume are precomputed and the grid is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec<const D: usize> {
    axes: [AxisSpec; D],
    cell_size: [f64; D],
    cell_volume: f64,
}

impl<const D: usize> GridSpec<D> {
    pub fn new(axes: [AxisSpec; D]) -> EpochResult<Self> {
        if D == 0 || D > AXIS_NAMES.len() {
            return Err(EpochError::ConfigError(format!(
                "dimensionality must be 1, 2 or 3, got {D}"
            )));
        }
        for (axis, name) in axes.iter().zip(AXIS_NAMES) {
            axis.validate(name)?;
        }
        let cell_size = axes.map(|a| a.cell_size());
        let cell_volume = cell_size.iter().product::<f64>();
        if !cell_volume.is_finite() || cell_volume <= 0.0 {
            return Err(EpochError::ConfigError(format!(
                "cell volume must be finite and > 0, got {cell_volume}"
            )));
        }
        Ok(GridSpec {
            axes,
            cell_size,
            cell_volume,
        })
    }

    pub fn axes(&self) -> &[AxisSpec; D] {
        &self.axes
    }

    pub fn axis(&self, axis: usize) -> &AxisSpec {
        &self.axes[axis]
    }

    pub fn cell_size(&self) -> [f64; D] {
        self.cell_size
    }

    pub fn cell_volume(&self) -> f64 {
        self.cell_volume
    }

    pub fn cells_per_axis(&self) -> [usize; D] {
        self.axes.map(|a| a.cells)
    }

    /// Total number of cells, the product of per-axis counts.
    pub fn cell_count(&self) -> usize {
        self.axes.iter().map(|a| a.cells).product()
    }

    /// Lower corner of the cell at `index`.
    pub fn cell_origin(&self, index: [usize; D]) -> [f64; D] {
        std::array::from_fn(|k| self.axes[k].lower + index[k] as f64 * self.cell_size[k])
    }

    pub fn lower(&self) -> [f64; D] {
        self.axes.map(|a| a.lower)
    }

    pub fn upper(&self) -> [f64; D] {
        self.axes.map(|a| a.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_1d_cell_size() {
        let grid = GridSpec::new([AxisSpec::new(-1.0, 1.0, 2)]).unwrap();
        assert_eq!(grid.cell_size(), [1.0]);
        assert!((grid.cell_volume() - 1.0).abs() < 1e-15);
        assert_eq!(grid.cell_count(), 2);
        assert_eq!(grid.cell_origin([1]), [0.0]);
    }

    #[test]
    fn test_grid_3d_volume_is_product() {
        let grid = GridSpec::new([
            AxisSpec::new(0.0, 2.0, 4),
            AxisSpec::new(-1.0, 1.0, 8),
            AxisSpec::new(10.0, 13.0, 3),
        ])
        .unwrap();
        let expected = 0.5 * 0.25 * 1.0;
        assert!((grid.cell_volume() - expected).abs() < 1e-15);
        assert_eq!(grid.cell_count(), 96);
        assert_eq!(grid.cells_per_axis(), [4, 8, 3]);
        let origin = grid.cell_origin([3, 7, 2]);
        assert!((origin[0] - 1.5).abs() < 1e-15);
        assert!((origin[1] - 0.75).abs() < 1e-15);
        assert!((origin[2] - 12.0).abs() < 1e-15);
    }

    #[test]
    fn test_grid_index_stepping_has_no_drift() {
        // 0.1 is not representable; repeated addition would drift.
        let axis = AxisSpec::new(0.0, 1.0, 10);
        let last_upper = axis.cell_lower(9) + axis.cell_size();
        assert!((last_upper - 1.0).abs() < 1e-12);
        assert!(axis.cell_lower(9) < 1.0);
    }

    #[test]
    fn test_grid_rejects_inverted_bounds() {
        let err = GridSpec::new([AxisSpec::new(1.0, 1.0, 4)]).unwrap_err();
        match err {
            EpochError::ConfigError(msg) => assert!(msg.contains("xmax")),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_grid_rejects_zero_cells() {
        let err = GridSpec::new([AxisSpec::new(0.0, 1.0, 4), AxisSpec::new(0.0, 1.0, 0)])
            .unwrap_err();
        match err {
            EpochError::ConfigError(msg) => assert!(msg.contains("ny")),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_grid_rejects_non_finite_bounds() {
        assert!(GridSpec::new([AxisSpec::new(f64::NAN, 1.0, 4)]).is_err());
        assert!(GridSpec::new([AxisSpec::new(0.0, f64::INFINITY, 4)]).is_err());
    }

    #[test]
    fn test_grid_rejects_unsupported_dimensionality() {
        let axis = AxisSpec::new(0.0, 1.0, 1);
        assert!(GridSpec::new([axis; 4]).is_err());
    }
}
