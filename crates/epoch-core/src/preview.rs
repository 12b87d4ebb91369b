// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Distribution Preview
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Regular, non-random evaluation of a density field for visual inspection.
//!
//! Unlike the sampler, each axis is a closed lattice: `n` evenly spaced
//! points from `lower` to `upper` inclusive.

use crate::field::{evaluate_checked, DensityField};
use epoch_types::error::{EpochError, EpochResult};
use epoch_types::grid::GridSpec;
use ndarray::{Array1, ArrayD, IxDyn};

/// Density on a regular lattice.
///
/// `density` has the axes in reverse order, so a 2D preview is `[ny, nx]`
/// (rows follow y) and a 3D preview is `[nz, ny, nx]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewGrid<const D: usize> {
    pub axes: [Array1<f64>; D],
    pub density: ArrayD<f64>,
}

impl<const D: usize> PreviewGrid<D> {
    /// Density at lattice indices given in axis order (x, y, z).
    pub fn density_at(&self, index: [usize; D]) -> f64 {
        let reversed: Vec<usize> = index.iter().rev().copied().collect();
        self.density[IxDyn(&reversed)]
    }

    pub fn resolution(&self) -> [usize; D] {
        std::array::from_fn(|k| self.axes[k].len())
    }

    /// Largest density on the lattice, 0 when empty.
    pub fn max_density(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }
}

/// Evaluate `field` on a `resolution[k]`-point lattice per axis.
pub fn preview<const D: usize, F>(
    grid: &GridSpec<D>,
    field: &F,
    resolution: [usize; D],
) -> EpochResult<PreviewGrid<D>>
where
    F: DensityField<D> + ?Sized,
{
    if let Some(k) = resolution.iter().position(|&n| n == 0) {
        return Err(EpochError::ConfigError(format!(
            "preview resolution along axis {k} must be >= 1"
        )));
    }
    let axes: [Array1<f64>; D] = std::array::from_fn(|k| {
        let axis = grid.axis(k);
        Array1::linspace(axis.lower, axis.upper, resolution[k])
    });

    // Last axis index varies slowest so the flat order matches the
    // reversed-axis shape in standard layout.
    let total: usize = resolution.iter().product();
    let mut points: Vec<[f64; D]> = Vec::with_capacity(total);
    let mut index = [0usize; D];
    for _ in 0..total {
        points.push(std::array::from_fn(|k| axes[k][index[k]]));
        for k in 0..D {
            index[k] += 1;
            if index[k] < resolution[k] {
                break;
            }
            index[k] = 0;
        }
    }

    let values = evaluate_checked(field, &points)?;
    let shape: Vec<usize> = resolution.iter().rev().copied().collect();
    let density = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
        EpochError::ConfigError(format!("preview shape {shape:?} rejected: {e}"))
    })?;
    Ok(PreviewGrid { axes, density })
}
