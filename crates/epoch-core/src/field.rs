// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Density Field
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Number density capability consumed by the sampler and the preview.
//!
//! A field is evaluated either at one point or at a batch of points. Batch
//! evaluation must match independent per-point evaluation, in order.

use epoch_types::error::{EpochError, EpochResult};

/// Scalar number density n(x) over D spatial coordinates [m^-3].
pub trait DensityField<const D: usize> {
    /// Density at a single point.
    fn density(&self, point: &[f64; D]) -> EpochResult<f64>;

    /// Densities at each of `points`, same order and length.
    fn density_batch(&self, points: &[[f64; D]]) -> EpochResult<Vec<f64>> {
        points.iter().map(|p| self.density(p)).collect()
    }
}

impl<const D: usize, F: DensityField<D> + ?Sized> DensityField<D> for &F {
    fn density(&self, point: &[f64; D]) -> EpochResult<f64> {
        (**self).density(point)
    }

    fn density_batch(&self, points: &[[f64; D]]) -> EpochResult<Vec<f64>> {
        (**self).density_batch(points)
    }
}

impl<const D: usize, F: DensityField<D> + ?Sized> DensityField<D> for Box<F> {
    fn density(&self, point: &[f64; D]) -> EpochResult<f64> {
        (**self).density(point)
    }

    fn density_batch(&self, points: &[[f64; D]]) -> EpochResult<Vec<f64>> {
        (**self).density_batch(points)
    }
}

/// Adapter turning an infallible closure into a [`DensityField`].
#[derive(Debug, Clone, Copy)]
pub struct FnDensity<F>(pub F);

impl<const D: usize, F> DensityField<D> for FnDensity<F>
where
    F: Fn(&[f64; D]) -> f64,
{
    fn density(&self, point: &[f64; D]) -> EpochResult<f64> {
        Ok((self.0)(point))
    }
}

/// Wrap a closure as a density field.
pub fn from_fn<const D: usize, F: Fn(&[f64; D]) -> f64>(f: F) -> FnDensity<F> {
    FnDensity(f)
}

/// Evaluate a batch and reject anything that is not a usable density.
pub fn evaluate_checked<const D: usize, F: DensityField<D> + ?Sized>(
    field: &F,
    points: &[[f64; D]],
) -> EpochResult<Vec<f64>> {
    let values = field.density_batch(points)?;
    if values.len() != points.len() {
        let first = points.first().map(|p| p.as_slice()).unwrap_or(&[]);
        return Err(EpochError::evaluation(
            first,
            format!(
                "batch returned {} value(s) for {} point(s)",
                values.len(),
                points.len()
            ),
        ));
    }
    for (point, &n) in points.iter().zip(&values) {
        if !n.is_finite() {
            return Err(EpochError::evaluation(
                point,
                format!("density must be finite, got {n}"),
            ));
        }
        if n < 0.0 {
            return Err(EpochError::evaluation(
                point,
                format!("density must be >= 0, got {n}"),
            ));
        }
    }
    Ok(values)
}
