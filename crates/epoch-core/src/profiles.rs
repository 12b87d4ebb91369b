// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Analytic Profiles
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Analytic number density profiles and their construction from a
//! [`FieldSpec`].

use crate::field::DensityField;
use epoch_types::config::FieldSpec;
use epoch_types::error::{EpochError, EpochResult};

/// Uniform density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantProfile {
    pub value: f64,
}

impl<const D: usize> DensityField<D> for ConstantProfile {
    fn density(&self, _point: &[f64; D]) -> EpochResult<f64> {
        Ok(self.value)
    }

    fn density_batch(&self, points: &[[f64; D]]) -> EpochResult<Vec<f64>> {
        Ok(vec![self.value; points.len()])
    }
}

/// Separable Gaussian, `peak * Π exp(-(x_i - c_i)^2 / w_i^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianProfile<const D: usize> {
    pub peak: f64,
    pub centre: [f64; D],
    pub waist: [f64; D],
}

impl<const D: usize> DensityField<D> for GaussianProfile<D> {
    fn density(&self, point: &[f64; D]) -> EpochResult<f64> {
        let exponent: f64 = (0..D)
            .map(|k| {
                let u = (point[k] - self.centre[k]) / self.waist[k];
                u * u
            })
            .sum();
        Ok(self.peak * (-exponent).exp())
    }
}

/// Linear ramp along one axis, flat beyond either end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampProfile {
    pub axis: usize,
    pub start: f64,
    pub end: f64,
    pub start_density: f64,
    pub end_density: f64,
}

impl<const D: usize> DensityField<D> for RampProfile {
    fn density(&self, point: &[f64; D]) -> EpochResult<f64> {
        let x = point[self.axis];
        let t = ((x - self.start) / (self.end - self.start)).clamp(0.0, 1.0);
        Ok(self.start_density + t * (self.end_density - self.start_density))
    }
}

fn require_finite(value: f64, label: &str) -> EpochResult<()> {
    if !value.is_finite() {
        return Err(EpochError::FieldLoad(format!(
            "{label} must be finite, got {value}"
        )));
    }
    Ok(())
}

fn require_density(value: f64, label: &str) -> EpochResult<()> {
    require_finite(value, label)?;
    if value < 0.0 {
        return Err(EpochError::FieldLoad(format!(
            "{label} must be >= 0, got {value}"
        )));
    }
    Ok(())
}

fn per_axis<const D: usize>(values: &[f64], label: &str) -> EpochResult<[f64; D]> {
    if values.len() != D {
        return Err(EpochError::FieldLoad(format!(
            "{label} needs {D} entries for a {D}D field, got {}",
            values.len()
        )));
    }
    for (k, &v) in values.iter().enumerate() {
        require_finite(v, &format!("{label}[{k}]"))?;
    }
    Ok(std::array::from_fn(|k| values[k]))
}

/// Build a D-dimensional density field from its description.
pub fn build_field<const D: usize>(spec: &FieldSpec) -> EpochResult<Box<dyn DensityField<D>>> {
    match spec {
        FieldSpec::Constant { value } => {
            require_density(*value, "constant value")?;
            Ok(Box::new(ConstantProfile { value: *value }))
        }
        FieldSpec::Gaussian {
            peak,
            centre,
            waist,
        } => {
            require_density(*peak, "gaussian peak")?;
            let centre = per_axis::<D>(centre, "gaussian centre")?;
            let waist = per_axis::<D>(waist, "gaussian waist")?;
            if let Some(k) = waist.iter().position(|&w| w <= 0.0) {
                return Err(EpochError::FieldLoad(format!(
                    "gaussian waist[{k}] must be > 0, got {}",
                    waist[k]
                )));
            }
            Ok(Box::new(GaussianProfile {
                peak: *peak,
                centre,
                waist,
            }))
        }
        FieldSpec::Ramp {
            axis,
            start,
            end,
            start_density,
            end_density,
        } => {
            if *axis >= D {
                return Err(EpochError::FieldLoad(format!(
                    "ramp axis {axis} out of range for a {D}D field"
                )));
            }
            require_finite(*start, "ramp start")?;
            require_finite(*end, "ramp end")?;
            if end <= start {
                return Err(EpochError::FieldLoad(format!(
                    "ramp end ({end}) must be greater than start ({start})"
                )));
            }
            require_density(*start_density, "ramp start_density")?;
            require_density(*end_density, "ramp end_density")?;
            Ok(Box::new(RampProfile {
                axis: *axis,
                start: *start,
                end: *end,
                start_density: *start_density,
                end_density: *end_density,
            }))
        }
    }
}
