// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Particle Batch
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Weighted macro-particles produced by a sampling run.
//!
//! Records are kept in emission order: cell traversal order, then draw order
//! within a cell. File writers rely on that order being shared by all axes.

use epoch_types::error::{EpochError, EpochResult};
use ndarray::Array1;

/// One macro-particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle<const D: usize> {
    pub position: [f64; D],
    /// Number density sampled at `position` [m^-D].
    pub density: f64,
    /// Real particles represented: `density * cell_volume / ppc`.
    pub weight: f64,
}

/// Ordered particle records, stored per component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleBatch<const D: usize> {
    positions: Vec<[f64; D]>,
    densities: Vec<f64>,
    weights: Vec<f64>,
}

impl<const D: usize> ParticleBatch<D> {
    pub fn new() -> Self {
        ParticleBatch {
            positions: Vec::new(),
            densities: Vec::new(),
            weights: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ParticleBatch {
            positions: Vec::with_capacity(capacity),
            densities: Vec::with_capacity(capacity),
            weights: Vec::with_capacity(capacity),
        }
    }

    /// Rebuild a batch from stored components. Lengths must agree.
    pub fn from_parts(
        positions: Vec<[f64; D]>,
        densities: Vec<f64>,
        weights: Vec<f64>,
    ) -> EpochResult<Self> {
        if positions.len() != densities.len() || positions.len() != weights.len() {
            return Err(EpochError::ConfigError(format!(
                "particle component length mismatch: positions={}, densities={}, weights={}",
                positions.len(),
                densities.len(),
                weights.len()
            )));
        }
        Ok(ParticleBatch {
            positions,
            densities,
            weights,
        })
    }

    pub(crate) fn push(&mut self, position: [f64; D], density: f64, weight: f64) {
        self.positions.push(position);
        self.densities.push(density);
        self.weights.push(weight);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f64; D]] {
        &self.positions
    }

    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn get(&self, index: usize) -> Option<Particle<D>> {
        Some(Particle {
            position: *self.positions.get(index)?,
            density: self.densities[index],
            weight: self.weights[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle<D>> + '_ {
        self.positions
            .iter()
            .zip(&self.densities)
            .zip(&self.weights)
            .map(|((&position, &density), &weight)| Particle {
                position,
                density,
                weight,
            })
    }

    /// Coordinates along one axis, in emission order.
    pub fn axis_values(&self, axis: usize) -> Array1<f64> {
        assert!(axis < D, "axis {axis} out of range for {D}D particles");
        self.positions.iter().map(|p| p[axis]).collect()
    }

    /// Sum of all weights; approximates the integral of density over the domain.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub count: usize,
    pub total_weight: f64,
    pub mean_weight: f64,
    pub min_density: f64,
    pub max_density: f64,
}

/// Summarize a particle batch. An empty batch summarizes to zeros.
pub fn summarize<const D: usize>(batch: &ParticleBatch<D>) -> BatchSummary {
    if batch.is_empty() {
        return BatchSummary {
            count: 0,
            total_weight: 0.0,
            mean_weight: 0.0,
            min_density: 0.0,
            max_density: 0.0,
        };
    }
    let count = batch.len();
    let total_weight = batch.total_weight();
    let (min_density, max_density) = batch
        .densities()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &n| {
            (lo.min(n), hi.max(n))
        });
    BatchSummary {
        count,
        total_weight,
        mean_weight: total_weight / count as f64,
        min_density,
        max_density,
    }
}
