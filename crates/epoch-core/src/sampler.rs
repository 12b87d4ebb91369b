// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Grid Sampler
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Stratified Monte Carlo sampling of a number density field.
//!
//! Every cell of the grid receives `ppc` uniformly distributed draws. Each
//! draw whose density reaches the threshold becomes a macro-particle with
//! weight `n * cell_volume / ppc`, so the weights in a cell estimate the
//! integral of n over that cell.
//!
//! Cells are visited with axis 0 (x) outermost and the last axis fastest.
//! Positions come from integer cell indices, never from an accumulated
//! running coordinate, so every axis gets exactly `cells` steps.

use crate::field::{evaluate_checked, DensityField};
use crate::particles::ParticleBatch;
use crate::progress::{NoProgress, ProgressSink};
use epoch_types::error::{EpochError, EpochResult};
use epoch_types::grid::GridSpec;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use tracing::{debug, info};

/// Per-run sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub particles_per_cell: usize,
    /// Draws with density strictly below this are discarded.
    pub density_threshold: f64,
}

impl SamplingParams {
    pub fn new(particles_per_cell: usize, density_threshold: f64) -> EpochResult<Self> {
        let params = SamplingParams {
            particles_per_cell,
            density_threshold,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> EpochResult<()> {
        if self.particles_per_cell == 0 {
            return Err(EpochError::ConfigError(
                "particles_per_cell must be >= 1".to_string(),
            ));
        }
        if !self.density_threshold.is_finite() || self.density_threshold < 0.0 {
            return Err(EpochError::ConfigError(format!(
                "density_threshold must be finite and >= 0, got {}",
                self.density_threshold
            )));
        }
        Ok(())
    }
}

/// Row-major cell index enumeration, last axis fastest.
#[derive(Debug, Clone)]
pub struct CellIndexIter<const D: usize> {
    counts: [usize; D],
    next: Option<[usize; D]>,
}

impl<const D: usize> CellIndexIter<D> {
    pub fn new(counts: [usize; D]) -> Self {
        let next = if D == 0 || counts.iter().any(|&c| c == 0) {
            None
        } else {
            Some([0; D])
        };
        CellIndexIter { counts, next }
    }
}

impl<const D: usize> Iterator for CellIndexIter<D> {
    type Item = [usize; D];

    fn next(&mut self) -> Option<[usize; D]> {
        let current = self.next?;
        let mut following = current;
        let mut axis = D;
        self.next = loop {
            if axis == 0 {
                break None;
            }
            axis -= 1;
            following[axis] += 1;
            if following[axis] < self.counts[axis] {
                break Some(following);
            }
            following[axis] = 0;
        };
        Some(current)
    }
}

/// Sample `field` over `grid` with an explicit random source.
///
/// The whole run fails on the first field-evaluation error; no partial batch
/// is returned.
pub fn sample_grid<const D: usize, F, R, P>(
    grid: &GridSpec<D>,
    field: &F,
    params: &SamplingParams,
    rng: &mut R,
    progress: &mut P,
) -> EpochResult<ParticleBatch<D>>
where
    F: DensityField<D> + ?Sized,
    R: Rng + ?Sized,
    P: ProgressSink + ?Sized,
{
    params.validate()?;
    let ppc = params.particles_per_cell;
    let threshold = params.density_threshold;
    let cell_size = grid.cell_size();
    let cell_volume = grid.cell_volume();
    let slices = grid.axis(0).cells;
    let cells_per_slice = grid.cell_count() / slices;
    let unit = Uniform::new(0.0f64, 1.0f64);

    debug!(
        "Grid cells {:?}, cell size {:?}, cell volume {:e}",
        grid.cells_per_axis(),
        cell_size,
        cell_volume
    );

    let capacity = if threshold > 0.0 { 0 } else { grid.cell_count() * ppc };
    let mut batch = ParticleBatch::with_capacity(capacity);
    let mut points = vec![[0.0f64; D]; ppc];

    progress.begin(slices);
    for (linear, index) in CellIndexIter::new(grid.cells_per_axis()).enumerate() {
        let origin = grid.cell_origin(index);
        for axis in 0..D {
            for point in points.iter_mut() {
                point[axis] = origin[axis] + unit.sample(rng) * cell_size[axis];
            }
        }

        let densities = evaluate_checked(field, &points)?;
        for (point, &n) in points.iter().zip(&densities) {
            if n >= threshold {
                batch.push(*point, n, n * cell_volume / ppc as f64);
            }
        }

        if (linear + 1) % cells_per_slice == 0 {
            progress.advance((linear + 1) / cells_per_slice, slices);
        }
    }
    progress.finish();

    Ok(batch)
}

/// Seeded or entropy-backed sampler over any grid and field.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSampler {
    params: SamplingParams,
    seed: Option<u64>,
}

impl GridSampler {
    /// Sampler with `particles_per_cell` draws per cell and no threshold.
    pub fn new(particles_per_cell: usize) -> EpochResult<Self> {
        Ok(GridSampler {
            params: SamplingParams::new(particles_per_cell, 0.0)?,
            seed: None,
        })
    }

    pub fn from_params(params: SamplingParams) -> EpochResult<Self> {
        params.validate()?;
        Ok(GridSampler { params, seed: None })
    }

    pub fn with_threshold(mut self, density_threshold: f64) -> EpochResult<Self> {
        self.params = SamplingParams::new(self.params.particles_per_cell, density_threshold)?;
        Ok(self)
    }

    /// Fix the random seed; identical seeds give bit-identical batches.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn params(&self) -> &SamplingParams {
        &self.params
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn sample<const D: usize, F>(
        &self,
        grid: &GridSpec<D>,
        field: &F,
    ) -> EpochResult<ParticleBatch<D>>
    where
        F: DensityField<D> + ?Sized,
    {
        self.sample_with_progress(grid, field, &mut NoProgress)
    }

    pub fn sample_with_progress<const D: usize, F, P>(
        &self,
        grid: &GridSpec<D>,
        field: &F,
        progress: &mut P,
    ) -> EpochResult<ParticleBatch<D>>
    where
        F: DensityField<D> + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            "Sampling {}D grid: {} cell(s) x {} particle(s) per cell, nmin = {:e}",
            D,
            grid.cell_count(),
            self.params.particles_per_cell,
            self.params.density_threshold
        );
        let batch = sample_grid(grid, field, &self.params, &mut rng, progress)?;
        info!(
            "Generated {} particle(s), total weight {:e}",
            batch.len(),
            batch.total_weight()
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::from_fn;
    use crate::progress::RecordingProgress;
    use epoch_types::grid::AxisSpec;

    fn line(lower: f64, upper: f64, cells: usize) -> GridSpec<1> {
        GridSpec::new([AxisSpec::new(lower, upper, cells)]).unwrap()
    }

    #[test]
    fn test_cell_index_iter_is_row_major() {
        let cells: Vec<[usize; 2]> = CellIndexIter::new([2, 3]).collect();
        assert_eq!(
            cells,
            vec![[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]]
        );
        assert_eq!(CellIndexIter::new([2, 0, 4]).count(), 0);
        assert_eq!(CellIndexIter::new([3, 4, 5]).count(), 60);
    }

    #[test]
    fn test_constant_field_two_cells() {
        let grid = line(-1.0, 1.0, 2);
        let field = from_fn(|_: &[f64; 1]| 5.0);
        let batch = GridSampler::new(100)
            .unwrap()
            .with_seed(1)
            .sample(&grid, &field)
            .unwrap();
        assert_eq!(batch.len(), 200);
        for p in batch.iter() {
            assert!((p.weight - 0.05).abs() < 1e-15, "weight {}", p.weight);
            assert!(p.position[0] >= -1.0 && p.position[0] <= 1.0);
        }
        // First cell's draws come first.
        assert!(batch.positions()[..100].iter().all(|p| p[0] < 0.0));
        assert!(batch.positions()[100..].iter().all(|p| p[0] >= 0.0));
    }

    #[test]
    fn test_threshold_above_maximum_emits_nothing() {
        let grid = line(-1.0, 1.0, 2);
        let field = from_fn(|_: &[f64; 1]| 5.0);
        let batch = GridSampler::new(100)
            .unwrap()
            .with_threshold(6.0)
            .unwrap()
            .with_seed(1)
            .sample(&grid, &field)
            .unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let grid = line(0.0, 1.0, 4);
        let field = from_fn(|_: &[f64; 1]| 2.0);
        let batch = GridSampler::new(3)
            .unwrap()
            .with_threshold(2.0)
            .unwrap()
            .with_seed(3)
            .sample(&grid, &field)
            .unwrap();
        assert_eq!(batch.len(), 12);
    }

    #[test]
    fn test_threshold_culls_partially() {
        let grid = line(0.0, 1.0, 10);
        let field = from_fn(|p: &[f64; 1]| p[0]);
        let batch = GridSampler::new(20)
            .unwrap()
            .with_threshold(0.5)
            .unwrap()
            .with_seed(9)
            .sample(&grid, &field)
            .unwrap();
        assert_eq!(batch.len(), 100);
        assert!(batch.densities().iter().all(|&n| n >= 0.5));
    }

    #[test]
    fn test_weights_match_density_rule() {
        let grid = GridSpec::new([AxisSpec::new(0.0, 2.0, 4), AxisSpec::new(-1.0, 1.0, 5)])
            .unwrap();
        let field = from_fn(|p: &[f64; 2]| 1.0 + p[0] * p[0] + p[1].abs());
        let batch = GridSampler::new(7)
            .unwrap()
            .with_seed(42)
            .sample(&grid, &field)
            .unwrap();
        assert_eq!(batch.len(), 4 * 5 * 7);
        for p in batch.iter() {
            assert_eq!(p.weight, p.density * grid.cell_volume() / 7.0);
            assert_eq!(p.density, field.density(&p.position).unwrap());
        }
    }

    #[test]
    fn test_particles_stay_in_their_cells_in_traversal_order() {
        let grid = GridSpec::new([
            AxisSpec::new(0.0, 1.0, 3),
            AxisSpec::new(0.0, 2.0, 2),
            AxisSpec::new(-3.0, 0.0, 4),
        ])
        .unwrap();
        let field = from_fn(|_: &[f64; 3]| 1.0);
        let ppc = 5;
        let batch = GridSampler::new(ppc)
            .unwrap()
            .with_seed(11)
            .sample(&grid, &field)
            .unwrap();
        let size = grid.cell_size();
        for (linear, index) in CellIndexIter::new(grid.cells_per_axis()).enumerate() {
            let origin = grid.cell_origin(index);
            for p in &batch.positions()[linear * ppc..(linear + 1) * ppc] {
                for k in 0..3 {
                    assert!(p[k] >= origin[k] && p[k] <= origin[k] + size[k]);
                }
            }
        }
    }

    #[test]
    fn test_3d_z_cells_are_covered_evenly() {
        // Different y and z cell sizes: every z cell gets nx*ny*ppc draws.
        let grid = GridSpec::new([
            AxisSpec::new(0.0, 1.0, 2),
            AxisSpec::new(0.0, 1.0, 2),
            AxisSpec::new(0.0, 3.0, 6),
        ])
        .unwrap();
        let field = from_fn(|_: &[f64; 3]| 1.0);
        let batch = GridSampler::new(4)
            .unwrap()
            .with_seed(5)
            .sample(&grid, &field)
            .unwrap();
        let mut per_z = [0usize; 6];
        for p in batch.positions() {
            let iz = ((p[2] / 0.5).floor() as usize).min(5);
            per_z[iz] += 1;
        }
        assert_eq!(per_z, [16; 6]);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let grid = GridSpec::new([AxisSpec::new(0.0, 1.0, 6), AxisSpec::new(0.0, 1.0, 6)])
            .unwrap();
        let field = from_fn(|p: &[f64; 2]| (p[0] * 3.0).sin().abs() + p[1]);
        let sampler = GridSampler::new(8).unwrap().with_threshold(0.3).unwrap().with_seed(2026);
        let a = sampler.sample(&grid, &field).unwrap();
        let b = sampler.sample(&grid, &field).unwrap();
        assert_eq!(a, b);
        let c = sampler.clone().with_seed(2027).sample(&grid, &field).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_progress_once_per_outer_slice() {
        let grid = GridSpec::new([AxisSpec::new(0.0, 1.0, 4), AxisSpec::new(0.0, 1.0, 3)])
            .unwrap();
        let field = from_fn(|_: &[f64; 2]| 1.0);
        let mut progress = RecordingProgress::default();
        GridSampler::new(2)
            .unwrap()
            .with_seed(0)
            .sample_with_progress(&grid, &field, &mut progress)
            .unwrap();
        assert_eq!(progress.total, Some(4));
        assert_eq!(progress.steps, vec![1, 2, 3, 4]);
        assert!(progress.finished);
    }

    #[test]
    fn test_field_failure_aborts_run() {
        let grid = line(0.0, 1.0, 4);
        let field = from_fn(|p: &[f64; 1]| if p[0] > 0.5 { f64::NAN } else { 1.0 });
        let err = GridSampler::new(10)
            .unwrap()
            .with_seed(4)
            .sample(&grid, &field)
            .unwrap_err();
        assert!(matches!(err, EpochError::FieldEvaluation { .. }));
    }

    #[test]
    fn test_sample_grid_accepts_external_rng() {
        let grid = line(0.0, 1.0, 3);
        let field = from_fn(|_: &[f64; 1]| 1.0);
        let params = SamplingParams::new(2, 0.0).unwrap();
        let mut rng_a = StdRng::seed_from_u64(77);
        let mut rng_b = StdRng::seed_from_u64(77);
        let a = sample_grid(&grid, &field, &params, &mut rng_a, &mut NoProgress).unwrap();
        let b = sample_grid(&grid, &field, &params, &mut rng_b, &mut NoProgress).unwrap();
        assert_eq!(a, b);
        let via_sampler = GridSampler::from_params(params)
            .unwrap()
            .with_seed(77)
            .sample(&grid, &field)
            .unwrap();
        assert_eq!(a, via_sampler);
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(GridSampler::new(0).is_err());
        assert!(GridSampler::new(1).unwrap().with_threshold(-0.1).is_err());
        assert!(GridSampler::new(1).unwrap().with_threshold(f64::INFINITY).is_err());
        assert!(SamplingParams::new(1, f64::NAN).is_err());
    }
}
