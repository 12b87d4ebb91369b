// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Property-Based Tests (proptest) for epoch-core
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for the grid sampler using proptest.
//!
//! Covers: particle count bounds, threshold culling, weight rule,
//! determinism under a fixed seed, and Monte Carlo convergence of the
//! total weight to the analytic integral.

use epoch_core::field::{from_fn, DensityField};
use epoch_core::preview::preview;
use epoch_core::profiles::GaussianProfile;
use epoch_core::sampler::GridSampler;
use epoch_types::grid::{AxisSpec, GridSpec};
use proptest::prelude::*;
use std::f64::consts::PI;

fn wave(p: &[f64; 2]) -> f64 {
    1.0 + (3.0 * p[0]).sin() * (2.0 * p[1]).cos()
}

// ── Count and Weight Properties ──────────────────────────────────────

proptest! {
    /// Emitted count lies in [0, cells * ppc] and hits the maximum at nmin = 0.
    #[test]
    fn particle_count_bounds(
        nx in 1usize..8,
        ny in 1usize..8,
        ppc in 1usize..16,
        nmin in 0.0f64..2.5,
        seed in any::<u64>(),
    ) {
        let grid = GridSpec::new([AxisSpec::new(-1.0, 1.0, nx), AxisSpec::new(0.0, 2.0, ny)])
            .unwrap();
        let field = from_fn(wave);
        let max = nx * ny * ppc;

        let all = GridSampler::new(ppc).unwrap().with_seed(seed)
            .sample(&grid, &field).unwrap();
        prop_assert_eq!(all.len(), max);

        let culled = GridSampler::new(ppc).unwrap().with_threshold(nmin).unwrap()
            .with_seed(seed).sample(&grid, &field).unwrap();
        prop_assert!(culled.len() <= max);
        prop_assert!(culled.densities().iter().all(|&n| n >= nmin));
    }

    /// Threshold above the field's maximum emits nothing.
    #[test]
    fn threshold_above_max_is_empty(
        n_cells in 1usize..20,
        ppc in 1usize..20,
        seed in any::<u64>(),
    ) {
        let grid = GridSpec::new([AxisSpec::new(0.0, 1.0, n_cells)]).unwrap();
        let field = from_fn(|p: &[f64; 1]| 3.0 * p[0] * (1.0 - p[0]));
        let batch = GridSampler::new(ppc).unwrap().with_threshold(1.0).unwrap()
            .with_seed(seed).sample(&grid, &field).unwrap();
        prop_assert!(batch.is_empty());
    }

    /// Every weight is non-negative and equals density * cell_volume / ppc.
    #[test]
    fn weight_rule_holds(
        nx in 1usize..6,
        ny in 1usize..6,
        nz in 1usize..6,
        ppc in 1usize..8,
        seed in any::<u64>(),
    ) {
        let grid = GridSpec::new([
            AxisSpec::new(0.0, 1.0, nx),
            AxisSpec::new(0.0, 0.5, ny),
            AxisSpec::new(-2.0, 2.0, nz),
        ]).unwrap();
        let field = GaussianProfile { peak: 1e20, centre: [0.5, 0.25, 0.0], waist: [0.3, 0.2, 1.0] };
        let batch = GridSampler::new(ppc).unwrap().with_seed(seed)
            .sample(&grid, &field).unwrap();
        for p in batch.iter() {
            prop_assert!(p.weight >= 0.0);
            prop_assert_eq!(p.weight, p.density * grid.cell_volume() / ppc as f64);
            prop_assert_eq!(p.density, field.density(&p.position).unwrap());
        }
    }

    /// Same seed, same inputs: bit-identical batches.
    #[test]
    fn seeded_runs_are_deterministic(
        nx in 1usize..10,
        ppc in 1usize..10,
        nmin in 0.0f64..1.5,
        seed in any::<u64>(),
    ) {
        let grid = GridSpec::new([AxisSpec::new(0.0, 1.0, nx), AxisSpec::new(0.0, 1.0, 3)])
            .unwrap();
        let field = from_fn(wave);
        let sampler = GridSampler::new(ppc).unwrap().with_threshold(nmin).unwrap().with_seed(seed);
        let a = sampler.sample(&grid, &field).unwrap();
        let b = sampler.sample(&grid, &field).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Preview lattice includes both bounds and is evenly spaced.
    #[test]
    fn preview_lattice_is_closed(
        lower in -5.0f64..5.0,
        length in 0.5f64..10.0,
        n in 2usize..200,
    ) {
        let grid = GridSpec::new([AxisSpec::new(lower, lower + length, 1)]).unwrap();
        let field = from_fn(|p: &[f64; 1]| p[0] * p[0]);
        let pv = preview(&grid, &field, [n]).unwrap();
        let xs = &pv.axes[0];
        prop_assert!((xs[0] - lower).abs() < 1e-12);
        prop_assert!((xs[n - 1] - (lower + length)).abs() < 1e-9);
        let step = length / (n - 1) as f64;
        for i in 1..n {
            prop_assert!((xs[i] - xs[i - 1] - step).abs() < 1e-9);
            prop_assert_eq!(pv.density_at([i]), xs[i] * xs[i]);
        }
    }
}

// ── Monte Carlo Consistency ──────────────────────────────────────────

fn relative_error_1d(ppc: usize, seed: u64) -> f64 {
    // ∫_{-3}^{3} exp(-x^2) dx ≈ sqrt(pi) * erf(3), erf(3) = 0.9999779095
    let exact = PI.sqrt() * 0.999_977_909_5;
    let grid = GridSpec::new([AxisSpec::new(-3.0, 3.0, 12)]).unwrap();
    let field = GaussianProfile { peak: 1.0, centre: [0.0], waist: [1.0] };
    let batch = GridSampler::new(ppc).unwrap().with_seed(seed).sample(&grid, &field).unwrap();
    (batch.total_weight() - exact).abs() / exact
}

#[test]
fn total_weight_converges_to_integral_1d() {
    let coarse: f64 = (0..8).map(|s| relative_error_1d(16, s)).sum::<f64>() / 8.0;
    let fine: f64 = (0..8).map(|s| relative_error_1d(4096, s)).sum::<f64>() / 8.0;
    // 256x more draws: error should shrink roughly 16x; require 4x.
    assert!(fine < coarse / 4.0, "coarse {coarse}, fine {fine}");
    assert!(fine < 5e-3, "fine-sampling error too large: {fine}");
}

#[test]
fn total_weight_matches_gaussian_integral_2d() {
    // ∫∫ exp(-x^2/a^2 - y^2/b^2) over a wide box ≈ pi * a * b
    let (a, b) = (1.0e-6, 0.5e-6);
    let exact = PI * a * b;
    let grid = GridSpec::new([
        AxisSpec::new(-5.0e-6, 5.0e-6, 40),
        AxisSpec::new(-3.0e-6, 3.0e-6, 30),
    ])
    .unwrap();
    let field = GaussianProfile { peak: 1.0, centre: [0.0, 0.0], waist: [a, b] };
    let batch = GridSampler::new(64).unwrap().with_seed(31).sample(&grid, &field).unwrap();
    let rel = (batch.total_weight() - exact).abs() / exact;
    assert!(rel < 1e-2, "relative error {rel}");
}

#[test]
fn constant_field_integral_is_exact() {
    let grid = GridSpec::new([
        AxisSpec::new(0.0, 2.0, 3),
        AxisSpec::new(0.0, 1.0, 4),
        AxisSpec::new(0.0, 0.5, 2),
    ])
    .unwrap();
    let field = from_fn(|_: &[f64; 3]| 8.0);
    let batch = GridSampler::new(5).unwrap().with_seed(1).sample(&grid, &field).unwrap();
    assert_eq!(batch.len(), 3 * 4 * 2 * 5);
    assert!((batch.total_weight() - 8.0).abs() < 1e-12);
}
