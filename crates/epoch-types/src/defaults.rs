// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Defaults
// License: MIT
// ─────────────────────────────────────────────────────────────────────
/// Preview points per axis when none are given.
pub const DEFAULT_PREVIEW_SAMPLES: usize = 1000;

/// Particles with a sampled density below this are dropped. Zero keeps all.
pub const DEFAULT_DENSITY_THRESHOLD: f64 = 0.0;

/// Peak number density of the built-in profiles [m^-3].
pub const DEFAULT_PEAK_DENSITY: f64 = 1e25;

/// Centres of the built-in Gaussian profile per axis (x, y, z) [m].
/// The 1D profile is centred at the origin.
pub const GAUSSIAN_CENTRE_M: [f64; 3] = [0.2e-6, -0.1e-6, 0.3e-6];

/// Waists of the built-in Gaussian profile per axis (x, y, z) [m].
pub const GAUSSIAN_WAIST_M: [f64; 3] = [1e-6, 0.5e-6, 0.7e-6];

/// Names of the coordinate axes in traversal order.
pub const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// Highest supported dimensionality.
pub const MAX_DIMENSIONS: usize = 3;
