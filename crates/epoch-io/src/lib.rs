// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — IO
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Output of sampled particles.
//!
//! Raw binary particle files for EPOCH and SVG previews of the sampled
//! distribution.

pub mod particle_files;
pub mod plot;
