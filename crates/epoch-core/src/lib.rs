// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Core
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Number density fields to weighted macro-particles.
//!
//! `sampler` walks the grid and draws particles, `preview` evaluates the
//! field on a regular lattice for plotting.

pub mod field;
pub mod particles;
pub mod preview;
pub mod profiles;
pub mod progress;
pub mod sampler;
