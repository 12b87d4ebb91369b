// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Types
// License: MIT
// ─────────────────────────────────────────────────────────────────────
pub mod config;
pub mod defaults;
pub mod error;
pub mod grid;
