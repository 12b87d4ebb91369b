// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Error
// License: MIT
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpochError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to load number density distribution: {0}")]
    FieldLoad(String),

    #[error("Density evaluation failed at {point}: {message}")]
    FieldEvaluation { point: String, message: String },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EpochError {
    /// Field-evaluation failure located at `point`.
    pub fn evaluation(point: &[f64], message: impl Into<String>) -> Self {
        EpochError::FieldEvaluation {
            point: format!("{point:?}"),
            message: message.into(),
        }
    }
}

pub type EpochResult<T> = Result<T, EpochError>;
