//! Error type for pursuit operations and configuration.

use thiserror::Error;

/// Failures the pursuit subsystem reports. Operations invoked by gameplay
/// code log these and degrade to no-ops; config loading returns them.
#[derive(Debug, Error)]
pub enum PursuitError {
    #[error("no target attached")]
    NoTarget,
    #[error("no chaser template configured")]
    NoChaserTemplate,
    #[error("invalid pursuit config: {0}")]
    InvalidConfig(String),
    #[error("malformed pursuit config: {0}")]
    Json(#[from] serde_json::Error),
}
