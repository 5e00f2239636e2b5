use thiserror::Error;

use super::config::ConfigError;
use crate::core::forcefield::energy::ForceFieldError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Force field error: {source}")]
    ForceField {
        #[from]
        source: ForceFieldError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
