use super::config::ConfigError;
use crate::core::models::error::ParameterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Mode index {index} is out of range for a spectrum of {len} modes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Numerical instability during diagonalization: {0}")]
    NumericalInstability(String),
}

impl EngineError {
    /// Whether the failure was caused by caller input rather than by the numerics.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidParameter(_)
                | EngineError::Config(_)
                | EngineError::IndexOutOfRange { .. }
        )
    }

    pub fn is_numerical_instability(&self) -> bool {
        matches!(self, EngineError::NumericalInstability(_))
    }
}
