use crate::spots::error::SpotLookupError;
use thiserror::Error;

/// Errors surfaced to callers of the forecast service.
///
/// Upstream failures never appear here: they are absorbed by the synthetic
/// fallback.
#[derive(Debug, Error)]
pub enum SurfcastError {
    #[error("Spot '{0}' not found")]
    NotFound(String),

    #[error("Spot '{0}' has no usable coordinates")]
    UnprocessableInput(String),

    #[error(transparent)]
    SpotLookup(#[from] SpotLookupError),

    #[error("Internal forecast error: {0}")]
    Internal(String),

    #[error("Invalid value '{value}' for environment variable {name}")]
    InvalidConfig { name: &'static str, value: String },
}

impl SurfcastError {
    /// The HTTP status an entry point should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            SurfcastError::NotFound(_) => 404,
            SurfcastError::UnprocessableInput(_) => 422,
            SurfcastError::SpotLookup(_) => 502,
            SurfcastError::Internal(_) | SurfcastError::InvalidConfig { .. } => 500,
        }
    }
}
