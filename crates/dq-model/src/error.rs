//! Error types shared by detection and cleaning.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors surfaced by configure, fit, detect and clean.
///
/// Missing values are never an error; they are a policy of the detector.
#[derive(Debug, Error)]
pub enum Error {
    // === Configuration Errors ===
    /// Unknown method, missing or out-of-range option, contradictory options.
    #[error("configuration error: {0}")]
    Configuration(String),

    // === Data Shape Errors ===
    /// Column set or kinds differ from what the detector expects.
    #[error("schema error: {0}")]
    Schema(String),

    /// Cleaning strategy cannot be applied to this detector's result.
    #[error("strategy '{strategy}' is not compatible with '{method}' detection")]
    IncompatibleStrategy { strategy: String, method: String },

    // === Estimation Errors ===
    /// Normality was required and the fit data failed the test.
    #[error("{message}")]
    NotNormal {
        message: String,
        pvalue: Option<f64>,
    },

    // === Wrapped Errors ===
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    pub fn incompatible(strategy: impl Into<String>, method: impl Into<String>) -> Self {
        Self::IncompatibleStrategy {
            strategy: strategy.into(),
            method: method.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
