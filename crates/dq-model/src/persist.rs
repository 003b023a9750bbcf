//! Stored form of a fitted detector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fitted::FittedState;
use crate::schema::Schema;
use crate::spec::{DetectorSpec, Method};

/// `{method, options, fitted_params, fit_schema, fitted_at}`.
///
/// Loading goes back through [`DetectorSpec::configure`], so stored options
/// are validated exactly like fresh ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedDetector {
    pub method: String,
    pub options: serde_json::Value,
    pub fitted_params: FittedState,
    pub fit_schema: Schema,
    pub fitted_at: DateTime<Utc>,
}

impl PersistedDetector {
    pub fn new(
        spec: &DetectorSpec,
        fitted_params: FittedState,
        fit_schema: Schema,
        fitted_at: DateTime<Utc>,
    ) -> Result<Self> {
        if let Method::Custom(_) = spec.method() {
            return Err(Error::configuration(
                "custom detectors wrap a user function and cannot be persisted",
            ));
        }
        Ok(Self {
            method: spec.name().to_string(),
            options: spec.options_json()?,
            fitted_params,
            fit_schema,
            fitted_at,
        })
    }

    pub fn spec(&self) -> Result<DetectorSpec> {
        DetectorSpec::configure(&self.method, self.options.clone())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
