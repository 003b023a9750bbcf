//! Numeric kernels behind the estimators.

pub mod descriptive;
pub mod distribution;
pub mod linalg;
pub mod normality;
pub mod power;
