//! Data-quality detection.
//!
//! Detectors follow one lifecycle: a [`DetectorSpec`](dq_model::DetectorSpec)
//! is configured, fitted on data into a [`Detector`], applied with
//! [`Detector::detect`] and summarized by a [`ReportBuilder`]. The fitted
//! detector can be stored as JSON and replayed on new data without
//! re-estimating anything.
//!
//! - [`estimate`]: bounds, quantile and frequency estimators
//! - [`alternatives`]: key-collision clustering of categorical labels
//! - [`multivariate`]: associations and robust distance outliers
//! - [`by_category`]: range methods fitted per category
//! - [`checks`]: stateless text and value checks

pub mod alternatives;
pub mod by_category;
pub mod checks;
pub mod compare;
pub mod detection;
pub mod detector;
pub mod estimate;
pub mod frame;
pub mod multivariate;
pub mod report;
pub mod stats;

pub use alternatives::{ClusterIndex, fingerprint};
pub use checks::{Cast, CastParser};
pub use detection::{Detection, detect, replay};
pub use detector::{Detector, FitInput};
pub use report::ReportBuilder;
