//! A detector together with the result of applying it.

use polars::prelude::DataFrame;

use dq_model::{DetectionResult, DetectorSpec, Report, Result};

use crate::detector::{Detector, FitInput};
use crate::frame;
use crate::report::ReportBuilder;

/// Owned pair of a fitted detector and one of its detection results.
///
/// Every accessor is a pure derivation of the pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    detector: Detector,
    result: DetectionResult,
}

impl Detection {
    pub fn new(detector: Detector, result: DetectionResult) -> Self {
        Self { detector, result }
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn result(&self) -> &DetectionResult {
        &self.result
    }

    pub fn into_parts(self) -> (Detector, DetectionResult) {
        (self.detector, self.result)
    }

    /// Per-row error flags.
    pub fn is_error(&self) -> &[bool] {
        self.result.mask()
    }

    pub fn not_error(&self) -> Vec<bool> {
        self.result.mask().iter().map(|flag| !flag).collect()
    }

    pub fn n_errors(&self) -> usize {
        self.result.n_errors()
    }

    pub fn has_errors(&self) -> bool {
        self.result.n_errors() > 0
    }

    pub fn error_indices(&self) -> Vec<usize> {
        self.result.error_indices()
    }

    /// Rows of `data` flagged as errors.
    pub fn detected(&self, data: &DataFrame) -> Result<DataFrame> {
        frame::filter_rows(data, self.is_error())
    }

    /// Rows of `data` not flagged as errors.
    pub fn valid(&self, data: &DataFrame) -> Result<DataFrame> {
        frame::filter_rows(data, &self.not_error())
    }

    pub fn report(&self) -> Report {
        ReportBuilder::new(&self.detector, &self.result).build()
    }
}

/// Configures, fits and applies `method` on `data` in one call.
pub fn detect(method: &str, data: &DataFrame, options: serde_json::Value) -> Result<Detection> {
    let spec = DetectorSpec::configure(method, options)?;
    let detector = Detector::new(FitInput::Estimate { spec: &spec, data })?;
    let result = detector.detect(data)?;
    Ok(Detection::new(detector, result))
}

/// Applies an already fitted detector to `data` without re-estimating.
pub fn replay(detector: &Detector, data: &DataFrame) -> Result<Detection> {
    let detector = Detector::new(FitInput::Replay(detector))?;
    let result = detector.detect(data)?;
    Ok(Detection::new(detector, result))
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;
    use serde_json::json;

    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![Series::new("x".into(), &[1i64, 5, -6, 100, 10]).into()]).unwrap()
    }

    #[test]
    fn test_detected_and_valid_partition_rows() {
        let df = frame();
        let detection = detect("bounded", &df, json!({"lower": 0, "upper": 10})).unwrap();
        assert!(detection.has_errors());
        assert_eq!(detection.detected(&df).unwrap().height(), 2);
        let valid = detection.valid(&df).unwrap();
        let values: Vec<Option<i64>> = valid.column("x").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1), Some(5), Some(10)]);
    }

    #[test]
    fn test_replay_on_new_rows() {
        let detection = detect("bounded", &frame(), json!({"lower": 0, "upper": 10})).unwrap();
        let incoming =
            DataFrame::new(vec![Series::new("x".into(), &[11i64, 3]).into()]).unwrap();
        let replayed = replay(detection.detector(), &incoming).unwrap();
        assert_eq!(replayed.is_error(), &[true, false]);
    }
}
