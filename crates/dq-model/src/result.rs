//! Output of a detection run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-row diagnostics attached to a detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "detail", content = "values", rename_all = "snake_case")]
pub enum DetectionDetail {
    #[default]
    None,
    /// Cluster index of each row's label; `None` for missing or unknown labels.
    Clusters(Vec<Option<usize>>),
    /// Robust distance of each row; `None` for rows with missing cells.
    Distances(Vec<Option<f64>>),
}

/// Row mask and counts of a detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    mask: Vec<bool>,
    n_errors: usize,
    n_missing_rows: usize,
    detail: DetectionDetail,
    detected_at: DateTime<Utc>,
}

impl DetectionResult {
    pub fn new(mask: Vec<bool>, n_missing_rows: usize, detail: DetectionDetail) -> Self {
        let n_errors = mask.iter().filter(|&&flagged| flagged).count();
        Self {
            mask,
            n_errors,
            n_missing_rows,
            detail,
            detected_at: Utc::now(),
        }
    }

    /// Per-row error flags, aligned with the input rows.
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    pub fn n_errors(&self) -> usize {
        self.n_errors
    }

    pub fn n_missing_rows(&self) -> usize {
        self.n_missing_rows
    }

    pub fn detail(&self) -> &DetectionDetail {
        &self.detail
    }

    pub fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }

    /// Row indices flagged as errors.
    pub fn error_indices(&self) -> Vec<usize> {
        self.mask
            .iter()
            .enumerate()
            .filter_map(|(idx, &flagged)| flagged.then_some(idx))
            .collect()
    }
}
