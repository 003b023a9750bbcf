//! Parameters learned by `fit`.
//!
//! Unbounded or undefined quantities are stored as `None` rather than as
//! infinities or `NaN`, which keeps the JSON form lossless.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Power transform family chosen by the transform search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerTransform {
    #[serde(rename = "boxcox")]
    BoxCox,
    #[serde(rename = "yeojohnson")]
    YeoJohnson,
}

impl PowerTransform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BoxCox => "boxcox",
            Self::YeoJohnson => "yeojohnson",
        }
    }
}

/// A fitted power transform: `family(x + shift; lambda)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedTransform {
    pub family: PowerTransform,
    pub lambda: f64,
    pub shift: f64,
}

/// Center and spread statistics behind a set of bounds.
///
/// Values are on the transformed scale when a transform was applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "statistic", rename_all = "snake_case")]
pub enum Estimate {
    Quantiles { lower: f64, upper: f64 },
    Quartiles { q25: f64, q75: f64, iqr: f64 },
    Mean { mean: f64, std: f64 },
    Median { median: f64, mad: f64 },
}

/// Numeric bounds, literal or estimated, in original units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FittedBounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    #[serde(default)]
    pub estimate: Option<Estimate>,
    #[serde(default)]
    pub transform: Option<FittedTransform>,
    /// Normality test p-value of the fit data, when the test ran.
    #[serde(default)]
    pub pvalue: Option<f64>,
    /// Whether the fit data passed the normality test.
    #[serde(default)]
    pub normal: Option<bool>,
}

impl FittedBounds {
    pub fn literal(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self {
            lower,
            upper,
            ..Self::default()
        }
    }
}

/// Values accepted by the counts and freq detectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FittedValues {
    pub valid: BTreeSet<String>,
    pub n_samples: usize,
}

/// Labels sharing one fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub key: String,
    pub representative: String,
    /// Distinct literal labels in first-encountered order.
    pub labels: Vec<String>,
}

/// Fingerprint clusters, in order of first encounter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FittedClusters {
    pub clusters: Vec<Cluster>,
}

impl FittedClusters {
    /// Clusters holding more than one distinct label.
    pub fn collisions(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(|c| c.labels.len() > 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub values: Vec<String>,
    pub count: usize,
    pub valid: bool,
}

/// Observed cross-column combinations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FittedAssociations {
    pub combinations: Vec<Combination>,
    /// Rows without missing cells seen at fit.
    pub n_samples: usize,
}

/// Robust location and scatter of numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedRobust {
    pub location: Vec<f64>,
    pub covariance: Vec<Vec<f64>>,
    /// Inverse of `covariance`.
    pub precision: Vec<Vec<f64>>,
    /// Distance above which a row is an outlier.
    pub threshold: f64,
    /// Rows in the final support subset.
    pub support: usize,
}

/// Per-category states of a by-category detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedGroups {
    /// Column holding the categories.
    pub category: String,
    /// Numeric column checked within each category.
    pub value: String,
    /// Fitted state of the inner method, keyed by category.
    pub groups: BTreeMap<String, FittedState>,
}

/// Method-specific state produced by `fit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedState {
    /// Fitted on empty input: nothing can be detected.
    Trivial,
    /// No learned parameters; the options say everything.
    Literal,
    Bounds(FittedBounds),
    Values(FittedValues),
    Clusters(FittedClusters),
    Associations(FittedAssociations),
    Robust(FittedRobust),
    Groups(FittedGroups),
}

impl FittedState {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Literal => "literal",
            Self::Bounds(_) => "bounds",
            Self::Values(_) => "values",
            Self::Clusters(_) => "clusters",
            Self::Associations(_) => "associations",
            Self::Robust(_) => "robust",
            Self::Groups(_) => "groups",
        }
    }

    pub fn bounds(&self) -> Option<&FittedBounds> {
        match self {
            Self::Bounds(b) => Some(b),
            _ => None,
        }
    }

    pub fn clusters(&self) -> Option<&FittedClusters> {
        match self {
            Self::Clusters(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_side_serializes_as_null() {
        let state = FittedState::Bounds(FittedBounds::literal(Some(0.0), None));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["kind"], "bounds");
        assert!(json["upper"].is_null());
        let back: FittedState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_estimate_tagging() {
        let estimate = Estimate::Median {
            median: 1.0,
            mad: 0.5,
        };
        let json = serde_json::to_string(&estimate).unwrap();
        assert_eq!(json, r#"{"statistic":"median","median":1.0,"mad":0.5}"#);
    }
}
