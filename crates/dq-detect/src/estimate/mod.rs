//! Parameter estimation for range and statistical detectors.
//!
//! Produces the [`FittedState`] of the bounded, quantiles, IQR, z-score and
//! modified z-score methods, and the accepted-value sets of the counts and
//! freq methods.

pub mod frequency;
pub mod gaussian;

use dq_model::{
    BoundedOptions, Error, Estimate, FittedBounds, FittedState, Method, QuantilesOptions, Result,
    Sided,
};

use crate::stats::descriptive;

/// Fitted state of a numeric range method on `values` (missing cells
/// already removed).
pub fn range(method: &Method, values: &[f64]) -> Result<FittedState> {
    match method {
        Method::Bounded(o) => Ok(bounded(o)),
        Method::Quantiles(o) => Ok(quantiles(o, values)),
        Method::Iqr(o) => gaussian::fit(gaussian::Family::Iqr, o, values),
        Method::Zscore(o) => gaussian::fit(gaussian::Family::Zscore, o, values),
        Method::Modzscore(o) => gaussian::fit(gaussian::Family::Modzscore, o, values),
        other => Err(Error::configuration(format!(
            "'{}' is not a numeric range method",
            other.name()
        ))),
    }
}

/// Literal bounds, with the unchecked side removed.
pub fn bounded(options: &BoundedOptions) -> FittedState {
    let (lower, upper) = apply_sided(options.sided, options.lower, options.upper);
    FittedState::Bounds(FittedBounds::literal(lower, upper))
}

/// Bounds at the empirical `lowerq` and `upperq` quantiles of `values`.
pub fn quantiles(options: &QuantilesOptions, values: &[f64]) -> FittedState {
    let sorted = descriptive::sorted(values);
    let (Some(lower), Some(upper)) = (
        descriptive::quantile_sorted(&sorted, options.lowerq),
        descriptive::quantile_sorted(&sorted, options.upperq),
    ) else {
        return FittedState::Trivial;
    };
    let (lo, hi) = apply_sided(options.sided, Some(lower), Some(upper));
    FittedState::Bounds(FittedBounds {
        lower: lo,
        upper: hi,
        estimate: Some(Estimate::Quantiles { lower, upper }),
        ..FittedBounds::default()
    })
}

fn apply_sided(sided: Sided, lower: Option<f64>, upper: Option<f64>) -> (Option<f64>, Option<f64>) {
    (
        lower.filter(|_| sided.checks_lower()),
        upper.filter(|_| sided.checks_upper()),
    )
}
