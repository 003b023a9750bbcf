//! IQR, z-score and modified z-score bounds with optional power transform.

use dq_model::{
    Error, Estimate, FittedBounds, FittedState, FittedTransform, GaussianOptions,
    NormalTestPolicy, PowerTransform, Result, TransformChoice,
};

use crate::stats::{descriptive, normality, power};

/// Normal-consistency constant of the median absolute deviation.
pub const MAD_CONSISTENCY: f64 = 0.6745;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Iqr,
    Zscore,
    Modzscore,
}

impl Family {
    pub fn name(self) -> &'static str {
        match self {
            Self::Iqr => "iqr",
            Self::Zscore => "zscore",
            Self::Modzscore => "modzscore",
        }
    }

    pub fn default_threshold(self) -> f64 {
        match self {
            Self::Iqr => 1.5,
            Self::Zscore | Self::Modzscore => 3.0,
        }
    }
}

/// Resolved threshold of `options` for `family`.
pub fn threshold(family: Family, options: &GaussianOptions) -> f64 {
    options
        .threshold
        .unwrap_or_else(|| family.default_threshold())
}

/// Estimates bounds on `values` (missing cells already removed).
pub fn fit(family: Family, options: &GaussianOptions, values: &[f64]) -> Result<FittedState> {
    if values.is_empty() {
        return Ok(FittedState::Trivial);
    }

    let needs_test =
        options.transform != TransformChoice::None || options.normaltest != NormalTestPolicy::Ignore;
    let test = if needs_test {
        normality::normaltest(values)
    } else {
        None
    };
    let normal = needs_test.then(|| test.is_some_and(|t| t.pvalue > options.pvalue));
    let pvalue = test.map(|t| t.pvalue);

    if normal == Some(false) {
        let message = if values.len() < normality::MIN_SAMPLES {
            format!(
                "not enough rows to test normality, must be > {}",
                normality::MIN_SAMPLES - 1
            )
        } else {
            match pvalue {
                Some(p) => format!("distribution is not normal (p = {p:.3e})"),
                None => "distribution is not normal (test undefined)".to_string(),
            }
        };
        match options.normaltest {
            NormalTestPolicy::Error => return Err(Error::NotNormal { message, pvalue }),
            NormalTestPolicy::Warn => tracing::warn!(method = family.name(), "{message}"),
            NormalTestPolicy::Ignore => tracing::debug!(method = family.name(), "{message}"),
        }
    }

    let transform = if normal == Some(false) {
        choose_transform(options.transform, values)
    } else {
        None
    };
    let working: Vec<f64> = match &transform {
        Some(t) => values.iter().map(|&x| power::apply(t, x)).collect(),
        None => values.to_vec(),
    };

    let k = threshold(family, options);
    let Some((estimate, lower, upper)) = spread_bounds(family, k, &working) else {
        tracing::debug!(
            method = family.name(),
            n = values.len(),
            "spread undefined, nothing can be detected"
        );
        return Ok(FittedState::Trivial);
    };

    let lower = options.sided.checks_lower().then_some(lower);
    let upper = options.sided.checks_upper().then_some(upper);
    let (lower, upper) = match &transform {
        Some(t) => (
            lower.and_then(|b| finite(power::invert(t, b))),
            upper.and_then(|b| finite(power::invert(t, b))),
        ),
        None => (lower, upper),
    };

    tracing::debug!(
        method = family.name(),
        n = values.len(),
        ?lower,
        ?upper,
        transform = transform.map(|t| t.family.as_str()),
        "estimated bounds"
    );

    Ok(FittedState::Bounds(FittedBounds {
        lower,
        upper,
        estimate: Some(estimate),
        transform,
        pvalue,
        normal,
    }))
}

fn choose_transform(choice: TransformChoice, values: &[f64]) -> Option<FittedTransform> {
    let family = match choice {
        TransformChoice::None => return None,
        TransformChoice::Boxcox => PowerTransform::BoxCox,
        TransformChoice::Yeojohnson => PowerTransform::YeoJohnson,
        TransformChoice::Auto => {
            if values.iter().all(|&x| x > 0.0) {
                PowerTransform::BoxCox
            } else {
                PowerTransform::YeoJohnson
            }
        }
    };
    let fitted = power::fit(values, family);
    if fitted.is_none() {
        tracing::debug!(
            transform = family.as_str(),
            "no transform parameter maximizes the likelihood, using raw values"
        );
    }
    fitted
}

fn spread_bounds(family: Family, k: f64, values: &[f64]) -> Option<(Estimate, f64, f64)> {
    match family {
        Family::Iqr => {
            let sorted = descriptive::sorted(values);
            let q25 = descriptive::quantile_sorted(&sorted, 0.25)?;
            let q75 = descriptive::quantile_sorted(&sorted, 0.75)?;
            let iqr = q75 - q25;
            Some((
                Estimate::Quartiles { q25, q75, iqr },
                q25 - k * iqr,
                q75 + k * iqr,
            ))
        }
        Family::Zscore => {
            let mean = descriptive::mean(values)?;
            let std = descriptive::std(values)?;
            Some((Estimate::Mean { mean, std }, mean - k * std, mean + k * std))
        }
        Family::Modzscore => {
            let median = descriptive::median(values)?;
            let mad = descriptive::mad(values)?;
            let half_width = k * mad / MAD_CONSISTENCY;
            Some((
                Estimate::Median { median, mad },
                median - half_width,
                median + half_width,
            ))
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
