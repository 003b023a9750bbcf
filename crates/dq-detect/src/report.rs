//! Assembles the structured [`Report`] of a detection run.

use dq_model::{
    DetectionResult, Estimate, FittedState, Method, ParamValue, Parameter, Report,
};

use crate::detector::Detector;

/// Builds the report of one detector applied to one dataset.
pub struct ReportBuilder<'a> {
    detector: &'a Detector,
    result: &'a DetectionResult,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(detector: &'a Detector, result: &'a DetectionResult) -> Self {
        Self { detector, result }
    }

    pub fn build(&self) -> Report {
        let mut parameters = method_parameters(self.detector.method());
        parameters.extend(state_parameters(self.detector.state()));
        parameters.push(Parameter::new(
            "missing",
            self.detector.spec().missing().as_str(),
        ));

        Report {
            method: self.detector.name().to_string(),
            n_samples: self.result.len(),
            n_errors: self.result.n_errors(),
            n_missing_rows: self.result.n_missing_rows(),
            fitted_at: self.detector.fitted_at(),
            detected_at: self.result.detected_at(),
            parameters,
            estimates: estimates(self.detector.state()),
            comments: comments(self.detector.state()),
        }
    }
}

fn method_parameters(method: &Method) -> Vec<Parameter> {
    match method {
        Method::Bounded(o) => vec![
            Parameter::new("inclusive", o.inclusive.as_str()),
            Parameter::new("sided", o.sided.as_str()),
        ],
        Method::Quantiles(o) => vec![
            Parameter::new("lowerq", o.lowerq),
            Parameter::new("upperq", o.upperq),
            Parameter::new("inclusive", o.inclusive.as_str()),
            Parameter::new("sided", o.sided.as_str()),
        ],
        Method::Iqr(o) | Method::Zscore(o) | Method::Modzscore(o) => vec![
            Parameter::new("threshold", o.threshold),
            Parameter::new("inclusive", o.inclusive.as_str()),
            Parameter::new("sided", o.sided.as_str()),
            Parameter::new("normaltest", o.normaltest.as_str()),
            Parameter::new("transform", o.transform.as_str()),
        ],
        Method::Length(o) => vec![
            Parameter::new("lower", o.lower),
            Parameter::new("upper", o.upper),
            Parameter::new("value", o.value),
            Parameter::new("inclusive", o.inclusive.as_str()),
        ],
        Method::Missing(o) => vec![Parameter::new("how", o.how.as_str())],
        Method::Duplicated(o) => vec![
            Parameter::new("subset", o.subset.clone()),
            Parameter::new("keep", o.keep.as_str()),
        ],
        Method::Enum(o) => vec![
            Parameter::new(
                "values",
                o.values.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ),
            Parameter::new("forbidden", o.forbidden),
        ],
        Method::Value(o) => vec![
            Parameter::new("value", o.value.to_string()),
            Parameter::new("forbidden", o.forbidden),
        ],
        Method::Counts(o) => vec![Parameter::new("n", o.n)],
        Method::Freq(o) => vec![Parameter::new("freq", o.freq)],
        Method::Pattern(o) => vec![
            Parameter::new("pattern", o.pattern.as_str()),
            Parameter::new("mode", o.mode.as_str()),
            Parameter::new("case", o.case),
        ],
        Method::Email(_) => Vec::new(),
        Method::Url(o) => vec![Parameter::new("check_protocol", o.check_protocol)],
        Method::Spaces(o) => vec![Parameter::new("side", o.side.as_str())],
        Method::Castable(o) => vec![
            Parameter::new("target", o.target.as_str()),
            Parameter::new("thousands", o.thousands.clone()),
            Parameter::new("decimal", o.decimal.clone()),
            Parameter::new("date_format", o.date_format.clone()),
        ],
        Method::DateRange(o) => vec![
            Parameter::new("lower", o.lower.clone()),
            Parameter::new("upper", o.upper.clone()),
            Parameter::new("inclusive", o.inclusive.as_str()),
        ],
        Method::Alternatives(o) => vec![Parameter::new(
            "representative",
            o.representative.as_str(),
        )],
        Method::Associations(o) => vec![
            Parameter::new("min_count", o.min_count),
            Parameter::new("min_freq", o.min_freq),
        ],
        Method::Outliers(o) => vec![
            Parameter::new("quantile", o.quantile),
            Parameter::new("support_fraction", o.support_fraction),
        ],
        Method::ByCategory(o) => {
            let mut rows = vec![Parameter::new("within", o.within.name())];
            rows.extend(method_parameters(&o.within));
            rows
        }
        Method::Custom(_) => Vec::new(),
    }
}

fn state_parameters(state: &FittedState) -> Vec<Parameter> {
    match state {
        FittedState::Trivial | FittedState::Literal => Vec::new(),
        FittedState::Bounds(b) => vec![
            Parameter::new("lower", b.lower),
            Parameter::new("upper", b.upper),
        ],
        FittedState::Values(v) => vec![Parameter::new(
            "valid",
            v.valid.iter().cloned().collect::<Vec<_>>(),
        )],
        FittedState::Clusters(c) => vec![
            Parameter::new("n_clusters", c.clusters.len()),
            Parameter::new("n_collisions", c.collisions().count()),
        ],
        FittedState::Associations(a) => vec![
            Parameter::new("n_combinations", a.combinations.len()),
            Parameter::new(
                "n_invalid",
                a.combinations.iter().filter(|c| !c.valid).count(),
            ),
        ],
        FittedState::Robust(r) => vec![
            Parameter::new("threshold", r.threshold),
            Parameter::new("support", r.support),
        ],
        FittedState::Groups(g) => vec![
            Parameter::new("category", g.category.as_str()),
            Parameter::new("value", g.value.as_str()),
            Parameter::new("categories", g.groups.keys().cloned().collect::<Vec<_>>()),
        ],
    }
}

fn estimates(state: &FittedState) -> Vec<Parameter> {
    let Some(bounds) = state.bounds() else {
        return Vec::new();
    };
    let mut rows = match bounds.estimate {
        Some(Estimate::Quantiles { lower, upper }) => vec![
            Parameter::new("lower_quantile", lower),
            Parameter::new("upper_quantile", upper),
        ],
        Some(Estimate::Quartiles { q25, q75, iqr }) => vec![
            Parameter::new("q25", q25),
            Parameter::new("q75", q75),
            Parameter::new("iqr", iqr),
        ],
        Some(Estimate::Mean { mean, std }) => {
            vec![Parameter::new("mean", mean), Parameter::new("std", std)]
        }
        Some(Estimate::Median { median, mad }) => {
            vec![Parameter::new("median", median), Parameter::new("mad", mad)]
        }
        None => Vec::new(),
    };
    if let Some(pvalue) = bounds.pvalue {
        rows.push(Parameter::new("normaltest_pvalue", pvalue));
    }
    if let Some(t) = bounds.transform {
        rows.push(Parameter::new("lambda", t.lambda));
    }
    rows
}

fn comments(state: &FittedState) -> Vec<String> {
    let mut comments = Vec::new();
    match state {
        FittedState::Trivial => {
            comments.push("fitted on empty input: nothing can be detected".to_string());
        }
        FittedState::Bounds(b) => {
            if b.normal == Some(false) {
                let p = b.pvalue.map_or(ParamValue::Missing, ParamValue::Float);
                comments.push(format!("data is not normally distributed (p-value: {p})"));
            }
            if let Some(t) = b.transform {
                comments.push(format!(
                    "bounds estimated on {}-transformed data (lambda = {})",
                    t.family.as_str(),
                    ParamValue::Float(t.lambda)
                ));
            }
        }
        _ => {}
    }
    comments
}
