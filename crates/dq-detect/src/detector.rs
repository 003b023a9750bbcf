//! The fitted detector: spec, learned parameters and fit schema.
//!
//! A [`Detector`] is created once by [`Detector::fit`] (or replayed from an
//! existing one) and is immutable afterwards. `detect` can be called any
//! number of times on frames whose schema matches the fit schema, whatever
//! their row count.

use chrono::{DateTime, Utc};
use polars::prelude::{Column, DataFrame};

use dq_model::{
    Arity, CustomOptions, DetectionDetail, DetectionResult, DetectorSpec, Error, FittedBounds,
    FittedState, Method, MissingPolicy, PersistedDetector, Result, Schema, Value,
};

use crate::checks::strings::{has_extra_spaces, is_email, is_url, length_violates};
use crate::checks::{CastParser, PatternMatcher, values};
use crate::estimate::{self, frequency};
use crate::{alternatives, by_category, frame, multivariate};

/// How a detector obtains its fitted state.
#[derive(Debug, Clone, Copy)]
pub enum FitInput<'a> {
    /// Estimate parameters from `data`.
    Estimate {
        spec: &'a DetectorSpec,
        data: &'a DataFrame,
    },
    /// Reuse the parameters of an already fitted detector.
    Replay(&'a Detector),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detector {
    spec: DetectorSpec,
    state: FittedState,
    schema: Schema,
    fitted_at: DateTime<Utc>,
}

impl Detector {
    pub fn new(input: FitInput<'_>) -> Result<Self> {
        match input {
            FitInput::Estimate { spec, data } => Self::fit(spec.clone(), data),
            FitInput::Replay(detector) => Ok(detector.clone()),
        }
    }

    /// Estimates the parameters of `spec` on `data`.
    pub fn fit(spec: DetectorSpec, data: &DataFrame) -> Result<Self> {
        let schema = frame::schema_of(data)?;
        check_shape(spec.method(), &schema)?;
        let state = estimate_state(spec.method(), data)?;
        tracing::debug!(
            method = spec.name(),
            rows = data.height(),
            state = state.kind(),
            "fitted detector"
        );
        Ok(Self {
            spec,
            state,
            schema,
            fitted_at: Utc::now(),
        })
    }

    /// Builds a detector whose parameters are all given literally.
    pub fn from_parameters(spec: DetectorSpec, schema: Schema) -> Result<Self> {
        if !spec.method().is_literal() {
            return Err(Error::configuration(format!(
                "'{}' estimates its parameters and must be fitted on data",
                spec.name()
            )));
        }
        check_shape(spec.method(), &schema)?;
        Ok(Self {
            state: literal_state(spec.method()),
            spec,
            schema,
            fitted_at: Utc::now(),
        })
    }

    pub fn spec(&self) -> &DetectorSpec {
        &self.spec
    }

    pub fn method(&self) -> &Method {
        self.spec.method()
    }

    pub fn name(&self) -> &'static str {
        self.spec.name()
    }

    pub fn state(&self) -> &FittedState {
        &self.state
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn fitted_at(&self) -> DateTime<Utc> {
        self.fitted_at
    }

    /// Numeric bounds, for range and statistical detectors.
    pub fn bounds(&self) -> Option<&FittedBounds> {
        self.state.bounds()
    }

    pub fn is_trivial(&self) -> bool {
        self.state == FittedState::Trivial
    }

    /// Flags the rows of `data` according to the fitted parameters.
    pub fn detect(&self, data: &DataFrame) -> Result<DetectionResult> {
        let schema = frame::schema_of(data)?;
        if let Some(mismatch) = self.schema.mismatch(&schema) {
            return Err(Error::schema(mismatch));
        }

        let missing = frame::missing_counts(data)?;
        let n_missing_rows = missing.iter().filter(|&&count| count > 0).count();
        let (mut mask, detail) = self.method_mask(data, &missing)?;

        if self.spec.missing() == MissingPolicy::Flag && !matches!(self.method(), Method::Missing(_))
        {
            for (flag, &count) in mask.iter_mut().zip(&missing) {
                *flag |= count > 0;
            }
        }

        let result = DetectionResult::new(mask, n_missing_rows, detail);
        tracing::debug!(
            method = self.name(),
            rows = result.len(),
            errors = result.n_errors(),
            missing_rows = n_missing_rows,
            "detected"
        );
        Ok(result)
    }

    fn method_mask(&self, data: &DataFrame, missing: &[usize]) -> Result<(Vec<bool>, DetectionDetail)> {
        if self.is_trivial() {
            return Ok((vec![false; data.height()], DetectionDetail::None));
        }
        let mask = match (self.method(), &self.state) {
            (Method::Bounded(o), FittedState::Bounds(b)) => {
                values::outside_bounds(&frame::numeric_values(single(data)?)?, b, o.inclusive)
            }
            (Method::Quantiles(o), FittedState::Bounds(b)) => {
                values::outside_bounds(&frame::numeric_values(single(data)?)?, b, o.inclusive)
            }
            (Method::Iqr(o) | Method::Zscore(o) | Method::Modzscore(o), FittedState::Bounds(b)) => {
                values::outside_bounds(&frame::numeric_values(single(data)?)?, b, o.inclusive)
            }
            (Method::Length(o), FittedState::Literal) => frame::key_values(single(data)?)?
                .iter()
                .map(|k| k.as_deref().is_some_and(|s| length_violates(s, o)))
                .collect(),
            (Method::Missing(o), FittedState::Literal) => {
                values::missing_rows(missing, data.width(), o.how)
            }
            (Method::Duplicated(o), FittedState::Literal) => {
                let columns = match &o.subset {
                    Some(subset) => subset.clone(),
                    None => self.schema.names().map(str::to_string).collect(),
                };
                values::duplicated(&frame::row_keys(data, &columns)?, o.keep)
            }
            (Method::Enum(o), FittedState::Literal) => {
                let allowed = o.values.iter().filter_map(Value::key).collect();
                values::membership(&frame::key_values(single(data)?)?, &allowed, o.forbidden)
            }
            (Method::Value(o), FittedState::Literal) => {
                let allowed = o.value.key().into_iter().collect();
                values::membership(&frame::key_values(single(data)?)?, &allowed, o.forbidden)
            }
            (Method::Counts(_) | Method::Freq(_), FittedState::Values(v)) => {
                values::unaccepted(&frame::key_values(single(data)?)?, v)
            }
            (Method::Pattern(o), FittedState::Literal) => {
                let matcher = PatternMatcher::new(o)?;
                flag_text(single(data)?, |s| !matcher.is_match(s))?
            }
            (Method::Email(_), FittedState::Literal) => flag_text(single(data)?, |s| !is_email(s))?,
            (Method::Url(o), FittedState::Literal) => {
                flag_text(single(data)?, |s| !is_url(s, o.check_protocol))?
            }
            (Method::Spaces(o), FittedState::Literal) => {
                flag_text(single(data)?, |s| has_extra_spaces(s, o.side))?
            }
            (Method::Castable(o), FittedState::Literal) => {
                let parser = CastParser::new(o);
                flag_text(single(data)?, |s| !parser.is_castable(s))?
            }
            (Method::DateRange(o), FittedState::Literal) => {
                let (lower, upper) = o.bounds()?;
                values::outside_dates(
                    &frame::datetime_values(single(data)?)?,
                    lower,
                    upper,
                    o.inclusive,
                )
            }
            (Method::Alternatives(_), FittedState::Clusters(c)) => {
                let (mask, ids) = alternatives::detect(c, &frame::text_values(single(data)?)?);
                return Ok((mask, DetectionDetail::Clusters(ids)));
            }
            (Method::Associations(_), FittedState::Associations(a)) => {
                let columns: Vec<String> = self.schema.names().map(str::to_string).collect();
                multivariate::detect_associations(a, &frame::row_keys(data, &columns)?)
            }
            (Method::Outliers(_), FittedState::Robust(r)) => {
                let (mask, distances) = multivariate::detect_robust(r, &frame::numeric_rows(data)?);
                return Ok((mask, DetectionDetail::Distances(distances)));
            }
            (Method::ByCategory(o), FittedState::Groups(g)) => by_category::detect(
                g,
                o.within.inclusive().unwrap_or_default(),
                &frame::numeric_values(data.column(&g.value)?)?,
                &frame::key_values(data.column(&g.category)?)?,
            ),
            (Method::Custom(CustomOptions::Cell(f)), FittedState::Literal) => {
                frame::cell_values(single(data)?)?.iter().map(|v| f(v)).collect()
            }
            (Method::Custom(CustomOptions::Row(f)), FittedState::Literal) => {
                frame::value_rows(data)?.iter().map(|row| f(row.as_slice())).collect()
            }
            (method, state) => return Err(state_mismatch(method, state)),
        };
        Ok((mask, DetectionDetail::None))
    }

    // === Persistence ===

    pub fn to_persisted(&self) -> Result<PersistedDetector> {
        PersistedDetector::new(&self.spec, self.state.clone(), self.schema.clone(), self.fitted_at)
    }

    /// Rebuilds a detector from its stored form, re-validating the options.
    pub fn from_persisted(persisted: PersistedDetector) -> Result<Self> {
        let spec = persisted.spec()?;
        if !state_fits(spec.method(), &persisted.fitted_params) {
            return Err(state_mismatch(spec.method(), &persisted.fitted_params));
        }
        check_shape(spec.method(), &persisted.fit_schema)?;
        check_state(&persisted.fitted_params, &persisted.fit_schema)?;
        Ok(Self {
            spec,
            state: persisted.fitted_params,
            schema: persisted.fit_schema,
            fitted_at: persisted.fitted_at,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        self.to_persisted()?.to_json()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_persisted(PersistedDetector::from_json(json)?)
    }
}

/// Checks column count and kinds against what `method` inspects.
fn check_shape(method: &Method, schema: &Schema) -> Result<()> {
    if schema.is_empty() {
        return Err(Error::schema(format!("'{}' needs at least one column", method.name())));
    }
    match method.arity() {
        Arity::Single if schema.len() != 1 => {
            return Err(Error::schema(format!(
                "'{}' inspects a single column, got {}",
                method.name(),
                schema.len()
            )));
        }
        _ => {}
    }
    match method {
        Method::Associations(_) if schema.len() < 2 => {
            return Err(Error::schema("associations need at least two columns"));
        }
        Method::ByCategory(_) => {
            by_category::split_columns(schema)?;
        }
        Method::Duplicated(o) => {
            if let Some(unknown) = o
                .subset
                .iter()
                .flatten()
                .find(|name| schema.kind_of(name).is_none())
            {
                return Err(Error::schema(format!("subset column '{unknown}' not found")));
            }
        }
        _ => {}
    }
    if let Some(column) = schema.columns().iter().find(|c| !method.accepts(c.kind)) {
        return Err(Error::schema(format!(
            "'{}' cannot inspect {} column '{}'",
            method.name(),
            column.kind,
            column.name
        )));
    }
    Ok(())
}

fn literal_state(method: &Method) -> FittedState {
    match method {
        Method::Bounded(o) => estimate::bounded(o),
        _ => FittedState::Literal,
    }
}

fn estimate_state(method: &Method, data: &DataFrame) -> Result<FittedState> {
    let state = match method {
        Method::Quantiles(_) | Method::Iqr(_) | Method::Zscore(_) | Method::Modzscore(_) => {
            estimate::range(method, &present_numbers(single(data)?)?)?
        }
        Method::Counts(o) => frequency::counts(o, &frame::key_values(single(data)?)?),
        Method::Freq(o) => frequency::freq(o, &frame::key_values(single(data)?)?),
        Method::Alternatives(o) => {
            alternatives::fit(&frame::text_values(single(data)?)?, o.representative)
        }
        Method::Associations(o) => {
            let columns: Vec<String> = data
                .get_columns()
                .iter()
                .map(|column| column.name().to_string())
                .collect();
            multivariate::fit_associations(o, &frame::row_keys(data, &columns)?)
        }
        Method::Outliers(o) => multivariate::fit_robust(o, &frame::numeric_rows(data)?, data.width()),
        Method::ByCategory(o) => {
            let (value, category) = by_category::split_columns(&frame::schema_of(data)?)?;
            let values = frame::numeric_values(data.column(&value)?)?;
            let categories = frame::key_values(data.column(&category)?)?;
            by_category::fit(o, (value, category), &values, &categories)?
        }
        literal => literal_state(literal),
    };
    Ok(state)
}

/// Whether `state` is a possible fitted state of `method`.
fn state_fits(method: &Method, state: &FittedState) -> bool {
    match state {
        FittedState::Trivial => !method.is_literal(),
        FittedState::Literal => method.is_literal() && !matches!(method, Method::Bounded(_)),
        FittedState::Bounds(_) => method.has_bounds(),
        FittedState::Values(_) => matches!(method, Method::Counts(_) | Method::Freq(_)),
        FittedState::Clusters(_) => matches!(method, Method::Alternatives(_)),
        FittedState::Associations(_) => matches!(method, Method::Associations(_)),
        FittedState::Robust(_) => matches!(method, Method::Outliers(_)),
        FittedState::Groups(_) => matches!(method, Method::ByCategory(_)),
    }
}

/// Stored parameters must agree in size with the fit schema, so a damaged
/// file fails on load rather than at detect time.
fn check_state(state: &FittedState, schema: &Schema) -> Result<()> {
    let dim = schema.len();
    let invalid = |what: &str| {
        Error::configuration(format!(
            "fitted {what} do not match the {dim} fitted column(s)"
        ))
    };
    match state {
        FittedState::Robust(r) => {
            let square = |m: &[Vec<f64>]| m.len() == dim && m.iter().all(|row| row.len() == dim);
            if r.location.len() != dim {
                return Err(invalid("location"));
            }
            if !square(&r.covariance) {
                return Err(invalid("covariance"));
            }
            if !square(&r.precision) {
                return Err(invalid("precision"));
            }
        }
        FittedState::Associations(a) => {
            if a.combinations.iter().any(|c| c.values.len() != dim) {
                return Err(invalid("combinations"));
            }
        }
        FittedState::Groups(g) => {
            if by_category::split_columns(schema)? != (g.value.clone(), g.category.clone()) {
                return Err(invalid("group columns"));
            }
            if g
                .groups
                .values()
                .any(|s| !matches!(s, FittedState::Bounds(_) | FittedState::Trivial))
            {
                return Err(invalid("group states"));
            }
        }
        _ => {}
    }
    Ok(())
}

fn state_mismatch(method: &Method, state: &FittedState) -> Error {
    Error::configuration(format!(
        "fitted parameters of kind '{}' do not belong to a '{}' detector",
        state.kind(),
        method.name()
    ))
}

fn single(data: &DataFrame) -> Result<&Column> {
    match data.get_columns() {
        [column] => Ok(column),
        columns => Err(Error::schema(format!(
            "expected a single column, got {}",
            columns.len()
        ))),
    }
}

fn present_numbers(column: &Column) -> Result<Vec<f64>> {
    Ok(frame::numeric_values(column)?.into_iter().flatten().collect())
}

/// Flags non-missing text cells for which `flag` holds.
fn flag_text(column: &Column, flag: impl Fn(&str) -> bool) -> Result<Vec<bool>> {
    Ok(frame::text_values(column)?
        .iter()
        .map(|v| v.as_deref().is_some_and(&flag))
        .collect())
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;
    use serde_json::json;

    use super::*;

    fn numbers(values: &[f64]) -> DataFrame {
        DataFrame::new(vec![Series::new("x".into(), values).into()]).unwrap()
    }

    fn spec(method: &str, options: serde_json::Value) -> DetectorSpec {
        DetectorSpec::configure(method, options).unwrap()
    }

    #[test]
    fn test_bounded_end_to_end() {
        let df = numbers(&[1.0, 5.0, -6.0, 100.0, 10.0]);
        let detector = Detector::fit(spec("bounded", json!({"lower": 0, "upper": 10})), &df).unwrap();
        let result = detector.detect(&df).unwrap();
        assert_eq!(result.error_indices(), vec![2, 3]);
        assert_eq!(result.n_missing_rows(), 0);
    }

    #[test]
    fn test_missing_policy_flag() {
        let df = DataFrame::new(vec![
            Series::new("x".into(), &[Some(1.0), None, Some(50.0)]).into(),
        ])
        .unwrap();
        let ignore = Detector::fit(spec("bounded", json!({"upper": 10})), &df).unwrap();
        let result = ignore.detect(&df).unwrap();
        assert_eq!(result.mask(), &[false, false, true]);
        assert_eq!(result.n_missing_rows(), 1);

        let flag = Detector::fit(spec("bounded", json!({"upper": 10, "missing": "flag"})), &df)
            .unwrap();
        assert_eq!(flag.detect(&df).unwrap().mask(), &[false, true, true]);
    }

    #[test]
    fn test_empty_input_is_trivial() {
        let df = numbers(&[]);
        let detector = Detector::fit(spec("iqr", json!({})), &df).unwrap();
        assert!(detector.is_trivial());
        let later = numbers(&[1.0, 1e9]);
        assert_eq!(detector.detect(&later).unwrap().n_errors(), 0);
    }

    #[test]
    fn test_schema_mismatch_on_detect() {
        let detector = Detector::fit(spec("zscore", json!({})), &numbers(&[1.0, 2.0, 3.0])).unwrap();
        let other = DataFrame::new(vec![Series::new("y".into(), &[1.0]).into()]).unwrap();
        assert!(matches!(detector.detect(&other), Err(Error::Schema(_))));
        let text = DataFrame::new(vec![Series::new("x".into(), &["a"]).into()]).unwrap();
        assert!(matches!(detector.detect(&text), Err(Error::Schema(_))));
    }

    #[test]
    fn test_wrong_kind_at_fit() {
        let text = DataFrame::new(vec![Series::new("x".into(), &["a"]).into()]).unwrap();
        assert!(matches!(
            Detector::fit(spec("iqr", json!({})), &text),
            Err(Error::Schema(_))
        ));
        let two = DataFrame::new(vec![
            Series::new("a".into(), &[1.0]).into(),
            Series::new("b".into(), &[1.0]).into(),
        ])
        .unwrap();
        assert!(matches!(
            Detector::fit(spec("iqr", json!({})), &two),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_replay_keeps_parameters() {
        let train = numbers(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let detector = Detector::fit(spec("iqr", json!({})), &train).unwrap();
        let replayed = Detector::new(FitInput::Replay(&detector)).unwrap();
        assert_eq!(replayed.bounds(), detector.bounds());

        let fresh = numbers(&[100.0, 4.0]);
        assert_eq!(replayed.detect(&fresh).unwrap().mask(), &[true, false]);
    }

    #[test]
    fn test_from_parameters() {
        let schema = frame::schema_of(&numbers(&[])).unwrap();
        let detector =
            Detector::from_parameters(spec("bounded", json!({"lower": 0})), schema.clone()).unwrap();
        assert_eq!(detector.detect(&numbers(&[-1.0, 1.0])).unwrap().mask(), &[true, false]);

        let err = Detector::from_parameters(spec("zscore", json!({})), schema).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let train = numbers(&[1.5, 2.25, 3.0, 4.75, 5.0, 6.125, 70.0]);
        let detector = Detector::fit(spec("modzscore", json!({"threshold": 2.5})), &train).unwrap();
        let json = detector.to_json().unwrap();
        let back = Detector::from_json(&json).unwrap();
        assert_eq!(back, detector);
    }

    #[test]
    fn test_foreign_state_rejected_on_load() {
        let detector = Detector::fit(spec("counts", json!({})), &numbers(&[1.0, 1.0])).unwrap();
        let mut persisted = detector.to_persisted().unwrap();
        persisted.fitted_params = FittedState::Literal;
        assert!(Detector::from_persisted(persisted).is_err());
    }

    #[test]
    fn test_damaged_robust_state_rejected_on_load() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).into(),
            Series::new("b".into(), &[2.0, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0]).into(),
        ])
        .unwrap();
        let detector = Detector::fit(spec("outliers", json!({})), &df).unwrap();
        let persisted = detector.to_persisted().unwrap();
        assert!(Detector::from_persisted(persisted.clone()).is_ok());

        let mut truncated = persisted.clone();
        let FittedState::Robust(r) = &mut truncated.fitted_params else {
            panic!("expected robust state");
        };
        r.precision.truncate(1);
        let err = Detector::from_json(&truncated.to_json().unwrap()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let mut ragged = persisted.clone();
        let FittedState::Robust(r) = &mut ragged.fitted_params else {
            panic!("expected robust state");
        };
        r.covariance[1].pop();
        assert!(matches!(
            Detector::from_persisted(ragged),
            Err(Error::Configuration(_))
        ));

        let mut short = persisted;
        let FittedState::Robust(r) = &mut short.fitted_params else {
            panic!("expected robust state");
        };
        r.location.push(0.0);
        assert!(matches!(
            Detector::from_persisted(short),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_by_category_lifecycle() {
        let df = DataFrame::new(vec![
            Series::new("weight".into(), &[1.0, 1.1, 1.0, 1.05, 9.0, 10.0, 11.0, 10.0, 1.0]).into(),
            Series::new(
                "fruit".into(),
                &["cherry", "cherry", "cherry", "cherry", "apple", "apple", "apple", "apple", "apple"],
            )
            .into(),
        ])
        .unwrap();
        let detector = Detector::fit(
            spec("by_category", json!({"within": {"method": "iqr", "options": {}}})),
            &df,
        )
        .unwrap();
        assert_eq!(detector.detect(&df).unwrap().error_indices(), vec![8]);

        let back = Detector::from_json(&detector.to_json().unwrap()).unwrap();
        assert_eq!(back, detector);

        let numeric_only = numbers(&[1.0, 2.0]);
        assert!(matches!(
            Detector::fit(
                spec("by_category", json!({"within": {"method": "iqr", "options": {}}})),
                &numeric_only
            ),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_custom_cell_and_row_predicates() {
        let df = numbers(&[-1.0, 2.0, 3.0]);
        let negative = DetectorSpec::new(Method::Custom(CustomOptions::cell(|v| {
            v.as_f64().is_some_and(|x| x < 0.0)
        })))
        .unwrap();
        let detector = Detector::fit(negative, &df).unwrap();
        assert_eq!(detector.detect(&df).unwrap().mask(), &[true, false, false]);
        assert!(matches!(detector.to_json(), Err(Error::Configuration(_))));

        let pairs = DataFrame::new(vec![
            Series::new("x".into(), &[1i64, 2, 3]).into(),
            Series::new("y".into(), &[1i64, 3, 9]).into(),
        ])
        .unwrap();
        let bad_square = DetectorSpec::new(Method::Custom(CustomOptions::row(|row| {
            match (row[0].as_f64(), row[1].as_f64()) {
                (Some(x), Some(y)) => x * x != y,
                _ => false,
            }
        })))
        .unwrap();
        let detector = Detector::fit(bad_square.clone(), &pairs).unwrap();
        assert_eq!(detector.detect(&pairs).unwrap().mask(), &[false, true, false]);

        let cell = DetectorSpec::new(Method::Custom(CustomOptions::cell(|_| true))).unwrap();
        assert!(matches!(Detector::fit(cell, &pairs), Err(Error::Schema(_))));

        let schema = frame::schema_of(&pairs).unwrap();
        assert!(Detector::from_parameters(bad_square, schema).is_ok());
    }

    #[test]
    fn test_text_checks() {
        let df = DataFrame::new(vec![
            Series::new("mail".into(), &[Some("a@b.org"), Some("nope"), None]).into(),
        ])
        .unwrap();
        let detector = Detector::fit(spec("email", json!({})), &df).unwrap();
        assert_eq!(detector.detect(&df).unwrap().mask(), &[false, true, false]);
    }

    #[test]
    fn test_duplicated_subset() {
        let df = DataFrame::new(vec![
            Series::new("id".into(), &[1i64, 2, 1]).into(),
            Series::new("v".into(), &["a", "b", "c"]).into(),
        ])
        .unwrap();
        let all = Detector::fit(spec("duplicated", json!({})), &df).unwrap();
        assert_eq!(all.detect(&df).unwrap().n_errors(), 0);
        let by_id = Detector::fit(spec("duplicated", json!({"subset": ["id"]})), &df).unwrap();
        assert_eq!(by_id.detect(&df).unwrap().mask(), &[false, false, true]);
        assert!(Detector::fit(spec("duplicated", json!({"subset": ["nope"]})), &df).is_err());
    }
}
