//! Detector specifications.
//!
//! A [`DetectorSpec`] is the validated, immutable description of a detector:
//! which method to run and with which options. Every method is a variant of
//! the closed [`Method`] enum carrying its own typed options, so a method
//! name that is not listed here fails at configure time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::options::{
    CastTarget, Inclusive, Keep, MissingHow, MissingPolicy, NormalTestPolicy, PatternMode,
    Representative, Sided, SpaceSide, TransformChoice,
};
use crate::schema::ValueKind;
use crate::value::Value;

/// Literal numeric bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoundedOptions {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub inclusive: Inclusive,
    pub sided: Sided,
}

impl BoundedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lower(mut self, lower: f64) -> Self {
        self.lower = Some(lower);
        self
    }

    pub fn with_upper(mut self, upper: f64) -> Self {
        self.upper = Some(upper);
        self
    }

    pub fn with_inclusive(mut self, inclusive: Inclusive) -> Self {
        self.inclusive = inclusive;
        self
    }

    pub fn with_sided(mut self, sided: Sided) -> Self {
        self.sided = sided;
        self
    }

    fn validate(&self) -> Result<()> {
        for (name, bound) in [("lower", self.lower), ("upper", self.upper)] {
            if bound.is_some_and(f64::is_nan) {
                return Err(Error::configuration(format!("{name} bound must be a number")));
            }
        }
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) if lower >= upper => Err(Error::configuration(format!(
                "lower bound ({lower}) is >= upper bound ({upper})"
            ))),
            (None, None) => {
                tracing::warn!("bounded detector configured without lower or upper bound");
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Bounds taken from empirical quantiles of the fit data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuantilesOptions {
    pub lowerq: f64,
    pub upperq: f64,
    pub inclusive: Inclusive,
    pub sided: Sided,
}

impl Default for QuantilesOptions {
    fn default() -> Self {
        Self {
            lowerq: 0.0,
            upperq: 1.0,
            inclusive: Inclusive::Both,
            sided: Sided::Both,
        }
    }
}

impl QuantilesOptions {
    fn validate(&self) -> Result<()> {
        for (name, q) in [("lowerq", self.lowerq), ("upperq", self.upperq)] {
            if !(0.0..=1.0).contains(&q) {
                return Err(Error::configuration(format!("{name} must be within [0, 1], got {q}")));
            }
        }
        if self.lowerq >= self.upperq {
            return Err(Error::configuration(format!(
                "lower quantile ({}) is >= upper quantile ({})",
                self.lowerq, self.upperq
            )));
        }
        if self.lowerq == 0.0 && self.upperq == 1.0 {
            tracing::warn!("quantiles detector configured without lower or upper quantile");
        }
        Ok(())
    }
}

/// Options shared by the IQR, z-score and modified z-score detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GaussianOptions {
    /// Cut-off multiplier; the method default applies when absent.
    pub threshold: Option<f64>,
    pub inclusive: Inclusive,
    pub sided: Sided,
    pub normaltest: NormalTestPolicy,
    /// Significance level of the normality test.
    pub pvalue: f64,
    pub transform: TransformChoice,
}

impl Default for GaussianOptions {
    fn default() -> Self {
        Self {
            threshold: None,
            inclusive: Inclusive::Both,
            sided: Sided::Both,
            normaltest: NormalTestPolicy::Ignore,
            pvalue: 1e-3,
            transform: TransformChoice::None,
        }
    }
}

impl GaussianOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_transform(mut self, transform: TransformChoice) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_normaltest(mut self, policy: NormalTestPolicy) -> Self {
        self.normaltest = policy;
        self
    }

    pub fn with_sided(mut self, sided: Sided) -> Self {
        self.sided = sided;
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.threshold
            && !(threshold.is_finite() && threshold >= 0.0)
        {
            return Err(Error::configuration(format!(
                "threshold must be a finite number >= 0, got {threshold}"
            )));
        }
        if !(self.pvalue > 0.0 && self.pvalue < 1.0) {
            return Err(Error::configuration(format!(
                "pvalue must be within (0, 1), got {}",
                self.pvalue
            )));
        }
        Ok(())
    }
}

/// String length checks: either an exact `value` or `lower`/`upper` bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LengthOptions {
    pub lower: Option<usize>,
    pub upper: Option<usize>,
    pub value: Option<usize>,
    pub inclusive: Inclusive,
}

impl LengthOptions {
    fn validate(&self) -> Result<()> {
        match (self.value, self.lower, self.upper) {
            (None, None, None) => Err(Error::configuration(
                "length requires `value` or at least one of `lower`/`upper`",
            )),
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(Error::configuration(
                "incompatible arguments: `value` and `lower`/`upper`",
            )),
            (None, Some(lower), Some(upper)) if lower >= upper => Err(Error::configuration(
                format!("lower bound ({lower}) is >= upper bound ({upper})"),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MissingOptions {
    pub how: MissingHow,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DuplicatedOptions {
    /// Columns considered when comparing rows; all columns when absent.
    pub subset: Option<Vec<String>>,
    pub keep: Keep,
}

impl DuplicatedOptions {
    fn validate(&self) -> Result<()> {
        if self.subset.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::configuration("subset must name at least one column"));
        }
        Ok(())
    }
}

/// Allowed (or forbidden) set of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumOptions {
    pub values: Vec<Value>,
    #[serde(default)]
    pub forbidden: bool,
}

impl EnumOptions {
    fn validate(&self) -> Result<()> {
        if self.values.is_empty() {
            return Err(Error::configuration("values must not be empty"));
        }
        if self.values.iter().any(Value::is_missing) {
            return Err(Error::configuration("values must not contain missing values"));
        }
        Ok(())
    }
}

/// A single expected (or forbidden) value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueOptions {
    pub value: Value,
    #[serde(default)]
    pub forbidden: bool,
}

impl ValueOptions {
    fn validate(&self) -> Result<()> {
        if self.value.is_missing() {
            return Err(Error::configuration("the expected value is not defined"));
        }
        Ok(())
    }
}

/// Values observed at most `n` times at fit are errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CountsOptions {
    pub n: usize,
}

impl Default for CountsOptions {
    fn default() -> Self {
        Self { n: 1 }
    }
}

/// Values whose share at fit is at most `freq` are errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FreqOptions {
    pub freq: f64,
}

impl Default for FreqOptions {
    fn default() -> Self {
        Self { freq: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternOptions {
    pub pattern: String,
    #[serde(default)]
    pub mode: PatternMode,
    /// Case-sensitive matching.
    #[serde(default = "default_true")]
    pub case: bool,
}

impl PatternOptions {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            mode: PatternMode::Match,
            case: true,
        }
    }

    pub fn with_mode(mut self, mode: PatternMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_case(mut self, case: bool) -> Self {
        self.case = case;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.pattern.is_empty() {
            return Err(Error::configuration("the pattern is empty"));
        }
        regex::Regex::new(&self.pattern)
            .map(|_| ())
            .map_err(|e| Error::configuration(format!("invalid pattern: {e}")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailOptions {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlOptions {
    /// Require an `http(s)://` or `ftp(s)://` scheme.
    pub check_protocol: bool,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            check_protocol: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpacesOptions {
    pub side: SpaceSide,
}

/// Text values that cannot be converted to `target` are errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CastableOptions {
    pub target: CastTarget,
    #[serde(default)]
    pub thousands: Option<String>,
    #[serde(default)]
    pub decimal: Option<String>,
    /// chrono format for date targets; ISO forms are tried when absent.
    #[serde(default)]
    pub date_format: Option<String>,
    /// Literal to boolean mapping for boolean targets.
    #[serde(default)]
    pub bool_values: Option<BTreeMap<String, bool>>,
}

impl CastableOptions {
    pub fn new(target: CastTarget) -> Self {
        Self {
            target,
            thousands: None,
            decimal: None,
            date_format: None,
            bool_values: None,
        }
    }

    pub fn with_separators(mut self, thousands: Option<&str>, decimal: Option<&str>) -> Self {
        self.thousands = thousands.map(str::to_string);
        self.decimal = decimal.map(str::to_string);
        self
    }

    /// Literal to boolean mapping, `{"True": true, "False": false}` by default.
    pub fn bool_map(&self) -> BTreeMap<String, bool> {
        self.bool_values.clone().unwrap_or_else(|| {
            BTreeMap::from([("True".to_string(), true), ("False".to_string(), false)])
        })
    }

    fn validate(&self) -> Result<()> {
        let numeric = matches!(self.target, CastTarget::Int | CastTarget::Float);
        if !numeric && (self.thousands.is_some() || self.decimal.is_some()) {
            return Err(Error::configuration(format!(
                "thousands/decimal separators do not apply to '{}' targets",
                self.target.as_str()
            )));
        }
        if self.thousands.as_deref().is_some_and(str::is_empty)
            || self.decimal.as_deref().is_some_and(str::is_empty)
        {
            return Err(Error::configuration("separators must not be empty"));
        }
        if self.thousands.is_some() && self.thousands == self.decimal {
            return Err(Error::configuration(
                "thousands and decimal separators must differ",
            ));
        }
        if self.date_format.is_some() && self.target != CastTarget::Date {
            return Err(Error::configuration("date_format only applies to 'date' targets"));
        }
        if self.bool_values.is_some() && self.target != CastTarget::Boolean {
            return Err(Error::configuration(
                "bool_values only applies to 'boolean' targets",
            ));
        }
        if self.bool_values.as_ref().is_some_and(BTreeMap::is_empty) {
            return Err(Error::configuration("bool_values must not be empty"));
        }
        Ok(())
    }
}

/// Literal date bounds given as ISO strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateRangeOptions {
    pub lower: Option<String>,
    pub upper: Option<String>,
    pub inclusive: Inclusive,
}

impl DateRangeOptions {
    /// Parsed bounds; unparseable bounds are rejected at configure time.
    pub fn bounds(&self) -> Result<(Option<NaiveDateTime>, Option<NaiveDateTime>)> {
        let parse = |name: &str, raw: &Option<String>| -> Result<Option<NaiveDateTime>> {
            raw.as_deref()
                .map(|s| {
                    dq_common::parse_datetime(s).ok_or_else(|| {
                        Error::configuration(format!("{name} bound '{s}' is not a date"))
                    })
                })
                .transpose()
        };
        Ok((parse("lower", &self.lower)?, parse("upper", &self.upper)?))
    }

    fn validate(&self) -> Result<()> {
        match self.bounds()? {
            (None, None) => Err(Error::configuration("neither lower nor upper specified")),
            (Some(lower), Some(upper)) if lower >= upper => Err(Error::configuration(
                format!("lower bound ({lower}) is >= upper bound ({upper})"),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlternativesOptions {
    pub representative: Representative,
}

/// Cross-column combinations and their minimum support.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssociationsOptions {
    /// A combination is valid when seen more than `min_count` times.
    #[serde(alias = "count")]
    pub min_count: Option<usize>,
    /// A combination is valid when its share of rows exceeds `min_freq`.
    #[serde(alias = "freq")]
    pub min_freq: Option<f64>,
}

impl AssociationsOptions {
    fn validate(&self) -> Result<()> {
        if self.min_count.is_some() && self.min_freq.is_some() {
            return Err(Error::configuration(
                "min_count and min_freq cannot be used together",
            ));
        }
        if let Some(freq) = self.min_freq
            && !(freq > 0.0 && freq < 1.0)
        {
            return Err(Error::configuration(format!(
                "min_freq must be within (0, 1), got {freq}"
            )));
        }
        Ok(())
    }
}

/// Robust multivariate distance outliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutliersOptions {
    /// Distance cut-off; derived from `quantile` when absent.
    pub threshold: Option<f64>,
    /// Chi-squared quantile used to derive the cut-off.
    pub quantile: f64,
    /// Share of rows used for the robust estimate, `(n + p + 1) / 2` when absent.
    pub support_fraction: Option<f64>,
}

impl Default for OutliersOptions {
    fn default() -> Self {
        Self {
            threshold: None,
            quantile: 0.975,
            support_fraction: None,
        }
    }
}

impl OutliersOptions {
    fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.threshold
            && !(threshold.is_finite() && threshold > 0.0)
        {
            return Err(Error::configuration(format!(
                "threshold must be a finite number > 0, got {threshold}"
            )));
        }
        if !(self.quantile > 0.0 && self.quantile < 1.0) {
            return Err(Error::configuration(format!(
                "quantile must be within (0, 1), got {}",
                self.quantile
            )));
        }
        if let Some(fraction) = self.support_fraction
            && !(0.5..=1.0).contains(&fraction)
        {
            return Err(Error::configuration(format!(
                "support_fraction must be within [0.5, 1], got {fraction}"
            )));
        }
        Ok(())
    }
}

/// One-dimensional numeric method applied within every category of a
/// numeric/categorical column pair.
///
/// Serialized as `{"within": {"method": "iqr", "options": {...}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ByCategoryOptions {
    pub within: Box<Method>,
}

impl ByCategoryOptions {
    pub fn new(within: Method) -> Self {
        Self {
            within: Box::new(within),
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.within.has_bounds() {
            return Err(Error::configuration(format!(
                "by_category runs a numeric range method (bounded, quantiles, iqr, zscore, \
                 modzscore), got '{}'",
                self.within.name()
            )));
        }
        self.within.validate()
    }
}

/// User predicate over one cell.
pub type CellPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// User predicate over the cells of one row, in column order.
pub type RowPredicate = Arc<dyn Fn(&[Value]) -> bool + Send + Sync>;

/// User-defined error predicate: `true` marks an error.
///
/// Holds a function, so it has no JSON form. It is built in code with
/// [`CustomOptions::cell`] or [`CustomOptions::row`] and cannot be configured
/// by name or persisted.
#[derive(Clone)]
pub enum CustomOptions {
    /// Applied to the single inspected column.
    Cell(CellPredicate),
    /// Applied to every row of the frame.
    Row(RowPredicate),
}

impl CustomOptions {
    pub fn cell(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self::Cell(Arc::new(f))
    }

    pub fn row(f: impl Fn(&[Value]) -> bool + Send + Sync + 'static) -> Self {
        Self::Row(Arc::new(f))
    }
}

impl fmt::Debug for CustomOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell(_) => f.write_str("Cell(..)"),
            Self::Row(_) => f.write_str("Row(..)"),
        }
    }
}

/// Two predicates are equal when they share the same function.
impl PartialEq for CustomOptions {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Cell(a), Self::Cell(b)) => Arc::ptr_eq(a, b),
            (Self::Row(a), Self::Row(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// How many columns a method inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one column.
    Single,
    /// Every column of the frame.
    Frame,
}

/// Closed set of detection methods with their typed options.
///
/// Serialized adjacently tagged as `{"method": ..., "options": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "options", rename_all = "snake_case")]
pub enum Method {
    Bounded(BoundedOptions),
    Quantiles(QuantilesOptions),
    Iqr(GaussianOptions),
    Zscore(GaussianOptions),
    Modzscore(GaussianOptions),
    Length(LengthOptions),
    Missing(MissingOptions),
    Duplicated(DuplicatedOptions),
    Enum(EnumOptions),
    Value(ValueOptions),
    Counts(CountsOptions),
    Freq(FreqOptions),
    Pattern(PatternOptions),
    Email(EmailOptions),
    Url(UrlOptions),
    Spaces(SpacesOptions),
    Castable(CastableOptions),
    DateRange(DateRangeOptions),
    #[serde(alias = "keycollision")]
    Alternatives(AlternativesOptions),
    Associations(AssociationsOptions),
    Outliers(OutliersOptions),
    ByCategory(ByCategoryOptions),
    #[serde(skip)]
    Custom(CustomOptions),
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bounded(_) => "bounded",
            Self::Quantiles(_) => "quantiles",
            Self::Iqr(_) => "iqr",
            Self::Zscore(_) => "zscore",
            Self::Modzscore(_) => "modzscore",
            Self::Length(_) => "length",
            Self::Missing(_) => "missing",
            Self::Duplicated(_) => "duplicated",
            Self::Enum(_) => "enum",
            Self::Value(_) => "value",
            Self::Counts(_) => "counts",
            Self::Freq(_) => "freq",
            Self::Pattern(_) => "pattern",
            Self::Email(_) => "email",
            Self::Url(_) => "url",
            Self::Spaces(_) => "spaces",
            Self::Castable(_) => "castable",
            Self::DateRange(_) => "date_range",
            Self::Alternatives(_) => "alternatives",
            Self::Associations(_) => "associations",
            Self::Outliers(_) => "outliers",
            Self::ByCategory(_) => "by_category",
            Self::Custom(_) => "custom",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Self::Missing(_)
            | Self::Duplicated(_)
            | Self::Associations(_)
            | Self::Outliers(_)
            | Self::ByCategory(_)
            | Self::Custom(CustomOptions::Row(_)) => Arity::Frame,
            _ => Arity::Single,
        }
    }

    /// Whether a column of `kind` can be inspected by this method.
    pub fn accepts(&self, kind: ValueKind) -> bool {
        match self {
            Self::Bounded(_)
            | Self::Quantiles(_)
            | Self::Iqr(_)
            | Self::Zscore(_)
            | Self::Modzscore(_)
            | Self::Outliers(_) => kind == ValueKind::Numeric,
            Self::Pattern(_)
            | Self::Email(_)
            | Self::Url(_)
            | Self::Spaces(_)
            | Self::Castable(_)
            | Self::Alternatives(_) => kind == ValueKind::Text,
            Self::DateRange(_) => kind == ValueKind::Datetime,
            Self::Length(_)
            | Self::Missing(_)
            | Self::Duplicated(_)
            | Self::Enum(_)
            | Self::Value(_)
            | Self::Counts(_)
            | Self::Freq(_)
            | Self::Associations(_)
            | Self::ByCategory(_)
            | Self::Custom(_) => true,
        }
    }

    /// Whether every parameter is given literally, so no data is needed to fit.
    pub fn is_literal(&self) -> bool {
        !matches!(
            self,
            Self::Quantiles(_)
                | Self::Iqr(_)
                | Self::Zscore(_)
                | Self::Modzscore(_)
                | Self::Counts(_)
                | Self::Freq(_)
                | Self::Alternatives(_)
                | Self::Associations(_)
                | Self::Outliers(_)
                | Self::ByCategory(_)
        )
    }

    /// Whether the fitted state carries numeric lower/upper bounds.
    pub fn has_bounds(&self) -> bool {
        matches!(
            self,
            Self::Bounded(_) | Self::Quantiles(_) | Self::Iqr(_) | Self::Zscore(_) | Self::Modzscore(_)
        )
    }

    /// Boundary inclusion of the range methods.
    pub fn inclusive(&self) -> Option<Inclusive> {
        match self {
            Self::Bounded(o) => Some(o.inclusive),
            Self::Quantiles(o) => Some(o.inclusive),
            Self::Iqr(o) | Self::Zscore(o) | Self::Modzscore(o) => Some(o.inclusive),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Bounded(o) => o.validate(),
            Self::Quantiles(o) => o.validate(),
            Self::Iqr(o) | Self::Zscore(o) | Self::Modzscore(o) => o.validate(),
            Self::Length(o) => o.validate(),
            Self::Duplicated(o) => o.validate(),
            Self::Enum(o) => o.validate(),
            Self::Value(o) => o.validate(),
            Self::Counts(o) if o.n == 0 => {
                Err(Error::configuration("n must be a > 0 integer"))
            }
            Self::Freq(o) if !(o.freq > 0.0 && o.freq < 1.0) => Err(Error::configuration(
                format!("freq must be within (0, 1), got {}", o.freq),
            )),
            Self::Pattern(o) => o.validate(),
            Self::Castable(o) => o.validate(),
            Self::DateRange(o) => o.validate(),
            Self::Associations(o) => o.validate(),
            Self::Outliers(o) => o.validate(),
            Self::ByCategory(o) => o.validate(),
            Self::Counts(_)
            | Self::Freq(_)
            | Self::Missing(_)
            | Self::Email(_)
            | Self::Url(_)
            | Self::Spaces(_)
            | Self::Alternatives(_)
            | Self::Custom(_) => Ok(()),
        }
    }
}

/// Validated method plus the missing-value policy.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorSpec {
    method: Method,
    missing: MissingPolicy,
}

impl DetectorSpec {
    /// Builds a spec from typed options, validating them.
    pub fn new(method: Method) -> Result<Self> {
        method.validate()?;
        Ok(Self {
            method,
            missing: MissingPolicy::default(),
        })
    }

    /// Builds a spec from a method name and a JSON options object.
    ///
    /// The `missing` key, when present, sets the missing-value policy; every
    /// other key must be an option of the method.
    pub fn configure(method: &str, options: serde_json::Value) -> Result<Self> {
        let mut options = match options {
            serde_json::Value::Null => serde_json::Map::new(),
            serde_json::Value::Object(map) => map,
            other => {
                return Err(Error::configuration(format!(
                    "options for '{method}' must be an object, got {other}"
                )));
            }
        };
        let missing = match options.remove("missing") {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| Error::configuration(format!("invalid missing policy: {e}")))?,
            None => MissingPolicy::default(),
        };
        let tagged = serde_json::json!({ "method": method, "options": options });
        let method: Method = serde_json::from_value(tagged)
            .map_err(|e| Error::configuration(format!("{method}: {e}")))?;
        Ok(Self::new(method)?.with_missing(missing))
    }

    pub fn with_missing(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn name(&self) -> &'static str {
        self.method.name()
    }

    pub fn missing(&self) -> MissingPolicy {
        self.missing
    }

    /// Options as a JSON object, including the missing policy.
    pub fn options_json(&self) -> Result<serde_json::Value> {
        let tagged = serde_json::to_value(&self.method)?;
        let mut options = match tagged.get("options") {
            Some(serde_json::Value::Object(map)) => map.clone(),
            _ => serde_json::Map::new(),
        };
        options.insert("missing".to_string(), serde_json::to_value(self.missing)?);
        Ok(serde_json::Value::Object(options))
    }
}
