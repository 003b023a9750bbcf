//! Text checks: patterns, e-mail and URL shapes, stray spaces, lengths and
//! castability.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::{Regex, RegexBuilder};

use dq_common::{float_to_i64, parse_datetime, parse_datetime_with, parse_f64, parse_i64};
use dq_model::{
    CastTarget, CastableOptions, Error, LengthOptions, PatternMode, PatternOptions, Result,
    SpaceSide,
};

use crate::compare::is_outside;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b)$")
        .expect("Invalid e-mail regex")
});

const URL_HOST: &str = r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$";

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(?:http|ftp)s?://{URL_HOST}")).expect("Invalid URL regex")
});

static URL_ANY_PROTOCOL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(?:(?:http|ftp)s?://)?{URL_HOST}"))
        .expect("Invalid URL regex")
});

/// Compiled pattern of the pattern detector, anchored per its mode.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    pub fn new(options: &PatternOptions) -> Result<Self> {
        let anchored = match options.mode {
            PatternMode::Match => format!("^(?:{})", options.pattern),
            PatternMode::Fullmatch => format!("^(?:{})$", options.pattern),
            PatternMode::Contains => options.pattern.clone(),
        };
        let regex = RegexBuilder::new(&anchored)
            .case_insensitive(!options.case)
            .build()
            .map_err(|e| Error::configuration(format!("invalid pattern: {e}")))?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn is_url(value: &str, check_protocol: bool) -> bool {
    if check_protocol {
        URL_REGEX.is_match(value)
    } else {
        URL_ANY_PROTOCOL_REGEX.is_match(value)
    }
}

/// Whether `value` carries whitespace on the checked side(s).
pub fn has_extra_spaces(value: &str, side: SpaceSide) -> bool {
    let leading = value.starts_with(char::is_whitespace);
    let trailing = value.ends_with(char::is_whitespace);
    match side {
        SpaceSide::Leading => leading,
        SpaceSide::Trailing => trailing,
        SpaceSide::Both => leading || trailing,
    }
}

/// Whether the character length of `value` violates the length options.
pub fn length_violates(value: &str, options: &LengthOptions) -> bool {
    let len = value.chars().count();
    match options.value {
        Some(expected) => len != expected,
        None => is_outside(
            &len,
            options.lower.as_ref(),
            options.upper.as_ref(),
            options.inclusive,
        ),
    }
}

/// A value converted to a cast target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cast {
    Int(i64),
    Float(f64),
    Date(NaiveDateTime),
    Boolean(bool),
}

/// Text to typed value conversion shared by the castable detector and the
/// cast strategy.
#[derive(Debug, Clone)]
pub struct CastParser {
    target: CastTarget,
    thousands: Option<String>,
    decimal: Option<String>,
    date_format: Option<String>,
    bools: BTreeMap<String, bool>,
}

impl CastParser {
    pub fn new(options: &CastableOptions) -> Self {
        Self {
            target: options.target,
            thousands: options.thousands.clone(),
            decimal: options.decimal.clone(),
            date_format: options.date_format.clone(),
            bools: options.bool_map(),
        }
    }

    pub fn target(&self) -> CastTarget {
        self.target
    }

    /// Removes thousands separators and normalizes the decimal separator.
    fn normalize_number(&self, raw: &str) -> String {
        let mut s = raw.trim().to_string();
        if let Some(thousands) = &self.thousands {
            s = s.replace(thousands.as_str(), "");
        }
        if let Some(decimal) = &self.decimal {
            s = s.replace(decimal.as_str(), ".");
        }
        s
    }

    pub fn parse_float(&self, raw: &str) -> Option<f64> {
        parse_f64(&self.normalize_number(raw))
    }

    /// Integers, or floats without a fractional part.
    pub fn parse_int(&self, raw: &str) -> Option<i64> {
        let normalized = self.normalize_number(raw);
        parse_i64(&normalized).or_else(|| parse_f64(&normalized).and_then(float_to_i64))
    }

    pub fn parse_date(&self, raw: &str) -> Option<NaiveDateTime> {
        let trimmed = raw.trim();
        match &self.date_format {
            Some(format) => parse_datetime_with(trimmed, format),
            None => parse_datetime(trimmed),
        }
    }

    /// Exact lookup in the literal to boolean mapping.
    pub fn parse_bool(&self, raw: &str) -> Option<bool> {
        self.bools.get(raw).copied()
    }

    pub fn parse(&self, raw: &str) -> Option<Cast> {
        match self.target {
            CastTarget::Int => self.parse_int(raw).map(Cast::Int),
            CastTarget::Float => self.parse_float(raw).map(Cast::Float),
            CastTarget::Date => self.parse_date(raw).map(Cast::Date),
            CastTarget::Boolean => self.parse_bool(raw).map(Cast::Boolean),
        }
    }

    pub fn is_castable(&self, raw: &str) -> bool {
        self.parse(raw).is_some()
    }
}
