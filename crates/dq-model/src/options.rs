//! Option vocabularies shared by several detectors.

use serde::{Deserialize, Serialize};

/// Which boundaries count as valid values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inclusive {
    /// `lower <= x <= upper`
    #[default]
    Both,
    /// `lower < x < upper`
    Neither,
    /// `lower <= x < upper`
    Left,
    /// `lower < x <= upper`
    Right,
}

impl Inclusive {
    pub fn lower_closed(self) -> bool {
        matches!(self, Self::Both | Self::Left)
    }

    pub fn upper_closed(self) -> bool {
        matches!(self, Self::Both | Self::Right)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::Neither => "neither",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Which bounds are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sided {
    #[default]
    Both,
    /// Only values below the lower bound are errors.
    #[serde(alias = "left")]
    Lower,
    /// Only values above the upper bound are errors.
    #[serde(alias = "right")]
    Upper,
}

impl Sided {
    pub fn checks_lower(self) -> bool {
        matches!(self, Self::Both | Self::Lower)
    }

    pub fn checks_upper(self) -> bool {
        matches!(self, Self::Both | Self::Upper)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::Lower => "lower",
            Self::Upper => "upper",
        }
    }
}

/// Whether missing cells are reported as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Missing cells are never errors.
    #[default]
    Ignore,
    /// Rows carrying a missing cell are flagged.
    Flag,
}

impl MissingPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Flag => "flag",
        }
    }
}

/// What to do when the fit data fails the normality test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalTestPolicy {
    #[default]
    Ignore,
    /// Log a warning and continue.
    Warn,
    /// Fail the fit.
    Error,
}

impl NormalTestPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Power transform applied when the fit data is not normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformChoice {
    #[default]
    None,
    #[serde(alias = "box_cox")]
    Boxcox,
    #[serde(alias = "yeo_johnson")]
    Yeojohnson,
    /// Box-Cox for strictly positive data, Yeo-Johnson otherwise.
    Auto,
}

impl TransformChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Boxcox => "boxcox",
            Self::Yeojohnson => "yeojohnson",
            Self::Auto => "auto",
        }
    }
}

/// Representative label of a cluster of alternative spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representative {
    /// Most frequent literal; ties go to the first encountered.
    #[default]
    MostFrequent,
    FirstEncountered,
}

impl Representative {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MostFrequent => "most_frequent",
            Self::FirstEncountered => "first_encountered",
        }
    }
}

/// Which occurrence of a duplicated row is kept as valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keep {
    #[default]
    First,
    Last,
    /// Every occurrence is an error.
    #[serde(alias = "false")]
    None,
}

impl Keep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::None => "none",
        }
    }
}

/// Row-level rule of the missing-values detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingHow {
    /// A row is an error when any cell is missing.
    #[default]
    Any,
    /// A row is an error when all cells are missing.
    All,
}

impl MissingHow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceSide {
    Leading,
    Trailing,
    #[default]
    Both,
}

impl SpaceSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Leading => "leading",
            Self::Trailing => "trailing",
            Self::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternMode {
    /// Pattern must match at the start of the value.
    #[default]
    Match,
    /// Pattern must match the whole value.
    Fullmatch,
    /// Pattern may match anywhere in the value.
    Contains,
}

impl PatternMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Fullmatch => "fullmatch",
            Self::Contains => "contains",
        }
    }
}

/// Target kind of the castable detector and the cast strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastTarget {
    Int,
    Float,
    Date,
    Boolean,
}

impl CastTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Date => "date",
            Self::Boolean => "boolean",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_closedness() {
        assert!(Inclusive::Both.lower_closed() && Inclusive::Both.upper_closed());
        assert!(!Inclusive::Neither.lower_closed() && !Inclusive::Neither.upper_closed());
        assert!(Inclusive::Left.lower_closed() && !Inclusive::Left.upper_closed());
        assert!(!Inclusive::Right.lower_closed() && Inclusive::Right.upper_closed());
    }

    #[test]
    fn test_sided_aliases() {
        let lower: Sided = serde_json::from_str("\"left\"").unwrap();
        let upper: Sided = serde_json::from_str("\"upper\"").unwrap();
        assert_eq!(lower, Sided::Lower);
        assert_eq!(upper, Sided::Upper);
        assert!(!upper.checks_lower());
    }

    #[test]
    fn test_transform_names() {
        let t: TransformChoice = serde_json::from_str("\"boxcox\"").unwrap();
        assert_eq!(t, TransformChoice::Boxcox);
        assert_eq!(
            serde_json::to_string(&TransformChoice::Yeojohnson).unwrap(),
            "\"yeojohnson\""
        );
    }
}
