//! Cleaning strategies.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dq_model::{Error, Method, Value};

/// User function applied to each flagged cell.
pub type ReplaceFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// What a flagged cell is replaced with.
#[derive(Clone)]
pub enum Replacement {
    Constant(Value),
    /// Looked up by the cell's comparison key; unmapped cells become missing.
    Mapping(BTreeMap<String, Value>),
    Function(ReplaceFn),
}

impl Replacement {
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    pub fn mapping<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .filter_map(|(k, v)| Some((k.into().key()?, v.into())))
                .collect(),
        )
    }

    pub fn function(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    pub fn apply(&self, current: &Value) -> Value {
        match self {
            Self::Constant(value) => value.clone(),
            Self::Mapping(map) => current
                .key()
                .and_then(|key| map.get(&key).cloned())
                .unwrap_or(Value::Missing),
            Self::Function(f) => f(current),
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Mapping(map) => f.debug_tuple("Mapping").field(map).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// How flagged cells (or rows) are remediated.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Remove flagged rows.
    Drop,
    /// Set flagged cells to missing.
    ToNa,
    /// Move flagged numeric cells to the nearest fitted bound.
    Clip,
    Replace(Replacement),
    /// Convert the column to the castable target; flagged cells become missing.
    Cast,
    /// Replace alternative spellings with their cluster representative.
    ByKeys,
    /// Remove the stray spaces reported by the spaces detector.
    Strip,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::ToNa => "to_na",
            Self::Clip => "clip",
            Self::Replace(_) => "replace",
            Self::Cast => "cast",
            Self::ByKeys => "bykeys",
            Self::Strip => "strip",
        }
    }

    /// Whether results of `method` can be cleaned with this strategy.
    pub fn supports(&self, method: &Method) -> bool {
        match self {
            Self::Drop | Self::ToNa | Self::Replace(_) => true,
            Self::Clip => method.has_bounds(),
            Self::Cast => matches!(method, Method::Castable(_)),
            Self::ByKeys => matches!(method, Method::Alternatives(_)),
            Self::Strip => matches!(method, Method::Spaces(_)),
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    /// Parses the strategies that take no argument.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(Self::Drop),
            "to_na" | "to_nan" => Ok(Self::ToNa),
            "clip" => Ok(Self::Clip),
            "cast" => Ok(Self::Cast),
            "bykeys" => Ok(Self::ByKeys),
            "strip" => Ok(Self::Strip),
            "replace" => Err(Error::configuration(
                "replace needs a replacement value, mapping or function",
            )),
            other => Err(Error::configuration(format!(
                "unknown cleaning strategy '{other}'"
            ))),
        }
    }
}
