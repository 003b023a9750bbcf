//! Schema fingerprint captured at fit time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical kind of a column, independent of its physical dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Integer and floating-point columns.
    Numeric,
    /// String columns.
    Text,
    /// Date and datetime columns.
    Datetime,
    Boolean,
}

impl ValueKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    pub kind: ValueKind,
}

/// Ordered column names and kinds of the data a detector was fitted on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<SchemaColumn>,
}

impl Schema {
    pub fn new(columns: Vec<SchemaColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn kind_of(&self, name: &str) -> Option<ValueKind> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.kind)
    }

    /// Describes the first difference with `other`, `None` when both match.
    pub fn mismatch(&self, other: &Schema) -> Option<String> {
        if self.columns.len() != other.columns.len() {
            return Some(format!(
                "expected {} column(s) [{}], found {} [{}]",
                self.columns.len(),
                self.names().collect::<Vec<_>>().join(", "),
                other.columns.len(),
                other.names().collect::<Vec<_>>().join(", "),
            ));
        }
        self.columns
            .iter()
            .zip(&other.columns)
            .find(|(expected, found)| expected != found)
            .map(|(expected, found)| {
                format!(
                    "expected column '{}' ({}), found '{}' ({})",
                    expected.name, expected.kind, found.name, found.kind
                )
            })
    }
}
