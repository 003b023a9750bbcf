//! Mask-driven cleaning of a frame with one detection.

use polars::prelude::{Column, DataFrame};

use dq_detect::frame::{filter_rows, value_kind};
use dq_detect::{CastParser, ClusterIndex, Detection};
use dq_model::{Error, FittedState, Method, Result};

use crate::ops;
use crate::strategy::Strategy;

/// Applies a [`Strategy`] to the rows a [`Detection`] flagged.
#[derive(Debug, Clone, Copy)]
pub struct Cleaner<'a> {
    strategy: &'a Strategy,
    detection: &'a Detection,
}

impl<'a> Cleaner<'a> {
    pub fn new(strategy: &'a Strategy, detection: &'a Detection) -> Self {
        Self {
            strategy,
            detection,
        }
    }

    /// Fails with [`Error::IncompatibleStrategy`] when the strategy cannot
    /// consume results of the detector's method.
    pub fn check(&self) -> Result<()> {
        let method = self.detection.detector().method();
        if self.strategy.supports(method) {
            Ok(())
        } else {
            Err(Error::incompatible(self.strategy.name(), method.name()))
        }
    }

    /// Returns a cleaned copy of `data`; unflagged cells are left untouched.
    pub fn clean(&self, data: &DataFrame) -> Result<DataFrame> {
        self.check()?;
        ops::check_mask(self.detection.is_error(), data.height())?;
        self.check_columns(data)?;

        let mask = self.detection.is_error();
        let n_flagged = self.detection.n_errors();
        tracing::debug!(
            strategy = self.strategy.name(),
            method = self.detection.detector().name(),
            rows = data.height(),
            flagged = n_flagged,
            "cleaning"
        );

        if n_flagged == 0 {
            return Ok(data.clone());
        }
        if let Strategy::Drop = self.strategy {
            return filter_rows(data, &self.detection.not_error());
        }

        let mut out = data.clone();
        for name in self.detection.detector().schema().names() {
            let column = data.column(name)?;
            let cleaned = self.clean_column(column, mask)?;
            out.with_column(cleaned)?;
        }
        Ok(out)
    }

    /// Cleans `data` in place.
    pub fn clean_in_place(&self, data: &mut DataFrame) -> Result<()> {
        let cleaned = self.clean(data)?;
        *data = cleaned;
        Ok(())
    }

    fn clean_column(&self, column: &Column, mask: &[bool]) -> Result<Column> {
        let detector = self.detection.detector();
        match self.strategy {
            Strategy::Drop => Ok(column.clone()),
            Strategy::ToNa => ops::to_missing(column, mask),
            Strategy::Replace(replacement) => ops::replace(column, mask, replacement),
            Strategy::Clip => match detector.bounds() {
                Some(bounds) => ops::clip(column, mask, bounds),
                None => Ok(column.clone()),
            },
            Strategy::ByKeys => match detector.state() {
                FittedState::Clusters(clusters) => {
                    ops::by_keys(column, mask, &ClusterIndex::new(clusters))
                }
                _ => Ok(column.clone()),
            },
            Strategy::Cast => match detector.method() {
                Method::Castable(options) => ops::cast(column, mask, &CastParser::new(options)),
                other => Err(Error::incompatible("cast", other.name())),
            },
            Strategy::Strip => match detector.method() {
                Method::Spaces(options) => ops::strip(column, mask, options.side),
                other => Err(Error::incompatible("strip", other.name())),
            },
        }
    }

    /// Every fitted column must be present with its fitted kind. Extra
    /// columns are carried through untouched.
    fn check_columns(&self, data: &DataFrame) -> Result<()> {
        for expected in self.detection.detector().schema().columns() {
            let column = data.column(&expected.name).map_err(|_| {
                Error::schema(format!("column '{}' is missing from the data", expected.name))
            })?;
            let kind = value_kind(column.dtype());
            if kind != Some(expected.kind) {
                return Err(Error::schema(format!(
                    "column '{}' is {} but the detector was fitted on {}",
                    expected.name,
                    column.dtype(),
                    expected.kind.label()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;
    use serde_json::json;

    use dq_detect::detect;

    use super::*;

    fn frame() -> DataFrame {
        df!("x" => [1i64, 5, -6, 100, 10]).unwrap()
    }

    #[test]
    fn test_drop_removes_flagged_rows() {
        let df = frame();
        let detection = detect("bounded", &df, json!({"lower": 0, "upper": 10})).unwrap();
        let cleaned = Cleaner::new(&Strategy::Drop, &detection).clean(&df).unwrap();
        let values: Vec<Option<i64>> = cleaned.column("x").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1), Some(5), Some(10)]);
    }

    #[test]
    fn test_mask_length_mismatch() {
        let df = frame();
        let detection = detect("bounded", &df, json!({"lower": 0})).unwrap();
        let shorter = df.head(Some(3));
        let err = Cleaner::new(&Strategy::ToNa, &detection).clean(&shorter).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_missing_column() {
        let df = frame();
        let detection = detect("bounded", &df, json!({"lower": 0})).unwrap();
        let other = df!("y" => [1i64, 2, 3, 4, 5]).unwrap();
        let err = Cleaner::new(&Strategy::ToNa, &detection).clean(&other).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_incompatible_strategy() {
        let df = df!("fruit" => ["Granny", "granny"]).unwrap();
        let detection = detect("alternatives", &df, json!({})).unwrap();
        let err = Cleaner::new(&Strategy::Clip, &detection).clean(&df).unwrap_err();
        assert!(matches!(err, Error::IncompatibleStrategy { .. }));
    }
}
