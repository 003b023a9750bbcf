//! Column rewrites behind the cleaning strategies.
//!
//! Every function returns a new column of the same length. Only flagged
//! cells are rewritten; the rest are carried over from the original series
//! through a `zip_with` merge, so their dtype and bits never change unless a
//! replacement forces the column to widen.

use chrono::NaiveDateTime;
use polars::prelude::{
    BooleanChunked, Column, DataType, IntoColumn, NamedFrom, NewChunkedArray,
    PlSmallStr, Series, TimeUnit,
};

use dq_common::{epoch_micros, float_to_i64, parse_datetime};
use dq_detect::frame::{is_integer_dtype, text_values, value_kind, value_of};
use dq_detect::{Cast, CastParser, ClusterIndex};
use dq_model::{CastTarget, Error, FittedBounds, Result, SpaceSide, Value, ValueKind};

use crate::strategy::Replacement;

/// Sets flagged cells to missing, keeping the dtype.
pub fn to_missing(column: &Column, mask: &[bool]) -> Result<Column> {
    let series = column.as_materialized_series();
    let nulls = Series::full_null(column.name().clone(), column.len(), column.dtype());
    merge(series, mask, &nulls)
}

/// Moves flagged numeric cells inside `[lower, upper]`.
pub fn clip(column: &Column, mask: &[bool], bounds: &FittedBounds) -> Result<Column> {
    let series = column.as_materialized_series();
    let raw = series.cast(&DataType::Float64)?;
    let clipped: Vec<Option<f64>> = raw
        .f64()?
        .into_iter()
        .zip(mask)
        .map(|(value, &flagged)| {
            if !flagged {
                return None;
            }
            value.map(|x| {
                let x = bounds.lower.map_or(x, |lower| x.max(lower));
                bounds.upper.map_or(x, |upper| x.min(upper))
            })
        })
        .collect();
    numeric_merge(series, mask, &Series::new(column.name().clone(), clipped))
}

/// Applies `replacement` to flagged cells.
pub fn replace(column: &Column, mask: &[bool], replacement: &Replacement) -> Result<Column> {
    let values = (0..column.len())
        .map(|idx| {
            Ok(if mask[idx] {
                replacement.apply(&value_of(column.get(idx)?))
            } else {
                Value::Missing
            })
        })
        .collect::<Result<Vec<Value>>>()?;
    replaced_column(column, mask, &values)
}

/// Replaces flagged labels by their cluster representative. Flagged labels
/// with an unknown fingerprint become missing.
pub fn by_keys(column: &Column, mask: &[bool], index: &ClusterIndex<'_>) -> Result<Column> {
    let values: Vec<Option<String>> = text_values(column)?
        .into_iter()
        .zip(mask)
        .map(|(label, &flagged)| match label {
            Some(label) if flagged => index.representative(&label).map(str::to_string),
            _ => None,
        })
        .collect();
    let replaced = Series::new(column.name().clone(), values);
    merge(column.as_materialized_series(), mask, &replaced)
}

/// Trims the checked side(s) of flagged text cells.
pub fn strip(column: &Column, mask: &[bool], side: SpaceSide) -> Result<Column> {
    let values: Vec<Option<String>> = text_values(column)?
        .into_iter()
        .zip(mask)
        .map(|(value, &flagged)| {
            value.filter(|_| flagged).map(|s| match side {
                SpaceSide::Leading => s.trim_start().to_string(),
                SpaceSide::Trailing => s.trim_end().to_string(),
                SpaceSide::Both => s.trim().to_string(),
            })
        })
        .collect();
    let replaced = Series::new(column.name().clone(), values);
    merge(column.as_materialized_series(), mask, &replaced)
}

/// Converts a text column to the parser's target; flagged cells become missing.
pub fn cast(column: &Column, mask: &[bool], parser: &CastParser) -> Result<Column> {
    let casts: Vec<Option<Cast>> = text_values(column)?
        .iter()
        .zip(mask)
        .map(|(value, &flagged)| {
            if flagged {
                None
            } else {
                value.as_deref().and_then(|s| parser.parse(s))
            }
        })
        .collect();
    let name = column.name().clone();

    let series = match parser.target() {
        CastTarget::Int => Series::new(
            name,
            casts
                .iter()
                .map(|c| match c {
                    Some(Cast::Int(v)) => Some(*v),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        ),
        CastTarget::Float => Series::new(
            name,
            casts
                .iter()
                .map(|c| match c {
                    Some(Cast::Float(v)) => Some(*v),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        ),
        CastTarget::Boolean => Series::new(
            name,
            casts
                .iter()
                .map(|c| match c {
                    Some(Cast::Boolean(v)) => Some(*v),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        ),
        CastTarget::Date => {
            let dates: Vec<Option<NaiveDateTime>> = casts
                .iter()
                .map(|c| match c {
                    Some(Cast::Date(v)) => Some(*v),
                    _ => None,
                })
                .collect();
            return Ok(datetime_series(&name, &dates, &datetime_dtype())?.into_column());
        }
    };
    Ok(series.into_column())
}

fn datetime_dtype() -> DataType {
    DataType::Datetime(TimeUnit::Microseconds, None)
}

/// Flagged cells from `replaced`, every other cell from `base`. Both series
/// must share a dtype.
fn merge(base: &Series, mask: &[bool], replaced: &Series) -> Result<Column> {
    let keep: Vec<bool> = mask.iter().map(|flag| !flag).collect();
    let keep = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(base.zip_with(&keep, replaced)?.into_column())
}

/// Merges float replacements into a numeric column. An integer column keeps
/// its dtype when every replacement is integral and in range, otherwise the
/// whole column is widened to `Float64`.
fn numeric_merge(original: &Series, mask: &[bool], replaced: &Series) -> Result<Column> {
    let dtype = original.dtype();
    if !is_integer_dtype(dtype) {
        return merge(original, mask, &replaced.cast(dtype)?);
    }
    let integral = replaced
        .f64()?
        .into_iter()
        .flatten()
        .all(|v| float_to_i64(v).is_some());
    if integral && let Ok(narrowed) = replaced.strict_cast(dtype) {
        return merge(original, mask, &narrowed);
    }
    tracing::debug!(
        column = %original.name(),
        dtype = %dtype,
        "non-integral replacement, widening to Float64"
    );
    merge(&original.cast(&DataType::Float64)?, mask, replaced)
}

fn datetime_series(
    name: &PlSmallStr,
    values: &[Option<NaiveDateTime>],
    dtype: &DataType,
) -> Result<Series> {
    let micros: Vec<Option<i64>> = values.iter().map(|v| v.map(epoch_micros)).collect();
    let series = Series::new(name.clone(), micros).cast(&datetime_dtype())?;
    Ok(series.cast(dtype)?)
}

/// Merges the replacement `values` of flagged cells into `original`, keeping
/// its dtype when every replacement fits the column kind and falling back to
/// text otherwise. Unflagged cells are never rewritten.
fn replaced_column(original: &Column, mask: &[bool], values: &[Value]) -> Result<Column> {
    let name = original.name().clone();
    let series = original.as_materialized_series();
    let dtype = original.dtype();
    let present = || values.iter().filter(|v| !v.is_missing());

    match value_kind(dtype) {
        Some(ValueKind::Numeric) => {
            if is_integer_dtype(dtype) && present().all(|v| matches!(v, Value::Int(_))) {
                let ints: Vec<Option<i64>> = values
                    .iter()
                    .map(|v| match v {
                        Value::Int(i) => Some(*i),
                        _ => None,
                    })
                    .collect();
                if let Ok(narrowed) = Series::new(name.clone(), ints).strict_cast(dtype) {
                    return merge(series, mask, &narrowed);
                }
            }
            if present().all(|v| v.as_f64().is_some()) {
                let floats: Vec<Option<f64>> = values.iter().map(Value::as_f64).collect();
                return numeric_merge(series, mask, &Series::new(name, floats));
            }
        }
        Some(ValueKind::Boolean) if present().all(|v| matches!(v, Value::Bool(_))) => {
            let bools: Vec<Option<bool>> = values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            return merge(series, mask, &Series::new(name, bools));
        }
        Some(ValueKind::Text) if present().all(|v| matches!(v, Value::Text(_))) => {
            let texts: Vec<Option<String>> =
                values.iter().map(|v| v.as_str().map(str::to_string)).collect();
            return merge(series, mask, &Series::new(name, texts));
        }
        Some(ValueKind::Datetime) => {
            let dates: Option<Vec<Option<NaiveDateTime>>> = values
                .iter()
                .map(|v| match v {
                    v if v.is_missing() => Some(None),
                    Value::Text(s) => parse_datetime(s).map(Some),
                    _ => None,
                })
                .collect();
            if let Some(dates) = dates {
                return merge(series, mask, &datetime_series(&name, &dates, dtype)?);
            }
        }
        _ => {}
    }

    tracing::debug!(
        column = %name,
        dtype = %dtype,
        "replacement values do not fit the column dtype, storing as text"
    );
    let texts: Vec<Option<String>> = values
        .iter()
        .map(|v| (!v.is_missing()).then(|| v.to_string()))
        .collect();
    merge(
        &series.cast(&DataType::String)?,
        mask,
        &Series::new(name, texts),
    )
}

/// Mask length must match the frame height.
pub fn check_mask(mask: &[bool], height: usize) -> Result<()> {
    if mask.len() != height {
        return Err(Error::schema(format!(
            "detection covers {} rows, data has {}",
            mask.len(),
            height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;
    use super::clip;

    #[test]
    fn test_clip_restores_integer_dtype() {
        let column: Column = Series::new("x".into(), &[1i64, 5, -6, 100, 10]).into();
        let mask = [false, false, true, true, false];
        let clipped = clip(&column, &mask, &FittedBounds::literal(Some(0.0), Some(10.0))).unwrap();
        assert_eq!(clipped.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = clipped.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1), Some(5), Some(0), Some(10), Some(10)]);
    }

    #[test]
    fn test_clip_keeps_unflagged_integers_exact() {
        let big = (1i64 << 53) + 1;
        let column: Column = Series::new("x".into(), &[big, -5]).into();
        let clipped =
            clip(&column, &[false, true], &FittedBounds::literal(Some(0.0), None)).unwrap();
        assert_eq!(clipped.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = clipped.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(big), Some(0)]);
    }

    #[test]
    fn test_clip_widens_on_fractional_bound() {
        let column: Column = Series::new("x".into(), &[3i64, 20]).into();
        let clipped =
            clip(&column, &[false, true], &FittedBounds::literal(None, Some(10.5))).unwrap();
        assert_eq!(clipped.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = clipped.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(3.0), Some(10.5)]);
    }

    #[test]
    fn test_clip_keeps_float32_dtype() {
        let column: Column = Series::new("x".into(), &[1.5f32, 99.0]).into();
        let clipped =
            clip(&column, &[false, true], &FittedBounds::literal(None, Some(2.0))).unwrap();
        assert_eq!(clipped.dtype(), &DataType::Float32);
    }

    #[test]
    fn test_replace_keeps_unflagged_integers_exact() {
        let big = (1i64 << 53) + 1;
        let column: Column = Series::new("x".into(), &[big, -5]).into();
        let cleaned = replace(&column, &[false, true], &Replacement::constant(0i64)).unwrap();
        assert_eq!(cleaned.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = cleaned.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(big), Some(0)]);
    }

    #[test]
    fn test_replace_keeps_unflagged_nan() {
        let column: Column = Series::new("x".into(), &[f64::NAN, 7.0]).into();
        let cleaned = replace(&column, &[false, true], &Replacement::constant(1.5)).unwrap();
        let values: Vec<Option<f64>> = cleaned.f64().unwrap().into_iter().collect();
        assert!(values[0].is_some_and(f64::is_nan));
        assert_eq!(values[1], Some(1.5));
    }

    #[test]
    fn test_replace_with_missing_keeps_text_dtype() {
        let column: Column = Series::new("x".into(), &[Some("a"), None, Some("c")]).into();
        let cleaned =
            replace(&column, &[true, false, false], &Replacement::constant(Value::Missing))
                .unwrap();
        assert_eq!(cleaned.dtype(), &DataType::String);
        let values: Vec<Option<&str>> = cleaned.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![None, None, Some("c")]);
    }

    #[test]
    fn test_to_missing_keeps_dtype() {
        let column: Column = Series::new("x".into(), &["a", "b"]).into();
        let cleaned = to_missing(&column, &[true, false]).unwrap();
        assert_eq!(cleaned.dtype(), &DataType::String);
        assert_eq!(cleaned.null_count(), 1);
    }

    #[test]
    fn test_replace_falls_back_to_text() {
        let column: Column = Series::new("x".into(), &[1i64, 2]).into();
        let cleaned =
            replace(&column, &[false, true], &Replacement::constant("unknown")).unwrap();
        assert_eq!(cleaned.dtype(), &DataType::String);
        let values: Vec<Option<&str>> = cleaned.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("1"), Some("unknown")]);
    }
}
