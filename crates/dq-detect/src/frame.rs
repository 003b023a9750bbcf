//! Polars glue: schema capture, typed column extraction and row filtering.

use chrono::NaiveDateTime;
use polars::prelude::{AnyValue, BooleanChunked, Column, DataFrame, DataType, NewChunkedArray};

use dq_common::{any_to_datetime, any_to_i64, any_to_key, any_to_string, is_missing};
use dq_model::{Error, Result, Schema, SchemaColumn, Value, ValueKind};

/// Logical kind of a Polars dtype, `None` for unsupported dtypes.
pub fn value_kind(dtype: &DataType) -> Option<ValueKind> {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64 => Some(ValueKind::Numeric),
        DataType::String => Some(ValueKind::Text),
        DataType::Date | DataType::Datetime(_, _) => Some(ValueKind::Datetime),
        DataType::Boolean => Some(ValueKind::Boolean),
        _ => None,
    }
}

pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Captures column names and kinds of `df`.
pub fn schema_of(df: &DataFrame) -> Result<Schema> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| {
            let kind = value_kind(column.dtype()).ok_or_else(|| {
                Error::schema(format!(
                    "column '{}' has unsupported dtype {}",
                    column.name(),
                    column.dtype()
                ))
            })?;
            Ok(SchemaColumn {
                name: column.name().to_string(),
                kind,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Schema::new(columns))
}

/// Numeric cells as `f64`; nulls and `NaN` become `None`.
pub fn numeric_values(column: &Column) -> Result<Vec<Option<f64>>> {
    let casted = column.cast(&DataType::Float64)?;
    let values = casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Text cells as owned strings.
pub fn text_values(column: &Column) -> Result<Vec<Option<String>>> {
    Ok(column
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Owned [`Value`] of a cell.
pub fn value_of(cell: AnyValue<'_>) -> Value {
    if is_missing(&cell) {
        return Value::Missing;
    }
    match cell {
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::Float32(v) => Value::Float(f64::from(v)),
        AnyValue::Float64(v) => Value::Float(v),
        other => match any_to_i64(other.clone()) {
            Some(v) => Value::Int(v),
            None => Value::Text(any_to_string(other)),
        },
    }
}

pub fn cell_values(column: &Column) -> Result<Vec<Value>> {
    (0..column.len())
        .map(|idx| Ok(value_of(column.get(idx)?)))
        .collect()
}

/// Row-wise values of every column, in column order.
pub fn value_rows(df: &DataFrame) -> Result<Vec<Vec<Value>>> {
    let mut rows = vec![Vec::with_capacity(df.width()); df.height()];
    for column in df.get_columns() {
        for (row, value) in rows.iter_mut().zip(cell_values(column)?) {
            row.push(value);
        }
    }
    Ok(rows)
}

/// Comparison keys of any column, `None` for missing cells.
pub fn key_values(column: &Column) -> Result<Vec<Option<String>>> {
    (0..column.len())
        .map(|idx| Ok(any_to_key(column.get(idx)?)))
        .collect()
}

pub fn datetime_values(column: &Column) -> Result<Vec<Option<NaiveDateTime>>> {
    (0..column.len())
        .map(|idx| Ok(any_to_datetime(column.get(idx)?)))
        .collect()
}

/// Per-cell missing flags of one column.
pub fn missing_cells(column: &Column) -> Result<Vec<bool>> {
    (0..column.len())
        .map(|idx| Ok(is_missing(&column.get(idx)?)))
        .collect()
}

/// Number of missing cells in each row.
pub fn missing_counts(df: &DataFrame) -> Result<Vec<usize>> {
    let mut counts = vec![0; df.height()];
    for column in df.get_columns() {
        for (count, missing) in counts.iter_mut().zip(missing_cells(column)?) {
            *count += usize::from(missing);
        }
    }
    Ok(counts)
}

/// Row-wise keys over `columns`, in order.
pub fn row_keys(df: &DataFrame, columns: &[String]) -> Result<Vec<Vec<Option<String>>>> {
    let mut rows = vec![Vec::with_capacity(columns.len()); df.height()];
    for name in columns {
        let keys = key_values(df.column(name)?)?;
        for (row, key) in rows.iter_mut().zip(keys) {
            row.push(key);
        }
    }
    Ok(rows)
}

/// Row-wise numeric values of every column; `None` when any cell is missing.
pub fn numeric_rows(df: &DataFrame) -> Result<Vec<Option<Vec<f64>>>> {
    let columns = df
        .get_columns()
        .iter()
        .map(numeric_values)
        .collect::<Result<Vec<_>>>()?;
    Ok((0..df.height())
        .map(|idx| columns.iter().map(|values| values[idx]).collect())
        .collect())
}

/// Keeps the rows whose flag is `true`.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    if keep.len() != df.height() {
        return Err(Error::schema(format!(
            "mask has {} rows, data has {}",
            keep.len(),
            df.height()
        )));
    }
    let mask = BooleanChunked::from_slice("mask".into(), keep);
    Ok(df.filter(&mask)?)
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    #[test]
    fn test_schema_of_mixed_frame() {
        let df = DataFrame::new(vec![
            Series::new("x".into(), &[1i64, 2]).into(),
            Series::new("label".into(), &["a", "b"]).into(),
            Series::new("flag".into(), &[true, false]).into(),
        ])
        .unwrap();
        let schema = schema_of(&df).unwrap();
        let kinds: Vec<ValueKind> = schema.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ValueKind::Numeric, ValueKind::Text, ValueKind::Boolean]
        );
    }

    #[test]
    fn test_numeric_values_treat_nan_as_missing() {
        let column: Column =
            Series::new("x".into(), &[Some(1.0), None, Some(f64::NAN)]).into();
        assert_eq!(numeric_values(&column).unwrap(), vec![Some(1.0), None, None]);
    }

    #[test]
    fn test_numeric_rows_drop_incomplete_rows() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[Some(1.0), None]).into(),
            Series::new("b".into(), &[Some(2i64), Some(3)]).into(),
        ])
        .unwrap();
        assert_eq!(numeric_rows(&df).unwrap(), vec![Some(vec![1.0, 2.0]), None]);
    }

    #[test]
    fn test_value_of_cells() {
        assert_eq!(value_of(AnyValue::Int32(3)), Value::Int(3));
        assert_eq!(value_of(AnyValue::Float64(f64::NAN)), Value::Missing);
        assert_eq!(value_of(AnyValue::String("a")), Value::from("a"));
        assert_eq!(value_of(AnyValue::Boolean(true)), Value::Bool(true));
    }

    #[test]
    fn test_value_rows() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[Some(1i64), None]).into(),
            Series::new("b".into(), &["x", "y"]).into(),
        ])
        .unwrap();
        assert_eq!(
            value_rows(&df).unwrap(),
            vec![
                vec![Value::Int(1), Value::from("x")],
                vec![Value::Missing, Value::from("y")],
            ]
        );
    }

    #[test]
    fn test_missing_counts() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[Some("x"), None, None]).into(),
            Series::new("b".into(), &[Some(1.0), Some(f64::NAN), None]).into(),
        ])
        .unwrap();
        assert_eq!(missing_counts(&df).unwrap(), vec![0, 2, 2]);
    }

    #[test]
    fn test_filter_rows_checks_length() {
        let df = DataFrame::new(vec![Series::new("a".into(), &[1i32, 2, 3]).into()]).unwrap();
        let filtered = filter_rows(&df, &[true, false, true]).unwrap();
        assert_eq!(filtered.height(), 2);
        assert!(filter_rows(&df, &[true]).is_err());
    }
}
