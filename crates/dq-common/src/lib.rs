//! Shared utilities for the data-quality crates.
//!
//! This crate provides common helpers used across the workspace,
//! including Polars `AnyValue` extraction and date conversions.

pub mod dates;
pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use self::dates::{
    any_to_datetime, date_from_epoch_days, datetime_from_timestamp, epoch_days, epoch_micros,
    parse_datetime, parse_datetime_with,
};
pub use self::polars::{
    any_to_f64, any_to_i64, any_to_key, any_to_string, any_to_text, float_to_i64,
    format_numeric, is_missing, parse_f64, parse_i64,
};
