//! Row masks over already extracted cell values.
//!
//! Missing cells are never flagged here; the detector applies the
//! missing-value policy on top.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDateTime;

use dq_model::{FittedBounds, FittedValues, Inclusive, Keep, MissingHow};

use crate::compare::is_outside;

/// Numeric cells outside the fitted bounds.
pub fn outside_bounds(values: &[Option<f64>], bounds: &FittedBounds, inclusive: Inclusive) -> Vec<bool> {
    values
        .iter()
        .map(|v| {
            v.is_some_and(|x| is_outside(&x, bounds.lower.as_ref(), bounds.upper.as_ref(), inclusive))
        })
        .collect()
}

pub fn outside_dates(
    values: &[Option<NaiveDateTime>],
    lower: Option<NaiveDateTime>,
    upper: Option<NaiveDateTime>,
    inclusive: Inclusive,
) -> Vec<bool> {
    values
        .iter()
        .map(|v| v.is_some_and(|d| is_outside(&d, lower.as_ref(), upper.as_ref(), inclusive)))
        .collect()
}

/// Cells outside `allowed`, or inside it when `forbidden`.
pub fn membership(keys: &[Option<String>], allowed: &BTreeSet<String>, forbidden: bool) -> Vec<bool> {
    keys.iter()
        .map(|key| {
            key.as_ref()
                .is_some_and(|k| allowed.contains(k) == forbidden)
        })
        .collect()
}

/// Cells whose value was not accepted at fit.
pub fn unaccepted(keys: &[Option<String>], fitted: &FittedValues) -> Vec<bool> {
    membership(keys, &fitted.valid, false)
}

/// Rows with any (or all) cells missing.
pub fn missing_rows(counts: &[usize], n_columns: usize, how: MissingHow) -> Vec<bool> {
    counts
        .iter()
        .map(|&count| match how {
            MissingHow::Any => count > 0,
            MissingHow::All => n_columns > 0 && count == n_columns,
        })
        .collect()
}

/// Repeated rows; `keep` decides which occurrence stays valid.
///
/// Missing cells compare equal to each other.
pub fn duplicated(rows: &[Vec<Option<String>>], keep: Keep) -> Vec<bool> {
    match keep {
        Keep::First => {
            let mut seen = HashSet::with_capacity(rows.len());
            rows.iter().map(|row| !seen.insert(row)).collect()
        }
        Keep::Last => {
            let mut seen = HashSet::with_capacity(rows.len());
            let mut mask: Vec<bool> = rows.iter().rev().map(|row| !seen.insert(row)).collect();
            mask.reverse();
            mask
        }
        Keep::None => {
            let mut counts: HashMap<&Vec<Option<String>>, usize> = HashMap::new();
            for row in rows {
                *counts.entry(row).or_insert(0) += 1;
            }
            rows.iter().map(|row| counts[row] > 1).collect()
        }
    }
}
