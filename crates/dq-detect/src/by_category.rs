//! Numeric range methods applied within each category.
//!
//! The frame holds one numeric and one categorical column. The inner method
//! is fitted once per category on that category's values, and a value is
//! checked against the bounds of its own category only.

use std::collections::BTreeMap;

use dq_model::{
    ByCategoryOptions, Error, FittedGroups, FittedState, Inclusive, Result, Schema, ValueKind,
};

use crate::compare::is_outside;
use crate::estimate;

/// `(value, category)` column names of a numeric/categorical pair.
pub fn split_columns(schema: &Schema) -> Result<(String, String)> {
    let [a, b] = schema.columns() else {
        return Err(Error::schema(format!(
            "by_category inspects a numeric and a categorical column, got {} columns",
            schema.len()
        )));
    };
    match (a.kind == ValueKind::Numeric, b.kind == ValueKind::Numeric) {
        (true, false) => Ok((a.name.clone(), b.name.clone())),
        (false, true) => Ok((b.name.clone(), a.name.clone())),
        _ => Err(Error::schema(format!(
            "by_category needs exactly one numeric column, got '{}' ({}) and '{}' ({})",
            a.name, a.kind, b.name, b.kind
        ))),
    }
}

/// Fits the inner method on every category. Rows missing either cell take
/// no part in the fit.
pub fn fit(
    options: &ByCategoryOptions,
    columns: (String, String),
    values: &[Option<f64>],
    categories: &[Option<String>],
) -> Result<FittedState> {
    let mut by_category: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (value, category) in values.iter().zip(categories) {
        if let (Some(value), Some(category)) = (value, category) {
            by_category.entry(category).or_default().push(*value);
        }
    }
    if by_category.is_empty() {
        return Ok(FittedState::Trivial);
    }

    let groups = by_category
        .into_iter()
        .map(|(category, values)| {
            Ok((category.to_string(), estimate::range(&options.within, &values)?))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;
    tracing::debug!(
        method = options.within.name(),
        n_groups = groups.len(),
        "fitted by category"
    );

    let (value, category) = columns;
    Ok(FittedState::Groups(FittedGroups {
        category,
        value,
        groups,
    }))
}

/// Flags values outside the bounds of their category. Categories unseen at
/// fit time have no bounds and are never flagged.
pub fn detect(
    fitted: &FittedGroups,
    inclusive: Inclusive,
    values: &[Option<f64>],
    categories: &[Option<String>],
) -> Vec<bool> {
    values
        .iter()
        .zip(categories)
        .map(|(value, category)| {
            let (Some(value), Some(category)) = (value, category) else {
                return false;
            };
            fitted
                .groups
                .get(category)
                .and_then(FittedState::bounds)
                .is_some_and(|b| is_outside(value, b.lower.as_ref(), b.upper.as_ref(), inclusive))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use dq_model::{GaussianOptions, Method, SchemaColumn};

    use super::*;

    fn column(name: &str, kind: ValueKind) -> SchemaColumn {
        SchemaColumn {
            name: name.to_string(),
            kind,
        }
    }

    fn groups(state: FittedState) -> FittedGroups {
        match state {
            FittedState::Groups(g) => g,
            other => panic!("expected groups, got {other:?}"),
        }
    }

    #[test]
    fn test_split_columns_in_any_order() {
        let schema = Schema::new(vec![
            column("fruit", ValueKind::Text),
            column("weight", ValueKind::Numeric),
        ]);
        assert_eq!(
            split_columns(&schema).unwrap(),
            ("weight".to_string(), "fruit".to_string())
        );

        let both_numeric = Schema::new(vec![
            column("a", ValueKind::Numeric),
            column("b", ValueKind::Numeric),
        ]);
        assert!(matches!(split_columns(&both_numeric), Err(Error::Schema(_))));
        let single = Schema::new(vec![column("a", ValueKind::Numeric)]);
        assert!(matches!(split_columns(&single), Err(Error::Schema(_))));
    }

    #[test]
    fn test_iqr_within_each_category() {
        let raw = [
            0.0, 0.0, 0.0, 0.0, -1.0, 1.0, -1.0, 1.0, -2.0, 2.0, 5.0, 6.0, 6.0, 6.0, 6.0, 5.0,
            7.0, 5.0, 7.0, 4.0, 8.0,
        ];
        let values: Vec<Option<f64>> = raw.iter().copied().map(Some).collect();
        let categories: Vec<Option<String>> = (0..raw.len())
            .map(|idx| Some(if idx < 11 { "I" } else { "II" }.to_string()))
            .collect();
        let options = ByCategoryOptions::new(Method::Iqr(GaussianOptions::new()));

        let fitted = groups(
            fit(
                &options,
                ("x".to_string(), "group".to_string()),
                &values,
                &categories,
            )
            .unwrap(),
        );
        assert_eq!(fitted.groups.len(), 2);
        let mask = detect(&fitted, Inclusive::Both, &values, &categories);
        let flagged: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(idx, &f)| f.then_some(idx))
            .collect();
        // 5 is ordinary in group II but far out in group I.
        assert_eq!(flagged, vec![10]);
    }

    #[test]
    fn test_missing_and_unseen_categories() {
        let options = ByCategoryOptions::new(Method::Iqr(GaussianOptions::new()));
        let values = [Some(1.0), Some(2.0), Some(3.0), None, Some(100.0)];
        let categories: Vec<Option<String>> =
            vec![Some("a".into()), Some("a".into()), Some("a".into()), Some("a".into()), None];
        let fitted = groups(
            fit(&options, ("x".into(), "c".into()), &values, &categories).unwrap(),
        );
        assert_eq!(fitted.groups.keys().collect::<Vec<_>>(), vec!["a"]);

        let later = [Some(100.0), Some(100.0)];
        let later_categories = vec![Some("a".to_string()), Some("b".to_string())];
        assert_eq!(
            detect(&fitted, Inclusive::Both, &later, &later_categories),
            vec![true, false]
        );
    }

    #[test]
    fn test_nothing_to_fit_is_trivial() {
        let options = ByCategoryOptions::new(Method::Iqr(GaussianOptions::new()));
        let state = fit(
            &options,
            ("x".into(), "c".into()),
            &[None, Some(1.0)],
            &[Some("a".into()), None],
        )
        .unwrap();
        assert_eq!(state, FittedState::Trivial);
    }
}
