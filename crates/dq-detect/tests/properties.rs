//! Property tests over arbitrary numeric columns.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;
use serde_json::json;

use dq_detect::{detect, replay};

fn frame(values: &[Option<f64>]) -> DataFrame {
    DataFrame::new(vec![Series::new("x".into(), values).into_column()]).unwrap()
}

fn column() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::weighted(0.9, -1e6..1e6f64), 0..64)
}

proptest! {
    #[test]
    fn mask_length_matches_rows(values in column()) {
        let df = frame(&values);
        for method in ["iqr", "zscore", "modzscore", "quantiles", "counts"] {
            let detection = detect(method, &df, json!({})).unwrap();
            prop_assert_eq!(detection.is_error().len(), values.len());
        }
    }

    #[test]
    fn missing_cells_are_never_flagged_by_default(values in column()) {
        let df = frame(&values);
        let detection = detect("zscore", &df, json!({"threshold": 0.5})).unwrap();
        for (value, flagged) in values.iter().zip(detection.is_error()) {
            if value.is_none() {
                prop_assert!(!flagged);
            }
        }
        prop_assert_eq!(
            detection.result().n_missing_rows(),
            values.iter().filter(|v| v.is_none()).count()
        );
    }

    #[test]
    fn replay_matches_fit_on_same_data(values in column()) {
        let df = frame(&values);
        let detection = detect("modzscore", &df, json!({})).unwrap();
        let replayed = replay(detection.detector(), &df).unwrap();
        prop_assert_eq!(replayed.is_error(), detection.is_error());
    }
}
