//! Integration tests for the cleaning strategies.

use anyhow::Result;
use polars::prelude::{DataFrame, DataType, IntoColumn, NamedFrom, Series};
use serde_json::json;

use dq_clean::{Frame, FrameMut, Replacement, Strategy, clean, clean_in_place};
use dq_detect::{Detector, detect, replay};
use dq_model::{CustomOptions, DetectorSpec, Error, Method, Value};

fn scores() -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        Series::new("x".into(), &[1i64, 5, -6, 100, 10]).into_column(),
        Series::new("id".into(), &["a", "b", "c", "d", "e"]).into_column(),
    ])?)
}

fn ints(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    Ok(df.column(name)?.i64()?.into_iter().collect())
}

fn texts(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    Ok(df
        .column(name)?
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

#[test]
fn drop_and_clip_end_to_end() -> Result<()> {
    let df = scores()?;
    let detection = detect("bounded", &df.select(["x"])?, json!({"lower": 0, "upper": 10}))?;

    let dropped = clean(&Strategy::Drop, &detection, &df)?;
    assert_eq!(ints(&dropped, "x")?, vec![Some(1), Some(5), Some(10)]);
    assert_eq!(texts(&dropped, "id")?, vec![
        Some("a".to_string()),
        Some("b".to_string()),
        Some("e".to_string())
    ]);

    let clipped = clean(&Strategy::Clip, &detection, &df)?;
    assert_eq!(clipped.column("x")?.dtype(), &DataType::Int64);
    assert_eq!(
        ints(&clipped, "x")?,
        vec![Some(1), Some(5), Some(0), Some(10), Some(10)]
    );
    assert_eq!(texts(&clipped, "id")?, texts(&df, "id")?);
    Ok(())
}

#[test]
fn clip_is_idempotent() -> Result<()> {
    let df = scores()?.select(["x"])?;
    let detection = detect("bounded", &df, json!({"lower": 0, "upper": 10}))?;
    let once = clean(&Strategy::Clip, &detection, &df)?;
    let again = clean(&Strategy::Clip, &detector_rerun(&detection, &once)?, &once)?;
    assert!(once.equals_missing(&again));
    Ok(())
}

fn detector_rerun(
    detection: &dq_detect::Detection,
    data: &DataFrame,
) -> Result<dq_detect::Detection> {
    Ok(dq_detect::replay(detection.detector(), data)?)
}

#[test]
fn to_na_and_replace() -> Result<()> {
    let df = scores()?.select(["x"])?;
    let detection = detect("bounded", &df, json!({"lower": 0, "upper": 10}))?;

    let missing = clean(&Strategy::ToNa, &detection, &df)?;
    assert_eq!(
        ints(&missing, "x")?,
        vec![Some(1), Some(5), None, None, Some(10)]
    );

    let constant = clean(
        &Strategy::Replace(Replacement::constant(Value::Int(-1))),
        &detection,
        &df,
    )?;
    assert_eq!(
        ints(&constant, "x")?,
        vec![Some(1), Some(5), Some(-1), Some(-1), Some(10)]
    );

    let mapping = clean(
        &Strategy::Replace(Replacement::mapping([(Value::Int(-6), Value::Int(6))])),
        &detection,
        &df,
    )?;
    assert_eq!(
        ints(&mapping, "x")?,
        vec![Some(1), Some(5), Some(6), None, Some(10)]
    );

    let halved = clean(
        &Strategy::Replace(Replacement::function(|v| match v.as_f64() {
            Some(x) => Value::Float(x / 2.0),
            None => Value::Missing,
        })),
        &detection,
        &df,
    )?;
    assert_eq!(
        ints(&halved, "x")?,
        vec![Some(1), Some(5), Some(-3), Some(50), Some(10)]
    );
    Ok(())
}

#[test]
fn bykeys_merges_alternative_spellings() -> Result<()> {
    let df = DataFrame::new(vec![
        Series::new(
            "apple".into(),
            &[Some("Granny"), Some("granny"), Some("GRANNY"), Some("Fuji"), None],
        )
        .into_column(),
    ])?;
    let detection = detect("alternatives", &df, json!({}))?;
    let cleaned = clean(&Strategy::ByKeys, &detection, &df)?;
    assert_eq!(texts(&cleaned, "apple")?, vec![
        Some("Granny".to_string()),
        Some("Granny".to_string()),
        Some("Granny".to_string()),
        Some("Fuji".to_string()),
        None
    ]);
    Ok(())
}

#[test]
fn bykeys_clears_unknown_spellings_on_replay() -> Result<()> {
    let train = DataFrame::new(vec![
        Series::new("apple".into(), &["Granny", "granny", "Fuji"]).into_column(),
    ])?;
    let detection = detect("alternatives", &train, json!({}))?;
    let incoming = DataFrame::new(vec![
        Series::new("apple".into(), &[Some("GRANNY"), Some("Pink Lady"), Some("Fuji"), None])
            .into_column(),
    ])?;
    let replayed = replay(detection.detector(), &incoming)?;
    assert_eq!(replayed.is_error(), &[true, true, false, false]);

    let cleaned = clean(&Strategy::ByKeys, &replayed, &incoming)?;
    assert_eq!(texts(&cleaned, "apple")?, vec![
        Some("Granny".to_string()),
        None,
        Some("Fuji".to_string()),
        None
    ]);
    Ok(())
}

#[test]
fn custom_row_predicate_then_to_na() -> Result<()> {
    let df = DataFrame::new(vec![
        Series::new("side".into(), &[1i64, 2, 3]).into_column(),
        Series::new("area".into(), &[1i64, 3, 9]).into_column(),
    ])?;
    let bad_square = CustomOptions::row(|row| match (row[0].as_f64(), row[1].as_f64()) {
        (Some(side), Some(area)) => side * side != area,
        _ => false,
    });
    let detector = Detector::fit(DetectorSpec::new(Method::Custom(bad_square))?, &df)?;
    let detection = Frame::new(&df).detect_with(&detector)?;
    assert_eq!(detection.error_indices(), vec![1]);

    let cleaned = clean(&Strategy::ToNa, &detection, &df)?;
    assert_eq!(ints(&cleaned, "side")?, vec![Some(1), None, Some(3)]);
    assert_eq!(ints(&cleaned, "area")?, vec![Some(1), None, Some(9)]);
    Ok(())
}

#[test]
fn by_category_rows_can_be_dropped() -> Result<()> {
    let df = DataFrame::new(vec![
        Series::new("price".into(), &[1.0, 1.2, 0.9, 1.1, 30.0, 31.0, 29.0, 30.5, 1.0])
            .into_column(),
        Series::new(
            "item".into(),
            &["pen", "pen", "pen", "pen", "book", "book", "book", "book", "book"],
        )
        .into_column(),
    ])?;
    let detection = detect(
        "by_category",
        &df,
        json!({"within": {"method": "iqr", "options": {}}}),
    )?;
    assert_eq!(detection.error_indices(), vec![8]);
    assert_eq!(clean(&Strategy::Drop, &detection, &df)?.height(), 8);
    let err = clean(&Strategy::Clip, &detection, &df).unwrap_err();
    assert!(matches!(err, Error::IncompatibleStrategy { .. }));
    Ok(())
}

#[test]
fn cast_with_separators() -> Result<()> {
    let df = DataFrame::new(vec![
        Series::new("amount".into(), &[Some("100 000"), Some("154,5"), Some("n/a"), None])
            .into_column(),
    ])?;
    let detection = detect(
        "castable",
        &df,
        json!({"target": "float", "thousands": " ", "decimal": ","}),
    )?;
    assert_eq!(detection.error_indices(), vec![2]);

    let cleaned = clean(&Strategy::Cast, &detection, &df)?;
    let values: Vec<Option<f64>> = cleaned.column("amount")?.f64()?.into_iter().collect();
    assert_eq!(values, vec![Some(100_000.0), Some(154.5), None, None]);
    Ok(())
}

#[test]
fn strip_trims_flagged_cells() -> Result<()> {
    let df = DataFrame::new(vec![
        Series::new("name".into(), &["Ada", " Linus", "Grace  "]).into_column(),
    ])?;
    let detection = detect("spaces", &df, json!({"side": "leading"}))?;
    let cleaned = clean(&Strategy::Strip, &detection, &df)?;
    assert_eq!(texts(&cleaned, "name")?, vec![
        Some("Ada".to_string()),
        Some("Linus".to_string()),
        Some("Grace  ".to_string())
    ]);
    Ok(())
}

#[test]
fn incompatible_pairs_are_rejected() -> Result<()> {
    let df = scores()?.select(["x"])?;
    let detection = detect("bounded", &df, json!({"lower": 0}))?;
    for strategy in [Strategy::ByKeys, Strategy::Cast, Strategy::Strip] {
        let err = clean(&strategy, &detection, &df).unwrap_err();
        assert!(matches!(err, Error::IncompatibleStrategy { .. }), "{err}");
    }
    Ok(())
}

#[test]
fn mask_must_match_height() -> Result<()> {
    let df = scores()?.select(["x"])?;
    let detection = detect("bounded", &df, json!({"lower": 0}))?;
    let longer = DataFrame::new(vec![
        Series::new("x".into(), &[1i64, 2, 3, 4, 5, 6]).into_column(),
    ])?;
    let err = clean(&Strategy::ToNa, &detection, &longer).unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
    Ok(())
}

#[test]
fn in_place_through_accessor() -> Result<()> {
    let mut df = scores()?;
    let detection = Frame::new(&df).detect("duplicated", json!({"subset": ["id"]}))?;
    assert!(!detection.has_errors());
    clean_in_place(&Strategy::Drop, &detection, &mut df)?;
    assert_eq!(df.height(), 5);

    let subset = df.select(["x"])?;
    let detection = detect("bounded", &subset, json!({"upper": 10}))?;
    FrameMut::new(&mut df).clean_in_place(&Strategy::ToNa, &detection)?;
    assert_eq!(ints(&df, "x")?[3], None);
    Ok(())
}
