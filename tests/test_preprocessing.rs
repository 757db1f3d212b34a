//! Integration test: data preparation pipeline (preprocess → impute → matrix)

use bootval::data::{preprocess, to_matrix, ImputeStrategy, Imputer};
use polars::prelude::*;

fn clinical_df() -> DataFrame {
    df!(
        "phq_baseline" => &["12", "NA", "18", "9", "15", "?"],
        "sessions" => &[Some(8.0), Some(12.0), None, Some(6.0), Some(10.0), Some(14.0)],
        "age" => &[34i64, 51, 46, 29, 62, 38],
        "remission" => &[1i64, 0, 0, 1, 0, 1]
    )
    .unwrap()
}

fn predictor_names() -> Vec<String> {
    vec![
        "phq_baseline".to_string(),
        "sessions".to_string(),
        "age".to_string(),
    ]
}

#[test]
fn test_preprocess_preserves_rows_and_coerces() {
    let df = clinical_df();
    let out = preprocess(&df, &predictor_names(), "remission").unwrap();

    assert_eq!(out.height(), 6);
    for name in ["phq_baseline", "sessions", "age", "remission"] {
        assert_eq!(out.column(name).unwrap().dtype(), &DataType::Float64);
    }
    // "NA" and "?" became missing
    assert_eq!(out.column("phq_baseline").unwrap().null_count(), 2);
    assert_eq!(out.column("sessions").unwrap().null_count(), 1);
}

#[test]
fn test_full_preparation_yields_complete_matrix() {
    let df = clinical_df();
    let predictors = predictor_names();

    let prepared = preprocess(&df, &predictors, "remission").unwrap();
    let imputed = Imputer::new(ImputeStrategy::Mean)
        .fit_transform(&prepared, &predictors)
        .unwrap();
    let (x, y) = to_matrix(&imputed, &predictors, "remission").unwrap();

    assert_eq!(x.dim(), (6, 3));
    assert_eq!(y.len(), 6);
    assert!(x.iter().all(|v| v.is_finite()));
    assert!(y.iter().all(|&v| v == 0.0 || v == 1.0));

    // Row order untouched: age column passes through verbatim
    assert_eq!(x[[0, 2]], 34.0);
    assert_eq!(x[[5, 2]], 38.0);

    // Imputed phq value is the mean of the four observed entries
    let expected = (12.0 + 18.0 + 9.0 + 15.0) / 4.0;
    assert!((x[[1, 0]] - expected).abs() < 1e-12);
    assert!((x[[5, 0]] - expected).abs() < 1e-12);
}

#[test]
fn test_matrix_extraction_fails_on_remaining_gaps() {
    let df = clinical_df();
    let predictors = predictor_names();
    let prepared = preprocess(&df, &predictors, "remission").unwrap();
    // No imputation: extraction must refuse the gaps rather than fill them
    assert!(to_matrix(&prepared, &predictors, "remission").is_err());
}
