//! Prediction-instability metrics across bootstrap refits

use crate::error::{BootvalError, Result};
use ndarray::{Array1, Array2};

/// Per-subject mean absolute difference between the subject's
/// bootstrap-model predictions and its original-model prediction.
///
/// Rows of `bootstrap_preds` that contain non-finite values (failed
/// bootstrap iterations recorded as missing) are excluded from the
/// average; the denominator is the number of successful iterations.
pub fn mape_per_subject(
    bootstrap_preds: &Array2<f64>,
    original_preds: &Array1<f64>,
) -> Result<Array1<f64>> {
    let (b, n) = bootstrap_preds.dim();
    if n != original_preds.len() {
        return Err(BootvalError::ShapeError {
            expected: format!("{} columns", original_preds.len()),
            actual: format!("{} columns", n),
        });
    }
    if b == 0 || n == 0 {
        return Err(BootvalError::InvalidInput(
            "empty prediction matrix".to_string(),
        ));
    }

    let valid_rows: Vec<usize> = (0..b)
        .filter(|&i| bootstrap_preds.row(i).iter().all(|v| v.is_finite()))
        .collect();
    if valid_rows.is_empty() {
        return Err(BootvalError::InvalidInput(
            "no successful bootstrap iterations in prediction matrix".to_string(),
        ));
    }

    let denom = valid_rows.len() as f64;
    let mape = Array1::from_shape_fn(n, |j| {
        let orig = original_preds[j];
        valid_rows
            .iter()
            .map(|&i| (bootstrap_preds[[i, j]] - orig).abs())
            .sum::<f64>()
            / denom
    });

    Ok(mape)
}

/// Grand mean of the per-subject instability over all subjects.
pub fn average_mape(bootstrap_preds: &Array2<f64>, original_preds: &Array1<f64>) -> Result<f64> {
    let per_subject = mape_per_subject(bootstrap_preds, original_preds)?;
    Ok(per_subject.mean().unwrap_or(0.0))
}
