//! DataFrame preparation: numeric coercion and matrix extraction

use crate::error::{BootvalError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;

/// Coerce predictor and target columns to Float64, turning any
/// non-numeric entry (sentinel strings such as "NA" or "?") into a
/// missing value. Row count and order pass through unchanged.
pub fn preprocess(df: &DataFrame, predictors: &[String], target: &str) -> Result<DataFrame> {
    let mut result = df.clone();

    let mut columns: Vec<&str> = predictors.iter().map(|s| s.as_str()).collect();
    columns.push(target);

    for name in columns {
        let col = df
            .column(name)
            .map_err(|_| BootvalError::ColumnNotFound(name.to_string()))?;
        // Non-strict cast: unparseable entries become null
        let casted = col
            .cast(&DataType::Float64)
            .map_err(|e| BootvalError::DataError(e.to_string()))?;
        result = result
            .with_column(casted)
            .map_err(|e| BootvalError::DataError(e.to_string()))?
            .clone();
    }

    Ok(result)
}

/// Extract the feature matrix and target vector from a fully numeric,
/// imputed DataFrame. Any remaining missing value is an error, never a
/// silent substitution.
pub fn to_matrix(
    df: &DataFrame,
    predictors: &[String],
    target: &str,
) -> Result<(Array2<f64>, Array1<f64>)> {
    let n_rows = df.height();
    let n_cols = predictors.len();
    if n_cols == 0 {
        return Err(BootvalError::InvalidInput(
            "no predictor columns given".to_string(),
        ));
    }

    let col_data: Vec<Vec<f64>> = predictors
        .iter()
        .map(|name| column_values(df, name))
        .collect::<Result<Vec<_>>>()?;

    let x = Array2::from_shape_fn((n_rows, n_cols), |(r, c)| col_data[c][r]);
    let y = Array1::from_vec(column_values(df, target)?);

    Ok((x, y))
}

fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let col = df
        .column(name)
        .map_err(|_| BootvalError::ColumnNotFound(name.to_string()))?;
    let casted = col
        .cast(&DataType::Float64)
        .map_err(|e| BootvalError::DataError(e.to_string()))?;
    casted
        .f64()
        .map_err(|e| BootvalError::DataError(e.to_string()))?
        .into_iter()
        .map(|v| {
            v.ok_or_else(|| {
                BootvalError::DataError(format!(
                    "column '{}' contains missing values; impute before extraction",
                    name
                ))
            })
        })
        .collect()
}
