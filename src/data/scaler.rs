//! Feature standardization for numeric predictor columns

use crate::error::{BootvalError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-column z-score parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScaleParams {
    mean: f64,
    std: f64,
}

/// Column-wise z-score standardizer: (x - mean) / std per predictor.
/// Fit learns the parameters from the observed entries; transform
/// applies them, leaving unlisted columns untouched.
#[derive(Debug, Clone, Default)]
pub struct Standardizer {
    params: HashMap<String, ScaleParams>,
    is_fitted: bool,
}

impl Standardizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn per-column mean and standard deviation from the observed
    /// entries. A zero-variance column scales by 1.
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        self.params.clear();

        for name in columns {
            let col = df
                .column(name)
                .map_err(|_| BootvalError::ColumnNotFound(name.clone()))?;
            let casted = col
                .cast(&DataType::Float64)
                .map_err(|e| BootvalError::DataError(e.to_string()))?;
            let ca = casted
                .f64()
                .map_err(|e| BootvalError::DataError(e.to_string()))?;

            if ca.len() == ca.null_count() {
                return Err(BootvalError::DataError(format!(
                    "column '{}' has no observed values to standardize from",
                    name
                )));
            }

            let mean = ca.mean().unwrap_or(0.0);
            let std = ca.std(1).unwrap_or(1.0);
            self.params.insert(
                name.clone(),
                ScaleParams {
                    mean,
                    std: if std == 0.0 { 1.0 } else { std },
                },
            );
        }

        self.is_fitted = true;
        Ok(self)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(BootvalError::ModelNotFitted);
        }

        let mut result = df.clone();
        for (name, params) in &self.params {
            let col = df
                .column(name)
                .map_err(|_| BootvalError::ColumnNotFound(name.clone()))?;
            let casted = col
                .cast(&DataType::Float64)
                .map_err(|e| BootvalError::DataError(e.to_string()))?;
            let scaled: Float64Chunked = casted
                .f64()
                .map_err(|e| BootvalError::DataError(e.to_string()))?
                .into_iter()
                .map(|opt| opt.map(|v| (v - params.mean) / params.std))
                .collect();

            result = result
                .with_column(scaled.with_name(name.as_str().into()).into_series())
                .map_err(|e| BootvalError::DataError(e.to_string()))?
                .clone();
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize_centers_and_scales() {
        let df = df!(
            "a" => &[1.0, 2.0, 3.0, 4.0, 5.0],
            "b" => &[10.0, 10.0, 10.0, 10.0, 10.0]
        )
        .unwrap();
        let cols = vec!["a".to_string(), "b".to_string()];
        let out = Standardizer::new().fit_transform(&df, &cols).unwrap();

        let a = out.column("a").unwrap().f64().unwrap();
        assert!(a.mean().unwrap().abs() < 1e-10);
        assert!((a.std(1).unwrap() - 1.0).abs() < 1e-10);

        // Zero-variance column passes through centered, unscaled
        let b = out.column("b").unwrap().f64().unwrap();
        assert!(b.into_iter().all(|v| v.unwrap().abs() < 1e-10));
    }

    #[test]
    fn test_untouched_columns_pass_through() {
        let df = df!(
            "a" => &[1.0, 2.0, 3.0],
            "y" => &[0.0, 1.0, 0.0]
        )
        .unwrap();
        let out = Standardizer::new()
            .fit_transform(&df, &["a".to_string()])
            .unwrap();

        let y = out.column("y").unwrap().f64().unwrap();
        assert_eq!(y.get(1).unwrap(), 1.0);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let df = df!("a" => &[1.0, 2.0]).unwrap();
        let scaler = Standardizer::new();
        assert!(scaler.transform(&df).is_err());
    }
}
