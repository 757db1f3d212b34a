//! Missing-value imputation for numeric columns

use crate::error::{BootvalError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fill strategy for missing numeric values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    Mean,
    Median,
}

/// Column-wise imputer. Fit learns one fill value per column from the
/// observed entries; transform fills the gaps with it.
#[derive(Debug, Clone)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, f64>,
    is_fitted: bool,
}

impl Imputer {
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        self.fill_values.clear();

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

            let observed: Vec<f64> = ca.into_iter().flatten().collect();
            if observed.is_empty() {
                return Err(BootvalError::DataError(format!(
                    "column '{}' has no observed values to impute from",
                    name
                )));
            }

            let fill = match self.strategy {
                ImputeStrategy::Mean => observed.iter().sum::<f64>() / observed.len() as f64,
                ImputeStrategy::Median => {
                    let mut sorted = observed.clone();
                    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                    let mid = sorted.len() / 2;
                    if sorted.len() % 2 == 0 {
                        (sorted[mid - 1] + sorted[mid]) / 2.0
                    } else {
                        sorted[mid]
                    }
                }
            };

            self.fill_values.insert(name.clone(), fill);
        }

        self.is_fitted = true;
        Ok(self)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(BootvalError::ModelNotFitted);
        }

        let mut result = df.clone();
        for (name, &fill) in &self.fill_values {
            let col = df
                .column(name)
                .map_err(|_| BootvalError::ColumnNotFound(name.clone()))?;
            let casted = col
                .cast(&DataType::Float64)
                .map_err(|e| BootvalError::DataError(e.to_string()))?;
            let filled: Vec<f64> = casted
                .f64()
                .map_err(|e| BootvalError::DataError(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or(fill))
                .collect();

            result = result
                .with_column(Series::new(name.as_str().into(), filled))
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

    fn gappy_df() -> DataFrame {
        df!(
            "a" => &[Some(1.0), None, Some(3.0), Some(4.0)],
            "b" => &[Some(10.0), Some(20.0), None, Some(30.0)]
        )
        .unwrap()
    }

    #[test]
    fn test_mean_imputation() {
        let df = gappy_df();
        let cols = vec!["a".to_string(), "b".to_string()];
        let mut imputer = Imputer::new(ImputeStrategy::Mean);
        let out = imputer.fit_transform(&df, &cols).unwrap();

        let a = out.column("a").unwrap().f64().unwrap();
        assert!((a.get(1).unwrap() - (1.0 + 3.0 + 4.0) / 3.0).abs() < 1e-12);
        assert_eq!(out.column("a").unwrap().null_count(), 0);
        assert_eq!(out.column("b").unwrap().null_count(), 0);
    }

    #[test]
    fn test_median_imputation() {
        let df = gappy_df();
        let cols = vec!["a".to_string()];
        let mut imputer = Imputer::new(ImputeStrategy::Median);
        let out = imputer.fit_transform(&df, &cols).unwrap();

        let a = out.column("a").unwrap().f64().unwrap();
        assert!((a.get(1).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let imputer = Imputer::new(ImputeStrategy::Mean);
        assert!(imputer.transform(&gappy_df()).is_err());
    }

    #[test]
    fn test_all_null_column_fails() {
        let df = df!("a" => &[None::<f64>, None]).unwrap();
        let mut imputer = Imputer::new(ImputeStrategy::Mean);
        assert!(imputer.fit(&df, &["a".to_string()]).is_err());
    }
}
