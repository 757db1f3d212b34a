//! Data loading and preparation
//!
//! Turns a raw clinical table into the fully numeric, imputed feature
//! matrix and binary target vector the validation engine consumes:
//! CSV loading, sentinel-to-missing coercion, Float64 casting,
//! mean/median imputation, z-score standardization, and
//! DataFrame-to-ndarray extraction.

mod imputer;
mod preprocess;
mod scaler;

pub use imputer::{ImputeStrategy, Imputer};
pub use preprocess::{preprocess, to_matrix};
pub use scaler::Standardizer;

use crate::error::{BootvalError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Load a CSV file with header into a DataFrame.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|e| BootvalError::DataError(e.to_string()))?;

    let reader = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file);

    reader
        .finish()
        .map_err(|e| BootvalError::DataError(e.to_string()))
}
