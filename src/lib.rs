//! bootval - Bootstrap optimism-corrected model validation
//!
//! Validates binary clinical-outcome prediction models by refitting
//! them on bootstrap resamples and subtracting the estimated optimism
//! from their apparent performance.
//!
//! # Modules
//!
//! - [`data`] - CSV loading, numeric coercion, imputation, matrix extraction
//! - [`model`] - elastic-net logistic regression, cross-validation, grid search
//! - [`metrics`] - discrimination, calibration, and instability metrics
//! - [`validate`] - resampler, optimism-correction orchestrator, report
//! - [`cli`] - command-line interface

pub mod error;

pub mod data;
pub mod metrics;
pub mod model;
pub mod validate;

pub mod cli;

pub use error::{BootvalError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{BootvalError, Result};

    // Data preparation
    pub use crate::data::{load_csv, preprocess, to_matrix, ImputeStrategy, Imputer, Standardizer};

    // Models and tuning
    pub use crate::model::{
        BinaryClassifier, CrossValidator, CvStrategy, ElasticNetLogistic, GridSearchCv, ParamGrid,
    };

    // Metrics
    pub use crate::metrics::{
        brier_score, calibration_curve, calibration_slope_intercept, probability_grid, roc_auc,
        ConfusionCounts,
    };

    // Validation
    pub use crate::validate::{
        DegeneratePolicy, OptimismValidator, ValidationConfig, ValidationReport,
    };
}
