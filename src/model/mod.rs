//! Prediction models and hyperparameter selection
//!
//! The validation engine only sees the [`BinaryClassifier`] trait;
//! [`ElasticNetLogistic`] is the concrete pipeline this crate ships
//! with, and [`GridSearchCv`] selects its penalty configuration.

mod elastic_net;
pub mod cross_validation;
mod tuner;

pub use cross_validation::{CrossValidator, CvSplit, CvStrategy};
pub use elastic_net::ElasticNetLogistic;
pub use tuner::{GridSearchCv, ParamGrid, SearchResult, TrialScore};

use crate::error::Result;
use crate::metrics::threshold_labels;
use ndarray::{Array1, Array2};

/// Trait for binary probability classifiers
pub trait BinaryClassifier: Send + Sync {
    /// Fit the model to training data
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict positive-class probabilities
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Predict 0/1 labels at the given probability threshold
    fn predict(&self, x: &Array2<f64>, threshold: f64) -> Result<Array1<f64>> {
        Ok(threshold_labels(&self.predict_proba(x)?, threshold))
    }

    /// Produce a structurally identical, independently trainable
    /// instance sharing no fitted state with this one
    fn clone_untrained(&self) -> Self
    where
        Self: Sized;
}
