//! Immutable validation report and plot-data extraction

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Hyperparameters chosen by the grid search, when one was run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningSummary {
    pub best_alpha: f64,
    pub best_l1_ratio: f64,
    /// Cross-validated AUC of the chosen combination
    pub cv_auc: f64,
}

/// In-sample performance of the apparent model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApparentMetrics {
    pub auc: f64,
    pub sensitivity: f64,
    pub specificity: f64,
    pub brier: f64,
    pub calibration_curve: Vec<f64>,
    pub calibration_slope: f64,
    pub calibration_intercept: f64,
}

/// Bias-corrected estimates produced by the correction stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectedMetrics {
    /// Apparent AUC minus mean optimism
    pub auc: f64,
    /// Mean AUC optimism across successful iterations
    pub auc_optimism: f64,
    /// 2.5th/97.5th percentiles of the per-iteration test AUC
    pub auc_ci_percentile: (f64, f64),
    /// Location-shifted interval: corrected ± mean optimism
    pub auc_ci_shifted: (f64, f64),
    pub calibration_curve: Vec<f64>,
    pub calibration_slope: f64,
    pub calibration_intercept: f64,
}

/// Per-iteration metric lists, in loop order. Failed iterations hold
/// NaN so every list keeps exactly one entry per requested iteration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IterationArrays {
    /// Bootstrap-model AUC on the original dataset
    pub auc_test: Vec<f64>,
    /// Bootstrap-model AUC on its own bootstrap sample
    pub auc_bootstrap: Vec<f64>,
    /// Per-iteration AUC optimism (bootstrap minus test)
    pub auc_optimism: Vec<f64>,
    pub sensitivity: Vec<f64>,
    pub specificity: Vec<f64>,
    pub brier: Vec<f64>,
    /// Bootstrap-model calibration curves on the original dataset
    pub calibration_curves: Vec<Vec<f64>>,
    /// Pointwise calibration-curve optimism per iteration
    pub calibration_optimism: Vec<Vec<f64>>,
}

/// A bootstrap iteration that produced no metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationFailure {
    pub iteration: usize,
    pub message: String,
}

/// Result bundle of a completed validation run. Constructed once after
/// the bootstrap loop; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub created_at: DateTime<Utc>,
    pub n_samples: usize,
    pub n_features: usize,
    /// Requested number of bootstrap iterations
    pub n_bootstrap: usize,
    /// Iterations that produced metrics
    pub n_completed: usize,
    pub tuning: Option<TuningSummary>,
    pub apparent: ApparentMetrics,
    pub corrected: CorrectedMetrics,
    /// Evaluation grid shared by all calibration curves
    pub grid: Vec<f64>,
    pub iterations: IterationArrays,
    /// Apparent-model predictions on the full dataset
    pub apparent_predictions: Vec<f64>,
    /// Row i holds bootstrap model i's predictions on the full dataset
    pub bootstrap_predictions: Vec<Vec<f64>>,
    pub mape_per_subject: Vec<f64>,
    pub average_mape: f64,
    pub failures: Vec<IterationFailure>,
}

impl ValidationReport {
    /// Build the report from the orchestrator's accumulated state.
    /// Pure aggregation: converts arrays to plain vectors and counts
    /// completed iterations, nothing else.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        n_samples: usize,
        n_features: usize,
        n_bootstrap: usize,
        tuning: Option<TuningSummary>,
        apparent: ApparentMetrics,
        corrected: CorrectedMetrics,
        grid: &Array1<f64>,
        iterations: IterationArrays,
        apparent_predictions: &Array1<f64>,
        bootstrap_predictions: &Array2<f64>,
        mape_per_subject: &Array1<f64>,
        average_mape: f64,
        failures: Vec<IterationFailure>,
    ) -> Self {
        Self {
            created_at: Utc::now(),
            n_samples,
            n_features,
            n_bootstrap,
            n_completed: n_bootstrap - failures.len(),
            tuning,
            apparent,
            corrected,
            grid: grid.to_vec(),
            iterations,
            apparent_predictions: apparent_predictions.to_vec(),
            bootstrap_predictions: bootstrap_predictions
                .rows()
                .into_iter()
                .map(|row| row.to_vec())
                .collect(),
            mape_per_subject: mape_per_subject.to_vec(),
            average_mape,
            failures,
        }
    }

    /// Whether every requested iteration produced metrics
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Data for the calibration-curve plot
    pub fn calibration_plot(&self) -> CalibrationPlotData {
        CalibrationPlotData {
            grid: self.grid.clone(),
            apparent: self.apparent.calibration_curve.clone(),
            corrected: self.corrected.calibration_curve.clone(),
            slope: self.corrected.calibration_slope,
            intercept: self.corrected.calibration_intercept,
        }
    }

    /// Data for the prediction-instability scatter: one point per
    /// (subject, successful bootstrap model) pair, apparent prediction
    /// on the x axis.
    pub fn prediction_instability_plot(&self) -> PredictionInstabilityData {
        let mut points = Vec::new();
        for row in &self.bootstrap_predictions {
            if row.iter().any(|v| !v.is_finite()) {
                continue;
            }
            for (j, &p) in row.iter().enumerate() {
                points.push([self.apparent_predictions[j], p]);
            }
        }
        PredictionInstabilityData { points }
    }

    /// Data for the calibration-instability overlay: each successful
    /// bootstrap model's calibration curve over the apparent curve.
    pub fn calibration_instability_plot(&self) -> CalibrationInstabilityData {
        let bootstrap_curves = self
            .iterations
            .calibration_curves
            .iter()
            .filter(|curve| curve.iter().all(|v| v.is_finite()))
            .cloned()
            .collect();
        CalibrationInstabilityData {
            grid: self.grid.clone(),
            apparent: self.apparent.calibration_curve.clone(),
            bootstrap_curves,
        }
    }

    /// Data for the per-subject instability scatter: apparent
    /// prediction vs MAPE.
    pub fn mape_instability_plot(&self) -> MapeInstabilityData {
        let points = self
            .apparent_predictions
            .iter()
            .zip(self.mape_per_subject.iter())
            .map(|(&p, &m)| [p, m])
            .collect();
        MapeInstabilityData { points }
    }
}

/// Calibration curve plot data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationPlotData {
    pub grid: Vec<f64>,
    pub apparent: Vec<f64>,
    pub corrected: Vec<f64>,
    pub slope: f64,
    pub intercept: f64,
}

/// Prediction-instability scatter data: [apparent, bootstrap] pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionInstabilityData {
    pub points: Vec<[f64; 2]>,
}

/// Calibration-instability overlay data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationInstabilityData {
    pub grid: Vec<f64>,
    pub apparent: Vec<f64>,
    pub bootstrap_curves: Vec<Vec<f64>>,
}

/// Per-subject MAPE scatter data: [apparent, mape] pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapeInstabilityData {
    pub points: Vec<[f64; 2]>,
}
