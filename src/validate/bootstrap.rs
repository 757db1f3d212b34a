//! Bootstrap optimism-correction orchestrator
//!
//! Fits the apparent model once on the full dataset, refits it on B
//! bootstrap resamples, and combines apparent and bootstrap performance
//! into bias-corrected estimates with confidence intervals plus
//! per-subject prediction-instability statistics.

use crate::error::{BootvalError, Result};
use crate::metrics::{
    brier_score, calibration_curve, calibration_slope_intercept, mape_per_subject,
    probability_grid, roc_auc, ConfusionCounts,
};
use crate::model::{BinaryClassifier, ElasticNetLogistic, GridSearchCv, ParamGrid};
use crate::validate::report::{
    ApparentMetrics, CorrectedMetrics, IterationArrays, IterationFailure, TuningSummary,
    ValidationReport,
};
use crate::validate::resample::bootstrap_sample;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// How to handle a bootstrap resample whose labels contain a single
/// class (AUC and one of sensitivity/specificity are undefined on it).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DegeneratePolicy {
    /// Fail the whole run on the first degenerate resample
    Abort,
    /// Redraw from the iteration's own RNG stream; exhausting the
    /// attempts fails the run
    Redraw { max_attempts: usize },
    /// Record the iteration as failed; its slots stay NaN and are
    /// excluded from means, percentiles, and MAPE
    RecordMissing,
}

impl Default for DegeneratePolicy {
    fn default() -> Self {
        DegeneratePolicy::Redraw { max_attempts: 10 }
    }
}

/// Configuration for an optimism-correction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Number of bootstrap iterations
    pub n_bootstrap: usize,
    /// Decision threshold for sensitivity/specificity
    pub threshold: f64,
    /// Number of calibration-grid points
    pub grid_points: usize,
    /// Base seed; each iteration derives its own stream from it
    pub seed: Option<u64>,
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            n_bootstrap: 200,
            threshold: 0.5,
            grid_points: 100,
            seed: None,
            degenerate_policy: DegeneratePolicy::default(),
        }
    }
}

impl ValidationConfig {
    pub fn with_n_bootstrap(mut self, n: usize) -> Self {
        self.n_bootstrap = n;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_grid_points(mut self, n: usize) -> Self {
        self.grid_points = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }
}

/// Everything one successful bootstrap iteration contributes
struct IterationRecord {
    auc_test: f64,
    auc_bootstrap: f64,
    auc_optimism: f64,
    sensitivity: f64,
    specificity: f64,
    brier: f64,
    calibration_curve: Array1<f64>,
    calibration_optimism: Array1<f64>,
    /// Predictions of this iteration's model on the original dataset
    predictions: Array1<f64>,
}

/// Optimism-correction validator
pub struct OptimismValidator {
    config: ValidationConfig,
}

impl Default for OptimismValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl OptimismValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a model with fixed hyperparameters.
    pub fn validate<M: BinaryClassifier>(
        &self,
        model: &M,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<ValidationReport> {
        self.run(model, x, y, None)
    }

    /// Select elastic-net hyperparameters by cross-validated grid
    /// search on the full dataset, then validate the winning
    /// configuration.
    pub fn validate_elastic_net(
        &self,
        template: &ElasticNetLogistic,
        grid: &ParamGrid,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<ValidationReport> {
        let mut search = GridSearchCv::new();
        if let Some(seed) = self.config.seed {
            search = search.with_random_state(seed);
        }
        let result = search.search(template, grid, x, y)?;
        info!(
            alpha = result.best_alpha,
            l1_ratio = result.best_l1_ratio,
            cv_auc = result.best_auc,
            "selected elastic-net hyperparameters"
        );

        let tuned = template
            .clone_untrained()
            .with_alpha(result.best_alpha)
            .with_l1_ratio(result.best_l1_ratio);
        let tuning = TuningSummary {
            best_alpha: result.best_alpha,
            best_l1_ratio: result.best_l1_ratio,
            cv_auc: result.best_auc,
        };
        self.run(&tuned, x, y, Some(tuning))
    }

    fn run<M: BinaryClassifier>(
        &self,
        template: &M,
        x: &Array2<f64>,
        y: &Array1<f64>,
        tuning: Option<TuningSummary>,
    ) -> Result<ValidationReport> {
        // Input validation
        let n = x.nrows();
        let b = self.config.n_bootstrap;
        if n == 0 {
            return Err(BootvalError::InvalidInput("empty dataset".to_string()));
        }
        if b == 0 {
            return Err(BootvalError::InvalidInput(
                "n_bootstrap must be positive".to_string(),
            ));
        }
        if y.len() != n {
            return Err(BootvalError::ShapeError {
                expected: format!("y length = {}", n),
                actual: format!("y length = {}", y.len()),
            });
        }
        if !y.iter().all(|&v| v == 0.0 || v == 1.0) {
            return Err(BootvalError::InvalidInput(
                "labels must be 0 or 1".to_string(),
            ));
        }
        let n_pos = y.iter().filter(|&&v| v > 0.5).count();
        if n_pos == 0 || n_pos == n {
            return Err(BootvalError::DegenerateLabels(
                "full dataset contains a single class".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.config.threshold) {
            return Err(BootvalError::ConfigError(format!(
                "threshold must lie in [0, 1], got {}",
                self.config.threshold
            )));
        }
        let grid = probability_grid(self.config.grid_points)?;

        // Apparent model: fit and score in-sample on the full dataset
        info!(
            n_samples = n,
            n_features = x.ncols(),
            n_bootstrap = b,
            "fitting apparent model"
        );
        let mut apparent_model = template.clone_untrained();
        apparent_model
            .fit(x, y)
            .map_err(|e| BootvalError::FitFailure(format!("apparent fit: {}", e)))?;
        let apparent_preds = apparent_model.predict_proba(x)?;

        let apparent = {
            let predicted = apparent_model.predict(x, self.config.threshold)?;
            let counts = ConfusionCounts::from_labels(y, &predicted)?;
            let curve = calibration_curve(y, &apparent_preds, &grid)?;
            let (slope, intercept) = calibration_slope_intercept(&curve, &grid)?;
            ApparentMetrics {
                auc: roc_auc(y, &apparent_preds)?,
                sensitivity: counts.sensitivity()?,
                specificity: counts.specificity()?,
                brier: brier_score(y, &apparent_preds)?,
                calibration_curve: curve.to_vec(),
                calibration_slope: slope,
                calibration_intercept: intercept,
            }
        };

        // Bootstrap loop, embarrassingly parallel: every iteration
        // reads the shared template and dataset and owns its results.
        let base_seed = self.config.seed.unwrap_or(42);
        let outcomes: Vec<Result<IterationRecord>> = (0..b)
            .into_par_iter()
            .map(|i| self.run_iteration(i, base_seed, template, x, y, &grid))
            .collect();

        let mut iterations = IterationArrays {
            auc_test: vec![f64::NAN; b],
            auc_bootstrap: vec![f64::NAN; b],
            auc_optimism: vec![f64::NAN; b],
            sensitivity: vec![f64::NAN; b],
            specificity: vec![f64::NAN; b],
            brier: vec![f64::NAN; b],
            calibration_curves: vec![vec![f64::NAN; grid.len()]; b],
            calibration_optimism: vec![vec![f64::NAN; grid.len()]; b],
        };
        let mut predictions = Array2::from_elem((b, n), f64::NAN);
        let mut failures: Vec<IterationFailure> = Vec::new();

        for (i, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(record) => {
                    iterations.auc_test[i] = record.auc_test;
                    iterations.auc_bootstrap[i] = record.auc_bootstrap;
                    iterations.auc_optimism[i] = record.auc_optimism;
                    iterations.sensitivity[i] = record.sensitivity;
                    iterations.specificity[i] = record.specificity;
                    iterations.brier[i] = record.brier;
                    iterations.calibration_curves[i] = record.calibration_curve.to_vec();
                    iterations.calibration_optimism[i] = record.calibration_optimism.to_vec();
                    predictions.row_mut(i).assign(&record.predictions);
                }
                Err(err) => match self.config.degenerate_policy {
                    DegeneratePolicy::RecordMissing => {
                        warn!(iteration = i, error = %err, "bootstrap iteration failed");
                        failures.push(IterationFailure {
                            iteration: i,
                            message: err.to_string(),
                        });
                    }
                    _ => return Err(err),
                },
            }
        }

        if failures.len() == b {
            return Err(BootvalError::InvalidInput(
                "all bootstrap iterations failed".to_string(),
            ));
        }

        // Correction: full reduction over the loop's outputs
        let delta = mean_finite(&iterations.auc_optimism)
            .expect("at least one successful iteration");
        let corrected_auc = apparent.auc - delta;

        let mean_curve_optimism: Vec<f64> = (0..grid.len())
            .map(|g| {
                let column: Vec<f64> = iterations
                    .calibration_optimism
                    .iter()
                    .map(|curve| curve[g])
                    .collect();
                mean_finite(&column).unwrap_or(0.0)
            })
            .collect();
        let corrected_curve = Array1::from_shape_fn(grid.len(), |g| {
            (apparent.calibration_curve[g] - mean_curve_optimism[g]).clamp(0.0, 1.0)
        });
        let (corrected_slope, corrected_intercept) =
            calibration_slope_intercept(&corrected_curve, &grid)?;

        let mut finite_test_auc: Vec<f64> = iterations
            .auc_test
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        finite_test_auc.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let ci_percentile = (
            percentile(&finite_test_auc, 2.5),
            percentile(&finite_test_auc, 97.5),
        );
        let ci_shifted = (corrected_auc - delta, corrected_auc + delta);

        let mape = mape_per_subject(&predictions, &apparent_preds)?;
        let average_mape = mape.mean().unwrap_or(0.0);

        let corrected = CorrectedMetrics {
            auc: corrected_auc,
            auc_optimism: delta,
            auc_ci_percentile: ci_percentile,
            auc_ci_shifted: ci_shifted,
            calibration_curve: corrected_curve.to_vec(),
            calibration_slope: corrected_slope,
            calibration_intercept: corrected_intercept,
        };

        info!(
            apparent_auc = apparent.auc,
            corrected_auc,
            optimism = delta,
            n_failed = failures.len(),
            "optimism correction complete"
        );

        Ok(ValidationReport::assemble(
            n,
            x.ncols(),
            b,
            tuning,
            apparent,
            corrected,
            &grid,
            iterations,
            &apparent_preds,
            &predictions,
            &mape,
            average_mape,
            failures,
        ))
    }

    /// One resample→fit→score pass. Owns a ChaCha stream derived from
    /// the base seed and the iteration index so parallel iterations
    /// stay statistically independent and reproducible.
    fn run_iteration<M: BinaryClassifier>(
        &self,
        iteration: usize,
        base_seed: u64,
        template: &M,
        x: &Array2<f64>,
        y: &Array1<f64>,
        grid: &Array1<f64>,
    ) -> Result<IterationRecord> {
        let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(iteration as u64));

        let max_attempts = match self.config.degenerate_policy {
            DegeneratePolicy::Redraw { max_attempts } => max_attempts.max(1),
            _ => 1,
        };

        let (x_boot, y_boot) = {
            let mut attempt = 0;
            loop {
                attempt += 1;
                let (x_boot, y_boot) = bootstrap_sample(x, y, &mut rng)?;
                let n_pos = y_boot.iter().filter(|&&v| v > 0.5).count();
                if n_pos > 0 && n_pos < y_boot.len() {
                    break (x_boot, y_boot);
                }
                if attempt >= max_attempts {
                    return Err(BootvalError::DegenerateLabels(format!(
                        "iteration {}: resample contains a single class after {} draw(s)",
                        iteration, attempt
                    )));
                }
                debug!(iteration, attempt, "degenerate resample, redrawing");
            }
        };

        let mut model = template.clone_untrained();
        model
            .fit(&x_boot, &y_boot)
            .map_err(|e| BootvalError::FitFailure(format!("iteration {}: {}", iteration, e)))?;

        let probs_boot = model.predict_proba(&x_boot)?;
        let probs_test = model.predict_proba(x)?;

        // Bootstrap performance (in-sample, optimistic) vs test
        // performance (original dataset, the lower-bias proxy)
        let auc_bootstrap = roc_auc(&y_boot, &probs_boot)?;
        let auc_test = roc_auc(y, &probs_test)?;

        let curve_bootstrap = calibration_curve(&y_boot, &probs_boot, grid)?;
        let curve_test = calibration_curve(y, &probs_test, grid)?;

        let predicted = model.predict(&x_boot, self.config.threshold)?;
        let counts = ConfusionCounts::from_labels(&y_boot, &predicted)?;

        Ok(IterationRecord {
            auc_test,
            auc_bootstrap,
            auc_optimism: auc_bootstrap - auc_test,
            sensitivity: counts.sensitivity()?,
            specificity: counts.specificity()?,
            brier: brier_score(&y_boot, &probs_boot)?,
            calibration_optimism: &curve_bootstrap - &curve_test,
            calibration_curve: curve_test,
            predictions: probs_test,
        })
    }
}

/// Mean over the finite entries; None when none are finite.
fn mean_finite(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

/// Percentile with linear interpolation over sorted values.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;
    if lo + 1 < sorted.len() {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[lo]
    }
}
