//! Grid search for elastic-net penalty selection

use crate::error::{BootvalError, Result};
use crate::metrics::roc_auc;
use crate::model::{BinaryClassifier, CrossValidator, CvStrategy, ElasticNetLogistic};
use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Candidate values for the elastic-net hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamGrid {
    /// Regularization strengths
    pub alphas: Vec<f64>,
    /// L1 mixing ratios
    pub l1_ratios: Vec<f64>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            alphas: vec![1e-4, 1e-3, 1e-2, 1e-1, 1.0],
            l1_ratios: vec![0.1, 0.5, 0.9],
        }
    }
}

/// Cross-validated score for one hyperparameter combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialScore {
    pub alpha: f64,
    pub l1_ratio: f64,
    /// Mean AUC across folds
    pub mean_auc: f64,
    /// Standard deviation of fold AUCs
    pub std_auc: f64,
    pub fold_aucs: Vec<f64>,
}

impl TrialScore {
    fn from_fold_scores(alpha: f64, l1_ratio: f64, fold_aucs: Vec<f64>) -> Self {
        let n = fold_aucs.len() as f64;
        let mean_auc = fold_aucs.iter().sum::<f64>() / n;
        let variance = fold_aucs
            .iter()
            .map(|s| (s - mean_auc).powi(2))
            .sum::<f64>()
            / n;
        Self {
            alpha,
            l1_ratio,
            mean_auc,
            std_auc: variance.sqrt(),
            fold_aucs,
        }
    }
}

/// Outcome of a grid search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub best_alpha: f64,
    pub best_l1_ratio: f64,
    /// Cross-validated AUC of the winning combination
    pub best_auc: f64,
    /// Every evaluated combination, in grid order
    pub trials: Vec<TrialScore>,
}

/// Exhaustive grid search scored by cross-validated AUC
pub struct GridSearchCv {
    strategy: CvStrategy,
    random_state: Option<u64>,
}

impl Default for GridSearchCv {
    fn default() -> Self {
        Self::new()
    }
}

impl GridSearchCv {
    /// Create a grid search with stratified 5-fold cross-validation
    pub fn new() -> Self {
        Self {
            strategy: CvStrategy::default(),
            random_state: None,
        }
    }

    pub fn with_strategy(mut self, strategy: CvStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Evaluate every (alpha, l1_ratio) combination and return the best
    /// under mean fold AUC. Combinations are scored in parallel; the
    /// folds themselves are fixed up front so every combination sees
    /// identical splits.
    pub fn search(
        &self,
        template: &ElasticNetLogistic,
        grid: &ParamGrid,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<SearchResult> {
        if grid.alphas.is_empty() || grid.l1_ratios.is_empty() {
            return Err(BootvalError::ConfigError(
                "parameter grid must contain at least one alpha and one l1_ratio".to_string(),
            ));
        }

        let mut validator = CrossValidator::new(self.strategy.clone());
        if let Some(seed) = self.random_state {
            validator = validator.with_random_state(seed);
        }
        let splits = validator.split(x.nrows(), Some(y))?;

        let combos: Vec<(f64, f64)> = grid
            .alphas
            .iter()
            .flat_map(|&a| grid.l1_ratios.iter().map(move |&l| (a, l)))
            .collect();

        let trials: Vec<TrialScore> = combos
            .par_iter()
            .map(|&(alpha, l1_ratio)| {
                let mut fold_aucs = Vec::with_capacity(splits.len());
                for split in &splits {
                    let x_train = x.select(Axis(0), &split.train_indices);
                    let y_train = Array1::from_vec(
                        split.train_indices.iter().map(|&i| y[i]).collect(),
                    );
                    let x_test = x.select(Axis(0), &split.test_indices);
                    let y_test = Array1::from_vec(
                        split.test_indices.iter().map(|&i| y[i]).collect(),
                    );

                    let mut model = template
                        .clone_untrained()
                        .with_alpha(alpha)
                        .with_l1_ratio(l1_ratio);
                    model
                        .fit(&x_train, &y_train)
                        .map_err(|e| BootvalError::FitFailure(e.to_string()))?;

                    let probs = model.predict_proba(&x_test)?;
                    fold_aucs.push(roc_auc(&y_test, &probs)?);
                }
                Ok(TrialScore::from_fold_scores(alpha, l1_ratio, fold_aucs))
            })
            .collect::<Result<Vec<_>>>()?;

        let best = trials
            .iter()
            .max_by(|a, b| {
                a.mean_auc
                    .partial_cmp(&b.mean_auc)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("grid is non-empty");

        Ok(SearchResult {
            best_alpha: best.alpha,
            best_l1_ratio: best.l1_ratio,
            best_auc: best.mean_auc,
            trials,
        })
    }
}
