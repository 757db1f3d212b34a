//! Elastic-net penalized logistic regression

use crate::error::{BootvalError, Result};
use crate::model::BinaryClassifier;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Logistic regression with combined L1/L2 penalty, fitted by proximal
/// gradient descent: a plain gradient step on the smooth log-loss +
/// ridge part, followed by soft-thresholding for the lasso part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticNetLogistic {
    /// Fitted coefficients
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept
    pub intercept: Option<f64>,
    /// Overall regularization strength
    pub alpha: f64,
    /// L1 ratio (0.0 = pure ridge, 1.0 = pure lasso)
    pub l1_ratio: f64,
    /// Maximum iterations
    pub max_iter: usize,
    /// Convergence tolerance on the gradient norm
    pub tol: f64,
    /// Learning rate
    pub learning_rate: f64,
    /// Whether model is fitted
    pub is_fitted: bool,
}

impl Default for ElasticNetLogistic {
    fn default() -> Self {
        Self::new(0.01, 0.5)
    }
}

impl ElasticNetLogistic {
    pub fn new(alpha: f64, l1_ratio: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            alpha,
            l1_ratio: l1_ratio.clamp(0.0, 1.0),
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
            is_fitted: false,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_l1_ratio(mut self, l1_ratio: f64) -> Self {
        self.l1_ratio = l1_ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Soft-threshold operator for the L1 proximal step
    fn soft_threshold(val: f64, threshold: f64) -> f64 {
        if val > threshold {
            val - threshold
        } else if val < -threshold {
            val + threshold
        } else {
            0.0
        }
    }
}

impl BinaryClassifier for ElasticNetLogistic {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples == 0 {
            return Err(BootvalError::InvalidInput(
                "cannot fit on empty dataset".to_string(),
            ));
        }
        if n_samples != y.len() {
            return Err(BootvalError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        let mut weights: Array1<f64> = Array1::zeros(n_features);
        let mut bias = 0.0;

        let lr = self.learning_rate;
        let l1_penalty = self.alpha * self.l1_ratio;
        let l2_penalty = self.alpha * (1.0 - self.l1_ratio);

        for _iter in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = Self::sigmoid(&linear);

            // Gradient of the smooth part (log-loss + ridge)
            let errors = &predictions - y;
            let dw = (x.t().dot(&errors) / n_samples as f64) + l2_penalty * &weights;
            let db = errors.mean().unwrap_or(0.0);

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                break;
            }

            // Gradient step, then soft-threshold for the lasso part
            let stepped = &weights - &(lr * dw);
            weights = stepped.mapv(|w| Self::soft_threshold(w, lr * l1_penalty));
            bias -= lr * db;
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        self.is_fitted = true;

        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(BootvalError::ModelNotFitted);
        }

        let coefficients = self.coefficients.as_ref().unwrap();
        if x.ncols() != coefficients.len() {
            return Err(BootvalError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        let intercept = self.intercept.unwrap_or(0.0);

        let linear = x.dot(coefficients) + intercept;
        Ok(Self::sigmoid(&linear))
    }

    fn clone_untrained(&self) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            alpha: self.alpha,
            l1_ratio: self.l1_ratio,
            max_iter: self.max_iter,
            tol: self.tol,
            learning_rate: self.learning_rate,
            is_fitted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable_data() -> (Array2<f64>, Array1<f64>) {
        (
            array![
                [1.0, 1.0],
                [1.5, 1.5],
                [2.0, 2.0],
                [5.0, 5.0],
                [5.5, 5.5],
                [6.0, 6.0],
            ],
            array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        )
    }

    #[test]
    fn test_fit_separable() {
        let (x, y) = separable_data();
        let mut model = ElasticNetLogistic::new(0.001, 0.5).with_learning_rate(0.5);
        model.fit(&x, &y).unwrap();
        assert!(model.is_fitted);

        let proba = model.predict_proba(&x).unwrap();
        assert!(proba[0] < 0.5);
        assert!(proba[5] > 0.5);

        let labels = model.predict(&x, 0.5).unwrap();
        let correct = labels
            .iter()
            .zip(y.iter())
            .filter(|(p, t)| (*p - *t).abs() < 0.5)
            .count();
        assert!(correct >= 5, "correct = {}", correct);
    }

    #[test]
    fn test_strong_l1_zeroes_coefficients() {
        let (x, y) = separable_data();
        let mut model = ElasticNetLogistic::new(50.0, 1.0).with_learning_rate(0.1);
        model.fit(&x, &y).unwrap();
        let coef = model.coefficients.as_ref().unwrap();
        assert!(coef.iter().all(|&w| w == 0.0), "coef = {:?}", coef);
    }

    #[test]
    fn test_clone_untrained_shares_no_state() {
        let (x, y) = separable_data();
        let mut model = ElasticNetLogistic::new(0.01, 0.3);
        model.fit(&x, &y).unwrap();

        let fresh = model.clone_untrained();
        assert!(!fresh.is_fitted);
        assert!(fresh.coefficients.is_none());
        assert_eq!(fresh.alpha, model.alpha);
        assert_eq!(fresh.l1_ratio, model.l1_ratio);

        // The original keeps its fitted state
        assert!(model.is_fitted);
        assert!(model.predict_proba(&x).is_ok());
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = ElasticNetLogistic::default();
        let x = array![[1.0, 2.0]];
        assert!(matches!(
            model.predict_proba(&x).unwrap_err(),
            BootvalError::ModelNotFitted
        ));
    }

    #[test]
    fn test_fit_shape_mismatch() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![0.0, 1.0, 1.0];
        let mut model = ElasticNetLogistic::default();
        assert!(matches!(
            model.fit(&x, &y).unwrap_err(),
            BootvalError::ShapeError { .. }
        ));
    }
}
