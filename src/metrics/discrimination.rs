//! Discrimination metrics: ROC AUC and confusion-matrix statistics

use crate::error::{BootvalError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

fn check_same_length(labels: &Array1<f64>, other: &Array1<f64>) -> Result<()> {
    if labels.is_empty() {
        return Err(BootvalError::InvalidInput("empty label vector".to_string()));
    }
    if labels.len() != other.len() {
        return Err(BootvalError::ShapeError {
            expected: format!("length = {}", labels.len()),
            actual: format!("length = {}", other.len()),
        });
    }
    Ok(())
}

/// Convert probabilities to 0/1 labels at the given threshold.
pub fn threshold_labels(probs: &Array1<f64>, threshold: f64) -> Array1<f64> {
    probs.mapv(|p| if p >= threshold { 1.0 } else { 0.0 })
}

/// Area under the ROC curve via the trapezoidal rule.
///
/// Sorts by descending score and walks distinct score groups, so tied
/// scores contribute a single (FPR, TPR) point.
///
/// # Errors
///
/// `DegenerateLabels` when the label vector contains a single class
/// (AUC is undefined), `InvalidInput`/`ShapeError` on empty or
/// mismatched inputs.
pub fn roc_auc(labels: &Array1<f64>, probs: &Array1<f64>) -> Result<f64> {
    check_same_length(labels, probs)?;

    let total_pos = labels.iter().filter(|&&y| y > 0.5).count();
    let total_neg = labels.len() - total_pos;
    if total_pos == 0 || total_neg == 0 {
        return Err(BootvalError::DegenerateLabels(format!(
            "AUC undefined: {} positive and {} negative labels",
            total_pos, total_neg
        )));
    }

    let mut indices: Vec<usize> = (0..probs.len()).collect();
    indices.sort_by(|&a, &b| {
        probs[b]
            .partial_cmp(&probs[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let p = total_pos as f64;
    let n = total_neg as f64;

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut prev_fpr = 0.0;
    let mut prev_tpr = 0.0;
    let mut auc = 0.0;

    let mut i = 0;
    while i < indices.len() {
        // Accumulate all samples sharing the current score
        let current = probs[indices[i]];
        while i < indices.len() && probs[indices[i]] == current {
            if labels[indices[i]] > 0.5 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }

        let fpr = fp as f64 / n;
        let tpr = tp as f64 / p;
        auc += (fpr - prev_fpr) * (tpr + prev_tpr) / 2.0;
        prev_fpr = fpr;
        prev_tpr = tpr;
    }

    Ok(auc)
}

/// Confusion-matrix counts at a fixed decision threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionCounts {
    /// Count (tn, fp, fn, tp) from true labels and predicted labels.
    /// Both vectors are interpreted as binary with the 0.5 cut.
    pub fn from_labels(labels: &Array1<f64>, predicted: &Array1<f64>) -> Result<Self> {
        check_same_length(labels, predicted)?;

        let mut counts = ConfusionCounts {
            tn: 0,
            fp: 0,
            fn_: 0,
            tp: 0,
        };
        for (y, p) in labels.iter().zip(predicted.iter()) {
            match (*y > 0.5, *p > 0.5) {
                (false, false) => counts.tn += 1,
                (false, true) => counts.fp += 1,
                (true, false) => counts.fn_ += 1,
                (true, true) => counts.tp += 1,
            }
        }
        Ok(counts)
    }

    /// Sensitivity (true positive rate): tp / (tp + fn).
    ///
    /// # Errors
    ///
    /// `DivisionUndefined` when no positive cases are present.
    pub fn sensitivity(&self) -> Result<f64> {
        let denom = self.tp + self.fn_;
        if denom == 0 {
            return Err(BootvalError::DivisionUndefined(
                "sensitivity undefined: no positive cases".to_string(),
            ));
        }
        Ok(self.tp as f64 / denom as f64)
    }

    /// Specificity (true negative rate): tn / (tn + fp).
    ///
    /// # Errors
    ///
    /// `DivisionUndefined` when no negative cases are present.
    pub fn specificity(&self) -> Result<f64> {
        let denom = self.tn + self.fp;
        if denom == 0 {
            return Err(BootvalError::DivisionUndefined(
                "specificity undefined: no negative cases".to_string(),
            ));
        }
        Ok(self.tn as f64 / denom as f64)
    }
}
