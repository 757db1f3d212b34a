//! Performance metrics for binary probability predictions
//!
//! Provides the three metric families the validation engine consumes:
//! - Discrimination: ROC AUC, sensitivity/specificity at a fixed threshold
//! - Calibration: Brier score, smoothed calibration curve, slope/intercept
//! - Instability: per-subject prediction variability across bootstrap refits
//!
//! All functions are pure and deterministic given identical inputs.

mod calibration;
mod discrimination;
mod instability;

pub use calibration::{
    brier_score, calibration_curve, calibration_slope_intercept, probability_grid, LOWESS_FRAC,
};
pub use discrimination::{roc_auc, threshold_labels, ConfusionCounts};
pub use instability::{average_mape, mape_per_subject};
