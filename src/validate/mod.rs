//! Bootstrap optimism-corrected validation
//!
//! The central control loop of the crate: resampling, the
//! optimism-correction orchestrator, and the report it assembles.

mod bootstrap;
mod report;
mod resample;

pub use bootstrap::{DegeneratePolicy, OptimismValidator, ValidationConfig};
pub use report::{
    ApparentMetrics, CalibrationInstabilityData, CalibrationPlotData, CorrectedMetrics,
    IterationArrays, IterationFailure, MapeInstabilityData, PredictionInstabilityData,
    TuningSummary, ValidationReport,
};
pub use resample::{bootstrap_indices, bootstrap_sample};
