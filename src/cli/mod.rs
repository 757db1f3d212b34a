//! bootval CLI
//!
//! Command-line entry point: load a CSV, prepare the data, run the
//! grid-searched validation, and print/write the results.

use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::data::{load_csv, preprocess, to_matrix, ImputeStrategy, Imputer, Standardizer};
use crate::error::Result;
use crate::model::{ElasticNetLogistic, ParamGrid};
use crate::validate::{OptimismValidator, ValidationConfig, ValidationReport};

/// Bootstrap optimism-corrected validation for binary outcome models
#[derive(Parser, Debug)]
#[command(name = "bootval", version, about)]
pub struct Cli {
    /// CSV file with predictor columns and a binary target column
    #[arg(long)]
    pub data: PathBuf,

    /// Name of the binary target column
    #[arg(long)]
    pub target: String,

    /// Comma-separated predictor columns (default: every other column)
    #[arg(long)]
    pub predictors: Option<String>,

    /// Number of bootstrap iterations
    #[arg(long, default_value_t = 200)]
    pub bootstrap: usize,

    /// Base random seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the full JSON report to this path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write the four plot-data JSON files into this directory
    #[arg(long)]
    pub plot_dir: Option<PathBuf>,
}

// ─── Styling helpers ──────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}

fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}

fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) {
    println!("  {} {}", muted(key), val.white());
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

// ─── Command ──────────────────────────────────────────────────────────

/// Run the full load→preprocess→tune→validate pipeline.
pub fn cmd_validate(cli: &Cli) -> Result<()> {
    let df = load_csv(&cli.data)?;
    step_ok(&format!(
        "loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        cli.data.display()
    ));

    let predictors: Vec<String> = match &cli.predictors {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => df
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != cli.target)
            .map(|s| s.to_string())
            .collect(),
    };
    info!(outcome = %cli.target, n_predictors = predictors.len(), "preparing data");

    let prepared = preprocess(&df, &predictors, &cli.target)?;
    let imputed = Imputer::new(ImputeStrategy::Mean).fit_transform(&prepared, &predictors)?;
    let scaled = Standardizer::new().fit_transform(&imputed, &predictors)?;
    let (x, y) = to_matrix(&scaled, &predictors, &cli.target)?;
    step_ok("preprocessed, imputed, and standardized predictors");

    let mut config = ValidationConfig::default().with_n_bootstrap(cli.bootstrap);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    let validator = OptimismValidator::new(config);
    let template = ElasticNetLogistic::default();
    let report = validator.validate_elastic_net(&template, &ParamGrid::default(), &x, &y)?;
    step_ok(&format!(
        "validated with {} of {} bootstrap iterations",
        report.n_completed, report.n_bootstrap
    ));

    print_summary(&cli.target, &report);

    if let Some(path) = &cli.output {
        write_json(path, &report)?;
        step_ok(&format!("report written to {}", path.display()));
    }

    if let Some(dir) = &cli.plot_dir {
        write_plot_data(dir, &cli.target, &report)?;
        step_ok(&format!("plot data written to {}", dir.display()));
    }

    Ok(())
}

fn print_summary(target: &str, report: &ValidationReport) {
    section(&format!("Validation summary: {}", target));

    if let Some(tuning) = &report.tuning {
        kv(
            "hyperparameters ",
            &format!(
                "alpha = {}, l1_ratio = {} (cv auc {:.3})",
                tuning.best_alpha, tuning.best_l1_ratio, tuning.cv_auc
            ),
        );
    }
    kv(
        "auc             ",
        &format!(
            "apparent {:.3}, corrected {:.3} (optimism {:.4})",
            report.apparent.auc, report.corrected.auc, report.corrected.auc_optimism
        ),
    );
    let (plo, phi) = report.corrected.auc_ci_percentile;
    let (slo, shi) = report.corrected.auc_ci_shifted;
    kv(
        "95% ci          ",
        &format!(
            "percentile [{:.3}, {:.3}], shifted [{:.3}, {:.3}]",
            plo, phi, slo, shi
        ),
    );
    kv(
        "sens / spec     ",
        &format!(
            "{:.3} / {:.3}",
            report.apparent.sensitivity, report.apparent.specificity
        ),
    );
    kv("brier           ", &format!("{:.4}", report.apparent.brier));
    kv(
        "calibration     ",
        &format!(
            "slope {:.3}, intercept {:.3}",
            report.corrected.calibration_slope, report.corrected.calibration_intercept
        ),
    );
    kv("average mape    ", &format!("{:.4}", report.average_mape));
    if !report.is_complete() {
        kv("failed iters    ", &format!("{}", report.failures.len()));
    }
    println!();
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn write_plot_data(dir: &Path, target: &str, report: &ValidationReport) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    write_json(
        &dir.join(format!("{}_calibration.json", target)),
        &report.calibration_plot(),
    )?;
    write_json(
        &dir.join(format!("{}_prediction_instability.json", target)),
        &report.prediction_instability_plot(),
    )?;
    write_json(
        &dir.join(format!("{}_calibration_instability.json", target)),
        &report.calibration_instability_plot(),
    )?;
    write_json(
        &dir.join(format!("{}_mape_instability.json", target)),
        &report.mape_instability_plot(),
    )?;
    Ok(())
}
