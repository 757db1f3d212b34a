//! Integration test: full pipeline (CSV → preprocess → impute → validate)

use bootval::data::{load_csv, preprocess, to_matrix, ImputeStrategy, Imputer, Standardizer};
use bootval::model::ElasticNetLogistic;
use bootval::validate::{OptimismValidator, ValidationConfig};
use std::io::Write;

fn write_cohort_csv(n: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "severity,duration,age,relapse").unwrap();
    for i in 0..n {
        let severity = 5.0 + (i % 20) as f64;
        let duration = 2.0 + (i % 12) as f64;
        let age = 20 + (i * 7) % 50;
        // Outcome tracks severity with a deterministic wobble
        let relapse = if severity + ((i * 13) % 7) as f64 > 16.0 { 1 } else { 0 };
        if i % 17 == 0 {
            writeln!(file, "NA,{},{},{}", duration, age, relapse).unwrap();
        } else {
            writeln!(file, "{},{},{},{}", severity, duration, age, relapse).unwrap();
        }
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_csv_to_report() {
    let file = write_cohort_csv(120);
    let df = load_csv(file.path()).unwrap();
    assert_eq!(df.height(), 120);

    let predictors = vec![
        "severity".to_string(),
        "duration".to_string(),
        "age".to_string(),
    ];
    let prepared = preprocess(&df, &predictors, "relapse").unwrap();
    let imputed = Imputer::new(ImputeStrategy::Mean)
        .fit_transform(&prepared, &predictors)
        .unwrap();
    let scaled = Standardizer::new()
        .fit_transform(&imputed, &predictors)
        .unwrap();
    let (x, y) = to_matrix(&scaled, &predictors, "relapse").unwrap();
    assert_eq!(x.dim(), (120, 3));
    // Standardized predictors have zero column means
    assert!(x.column(0).iter().sum::<f64>().abs() < 1e-8);

    let config = ValidationConfig::default().with_n_bootstrap(10).with_seed(1);
    let model = ElasticNetLogistic::new(0.001, 0.5).with_learning_rate(0.5);
    let report = OptimismValidator::new(config)
        .validate(&model, &x, &y)
        .unwrap();

    assert_eq!(report.n_bootstrap, 10);
    assert!(report.corrected.auc > 0.5, "auc = {}", report.corrected.auc);
    assert!(report.average_mape >= 0.0);

    // The report round-trips through JSON
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("corrected"));
}
