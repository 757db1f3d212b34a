use bootval::model::ElasticNetLogistic;
use bootval::validate::{OptimismValidator, ValidationConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn create_cohort(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() * 2.0 - 1.0);
    let y = Array1::from_shape_fn(n_rows, |i| {
        let logit = 2.0 * x[[i, 0]] - 1.5 * x[[i, 1]];
        let p = 1.0 / (1.0 + (-logit).exp());
        if rng.gen::<f64>() < p {
            1.0
        } else {
            0.0
        }
    });
    (x, y)
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    group.sample_size(10); // Fewer samples, each run refits B models

    for n_rows in [100, 500].iter() {
        let (x, y) = create_cohort(*n_rows, 10);
        let model = ElasticNetLogistic::new(0.001, 0.5).with_learning_rate(0.5);

        group.bench_with_input(
            BenchmarkId::new("bootstrap_20", n_rows),
            &(x, y),
            |b, (x, y)| {
                b.iter(|| {
                    let config = ValidationConfig::default().with_n_bootstrap(20).with_seed(3);
                    let validator = OptimismValidator::new(config);
                    validator.validate(black_box(&model), x, y).unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_validation);
criterion_main!(benches);
