use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use exoplanet_detector::data::FeatureNames;
use exoplanet_detector::service::{PredictionContext, PredictionService};
use exoplanet_detector::training::ModelTrainer;
use polars::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

const LABELS: [&str; 3] = ["CONFIRMED", "CANDIDATE", "FALSE POSITIVE"];

fn create_archive_data(n_rows: usize) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let radius: Vec<f64> = (0..n_rows).map(|_| rng.gen::<f64>() * 20.0).collect();
    let mass: Vec<f64> = radius.iter().map(|r| r * r * 3.0 + rng.gen::<f64>() * 10.0).collect();
    let disposition: Vec<&str> = radius
        .iter()
        .map(|r| LABELS[((r / 7.0) as usize).min(2)])
        .collect();
    let names: Vec<String> = (0..n_rows).map(|i| format!("planet-{} b", i)).collect();

    df!(
        "pl_name" => names,
        "pl_rade" => radius,
        "pl_bmasse" => mass,
        "disposition" => disposition
    )
    .unwrap()
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10); // Fewer samples for training benchmarks

    for n_rows in [1000, 5000, 20000].iter() {
        let df = create_archive_data(*n_rows);

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &df, |b, df| {
            b.iter(|| {
                ModelTrainer::default()
                    .train(black_box(df), &FeatureNames::new("pl_rade", "pl_bmasse"))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    // Train once
    let (context, _) = PredictionContext::from_raw_table(create_archive_data(5000), &ModelTrainer::default()).unwrap();
    let service = PredictionService::new(Arc::new(context));

    group.bench_function("label_only", |b| {
        let model = service.context().model();
        b.iter(|| model.predict(black_box([3.5, 40.0])).unwrap())
    });

    group.bench_function("with_charts", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        b.iter(|| service.predict_with_rng(black_box(3.5), black_box(40.0), &mut rng).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_training, bench_prediction);
criterion_main!(benches);
