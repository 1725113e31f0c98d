use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use emg_features::processing::features::TimeDomainExtractor;
use emg_features::processing::filters::{apply, design_lowpass};
use emg_features::processing::{PhasicBaselineRemover, SpectralEstimator};
use emg_features::{AnalysisConfig, AnalysisPipeline, Recording};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const SAMPLE_RATE_HZ: f64 = 1000.0;
const SIGNAL_LENGTHS: &[usize] = &[1_000, 10_000, 60_000];

fn synthetic_emg(samples: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..samples)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE_HZ;
            0.6 * (2.0 * PI * 35.0 * t).sin() + 0.3 * (2.0 * PI * 120.0 * t).sin() + rng.gen_range(-0.2..0.2)
        })
        .collect()
}

fn benchmark_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtering");
    let coefficients = design_lowpass(50.0, SAMPLE_RATE_HZ, 2).unwrap();

    for &length in SIGNAL_LENGTHS {
        let signal = synthetic_emg(length, 1);
        group.throughput(Throughput::Elements(length as u64));

        group.bench_with_input(BenchmarkId::new("butterworth_apply", length), &signal, |b, signal| {
            b.iter(|| apply(black_box(signal), &coefficients).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("phasic_removal", length), &signal, |b, signal| {
            b.iter(|| PhasicBaselineRemover::remove(black_box(signal), SAMPLE_RATE_HZ, 0.25).unwrap());
        });
    }

    group.finish();
}

fn benchmark_feature_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_extraction");
    let extractor = TimeDomainExtractor::new(0.01, SAMPLE_RATE_HZ).unwrap();
    let estimator = SpectralEstimator::default();

    for &length in SIGNAL_LENGTHS {
        let signal = synthetic_emg(length, 2);
        group.throughput(Throughput::Elements(length as u64));

        group.bench_with_input(BenchmarkId::new("time_domain", length), &signal, |b, signal| {
            b.iter(|| extractor.extract(black_box(signal)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("welch", length), &signal, |b, signal| {
            b.iter(|| estimator.estimate(black_box(signal), SAMPLE_RATE_HZ).unwrap());
        });
    }

    group.finish();
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    let pipeline = AnalysisPipeline::new(AnalysisConfig::default()).unwrap();
    let signal = synthetic_emg(20_000, 3);
    group.bench_function("analyze_20s", |b| {
        b.iter(|| pipeline.analyze(black_box(&signal), SAMPLE_RATE_HZ).unwrap());
    });

    let recordings: Vec<Recording> = (0..16)
        .map(|seed| Recording::new(synthetic_emg(20_000, seed), SAMPLE_RATE_HZ))
        .collect();
    group.throughput(Throughput::Elements(recordings.len() as u64));
    group.bench_function("analyze_batch_16", |b| {
        b.iter(|| pipeline.analyze_batch(black_box(&recordings)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_filtering, benchmark_feature_extraction, benchmark_pipeline);
criterion_main!(benches);
