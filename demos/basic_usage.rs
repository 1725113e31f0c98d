// demos/basic_usage.rs
//! Basic usage example for EMG feature extraction

use emg_features::{version_info, AnalysisPipeline, ConfigLoader, Recording};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn synthetic_recording(seconds: f64, sample_rate_hz: f64, seed: u64) -> Recording {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = (seconds * sample_rate_hz) as usize;
    let signal = (0..samples)
        .map(|i| {
            let t = i as f64 / sample_rate_hz;
            // Slow drift, a 35 Hz burst envelope and broadband noise
            let envelope = 0.5 + 0.5 * (2.0 * PI * 0.5 * t).sin().abs();
            0.3 * t + envelope * (2.0 * PI * 35.0 * t).sin() + rng.gen_range(-0.15..0.15)
        })
        .collect();
    Recording::new(signal, sample_rate_hz)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    println!("EMG Feature Extraction Basic Usage Example");
    println!("==========================================");
    let info = version_info();
    println!("{} v{} ({} stages)", info.name, info.version, info.stages.len());

    // Defaults, then emg-features.toml / emg-features.local.toml, then EMG_* variables
    let config = ConfigLoader::new().load()?;
    println!("Configuration loaded successfully");
    println!("  - Preprocessing: {}", config.preprocessing.enabled);
    println!(
        "  - Band: {} - {} Hz (order {})",
        config.preprocessing.highpass_cutoff_hz, config.preprocessing.lowpass_cutoff_hz, config.preprocessing.filter_order
    );
    println!("  - Welch segment: {} samples", config.spectral.segment_length);

    let pipeline = AnalysisPipeline::new(config)?;

    let recording = synthetic_recording(12.0, 1000.0, 7);
    println!("\nAnalysing {} samples at {} Hz...", recording.samples.len(), recording.sample_rate_hz);
    let features = pipeline.analyze(&recording.samples, recording.sample_rate_hz)?;

    println!("\nTime domain:");
    for (name, value) in &features.time_domain {
        println!("  {:>6}: {:.6}", name, value);
    }
    println!("\nFrequency domain:");
    for (name, value) in &features.frequency_domain {
        println!("  {:>13}: {:.6}", name, value);
    }

    println!("\nBatch analysis of 4 recordings...");
    let recordings: Vec<Recording> = (0..4).map(|seed| synthetic_recording(10.0, 1000.0, seed)).collect();
    for (index, result) in pipeline.analyze_batch(&recordings).into_iter().enumerate() {
        match result {
            Ok(set) => println!("  recording {}: MNF = {:.2} Hz, MDF = {:.2} Hz", index, set.get("MNF").unwrap_or(0.0), set.get("MDF").unwrap_or(0.0)),
            Err(err) => println!("  recording {}: {}", index, err),
        }
    }

    println!("\nJSON:");
    println!("{}", serde_json::to_string_pretty(&features)?);

    Ok(())
}
