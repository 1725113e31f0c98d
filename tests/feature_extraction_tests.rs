// tests/feature_extraction_tests.rs
//! Integration tests for the individual analysis stages

use emg_features::config::{FrequencyRatioBands, PowerSpectrumRatioBands};
use emg_features::processing::features::{FrequencyDomainExtractor, SpectralMoments, TimeDomainExtractor};
use emg_features::processing::filters::{apply, design_highpass, design_lowpass};
use emg_features::processing::{PhasicBaselineRemover, PowerSpectrum, SpectralEstimator};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

fn noisy_signal(samples: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..samples)
        .map(|i| {
            let t = i as f64 / 1000.0;
            (2.0 * PI * 80.0 * t).sin() + rng.gen_range(-0.2..0.2)
        })
        .collect()
}

#[test]
fn test_time_domain_features_on_noisy_signal() {
    let signal = noisy_signal(1000, 7);
    let extractor = TimeDomainExtractor::new(0.01, 1000.0).unwrap();
    let features = extractor.extract(&signal).unwrap();

    assert!(features.rms > 0.6 && features.rms < 0.8);
    assert!(features.mav > 0.0);
    assert!(features.mav1 <= features.mav);
    assert!(features.zc >= 150, "80 Hz tone crosses zero ~160 times, got {}", features.zc);
    assert!(features.myop > 0.5);
    assert!(features.wamp > 0);
    assert!(features.ssc > 0);
    assert!((features.aac - features.wl / 1000.0).abs() < 1e-12);
}

#[test]
fn test_time_and_frequency_stages_agree_on_tone() {
    let signal: Vec<f64> = (0..1024).map(|i| (2.0 * PI * 100.0 * i as f64 / 1024.0).sin()).collect();

    let spectrum = SpectralEstimator::default().estimate(&signal, 1024.0).unwrap();
    let moments = SpectralMoments::from_spectrum(&spectrum);

    assert_eq!(FrequencyDomainExtractor::peak_frequency(&spectrum), 100.0);
    assert!((FrequencyDomainExtractor::mnf(&moments).unwrap() - 100.0).abs() < 1e-6);
    assert_eq!(FrequencyDomainExtractor::mdf(&spectrum, &moments).unwrap(), 100.0);

    // Σx²/N equals the sine power, which the spectrum recovers at the tone bins
    let rms = TimeDomainExtractor::rms(&signal).unwrap();
    assert!((rms * rms - 0.5).abs() < 1e-9);
}

#[test]
fn test_filters_then_baseline_removal() {
    let sample_rate = 1000.0;
    let signal: Vec<f64> = (0..3000)
        .map(|i| {
            let t = i as f64 / sample_rate;
            2.0 + 0.5 * t + (2.0 * PI * 35.0 * t).sin()
        })
        .collect();

    let lowpass = design_lowpass(50.0, sample_rate, 2).unwrap();
    let highpass = design_highpass(20.0, sample_rate, 2).unwrap();
    let filtered = apply(&apply(&signal, &lowpass).unwrap(), &highpass).unwrap();
    assert_eq!(filtered.len(), signal.len());

    // Drift and offset are gone once the high-pass has settled
    let settled = &filtered[1000..];
    let mean = settled.iter().sum::<f64>() / settled.len() as f64;
    assert!(mean.abs() < 0.05, "residual offset {}", mean);

    let phasic = PhasicBaselineRemover::remove(&filtered, sample_rate, 0.5).unwrap();
    assert_eq!(phasic.len(), filtered.len());
    assert!(phasic[..500].iter().all(|&x| x == 0.0));
    assert!(phasic[2500..].iter().all(|&x| x == 0.0));
    assert!(phasic[500..2500].iter().any(|&x| x != 0.0));
}

#[test]
fn test_phasic_short_signal_is_all_zero() {
    // Shorter than 2 * 4 s * 100 Hz, so no sample has a full window
    let signal = noisy_signal(799, 3);
    let output = PhasicBaselineRemover::remove(&signal, 100.0, 4.0).unwrap();
    assert_eq!(output.len(), 799);
    assert!(output.iter().all(|&x| x == 0.0));
}

#[test]
fn test_band_snapping_in_ratios() {
    let frequencies: Vec<f64> = (0..=10).map(|k| k as f64 * 2.0).collect();
    let power = vec![1.0; 11];
    let spectrum = PowerSpectrum::new(frequencies, power).unwrap();

    // 3 Hz and 5 Hz sit between bins and snap down to 2 Hz and 4 Hz; the 4 Hz bin is excluded
    let bands = FrequencyRatioBands {
        low_band_hz: (3.0, 5.0),
        high_band_hz: (0.0, 20.0),
    };
    assert!((FrequencyDomainExtractor::fr(&spectrum, &bands).unwrap() - 1.0 / 10.0).abs() < 1e-12);

    let psr_bands = PowerSpectrumRatioBands {
        peak_half_width_hz: 2.0,
        min_hz: 0.0,
        max_hz: 20.0,
    };
    // Peak is the first bin, so the neighbourhood is bin 0 alone
    assert!((FrequencyDomainExtractor::psr(&spectrum, &psr_bands).unwrap() - 1.0 / 10.0).abs() < 1e-12);
}

proptest! {
    #[test]
    fn prop_mav_is_non_negative_and_symmetric(signal in prop::collection::vec(-1e3f64..1e3, 1..256)) {
        let mav = TimeDomainExtractor::mav(&signal).unwrap();
        let negated: Vec<f64> = signal.iter().map(|x| -x).collect();

        prop_assert!(mav >= 0.0);
        prop_assert_eq!(mav, TimeDomainExtractor::mav(&negated).unwrap());
    }

    #[test]
    fn prop_filters_preserve_length(
        signal in prop::collection::vec(-10.0f64..10.0, 0..512),
        order in 1usize..6,
        cutoff in 5.0f64..450.0,
    ) {
        let lowpass = design_lowpass(cutoff, 1000.0, order).unwrap();
        let highpass = design_highpass(cutoff, 1000.0, order).unwrap();

        prop_assert_eq!(apply(&signal, &lowpass).unwrap().len(), signal.len());
        prop_assert_eq!(apply(&signal, &highpass).unwrap().len(), signal.len());
    }

    #[test]
    fn prop_rms_matches_var_and_mean(raw in prop::collection::vec(-100.0f64..100.0, 2..256)) {
        // Centred input so VAR about zero and about the mean coincide
        let mean = raw.iter().sum::<f64>() / raw.len() as f64;
        let signal: Vec<f64> = raw.iter().map(|x| x - mean).collect();

        let n = signal.len() as f64;
        let rms = TimeDomainExtractor::rms(&signal).unwrap();
        let var = TimeDomainExtractor::var(&signal).unwrap();
        let centred_mean = signal.iter().sum::<f64>() / n;
        let expected = var * (n - 1.0) / n + centred_mean * centred_mean;

        prop_assert!((rms * rms - expected).abs() <= 1e-9 * expected.max(1.0));
    }

    #[test]
    fn prop_vcf_and_ratios_are_non_negative(mut power in prop::collection::vec(0.0f64..10.0, 1..128)) {
        // Power at DC keeps every band starting at 0 Hz non-empty
        power.insert(0, 1.0);
        let frequencies: Vec<f64> = (0..power.len()).map(|k| k as f64 * 0.5).collect();
        let max_frequency = frequencies[frequencies.len() - 1];
        let spectrum = PowerSpectrum::new(frequencies, power).unwrap();
        let moments = SpectralMoments::from_spectrum(&spectrum);

        prop_assert!(FrequencyDomainExtractor::vcf(&moments).unwrap() >= 0.0);

        let bands = FrequencyRatioBands { low_band_hz: (0.0, max_frequency), high_band_hz: (0.0, max_frequency) };
        prop_assert!((FrequencyDomainExtractor::fr(&spectrum, &bands).unwrap() - 1.0).abs() < 1e-12);

        let psr_bands = PowerSpectrumRatioBands { peak_half_width_hz: 1.0, min_hz: 0.0, max_hz: max_frequency };
        let psr = FrequencyDomainExtractor::psr(&spectrum, &psr_bands).unwrap();
        prop_assert!(psr >= 0.0 && psr <= 1.0 + 1e-12);
    }
}
