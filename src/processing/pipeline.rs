// src/processing/pipeline.rs
//! Analysis pipeline
//!
//! One call turns a finite recording into a complete [`FeatureSet`]:
//! validation, optional preprocessing (low-pass, high-pass, phasic baseline removal),
//! time-domain features, Welch spectrum, frequency-domain features, assembly.
//! The first failing stage aborts the call. Nothing is cached between calls, so a pipeline
//! can be shared across threads and recordings analysed in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::error::{EmgResult, ProcessingStage};
use crate::processing::features::{FeatureSet, FrequencyDomainExtractor, TimeDomainExtractor};
use crate::processing::filter_bank::FilterBank;
use crate::processing::phasic::PhasicBaselineRemover;
use crate::processing::spectrum::SpectralEstimator;
use crate::utils::validation::{validate_sample_rate, validate_signal};

/// A finite recording and its sample rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub samples: Vec<f64>,
    pub sample_rate_hz: f64,
}

impl Recording {
    pub fn new(samples: Vec<f64>, sample_rate_hz: f64) -> Self {
        Self { samples, sample_rate_hz }
    }
}

/// Feature extraction pipeline for complete recordings
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    spectral_estimator: SpectralEstimator,
    frequency_extractor: FrequencyDomainExtractor,
}

impl AnalysisPipeline {
    pub fn new(config: AnalysisConfig) -> EmgResult<Self> {
        config.validate()?;
        let spectral_estimator = SpectralEstimator::from_config(&config.spectral)?;
        let frequency_extractor = FrequencyDomainExtractor::new(config.bands.clone());

        Ok(Self {
            config,
            spectral_estimator,
            frequency_extractor,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Band filtering and phasic baseline removal, or a copy when preprocessing is disabled
    pub fn preprocess(&self, signal: &[f64], sample_rate_hz: f64) -> EmgResult<Vec<f64>> {
        let preprocessing = &self.config.preprocessing;
        if !preprocessing.enabled {
            return Ok(signal.to_vec());
        }

        let filtered = FilterBank::from_config(preprocessing, sample_rate_hz)?.process(signal)?;
        PhasicBaselineRemover::remove(&filtered, sample_rate_hz, preprocessing.phasic_half_window_s)
    }

    /// Extract the full feature set from one recording
    pub fn analyze(&self, signal: &[f64], sample_rate_hz: f64) -> EmgResult<FeatureSet> {
        validate_sample_rate(sample_rate_hz, ProcessingStage::Validation)?;
        validate_signal(signal, ProcessingStage::Validation)?;
        debug!(samples = signal.len(), sample_rate_hz, preprocessing = self.config.preprocessing.enabled, "starting analysis");

        let prepared = self.preprocess(signal, sample_rate_hz)?;

        let time_extractor = TimeDomainExtractor::from_config(&self.config.time_domain, sample_rate_hz)?;
        let time_features = time_extractor.extract(&prepared)?;

        let spectrum = self.spectral_estimator.estimate(&prepared, sample_rate_hz)?;
        let frequency_features = self.frequency_extractor.extract(&spectrum)?;

        let features = FeatureSet::from_parts(&time_features, &frequency_features)?;
        debug!(features = features.feature_count(), "analysis complete");
        Ok(features)
    }

    /// Analyse independent recordings in parallel, results in input order
    pub fn analyze_batch(&self, recordings: &[Recording]) -> Vec<EmgResult<FeatureSet>> {
        info!(recordings = recordings.len(), "starting batch analysis");
        recordings
            .par_iter()
            .map(|recording| self.analyze(&recording.samples, recording.sample_rate_hz))
            .collect()
    }
}

/// Analyse one recording with `config`
pub fn analyze(signal: &[f64], sample_rate_hz: f64, config: &AnalysisConfig) -> EmgResult<FeatureSet> {
    AnalysisPipeline::new(config.clone())?.analyze(signal, sample_rate_hz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmgError;
    use std::f64::consts::PI;

    fn low_rate_config() -> AnalysisConfig {
        let mut config = AnalysisConfig::without_preprocessing();
        config.bands.frequency_ratio.low_band_hz = (5.0, 30.0);
        config.bands.frequency_ratio.high_band_hz = (30.0, 120.0);
        config.bands.power_spectrum_ratio.min_hz = 1.0;
        config.bands.power_spectrum_ratio.max_hz = 128.0;
        config
    }

    fn two_tones(samples: usize) -> Vec<f64> {
        (0..samples)
            .map(|i| {
                let t = i as f64 / 256.0;
                (2.0 * PI * 10.0 * t).sin() + 0.5 * (2.0 * PI * 60.0 * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_pipeline_creation_validates_config() {
        let mut config = AnalysisConfig::default();
        config.time_domain.threshold = -1.0;
        assert!(matches!(AnalysisPipeline::new(config), Err(EmgError::Configuration { .. })));
    }

    #[test]
    fn test_preprocess_disabled_copies_signal() {
        let pipeline = AnalysisPipeline::new(AnalysisConfig::without_preprocessing()).unwrap();
        let signal = vec![1.0, 2.0, 3.0];
        assert_eq!(pipeline.preprocess(&signal, 100.0).unwrap(), signal);
    }

    #[test]
    fn test_analyze_produces_all_features() {
        let pipeline = AnalysisPipeline::new(low_rate_config()).unwrap();
        let features = pipeline.analyze(&two_tones(512), 256.0).unwrap();

        assert_eq!(features.time_domain.len(), 19);
        assert_eq!(features.frequency_domain.len(), 11);
        assert_eq!(features.get("PeakFrequency"), Some(10.0));
    }

    #[test]
    fn test_analyze_rejects_invalid_input() {
        let pipeline = AnalysisPipeline::new(low_rate_config()).unwrap();

        let err = pipeline.analyze(&[1.0, f64::INFINITY], 256.0).unwrap_err();
        assert_eq!(err.stage(), ProcessingStage::Validation);

        let err = pipeline.analyze(&two_tones(64), -256.0).unwrap_err();
        assert!(matches!(err, EmgError::InvalidData { .. }));
    }

    #[test]
    fn test_batch_preserves_order() {
        let pipeline = AnalysisPipeline::new(low_rate_config()).unwrap();
        let recordings = vec![
            Recording::new(two_tones(512), 256.0),
            Recording::new(vec![1.0], 256.0),
            Recording::new(two_tones(1024), 256.0),
        ];

        let results = pipeline.analyze_batch(&recordings);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), &pipeline.analyze(&recordings[0].samples, 256.0).unwrap());
        assert!(matches!(results[1], Err(EmgError::InsufficientSamples { .. })));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_free_function_matches_pipeline() {
        let config = low_rate_config();
        let signal = two_tones(300);
        let pipeline = AnalysisPipeline::new(config.clone()).unwrap();

        assert_eq!(analyze(&signal, 256.0, &config).unwrap(), pipeline.analyze(&signal, 256.0).unwrap());
    }
}
