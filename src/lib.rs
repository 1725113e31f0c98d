//! EMG-Features: time- and frequency-domain feature extraction for EMG recordings
//!
//! This library turns a finite electromyography recording into a named set of
//! descriptors for downstream classification or fatigue monitoring. It features:
//!
//! - Causal Butterworth band filtering and phasic baseline removal
//! - Time-domain descriptors (IEMG, MAV, RMS, WL, ZC, SSC, ...)
//! - Welch power spectrum estimation
//! - Frequency-domain descriptors (MNF, MDF, spectral moments, FR, PSR, VCF)
//! - Layered TOML/environment configuration
//!
//! # Quick Start
//!
//! ```rust
//! use emg_features::{analyze, AnalysisConfig};
//!
//! use std::f64::consts::PI;
//!
//! let sample_rate_hz = 1024.0;
//! let signal: Vec<f64> = (0..2048)
//!     .map(|i| i as f64 / sample_rate_hz)
//!     .map(|t| (2.0 * PI * 64.0 * t).sin() + 0.2 * (2.0 * PI * 300.0 * t).sin())
//!     .collect();
//!
//! let features = analyze(&signal, sample_rate_hz, &AnalysisConfig::without_preprocessing())?;
//! assert_eq!(features.get("PeakFrequency"), Some(64.0));
//! # Ok::<(), emg_features::EmgError>(())
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod processing;
pub mod utils;

pub use config::{AnalysisConfig, ConfigError, ConfigLoader, PreprocessingConfig};
pub use error::{EmgError, EmgResult, ErrorContext, ProcessingStage};
pub use processing::{
    analyze, AnalysisPipeline, FeatureSet, FilterBank, FrequencyDomainExtractor, PhasicBaselineRemover,
    PowerSpectrum, Recording, SpectralEstimator, TimeDomainExtractor, WindowType,
};
pub use processing::filters::{apply, design_highpass, design_lowpass, BandType, FilterCoefficients};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Crate name, version and the analysis stages it runs, in order
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME,
        version: VERSION,
        stages: &[
            ProcessingStage::Validation,
            ProcessingStage::Filtering,
            ProcessingStage::BaselineRemoval,
            ProcessingStage::TimeDomain,
            ProcessingStage::SpectralEstimation,
            ProcessingStage::FrequencyDomain,
            ProcessingStage::Assembly,
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub stages: &'static [ProcessingStage],
}
