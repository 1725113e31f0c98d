// src/config/mod.rs
//! Analysis configuration
//!
//! [`AnalysisConfig`] gathers everything a single `analyze` call needs besides the signal:
//! preprocessing, feature thresholds, Welch parameters and the FR/PSR bands. All fields have
//! defaults, so a TOML file only needs to name the values it overrides.

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use serde::{Deserialize, Serialize};

use crate::error::{EmgErrorBuilder, EmgResult, ProcessingStage};
use crate::processing::windowing::WindowType;

/// Complete analysis configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub preprocessing: PreprocessingConfig,

    #[serde(default)]
    pub time_domain: TimeDomainConfig,

    #[serde(default)]
    pub spectral: SpectralConfig,

    #[serde(default)]
    pub bands: BandConfig,
}

/// Band filtering and phasic baseline removal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    #[serde(default = "defaults::lowpass_cutoff_hz")]
    pub lowpass_cutoff_hz: f64,

    #[serde(default = "defaults::highpass_cutoff_hz")]
    pub highpass_cutoff_hz: f64,

    #[serde(default = "defaults::filter_order")]
    pub filter_order: usize,

    #[serde(default = "defaults::phasic_half_window_s")]
    pub phasic_half_window_s: f64,
}

/// Thresholds and moment orders for the time-domain descriptors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeDomainConfig {
    /// Amplitude threshold shared by ZC, MYOP, WAMP and SSC
    #[serde(default = "defaults::threshold")]
    pub threshold: f64,

    /// Orders reported as `TM<order>`
    #[serde(default = "defaults::moment_orders")]
    pub moment_orders: Vec<u32>,
}

/// Welch estimator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralConfig {
    #[serde(default = "defaults::segment_length")]
    pub segment_length: usize,

    /// Samples shared by consecutive segments; half a segment when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlap: Option<usize>,

    #[serde(default = "defaults::window")]
    pub window: WindowType,
}

/// Frequency bands for FR and PSR
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BandConfig {
    #[serde(default)]
    pub frequency_ratio: FrequencyRatioBands,

    #[serde(default)]
    pub power_spectrum_ratio: PowerSpectrumRatioBands,
}

/// Low and high bands of the frequency ratio, `(lower_hz, upper_hz)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRatioBands {
    #[serde(default = "defaults::fr_low_band_hz")]
    pub low_band_hz: (f64, f64),

    #[serde(default = "defaults::fr_high_band_hz")]
    pub high_band_hz: (f64, f64),
}

/// Peak neighbourhood and reference band of the power spectrum ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerSpectrumRatioBands {
    #[serde(default = "defaults::psr_peak_half_width_hz")]
    pub peak_half_width_hz: f64,

    #[serde(default = "defaults::psr_min_hz")]
    pub min_hz: f64,

    #[serde(default = "defaults::psr_max_hz")]
    pub max_hz: f64,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;
    use crate::processing::windowing::WindowType;

    pub fn enabled() -> bool { preprocessing::DEFAULT_ENABLED }
    pub fn lowpass_cutoff_hz() -> f64 { preprocessing::DEFAULT_LOWPASS_CUTOFF_HZ }
    pub fn highpass_cutoff_hz() -> f64 { preprocessing::DEFAULT_HIGHPASS_CUTOFF_HZ }
    pub fn filter_order() -> usize { preprocessing::DEFAULT_FILTER_ORDER }
    pub fn phasic_half_window_s() -> f64 { preprocessing::DEFAULT_PHASIC_HALF_WINDOW_S }

    pub fn threshold() -> f64 { time_domain::DEFAULT_THRESHOLD }
    pub fn moment_orders() -> Vec<u32> { time_domain::DEFAULT_MOMENT_ORDERS.to_vec() }

    pub fn segment_length() -> usize { spectral::DEFAULT_SEGMENT_LENGTH }
    pub fn window() -> WindowType { WindowType::Hann }

    pub fn fr_low_band_hz() -> (f64, f64) { bands::DEFAULT_FR_LOW_BAND_HZ }
    pub fn fr_high_band_hz() -> (f64, f64) { bands::DEFAULT_FR_HIGH_BAND_HZ }
    pub fn psr_peak_half_width_hz() -> f64 { bands::DEFAULT_PSR_PEAK_HALF_WIDTH_HZ }
    pub fn psr_min_hz() -> f64 { bands::DEFAULT_PSR_MIN_HZ }
    pub fn psr_max_hz() -> f64 { bands::DEFAULT_PSR_MAX_HZ }
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            lowpass_cutoff_hz: defaults::lowpass_cutoff_hz(),
            highpass_cutoff_hz: defaults::highpass_cutoff_hz(),
            filter_order: defaults::filter_order(),
            phasic_half_window_s: defaults::phasic_half_window_s(),
        }
    }
}

impl Default for TimeDomainConfig {
    fn default() -> Self {
        Self {
            threshold: defaults::threshold(),
            moment_orders: defaults::moment_orders(),
        }
    }
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            segment_length: defaults::segment_length(),
            overlap: None,
            window: defaults::window(),
        }
    }
}

impl Default for FrequencyRatioBands {
    fn default() -> Self {
        Self {
            low_band_hz: defaults::fr_low_band_hz(),
            high_band_hz: defaults::fr_high_band_hz(),
        }
    }
}

impl Default for PowerSpectrumRatioBands {
    fn default() -> Self {
        Self {
            peak_half_width_hz: defaults::psr_peak_half_width_hz(),
            min_hz: defaults::psr_min_hz(),
            max_hz: defaults::psr_max_hz(),
        }
    }
}

impl AnalysisConfig {
    /// Configuration with preprocessing switched off
    pub fn without_preprocessing() -> Self {
        let mut config = Self::default();
        config.preprocessing.enabled = false;
        config
    }

    /// Check the sample-rate independent invariants.
    ///
    /// Cutoffs against Nyquist are checked when the filters are designed, since they depend
    /// on the sample rate of each recording.
    pub fn validate(&self) -> EmgResult<()> {
        let invalid = |component: &str, reason: String| {
            Err(EmgErrorBuilder::new(ProcessingStage::Configuration, "validate")
                .configuration(component, &reason))
        };

        let pre = &self.preprocessing;
        if !(pre.lowpass_cutoff_hz.is_finite() && pre.lowpass_cutoff_hz > 0.0) {
            return invalid("preprocessing", format!("low-pass cutoff must be > 0 Hz, got {}", pre.lowpass_cutoff_hz));
        }
        if !(pre.highpass_cutoff_hz.is_finite() && pre.highpass_cutoff_hz > 0.0) {
            return invalid("preprocessing", format!("high-pass cutoff must be > 0 Hz, got {}", pre.highpass_cutoff_hz));
        }
        if pre.filter_order == 0 {
            return invalid("preprocessing", "filter order must be at least 1".to_string());
        }
        if !(pre.phasic_half_window_s.is_finite() && pre.phasic_half_window_s >= 0.0) {
            return invalid("preprocessing", format!("phasic half window must be >= 0 s, got {}", pre.phasic_half_window_s));
        }

        let td = &self.time_domain;
        if !(td.threshold.is_finite() && td.threshold >= 0.0) {
            return invalid("time_domain", format!("threshold must be >= 0, got {}", td.threshold));
        }
        if let Some(&order) = td
            .moment_orders
            .iter()
            .find(|&&order| order == 0 || i32::try_from(order).is_err())
        {
            return invalid("time_domain", format!("moment orders must lie in 1..={}, got {}", i32::MAX, order));
        }

        let spectral = &self.spectral;
        if spectral.segment_length == 0 {
            return invalid("spectral", "segment length must be at least 1".to_string());
        }
        if let Some(overlap) = spectral.overlap {
            if overlap >= spectral.segment_length {
                return invalid("spectral", format!(
                    "overlap ({}) must be smaller than the segment length ({})",
                    overlap, spectral.segment_length
                ));
            }
        }

        let fr = &self.bands.frequency_ratio;
        for (name, (lower, upper)) in [("low", fr.low_band_hz), ("high", fr.high_band_hz)] {
            if !(lower.is_finite() && upper.is_finite() && lower >= 0.0 && lower <= upper) {
                return invalid("bands", format!("FR {} band must satisfy 0 <= lower <= upper, got ({}, {})", name, lower, upper));
            }
        }

        let psr = &self.bands.power_spectrum_ratio;
        if !(psr.peak_half_width_hz.is_finite() && psr.peak_half_width_hz >= 0.0) {
            return invalid("bands", format!("PSR peak half width must be >= 0 Hz, got {}", psr.peak_half_width_hz));
        }
        if !(psr.min_hz.is_finite() && psr.max_hz.is_finite() && psr.min_hz >= 0.0 && psr.min_hz <= psr.max_hz) {
            return invalid("bands", format!("PSR band must satisfy 0 <= min <= max, got ({}, {})", psr.min_hz, psr.max_hz));
        }

        Ok(())
    }
}
