// src/processing/filter_bank.rs
//! Filter bank combining the preprocessing band filters

use tracing::debug;

use crate::config::PreprocessingConfig;
use crate::error::EmgResult;
use crate::processing::filters::{apply, design_highpass, design_lowpass, FilterCoefficients};

/// Low-pass followed by high-pass Butterworth stage, designed for one sample rate
#[derive(Debug, Clone)]
pub struct FilterBank {
    lowpass: FilterCoefficients,
    highpass: FilterCoefficients,
    sample_rate_hz: f64,
}

impl FilterBank {
    /// Create filter bank from configuration
    pub fn from_config(config: &PreprocessingConfig, sample_rate_hz: f64) -> EmgResult<Self> {
        let lowpass = design_lowpass(config.lowpass_cutoff_hz, sample_rate_hz, config.filter_order)?;
        let highpass = design_highpass(config.highpass_cutoff_hz, sample_rate_hz, config.filter_order)?;

        Ok(Self {
            lowpass,
            highpass,
            sample_rate_hz,
        })
    }

    /// Run the signal through the low-pass then the high-pass stage
    pub fn process(&self, signal: &[f64]) -> EmgResult<Vec<f64>> {
        debug!(samples = signal.len(), sample_rate_hz = self.sample_rate_hz, "applying filter bank");
        let lowpassed = apply(signal, &self.lowpass)?;
        apply(&lowpassed, &self.highpass)
    }

    pub fn lowpass(&self) -> &FilterCoefficients {
        &self.lowpass
    }

    pub fn highpass(&self) -> &FilterCoefficients {
        &self.highpass
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }
}
