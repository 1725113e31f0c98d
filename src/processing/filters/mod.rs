// src/processing/filters/mod.rs
//! Digital IIR filters for EMG preprocessing
//!
//! Filters are designed as Butterworth transfer functions `b / a` and applied causally
//! (single forward pass, zero initial state). No zero-phase pass is made, so the output
//! carries the filter's phase lag.

pub mod butterworth;
pub mod iir;

pub use butterworth::{design_highpass, design_lowpass};
pub use iir::{apply, IirFilter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandType {
    Lowpass,
    Highpass,
}

/// Transfer-function coefficients of a digital IIR filter, normalised so that `a[0] == 1`
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCoefficients {
    pub b: Vec<f64>, // Numerator coefficients
    pub a: Vec<f64>, // Denominator coefficients
}

impl FilterCoefficients {
    /// Filter order (number of poles)
    pub fn order(&self) -> usize {
        self.a.len().saturating_sub(1)
    }
}
