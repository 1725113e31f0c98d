// src/processing/filters/butterworth.rs
//! Butterworth low-pass / high-pass design
//!
//! The analog prototype poles are scaled to the pre-warped cutoff, moved through the
//! bilinear transform and expanded into polynomial form. Any order >= 1 is supported.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;
use tracing::debug;

use super::{BandType, FilterCoefficients};
use crate::error::{EmgErrorBuilder, EmgResult, ProcessingStage};

// Bilinear transform at a normalised sample rate of 2 (Nyquist == 1)
const BILINEAR_FS2: f64 = 4.0;

/// Design a Butterworth low-pass filter
pub fn design_lowpass(cutoff_hz: f64, sample_rate_hz: f64, order: usize) -> EmgResult<FilterCoefficients> {
    design(BandType::Lowpass, cutoff_hz, sample_rate_hz, order)
}

/// Design a Butterworth high-pass filter
pub fn design_highpass(cutoff_hz: f64, sample_rate_hz: f64, order: usize) -> EmgResult<FilterCoefficients> {
    design(BandType::Highpass, cutoff_hz, sample_rate_hz, order)
}

fn design(band: BandType, cutoff_hz: f64, sample_rate_hz: f64, order: usize) -> EmgResult<FilterCoefficients> {
    let operation = match band {
        BandType::Lowpass => "design_lowpass",
        BandType::Highpass => "design_highpass",
    };
    let invalid = |reason: &str| {
        EmgErrorBuilder::new(ProcessingStage::Filtering, operation)
            .invalid_filter(band, cutoff_hz, sample_rate_hz, order, reason)
    };

    if order == 0 {
        return Err(invalid("order must be at least 1"));
    }
    if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
        return Err(invalid("sample rate must be finite and positive"));
    }

    let nyquist = sample_rate_hz / 2.0;
    let normalized_cutoff = cutoff_hz / nyquist;
    if !normalized_cutoff.is_finite() || normalized_cutoff <= 0.0 || normalized_cutoff >= 1.0 {
        return Err(invalid("cutoff must lie strictly between 0 and the Nyquist frequency"));
    }

    // Pre-warp frequency for bilinear transform
    let warped = BILINEAR_FS2 * (PI * normalized_cutoff / 2.0).tan();
    let prototype = prototype_poles(order);

    let (zeros, poles, gain) = match band {
        BandType::Lowpass => {
            let poles: Vec<Complex64> = prototype.iter().map(|p| *p * warped).collect();
            (Vec::new(), poles, warped.powi(order as i32))
        }
        BandType::Highpass => {
            let poles: Vec<Complex64> = prototype.iter().map(|p| warped / *p).collect();
            let gain = (Complex64::new(1.0, 0.0) / product(prototype.iter().map(|p| -*p))).re;
            (vec![Complex64::new(0.0, 0.0); order], poles, gain)
        }
    };

    let (digital_zeros, digital_poles, digital_gain) = bilinear(&zeros, &poles, gain);

    if digital_poles.iter().any(|p| p.norm() >= 1.0) {
        return Err(invalid("design is unstable (pole on or outside the unit circle)"));
    }

    let b: Vec<f64> = expand(&digital_zeros).iter().map(|c| c.re * digital_gain).collect();
    let a: Vec<f64> = expand(&digital_poles).iter().map(|c| c.re).collect();

    if b.iter().chain(a.iter()).any(|c| !c.is_finite()) {
        return Err(invalid("design produced non-finite coefficients"));
    }

    debug!(?band, order, cutoff_hz, sample_rate_hz, normalized_cutoff, "designed Butterworth filter");
    Ok(FilterCoefficients { b, a })
}

/// Poles of the normalised analog Butterworth prototype
fn prototype_poles(order: usize) -> Vec<Complex64> {
    let n = order as f64;
    (0..order)
        .map(|k| {
            let m = 1.0 - n + 2.0 * k as f64;
            -Complex64::from_polar(1.0, PI * m / (2.0 * n))
        })
        .collect()
}

fn bilinear(zeros: &[Complex64], poles: &[Complex64], gain: f64) -> (Vec<Complex64>, Vec<Complex64>, f64) {
    let fs2 = Complex64::new(BILINEAR_FS2, 0.0);
    let degree = poles.len() - zeros.len();

    let mut digital_zeros: Vec<Complex64> = zeros.iter().map(|z| (fs2 + *z) / (fs2 - *z)).collect();
    let digital_poles: Vec<Complex64> = poles.iter().map(|p| (fs2 + *p) / (fs2 - *p)).collect();

    // Zeros at infinity map to Nyquist
    digital_zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));

    let numerator = product(zeros.iter().map(|z| fs2 - *z));
    let denominator = product(poles.iter().map(|p| fs2 - *p));
    let digital_gain = gain * (numerator / denominator).re;

    (digital_zeros, digital_poles, digital_gain)
}

fn product(values: impl Iterator<Item = Complex64>) -> Complex64 {
    values.fold(Complex64::new(1.0, 0.0), |acc, v| acc * v)
}

/// Monic polynomial coefficients (highest power first) with the given roots
fn expand(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coefficients = vec![Complex64::new(1.0, 0.0)];
    for root in roots {
        let mut next = coefficients.clone();
        next.push(Complex64::new(0.0, 0.0));
        for i in 1..next.len() {
            next[i] -= *root * coefficients[i - 1];
        }
        coefficients = next;
    }
    coefficients
}
