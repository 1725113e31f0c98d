// src/processing/filters/iir.rs
//! Causal IIR filtering

use super::FilterCoefficients;
use crate::error::{EmgErrorBuilder, EmgResult, ProcessingStage};

/// IIR filter with internal state, processed sample by sample
pub struct IirFilter {
    coefficients: FilterCoefficients,
    state: Vec<f64>, // Delay line of the transposed direct form II structure
}

impl IirFilter {
    /// Create filter from coefficients, normalising by `a[0]`
    pub fn new(coefficients: FilterCoefficients) -> EmgResult<Self> {
        let a0 = coefficients.a.first().copied().unwrap_or(0.0);
        if coefficients.b.is_empty() || a0 == 0.0 || !a0.is_finite() {
            return Err(EmgErrorBuilder::new(ProcessingStage::Filtering, "apply")
                .invalid_data("filter coefficients", "a[0] must be finite and non-zero, b must be non-empty"));
        }

        // Pad numerator and denominator to a common length
        let len = coefficients.a.len().max(coefficients.b.len());
        let mut b = coefficients.b;
        let mut a = coefficients.a;
        b.resize(len, 0.0);
        a.resize(len, 0.0);
        let b = b.into_iter().map(|c| c / a0).collect();
        let a = a.into_iter().map(|c| c / a0).collect();

        Ok(Self {
            coefficients: FilterCoefficients { b, a },
            state: vec![0.0; len - 1],
        })
    }

    /// Process single sample using transposed direct form II
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let b = &self.coefficients.b;
        let a = &self.coefficients.a;
        let output = b[0] * input + self.state.first().copied().unwrap_or(0.0);

        let n = self.state.len();
        for i in 0..n {
            let carried = if i + 1 < n { self.state[i + 1] } else { 0.0 };
            self.state[i] = b[i + 1] * input - a[i + 1] * output + carried;
        }

        output
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.state.fill(0.0);
    }

    /// Get filter order
    pub fn order(&self) -> usize {
        self.state.len()
    }
}

/// Filter `signal` causally with zero initial state; the output has the input's length
pub fn apply(signal: &[f64], coefficients: &FilterCoefficients) -> EmgResult<Vec<f64>> {
    let mut filter = IirFilter::new(coefficients.clone())?;
    Ok(signal.iter().map(|&x| filter.process_sample(x)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::filters::{design_highpass, design_lowpass};

    #[test]
    fn test_first_order_difference_equation() {
        // y[n] = 0.5 x[n] + 0.5 x[n-1] + 0.25 y[n-1]
        let coefficients = FilterCoefficients { b: vec![0.5, 0.5], a: vec![1.0, -0.25] };
        let output = apply(&[1.0, 0.0, 0.0], &coefficients).unwrap();

        assert!((output[0] - 0.5).abs() < 1e-12);
        assert!((output[1] - 0.625).abs() < 1e-12);
        assert!((output[2] - 0.15625).abs() < 1e-12);
    }

    #[test]
    fn test_causal_output_ignores_future_samples() {
        let coefficients = design_lowpass(50.0, 1000.0, 2).unwrap();
        let short = apply(&[1.0, 2.0, 3.0], &coefficients).unwrap();
        let long = apply(&[1.0, 2.0, 3.0, 100.0, -100.0], &coefficients).unwrap();

        assert_eq!(&long[..3], &short[..]);
    }

    #[test]
    fn test_lowpass_settles_to_dc() {
        let coefficients = design_lowpass(10.0, 1000.0, 2).unwrap();
        let output = apply(&vec![1.0; 2000], &coefficients).unwrap();
        assert!((output[1999] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_highpass_removes_dc() {
        let coefficients = design_highpass(20.0, 1000.0, 2).unwrap();
        let output = apply(&vec![3.0; 2000], &coefficients).unwrap();
        assert!(output[1999].abs() < 1e-6);
    }

    #[test]
    fn test_empty_signal() {
        let coefficients = design_lowpass(10.0, 1000.0, 2).unwrap();
        assert!(apply(&[], &coefficients).unwrap().is_empty());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut filter = IirFilter::new(design_lowpass(10.0, 1000.0, 2).unwrap()).unwrap();
        let first = filter.process_sample(1.0);
        filter.process_sample(1.0);
        filter.reset();

        assert_eq!(filter.process_sample(1.0), first);
        assert_eq!(filter.order(), 2);
    }

    #[test]
    fn test_rejects_zero_leading_denominator() {
        let coefficients = FilterCoefficients { b: vec![1.0], a: vec![0.0, 1.0] };
        assert!(IirFilter::new(coefficients).is_err());
    }
}
