// src/processing/phasic.rs
//! Phasic baseline removal
//!
//! Each sample has the median of a centred window of `±W` samples subtracted, with
//! `W = floor(half_window_seconds * sample_rate)`. The window is only used when it fits
//! entirely inside the signal. Near either edge the baseline collapses to the sample itself,
//! so edge samples come out as exactly zero, and a signal shorter than `2W + 1` samples is
//! zeroed everywhere.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::{EmgErrorBuilder, EmgResult, ProcessingStage};
use crate::utils::validation::{validate_sample_rate, validate_signal};

/// Sliding-median baseline remover
pub struct PhasicBaselineRemover;

impl PhasicBaselineRemover {
    /// Half-window length in samples
    pub fn half_window_samples(sample_rate_hz: f64, half_window_seconds: f64) -> usize {
        (half_window_seconds * sample_rate_hz).floor() as usize
    }

    /// Subtract the local median from every sample
    pub fn remove(signal: &[f64], sample_rate_hz: f64, half_window_seconds: f64) -> EmgResult<Vec<f64>> {
        validate_sample_rate(sample_rate_hz, ProcessingStage::BaselineRemoval)?;
        validate_signal(signal, ProcessingStage::BaselineRemoval)?;
        if !half_window_seconds.is_finite() || half_window_seconds < 0.0 {
            return Err(EmgErrorBuilder::new(ProcessingStage::BaselineRemoval, "phasic_half_window")
                .invalid_data("half window", "must be finite and >= 0 seconds"));
        }

        let n = signal.len();
        let half = Self::half_window_samples(sample_rate_hz, half_window_seconds);
        let mut output = vec![0.0; n];

        // Interior indices i satisfy i >= half and i + half <= n - 1
        let span = half.saturating_mul(2).saturating_add(1);
        if span > n {
            debug!(samples = n, half_window = half, "signal shorter than one phasic window, output is all zeros");
            return Ok(output);
        }

        let mut window: Vec<f64> = signal[..span].to_vec();
        window.sort_by(f64::total_cmp);

        for i in half..n - half {
            if i > half {
                remove_sorted(&mut window, signal[i - half - 1]);
                insert_sorted(&mut window, signal[i + half]);
            }
            output[i] = signal[i] - window[half];
        }

        debug!(samples = n, half_window = half, "removed phasic baseline");
        Ok(output)
    }
}

fn insert_sorted(window: &mut Vec<f64>, value: f64) {
    let position = window.partition_point(|v| v.total_cmp(&value) == Ordering::Less);
    window.insert(position, value);
}

fn remove_sorted(window: &mut Vec<f64>, value: f64) {
    if let Ok(position) = window.binary_search_by(|v| v.total_cmp(&value)) {
        window.remove(position);
    }
}
