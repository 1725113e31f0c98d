// src/processing/spectrum.rs
//! Welch power spectrum estimation
//!
//! The signal is cut into segments of `segment_length` samples overlapping by `overlap`
//! samples. Each segment is mean-detrended, tapered, transformed, and the squared magnitudes
//! are averaged. Scaling is `1 / (Σw)²` (power spectrum, not density) and the one-sided
//! spectrum doubles every bin except DC and, for even segment lengths, Nyquist.
//!
//! A signal shorter than one segment is analysed as a single segment of its own length, so
//! the frequency resolution becomes `sample_rate / signal_length`.

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;
use tracing::{debug, warn};

use crate::config::SpectralConfig;
use crate::config::constants::spectral::DEFAULT_SEGMENT_LENGTH;
use crate::error::{EmgErrorBuilder, EmgResult, ProcessingStage};
use crate::processing::windowing::{window_coefficients, WindowType};
use crate::utils::validation::{require_samples, validate_sample_rate, validate_signal};

/// One-sided power spectrum on a strictly increasing frequency axis
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSpectrum {
    frequencies: Vec<f64>,
    power: Vec<f64>,
}

impl PowerSpectrum {
    /// Build a spectrum from matching frequency and power arrays
    pub fn new(frequencies: Vec<f64>, power: Vec<f64>) -> EmgResult<Self> {
        let builder = || EmgErrorBuilder::new(ProcessingStage::SpectralEstimation, "power_spectrum");

        if frequencies.is_empty() {
            return Err(builder().insufficient_samples(1, 0));
        }
        if frequencies.len() != power.len() {
            return Err(builder().invalid_data(
                "power spectrum",
                &format!("{} frequencies but {} power values", frequencies.len(), power.len()),
            ));
        }
        if frequencies.windows(2).any(|pair| !(pair[0] < pair[1])) {
            return Err(builder().invalid_data("power spectrum", "frequencies must be strictly increasing"));
        }
        if frequencies.iter().chain(power.iter()).any(|v| !v.is_finite()) {
            return Err(builder().invalid_data("power spectrum", "values must be finite"));
        }

        Ok(Self { frequencies, power })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn power(&self) -> &[f64] {
        &self.power
    }

    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Spacing between adjacent bins, zero for a single-bin spectrum
    pub fn resolution_hz(&self) -> f64 {
        match self.frequencies.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    /// Index of the bin closest to `target_hz`; the lower bin wins a tie
    pub fn nearest_bin(&self, target_hz: f64) -> usize {
        let upper = self.frequencies.partition_point(|&f| f < target_hz);
        if upper == 0 {
            return 0;
        }
        if upper == self.frequencies.len() {
            return upper - 1;
        }

        let below = target_hz - self.frequencies[upper - 1];
        let above = self.frequencies[upper] - target_hz;
        if below <= above {
            upper - 1
        } else {
            upper
        }
    }

    /// Power summed from the bin nearest `lower_hz` up to, not including, the bin nearest
    /// `upper_hz`. Edges snapping to the same bin give an empty band and zero power.
    pub fn band_power(&self, lower_hz: f64, upper_hz: f64) -> f64 {
        let start = self.nearest_bin(lower_hz);
        let end = self.nearest_bin(upper_hz);
        if start >= end {
            return 0.0;
        }
        self.power[start..end].iter().sum()
    }
}

/// Segment geometry used for one estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLayout {
    pub segment_length: usize,
    pub step: usize,
    pub segment_count: usize,
}

/// Welch spectral estimator
#[derive(Debug, Clone)]
pub struct SpectralEstimator {
    segment_length: usize,
    overlap: Option<usize>,
    window: WindowType,
}

impl Default for SpectralEstimator {
    fn default() -> Self {
        Self {
            segment_length: DEFAULT_SEGMENT_LENGTH,
            overlap: None,
            window: WindowType::Hann,
        }
    }
}

impl SpectralEstimator {
    pub fn new(segment_length: usize, overlap: Option<usize>, window: WindowType) -> EmgResult<Self> {
        if segment_length == 0 {
            return Err(EmgErrorBuilder::new(ProcessingStage::SpectralEstimation, "segment_length")
                .invalid_data("segment length", "must be at least 1 sample"));
        }
        Ok(Self {
            segment_length,
            overlap,
            window,
        })
    }

    pub fn from_config(config: &SpectralConfig) -> EmgResult<Self> {
        Self::new(config.segment_length, config.overlap, config.window)
    }

    pub fn segment_length(&self) -> usize {
        self.segment_length
    }

    pub fn window(&self) -> WindowType {
        self.window
    }

    /// Segment geometry for a signal of `samples` samples
    pub fn layout(&self, samples: usize) -> SegmentLayout {
        let segment_length = self.segment_length.min(samples).max(1);
        let overlap = self
            .overlap
            .unwrap_or(segment_length / 2)
            .min(segment_length - 1);
        let step = segment_length - overlap;
        let segment_count = samples.saturating_sub(segment_length) / step + 1;

        SegmentLayout {
            segment_length,
            step,
            segment_count,
        }
    }

    /// Estimate the one-sided power spectrum of `signal`
    pub fn estimate(&self, signal: &[f64], sample_rate_hz: f64) -> EmgResult<PowerSpectrum> {
        validate_sample_rate(sample_rate_hz, ProcessingStage::SpectralEstimation)?;
        validate_signal(signal, ProcessingStage::SpectralEstimation)?;
        require_samples(signal.len(), 1, ProcessingStage::SpectralEstimation, "welch")?;

        let layout = self.layout(signal.len());
        if layout.segment_length < self.segment_length {
            warn!(
                requested = self.segment_length,
                used = layout.segment_length,
                "signal shorter than one segment, reducing segment length"
            );
        }

        let window = window_coefficients(self.window, layout.segment_length);
        let window_sum: f64 = window.iter().sum();
        if window_sum == 0.0 {
            return Err(EmgErrorBuilder::new(ProcessingStage::SpectralEstimation, "welch")
                .domain("window coefficients sum to zero"));
        }

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(layout.segment_length);

        let bins = layout.segment_length / 2 + 1;
        let mut power = vec![0.0; bins];
        let mut buffer = vec![Complex64::new(0.0, 0.0); layout.segment_length];

        for segment_index in 0..layout.segment_count {
            let start = segment_index * layout.step;
            let segment = &signal[start..start + layout.segment_length];
            let mean = segment.iter().sum::<f64>() / segment.len() as f64;

            for ((slot, &sample), &weight) in buffer.iter_mut().zip(segment).zip(&window) {
                *slot = Complex64::new((sample - mean) * weight, 0.0);
            }
            fft.process(&mut buffer);

            for (accumulated, value) in power.iter_mut().zip(&buffer) {
                *accumulated += value.norm_sqr();
            }
        }

        let scale = 1.0 / (window_sum * window_sum * layout.segment_count as f64);
        let nyquist_bin = (layout.segment_length % 2 == 0).then_some(layout.segment_length / 2);
        for (k, value) in power.iter_mut().enumerate() {
            *value *= scale;
            if k != 0 && Some(k) != nyquist_bin {
                *value *= 2.0;
            }
        }

        let frequencies = (0..bins)
            .map(|k| k as f64 * sample_rate_hz / layout.segment_length as f64)
            .collect();

        debug!(
            samples = signal.len(),
            segment_length = layout.segment_length,
            segments = layout.segment_count,
            "estimated power spectrum"
        );
        PowerSpectrum::new(frequencies, power)
    }
}
