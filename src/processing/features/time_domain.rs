//! Time domain feature extraction for EMG signals
//!
//! Every feature is a pure reduction over the whole signal and is exposed as an associated
//! function named after its key, so single descriptors can be computed without running the
//! full extractor. Errors name the feature key as the failing operation.

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;
use tracing::debug;

use crate::config::TimeDomainConfig;
use crate::error::{EmgErrorBuilder, EmgResult, ProcessingStage};
use crate::utils::validation::{ensure_finite, require_samples, validate_sample_rate, validate_signal, validate_threshold};

const STAGE: ProcessingStage = ProcessingStage::TimeDomain;

/// Time domain features extracted from one signal
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDomainFeatures {
    pub iemg: f64,                        // Integrated EMG
    pub mav: f64,                         // Mean Absolute Value
    pub mav1: f64,                        // Step-weighted MAV
    pub mav2: f64,                        // Ramp-weighted MAV
    pub ssi: f64,                         // Simple Square Integral
    pub var: f64,                         // Variance about zero
    pub temporal_moments: Vec<(u32, f64)>, // (order, TM)
    pub log: f64,                         // Log detector
    pub rms: f64,                         // Root Mean Square
    pub wl: f64,                          // Waveform Length
    pub aac: f64,                         // Average Amplitude Change
    pub dasdv: f64,                       // Difference Absolute Standard Deviation Value
    pub afb: f64,                         // Amplitude-weighted frequency
    pub zc: usize,                        // Zero Crossings
    pub myop: f64,                        // Myopulse percentage rate
    pub wamp: usize,                      // Willison Amplitude
    pub ssc: usize,                       // Slope Sign Changes
}

impl TimeDomainFeatures {
    /// Feature keys and values in table order
    pub fn entries(&self) -> Vec<(String, f64)> {
        let mut entries = vec![
            ("IEMG".to_string(), self.iemg),
            ("MAV".to_string(), self.mav),
            ("MAV1".to_string(), self.mav1),
            ("MAV2".to_string(), self.mav2),
            ("SSI".to_string(), self.ssi),
            ("VAR".to_string(), self.var),
        ];
        entries.extend(
            self.temporal_moments
                .iter()
                .map(|&(order, value)| (format!("TM{}", order), value)),
        );
        entries.extend([
            ("LOG".to_string(), self.log),
            ("RMS".to_string(), self.rms),
            ("WL".to_string(), self.wl),
            ("AAC".to_string(), self.aac),
            ("DASDV".to_string(), self.dasdv),
            ("AFB".to_string(), self.afb),
            ("ZC".to_string(), self.zc as f64),
            ("MYOP".to_string(), self.myop),
            ("WAMP".to_string(), self.wamp as f64),
            ("SSC".to_string(), self.ssc as f64),
        ]);
        entries
    }
}

/// Time domain feature extractor
#[derive(Debug, Clone)]
pub struct TimeDomainExtractor {
    threshold: f64,
    sample_rate_hz: f64,
    moment_orders: Vec<u32>,
}

impl TimeDomainExtractor {
    /// Extractor with the default moment orders 3, 4 and 5
    pub fn new(threshold: f64, sample_rate_hz: f64) -> EmgResult<Self> {
        Self::from_config(
            &TimeDomainConfig {
                threshold,
                ..TimeDomainConfig::default()
            },
            sample_rate_hz,
        )
    }

    pub fn from_config(config: &TimeDomainConfig, sample_rate_hz: f64) -> EmgResult<Self> {
        validate_threshold(config.threshold, STAGE, "threshold")?;
        validate_sample_rate(sample_rate_hz, STAGE)?;

        Ok(Self {
            threshold: config.threshold,
            sample_rate_hz,
            moment_orders: config.moment_orders.clone(),
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compute every time-domain feature, failing on the first error
    pub fn extract(&self, signal: &[f64]) -> EmgResult<TimeDomainFeatures> {
        validate_signal(signal, STAGE)?;
        require_samples(signal.len(), 2, STAGE, "extract")?;

        let temporal_moments = self
            .moment_orders
            .iter()
            .map(|&order| Ok((order, Self::tm(signal, order)?)))
            .collect::<EmgResult<Vec<_>>>()?;

        let features = TimeDomainFeatures {
            iemg: ensure_finite(Self::iemg(signal), STAGE, "IEMG")?,
            mav: Self::mav(signal)?,
            mav1: Self::mav1(signal)?,
            mav2: Self::mav2(signal)?,
            ssi: ensure_finite(Self::ssi(signal), STAGE, "SSI")?,
            var: Self::var(signal)?,
            temporal_moments,
            log: Self::log(signal)?,
            rms: Self::rms(signal)?,
            wl: Self::wl(signal)?,
            aac: Self::aac(signal)?,
            dasdv: Self::dasdv(signal)?,
            afb: Self::afb(signal, self.sample_rate_hz)?,
            zc: Self::zc(signal, self.threshold)?,
            myop: Self::myop(signal, self.threshold)?,
            wamp: Self::wamp(signal, self.threshold)?,
            ssc: Self::ssc(signal, self.threshold)?,
        };

        debug!(samples = signal.len(), rms = features.rms, "extracted time-domain features");
        Ok(features)
    }

    /// Σ|x|
    pub fn iemg(signal: &[f64]) -> f64 {
        signal.iter().map(|x| x.abs()).sum()
    }

    pub fn mav(signal: &[f64]) -> EmgResult<f64> {
        require_samples(signal.len(), 1, STAGE, "MAV")?;
        ensure_finite(Self::iemg(signal) / signal.len() as f64, STAGE, "MAV")
    }

    /// MAV with weight 1 on the central half of the signal and 0.5 on both outer quarters
    pub fn mav1(signal: &[f64]) -> EmgResult<f64> {
        require_samples(signal.len(), 1, STAGE, "MAV1")?;
        let n = signal.len();
        let (start, end) = central_half(n);
        let weighted: f64 = signal
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let weight = if (start..end).contains(&i) { 1.0 } else { 0.5 };
                weight * x.abs()
            })
            .sum();
        ensure_finite(weighted / n as f64, STAGE, "MAV1")
    }

    /// MAV with weight 1 on the central half and linear ramps `4i/N`, `4(N-i)/N` outside it
    pub fn mav2(signal: &[f64]) -> EmgResult<f64> {
        require_samples(signal.len(), 1, STAGE, "MAV2")?;
        let n = signal.len();
        let (start, end) = central_half(n);
        let len = n as f64;
        let weighted: f64 = signal
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let weight = if i < start {
                    4.0 * i as f64 / len
                } else if i >= end {
                    4.0 * (n - i) as f64 / len
                } else {
                    1.0
                };
                weight * x.abs()
            })
            .sum();
        ensure_finite(weighted / len, STAGE, "MAV2")
    }

    /// Σx²
    pub fn ssi(signal: &[f64]) -> f64 {
        signal.iter().map(|x| x * x).sum()
    }

    /// Σx² / (N - 1)
    pub fn var(signal: &[f64]) -> EmgResult<f64> {
        require_samples(signal.len(), 2, STAGE, "VAR")?;
        ensure_finite(Self::ssi(signal) / (signal.len() - 1) as f64, STAGE, "VAR")
    }

    /// |Σx^order| / N
    pub fn tm(signal: &[f64], order: u32) -> EmgResult<f64> {
        let operation = format!("TM{}", order);
        require_samples(signal.len(), 1, STAGE, &operation)?;
        let exponent = i32::try_from(order).map_err(|_| {
            EmgErrorBuilder::new(STAGE, &operation).invalid_data("moment order", "must fit in an i32 exponent")
        })?;
        let moment: f64 = signal.iter().map(|x| x.powi(exponent)).sum();
        ensure_finite(moment.abs() / signal.len() as f64, STAGE, &operation)
    }

    /// Geometric mean of the non-zero magnitudes, zero for an all-zero signal
    pub fn log(signal: &[f64]) -> EmgResult<f64> {
        require_samples(signal.len(), 1, STAGE, "LOG")?;

        let (log_sum, nonzero) = signal
            .iter()
            .filter(|x| **x != 0.0)
            .fold((0.0, 0usize), |(sum, count), x| (sum + x.abs().ln(), count + 1));

        let skipped = signal.len() - nonzero;
        if skipped > 0 {
            debug!(skipped, samples = signal.len(), "LOG skipped zero samples");
        }
        if nonzero == 0 {
            return Ok(0.0);
        }
        ensure_finite((log_sum / nonzero as f64).exp(), STAGE, "LOG")
    }

    pub fn rms(signal: &[f64]) -> EmgResult<f64> {
        require_samples(signal.len(), 1, STAGE, "RMS")?;
        ensure_finite((Self::ssi(signal) / signal.len() as f64).sqrt(), STAGE, "RMS")
    }

    /// Σ|x[i+1] - x[i]|
    pub fn wl(signal: &[f64]) -> EmgResult<f64> {
        require_samples(signal.len(), 2, STAGE, "WL")?;
        let length: f64 = signal.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
        ensure_finite(length, STAGE, "WL")
    }

    pub fn aac(signal: &[f64]) -> EmgResult<f64> {
        require_samples(signal.len(), 2, STAGE, "AAC")?;
        ensure_finite(Self::wl(signal)? / signal.len() as f64, STAGE, "AAC")
    }

    pub fn dasdv(signal: &[f64]) -> EmgResult<f64> {
        require_samples(signal.len(), 2, STAGE, "DASDV")?;
        let squared: f64 = signal.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        ensure_finite((squared / (signal.len() - 1) as f64).sqrt(), STAGE, "DASDV")
    }

    /// Frequency-weighted mean of the one-sided FFT amplitude spectrum, DC excluded
    pub fn afb(signal: &[f64], sample_rate_hz: f64) -> EmgResult<f64> {
        require_samples(signal.len(), 2, STAGE, "AFB")?;
        validate_sample_rate(sample_rate_hz, STAGE)?;

        let n = signal.len();
        let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        let mut planner = FftPlanner::<f64>::new();
        planner.plan_fft_forward(n).process(&mut buffer);

        let nyquist = n / 2;
        let (weighted, total_frequency) = buffer[1..=nyquist]
            .iter()
            .enumerate()
            .map(|(offset, value)| {
                let k = offset + 1;
                let doubling = if n % 2 == 0 && k == nyquist { 1.0 } else { 2.0 };
                let amplitude = doubling * value.norm() / n as f64;
                let frequency = k as f64 * sample_rate_hz / n as f64;
                (frequency * amplitude, frequency)
            })
            .fold((0.0, 0.0), |(w, f), (dw, df)| (w + dw, f + df));

        ensure_finite(weighted / total_frequency, STAGE, "AFB")
    }

    /// Sign changes whose step exceeds `threshold`
    pub fn zc(signal: &[f64], threshold: f64) -> EmgResult<usize> {
        validate_threshold(threshold, STAGE, "ZC")?;
        require_samples(signal.len(), 2, STAGE, "ZC")?;
        Ok(signal
            .windows(2)
            .filter(|w| w[0] * w[1] < 0.0 && (w[0] - w[1]).abs() > threshold)
            .count())
    }

    /// Fraction of samples with magnitude above `threshold`
    pub fn myop(signal: &[f64], threshold: f64) -> EmgResult<f64> {
        validate_threshold(threshold, STAGE, "MYOP")?;
        require_samples(signal.len(), 1, STAGE, "MYOP")?;
        let above = signal.iter().filter(|x| x.abs() > threshold).count();
        Ok(above as f64 / signal.len() as f64)
    }

    /// Consecutive differences above `threshold`
    pub fn wamp(signal: &[f64], threshold: f64) -> EmgResult<usize> {
        validate_threshold(threshold, STAGE, "WAMP")?;
        require_samples(signal.len(), 2, STAGE, "WAMP")?;
        Ok(signal
            .windows(2)
            .filter(|w| (w[0] - w[1]).abs() > threshold)
            .count())
    }

    /// Local extrema whose slope product exceeds `threshold`
    pub fn ssc(signal: &[f64], threshold: f64) -> EmgResult<usize> {
        validate_threshold(threshold, STAGE, "SSC")?;
        require_samples(signal.len(), 2, STAGE, "SSC")?;
        Ok(signal
            .windows(3)
            .filter(|w| (w[1] - w[0]) * (w[1] - w[2]) > threshold)
            .count())
    }
}

/// `[floor(N/4), floor(3N/4))`
fn central_half(n: usize) -> (usize, usize) {
    (n / 4, 3 * n / 4)
}
