//! Frequency domain feature extraction for EMG signals
//!
//! Features are computed from a [`PowerSpectrum`]. The spectral moments are summed once into
//! [`SpectralMoments`] and passed to the features that depend on them.

use tracing::debug;

use crate::config::{BandConfig, FrequencyRatioBands, PowerSpectrumRatioBands};
use crate::error::{EmgErrorBuilder, EmgResult, ProcessingStage};
use crate::processing::spectrum::PowerSpectrum;
use crate::utils::validation::ensure_finite;

const STAGE: ProcessingStage = ProcessingStage::FrequencyDomain;

/// Frequency domain features extracted from one power spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyDomainFeatures {
    pub mnf: f64,            // Mean frequency
    pub mdf: f64,            // Median frequency
    pub peak_frequency: f64,
    pub mnp: f64,            // Mean power
    pub ttp: f64,            // Total power
    pub sm1: f64,
    pub sm2: f64,
    pub sm3: f64,
    pub fr: f64,             // Frequency ratio
    pub psr: f64,            // Power spectrum ratio
    pub vcf: f64,            // Variance of central frequency
}

impl FrequencyDomainFeatures {
    /// Feature keys and values in table order
    pub fn entries(&self) -> Vec<(String, f64)> {
        [
            ("MNF", self.mnf),
            ("MDF", self.mdf),
            ("PeakFrequency", self.peak_frequency),
            ("MNP", self.mnp),
            ("TTP", self.ttp),
            ("SM1", self.sm1),
            ("SM2", self.sm2),
            ("SM3", self.sm3),
            ("FR", self.fr),
            ("PSR", self.psr),
            ("VCF", self.vcf),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }
}

/// Spectral moments shared by MNF, VCF and the SM features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralMoments {
    /// Σ P, equal to TTP
    pub sm0: f64,
    /// Σ f·P
    pub sm1: f64,
    /// Σ f·P²
    pub sm2: f64,
    /// Σ f·P³
    pub sm3: f64,
    /// Σ f²·P, second moment of the frequency distribution
    pub frequency_second: f64,
}

impl SpectralMoments {
    pub fn from_spectrum(spectrum: &PowerSpectrum) -> Self {
        spectrum
            .frequencies()
            .iter()
            .zip(spectrum.power())
            .fold(
                Self { sm0: 0.0, sm1: 0.0, sm2: 0.0, sm3: 0.0, frequency_second: 0.0 },
                |acc, (&f, &p)| Self {
                    sm0: acc.sm0 + p,
                    sm1: acc.sm1 + f * p,
                    sm2: acc.sm2 + f * p * p,
                    sm3: acc.sm3 + f * p * p * p,
                    frequency_second: acc.frequency_second + f * f * p,
                },
            )
    }

    /// Total power, failing when it is zero
    #[track_caller]
    fn require_power(&self, operation: &str) -> EmgResult<f64> {
        if self.sm0 > 0.0 {
            Ok(self.sm0)
        } else {
            Err(EmgErrorBuilder::new(STAGE, operation).domain("total power is zero"))
        }
    }
}

/// Frequency domain feature extractor
#[derive(Debug, Clone, Default)]
pub struct FrequencyDomainExtractor {
    bands: BandConfig,
}

impl FrequencyDomainExtractor {
    pub fn new(bands: BandConfig) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &BandConfig {
        &self.bands
    }

    /// Compute every frequency-domain feature, failing on the first error
    pub fn extract(&self, spectrum: &PowerSpectrum) -> EmgResult<FrequencyDomainFeatures> {
        let moments = SpectralMoments::from_spectrum(spectrum);

        let features = FrequencyDomainFeatures {
            mnf: Self::mnf(&moments)?,
            mdf: Self::mdf(spectrum, &moments)?,
            peak_frequency: Self::peak_frequency(spectrum),
            mnp: Self::mnp(spectrum)?,
            ttp: ensure_finite(moments.sm0, STAGE, "TTP")?,
            sm1: ensure_finite(moments.sm1, STAGE, "SM1")?,
            sm2: ensure_finite(moments.sm2, STAGE, "SM2")?,
            sm3: ensure_finite(moments.sm3, STAGE, "SM3")?,
            fr: Self::fr(spectrum, &self.bands.frequency_ratio)?,
            psr: Self::psr(spectrum, &self.bands.power_spectrum_ratio)?,
            vcf: Self::vcf(&moments)?,
        };

        debug!(bins = spectrum.len(), mnf = features.mnf, mdf = features.mdf, "extracted frequency-domain features");
        Ok(features)
    }

    /// Σ f·P / Σ P
    pub fn mnf(moments: &SpectralMoments) -> EmgResult<f64> {
        let total = moments.require_power("MNF")?;
        ensure_finite(moments.sm1 / total, STAGE, "MNF")
    }

    /// Frequency of the first bin where the running power sum reaches half the total
    pub fn mdf(spectrum: &PowerSpectrum, moments: &SpectralMoments) -> EmgResult<f64> {
        let half = moments.require_power("MDF")? / 2.0;

        let mut cumulative = 0.0;
        let index = spectrum
            .power()
            .iter()
            .position(|&p| {
                cumulative += p;
                cumulative >= half
            })
            .unwrap_or(spectrum.len() - 1);

        Ok(spectrum.frequencies()[index])
    }

    /// Frequency of the first maximum
    pub fn peak_frequency(spectrum: &PowerSpectrum) -> f64 {
        spectrum.frequencies()[peak_bin(spectrum)]
    }

    pub fn mnp(spectrum: &PowerSpectrum) -> EmgResult<f64> {
        ensure_finite(Self::ttp(spectrum) / spectrum.len() as f64, STAGE, "MNP")
    }

    pub fn ttp(spectrum: &PowerSpectrum) -> f64 {
        spectrum.power().iter().sum()
    }

    /// Σ f·P^order
    pub fn sm(spectrum: &PowerSpectrum, order: i32) -> EmgResult<f64> {
        let moment: f64 = spectrum
            .frequencies()
            .iter()
            .zip(spectrum.power())
            .map(|(f, p)| f * p.powi(order))
            .sum();
        ensure_finite(moment, STAGE, &format!("SM{}", order))
    }

    /// Low-band power over high-band power, each band `[lower, upper)` on the nearest bins
    pub fn fr(spectrum: &PowerSpectrum, bands: &FrequencyRatioBands) -> EmgResult<f64> {
        let (low_lower, low_upper) = bands.low_band_hz;
        let (high_lower, high_upper) = bands.high_band_hz;
        ratio(
            spectrum.band_power(low_lower, low_upper),
            spectrum.band_power(high_lower, high_upper),
            "FR",
        )
    }

    /// Power within `±peak_half_width_hz` of the peak over power within `[min_hz, max_hz)`
    pub fn psr(spectrum: &PowerSpectrum, bands: &PowerSpectrumRatioBands) -> EmgResult<f64> {
        let peak = Self::peak_frequency(spectrum);
        ratio(
            spectrum.band_power(peak - bands.peak_half_width_hz, peak + bands.peak_half_width_hz),
            spectrum.band_power(bands.min_hz, bands.max_hz),
            "PSR",
        )
    }

    /// Σ f²·P / SM0 − (SM1 / SM0)²
    ///
    /// The second term's partner is the frequency moment `Σ f²·P`, not the reported `SM2`
    /// (`Σ f·P²`). Mixing in `SM2` turns the result negative for a pure tone.
    pub fn vcf(moments: &SpectralMoments) -> EmgResult<f64> {
        let total = moments.require_power("VCF")?;
        let centre = moments.sm1 / total;
        // Rounding can leave a tiny negative value for a single-bin spectrum
        let variance = (moments.frequency_second / total - centre * centre).max(0.0);
        ensure_finite(variance, STAGE, "VCF")
    }
}

fn peak_bin(spectrum: &PowerSpectrum) -> usize {
    spectrum
        .power()
        .iter()
        .enumerate()
        .fold(0, |best, (i, &p)| if p > spectrum.power()[best] { i } else { best })
}

#[track_caller]
fn ratio(numerator: f64, denominator: f64, operation: &str) -> EmgResult<f64> {
    if denominator == 0.0 {
        return Err(EmgErrorBuilder::new(STAGE, operation).domain("denominator band has zero power"));
    }
    ensure_finite(numerator / denominator, STAGE, operation)
}
