//! EMG signal feature extraction module
//!
//! This module provides feature extraction for complete EMG recordings:
//! - Time domain features (IEMG, MAV, RMS, WL, ZC, SSC, ...)
//! - Frequency domain features (MNF, MDF, spectral moments, FR, PSR, VCF)
//!
//! Both extractors produce typed records which are merged into a [`FeatureSet`], the
//! name-keyed record handed to callers.

pub mod frequency;
pub mod time_domain;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EmgErrorBuilder, EmgResult, ProcessingStage};
use crate::utils::validation::ensure_finite;

pub use frequency::{FrequencyDomainExtractor, FrequencyDomainFeatures, SpectralMoments};
pub use time_domain::{TimeDomainExtractor, TimeDomainFeatures};

/// Named features of one analysis, split by domain
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    #[serde(rename = "TimeDomain")]
    pub time_domain: BTreeMap<String, f64>,

    #[serde(rename = "FrequencyDomain")]
    pub frequency_domain: BTreeMap<String, f64>,
}

impl FeatureSet {
    /// Merge both typed records, checking every value is finite and every key unique
    pub fn from_parts(time: &TimeDomainFeatures, frequency: &FrequencyDomainFeatures) -> EmgResult<Self> {
        Ok(Self {
            time_domain: collect_entries(time.entries())?,
            frequency_domain: collect_entries(frequency.entries())?,
        })
    }

    /// Look a feature up by key in either domain
    pub fn get(&self, name: &str) -> Option<f64> {
        self.time_domain
            .get(name)
            .or_else(|| self.frequency_domain.get(name))
            .copied()
    }

    pub fn feature_count(&self) -> usize {
        self.time_domain.len() + self.frequency_domain.len()
    }

    /// Feature keys, time domain first, each domain in key order
    pub fn feature_names(&self) -> Vec<String> {
        self.time_domain
            .keys()
            .chain(self.frequency_domain.keys())
            .cloned()
            .collect()
    }

    /// Flatten all features into a single vector, aligned with [`feature_names`](Self::feature_names)
    pub fn to_flat_vector(&self) -> Vec<f64> {
        self.time_domain
            .values()
            .chain(self.frequency_domain.values())
            .copied()
            .collect()
    }
}

fn collect_entries(entries: Vec<(String, f64)>) -> EmgResult<BTreeMap<String, f64>> {
    let mut map = BTreeMap::new();
    for (name, value) in entries {
        let value = ensure_finite(value, ProcessingStage::Assembly, &name)?;
        if map.insert(name.clone(), value).is_some() {
            return Err(EmgErrorBuilder::new(ProcessingStage::Assembly, &name)
                .invalid_data("feature set", "duplicate feature key"));
        }
    }
    Ok(map)
}
