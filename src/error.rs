// src/error.rs
//! Unified error handling for EMG feature extraction
//!
//! Every stage of the analysis fails fast with an [`EmgError`]. Each variant carries an
//! [`ErrorContext`] naming the stage and the operation (usually the feature key, such as
//! `"WL"` or `"VCF"`) that failed, so callers can diagnose a failure without inspecting
//! intermediate buffers.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};

use crate::processing::filters::BandType;

/// Unified error type for the analysis pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum EmgError {
    /// Cutoff outside `(0, Nyquist)`, zero order, or an unstable design
    InvalidFilterParameters {
        band: BandType,
        cutoff_hz: f64,
        sample_rate_hz: f64,
        order: usize,
        reason: String,
        context: ErrorContext,
    },

    /// Signal too short for the requested feature, filter or segment
    InsufficientSamples {
        required: usize,
        actual: usize,
        context: ErrorContext,
    },

    /// Mathematically undefined operation (division by zero power, non-finite result)
    Domain {
        reason: String,
        context: ErrorContext,
    },

    /// Negative or non-finite amplitude threshold
    InvalidThreshold {
        threshold: f64,
        context: ErrorContext,
    },

    /// Invalid input data (non-finite samples, bad sample rate)
    InvalidData {
        data_type: String,
        reason: String,
        context: ErrorContext,
    },

    /// Configuration and setup errors
    Configuration {
        component: String,
        reason: String,
        context: ErrorContext,
    },
}

/// Analysis stages for error tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessingStage {
    Validation,
    Filtering,
    BaselineRemoval,
    TimeDomain,
    SpectralEstimation,
    FrequencyDomain,
    Assembly,
    Configuration,
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessingStage::Validation => "validation",
            ProcessingStage::Filtering => "filtering",
            ProcessingStage::BaselineRemoval => "baseline-removal",
            ProcessingStage::TimeDomain => "time-domain",
            ProcessingStage::SpectralEstimation => "spectral-estimation",
            ProcessingStage::FrequencyDomain => "frequency-domain",
            ProcessingStage::Assembly => "assembly",
            ProcessingStage::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

/// Error context for debugging and analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorContext {
    pub stage: ProcessingStage,
    pub operation: String,
    pub file: Option<&'static str>,
    pub line: Option<u32>,
    pub additional_info: BTreeMap<String, String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(stage: ProcessingStage, operation: &str) -> Self {
        Self {
            stage,
            operation: operation.to_string(),
            file: None,
            line: None,
            additional_info: BTreeMap::new(),
        }
    }

    /// Create error context with file and line information
    pub fn with_location(
        stage: ProcessingStage,
        operation: &str,
        file: &'static str,
        line: u32,
    ) -> Self {
        let mut context = Self::new(stage, operation);
        context.file = Some(file);
        context.line = Some(line);
        context
    }

    /// Add additional information to the context
    pub fn add_info<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }
}

/// Macro for creating error context with file and line info
#[macro_export]
macro_rules! error_context {
    ($stage:expr, $operation:expr) => {
        $crate::error::ErrorContext::with_location($stage, $operation, file!(), line!())
    };
}

impl EmgError {
    /// Context shared by every variant
    pub fn context(&self) -> &ErrorContext {
        match self {
            EmgError::InvalidFilterParameters { context, .. }
            | EmgError::InsufficientSamples { context, .. }
            | EmgError::Domain { context, .. }
            | EmgError::InvalidThreshold { context, .. }
            | EmgError::InvalidData { context, .. }
            | EmgError::Configuration { context, .. } => context,
        }
    }

    /// Stage that raised the error
    pub fn stage(&self) -> ProcessingStage {
        self.context().stage
    }

    /// Feature key or stage operation that raised the error
    pub fn operation(&self) -> &str {
        &self.context().operation
    }
}

impl fmt::Display for EmgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmgError::InvalidFilterParameters { band, cutoff_hz, sample_rate_hz, order, reason, context } => {
                write!(f, "[FILTER] Invalid {:?} design (order {}, cutoff {} Hz at {} Hz): {} ({})",
                       band, order, cutoff_hz, sample_rate_hz, reason, context.operation)
            }
            EmgError::InsufficientSamples { required, actual, context } => {
                write!(f, "[SAMPLES] {} needs at least {} samples, got {} ({})",
                       context.operation, required, actual, context.stage)
            }
            EmgError::Domain { reason, context } => {
                write!(f, "[DOMAIN] {} is undefined: {} ({})", context.operation, reason, context.stage)
            }
            EmgError::InvalidThreshold { threshold, context } => {
                write!(f, "[THRESHOLD] {} threshold must be finite and >= 0, got {} ({})",
                       context.operation, threshold, context.stage)
            }
            EmgError::InvalidData { data_type, reason, context } => {
                write!(f, "[DATA] Invalid {}: {} ({})", data_type, reason, context.operation)
            }
            EmgError::Configuration { component, reason, context } => {
                write!(f, "[CONFIG] Configuration error in {}: {} ({})",
                       component, reason, context.operation)
            }
        }
    }
}

impl Error for EmgError {}

/// Result type alias for EMG operations
pub type EmgResult<T> = Result<T, EmgError>;

/// Error builder for convenient error construction
///
/// The builder records the source location of its caller. Helpers that build errors on
/// behalf of a stage are `#[track_caller]`, so the location points at the stage code.
pub struct EmgErrorBuilder {
    stage: ProcessingStage,
    operation: String,
    location: &'static Location<'static>,
}

impl EmgErrorBuilder {
    #[track_caller]
    pub fn new(stage: ProcessingStage, operation: &str) -> Self {
        Self {
            stage,
            operation: operation.to_string(),
            location: Location::caller(),
        }
    }

    fn context(&self) -> ErrorContext {
        ErrorContext::with_location(self.stage, &self.operation, self.location.file(), self.location.line())
    }

    pub fn insufficient_samples(self, required: usize, actual: usize) -> EmgError {
        EmgError::InsufficientSamples {
            required,
            actual,
            context: self.context(),
        }
    }

    pub fn domain(self, reason: &str) -> EmgError {
        EmgError::Domain {
            reason: reason.to_string(),
            context: self.context(),
        }
    }

    pub fn invalid_threshold(self, threshold: f64) -> EmgError {
        EmgError::InvalidThreshold {
            threshold,
            context: self.context(),
        }
    }

    pub fn invalid_data(self, data_type: &str, reason: &str) -> EmgError {
        EmgError::InvalidData {
            data_type: data_type.to_string(),
            reason: reason.to_string(),
            context: self.context(),
        }
    }

    pub fn configuration(self, component: &str, reason: &str) -> EmgError {
        EmgError::Configuration {
            component: component.to_string(),
            reason: reason.to_string(),
            context: self.context(),
        }
    }

    pub fn invalid_filter(
        self,
        band: BandType,
        cutoff_hz: f64,
        sample_rate_hz: f64,
        order: usize,
        reason: &str,
    ) -> EmgError {
        EmgError::InvalidFilterParameters {
            band,
            cutoff_hz,
            sample_rate_hz,
            order,
            reason: reason.to_string(),
            context: self.context(),
        }
    }
}
