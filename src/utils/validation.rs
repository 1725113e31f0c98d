//! Validation helpers shared by the analysis stages
//!
//! Every stage checks its inputs with these helpers before computing anything, so failures
//! are reported with the stage and operation that detected them.

use crate::error::{EmgErrorBuilder, EmgResult, ProcessingStage};

/// Sample rate must be finite and strictly positive
#[track_caller]
pub fn validate_sample_rate(sample_rate_hz: f64, stage: ProcessingStage) -> EmgResult<()> {
    if sample_rate_hz.is_finite() && sample_rate_hz > 0.0 {
        Ok(())
    } else {
        Err(EmgErrorBuilder::new(stage, "sample_rate")
            .invalid_data("sample rate", &format!("must be finite and > 0 Hz, got {}", sample_rate_hz)))
    }
}

/// Every sample must be finite
#[track_caller]
pub fn validate_signal(signal: &[f64], stage: ProcessingStage) -> EmgResult<()> {
    match signal.iter().position(|x| !x.is_finite()) {
        None => Ok(()),
        Some(index) => Err(EmgErrorBuilder::new(stage, "signal")
            .invalid_data("signal", &format!("sample {} is not finite ({})", index, signal[index]))),
    }
}

/// Amplitude thresholds must be finite and non-negative
#[track_caller]
pub fn validate_threshold(threshold: f64, stage: ProcessingStage, operation: &str) -> EmgResult<()> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(EmgErrorBuilder::new(stage, operation).invalid_threshold(threshold))
    }
}

/// Fail with `InsufficientSamples` when fewer than `required` samples are available
#[track_caller]
pub fn require_samples(actual: usize, required: usize, stage: ProcessingStage, operation: &str) -> EmgResult<()> {
    if actual >= required {
        Ok(())
    } else {
        Err(EmgErrorBuilder::new(stage, operation).insufficient_samples(required, actual))
    }
}

/// Convert a NaN or infinite feature value into a `Domain` error
#[track_caller]
pub fn ensure_finite(value: f64, stage: ProcessingStage, operation: &str) -> EmgResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EmgErrorBuilder::new(stage, operation).domain(&format!("result is not finite ({})", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmgError;

    #[test]
    fn test_sample_rate_validation() {
        assert!(validate_sample_rate(1000.0, ProcessingStage::Validation).is_ok());
        assert!(validate_sample_rate(0.0, ProcessingStage::Validation).is_err());
        assert!(validate_sample_rate(-1.0, ProcessingStage::Validation).is_err());
        assert!(validate_sample_rate(f64::INFINITY, ProcessingStage::Validation).is_err());
    }

    #[test]
    fn test_signal_validation_reports_index() {
        let err = validate_signal(&[0.0, 1.0, f64::NAN], ProcessingStage::Validation).unwrap_err();
        match err {
            EmgError::InvalidData { reason, .. } => assert!(reason.contains("sample 2")),
            other => panic!("Expected invalid data, got {:?}", other),
        }
        assert!(validate_signal(&[], ProcessingStage::Validation).is_ok());
    }

    #[test]
    fn test_threshold_validation() {
        assert!(validate_threshold(0.0, ProcessingStage::TimeDomain, "ZC").is_ok());
        let err = validate_threshold(-0.1, ProcessingStage::TimeDomain, "ZC").unwrap_err();
        assert!(matches!(err, EmgError::InvalidThreshold { .. }));
        assert_eq!(err.operation(), "ZC");
        assert!(validate_threshold(f64::NAN, ProcessingStage::TimeDomain, "ZC").is_err());
    }

    #[test]
    fn test_require_samples() {
        assert!(require_samples(2, 2, ProcessingStage::TimeDomain, "WL").is_ok());
        assert!(matches!(
            require_samples(1, 2, ProcessingStage::TimeDomain, "WL"),
            Err(EmgError::InsufficientSamples { required: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_errors_point_at_the_calling_stage() {
        let line = line!() + 1;
        let err = require_samples(0, 1, ProcessingStage::TimeDomain, "MAV").unwrap_err();
        assert_eq!(err.context().file, Some(file!()));
        assert_eq!(err.context().line, Some(line));
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite(1.5, ProcessingStage::Assembly, "FR").unwrap(), 1.5);
        assert!(matches!(
            ensure_finite(f64::INFINITY, ProcessingStage::Assembly, "FR"),
            Err(EmgError::Domain { .. })
        ));
    }
}
