//! Common utility functions shared by the analysis stages

pub mod validation;

pub use validation::{
    ensure_finite,
    require_samples,
    validate_sample_rate,
    validate_signal,
    validate_threshold,
};
