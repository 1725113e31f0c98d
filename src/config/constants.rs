// src/config/constants.rs
//! Default values for the analysis configuration

/// Preprocessing defaults
pub mod preprocessing {
    pub const DEFAULT_ENABLED: bool = true;
    pub const DEFAULT_LOWPASS_CUTOFF_HZ: f64 = 50.0;
    pub const DEFAULT_HIGHPASS_CUTOFF_HZ: f64 = 20.0;
    pub const DEFAULT_FILTER_ORDER: usize = 2;
    pub const DEFAULT_PHASIC_HALF_WINDOW_S: f64 = 4.0;
}

/// Time-domain feature defaults
pub mod time_domain {
    pub const DEFAULT_THRESHOLD: f64 = 0.01;
    pub const DEFAULT_MOMENT_ORDERS: [u32; 3] = [3, 4, 5];
}

/// Spectral estimation defaults
pub mod spectral {
    pub const DEFAULT_SEGMENT_LENGTH: usize = 256;
}

/// Frequency-band defaults for FR and PSR
pub mod bands {
    pub const DEFAULT_FR_LOW_BAND_HZ: (f64, f64) = (30.0, 250.0);
    pub const DEFAULT_FR_HIGH_BAND_HZ: (f64, f64) = (250.0, 500.0);
    pub const DEFAULT_PSR_PEAK_HALF_WIDTH_HZ: f64 = 20.0;
    pub const DEFAULT_PSR_MIN_HZ: f64 = 10.0;
    pub const DEFAULT_PSR_MAX_HZ: f64 = 500.0;
}

/// Configuration file discovery
pub mod paths {
    pub const DEFAULT_CONFIG_FILE: &str = "emg-features.toml";
    pub const LOCAL_CONFIG_FILE: &str = "emg-features.local.toml";
    pub const ENV_PREFIX: &str = "EMG_";
    pub const ENV_SEPARATOR: &str = "__";
}
