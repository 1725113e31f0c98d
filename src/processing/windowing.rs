// src/processing/windowing.rs
//! Window functions for spectral estimation
//!
//! Coefficients are periodic (DFT-even): a window of length `n` is the first `n` points of
//! the symmetric window of length `n + 1`. This is the form used for Welch segments.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Segment taper applied before each FFT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    Rectangular,
    #[default]
    Hann,
    Hamming,
    Blackman,
}

/// Generate `size` periodic window coefficients
pub fn window_coefficients(window_type: WindowType, size: usize) -> Vec<f64> {
    if size == 0 {
        return Vec::new();
    }
    if size == 1 {
        return vec![1.0];
    }

    let n = size as f64;
    match window_type {
        WindowType::Rectangular => vec![1.0; size],
        WindowType::Hann => (0..size)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n).cos())
            .collect(),
        WindowType::Hamming => (0..size)
            .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / n).cos())
            .collect(),
        WindowType::Blackman => (0..size)
            .map(|i| {
                let phase = 2.0 * PI * i as f64 / n;
                0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_functions() {
        let hamming = window_coefficients(WindowType::Hamming, 10);
        assert_eq!(hamming.len(), 10);
        assert!((hamming[0] - 0.08).abs() < 1e-12); // Hamming starts at 0.08

        let hann = window_coefficients(WindowType::Hann, 10);
        assert_eq!(hann.len(), 10);
        assert!(hann[0].abs() < 1e-12);
        assert!((hann[5] - 1.0).abs() < 1e-12);

        let rect = window_coefficients(WindowType::Rectangular, 5);
        assert!(rect.iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_hann_is_periodic() {
        // w[k] == w[n - k] for the DFT-even form
        let hann = window_coefficients(WindowType::Hann, 8);
        for k in 1..8 {
            assert!((hann[k] - hann[8 - k]).abs() < 1e-12);
        }
        let sum: f64 = hann.iter().sum();
        assert!((sum - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_blackman_endpoints() {
        let blackman = window_coefficients(WindowType::Blackman, 16);
        assert!(blackman[0].abs() < 1e-12);
        assert!((blackman[8] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(window_coefficients(WindowType::Hann, 0).is_empty());
        assert_eq!(window_coefficients(WindowType::Hann, 1), vec![1.0]);
        assert_eq!(window_coefficients(WindowType::Blackman, 1), vec![1.0]);
    }

    #[test]
    fn test_window_type_serde_names() {
        #[derive(Deserialize)]
        struct Holder {
            window: WindowType,
        }
        let holder: Holder = toml::from_str("window = \"blackman\"").unwrap();
        assert_eq!(holder.window, WindowType::Blackman);
        assert_eq!(WindowType::default(), WindowType::Hann);
    }
}
