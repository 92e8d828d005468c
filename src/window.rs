//! Window function generation for spectral analysis.
//!
//! Each family is a closed-form per-sample formula over a denominator
//! `N = size` (periodic, FFT analysis) or `N = size - 1` (symmetric, filter
//! design). The periodic/symmetric distinction matters: perfect STFT→ISTFT
//! reconstruction relies on the periodic variant.

use crate::{AudioFeatureError, AudioFeatureResult};
use std::f64::consts::PI;
use std::str::FromStr;

/// Window function families supported by [`get_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    /// Triangular ramp with peak 1 at the midpoint.
    Bartlett,
    /// Three-term cosine sum with coefficients (0.42, 0.5, 0.08).
    Blackman,
    /// Raised cosine `0.54 - 0.46*cos(2*pi*i/N)`.
    Hamming,
    /// Raised cosine `0.5*(1 - cos(2*pi*i/N))`.
    Hann,
    /// Parabolic `1 - ((i - N/2)/(N/2))^2`.
    Welch,
}

impl FromStr for WindowType {
    type Err = AudioFeatureError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "bartlett" => Ok(WindowType::Bartlett),
            "blackman" => Ok(WindowType::Blackman),
            "hamming" => Ok(WindowType::Hamming),
            "hann" => Ok(WindowType::Hann),
            "welch" => Ok(WindowType::Welch),
            other => Err(AudioFeatureError::UnsupportedWindowType(other.to_string())),
        }
    }
}

/// Generates the weight sequence for a window family.
///
/// `periodic` selects an FFT-appropriate periodic window (`N = size`) versus
/// a symmetric filter-design window (`N = size - 1`).
///
/// # Errors
/// `InvalidParameter` when `size` is zero, or when `size == 1` with a
/// symmetric window (the denominator `N` would be zero).
pub fn get_window(window: WindowType, size: usize, periodic: bool) -> AudioFeatureResult<Vec<f64>> {
    if size == 0 {
        return Err(AudioFeatureError::InvalidParameter(
            "window size must be greater than 0".to_string(),
        ));
    }
    let n = if periodic { size } else { size - 1 };
    if n == 0 {
        return Err(AudioFeatureError::InvalidParameter(
            "symmetric window of size 1 has no valid denominator".to_string(),
        ));
    }

    let weights = match window {
        WindowType::Bartlett => bartlett(size, n),
        WindowType::Blackman => blackman(size, n),
        WindowType::Hamming => hamming(size, n),
        WindowType::Hann => hann(size, n),
        WindowType::Welch => welch(size, n),
    };
    Ok(weights)
}

fn bartlett(size: usize, n: usize) -> Vec<f64> {
    // integer midpoint split: the ascending ramp includes index N/2
    (0..size)
        .map(|i| {
            if i <= n / 2 {
                2.0 * i as f64 / n as f64
            } else {
                2.0 - 2.0 * i as f64 / n as f64
            }
        })
        .collect()
}

fn blackman(size: usize, n: usize) -> Vec<f64> {
    let alpha = 0.16;
    let a0 = (1.0 - alpha) / 2.0;
    let a1 = 0.5;
    let a2 = alpha / 2.0;
    (0..size)
        .map(|i| {
            let phase = 2.0 * PI * i as f64 / n as f64;
            a0 - a1 * phase.cos() + a2 * (2.0 * phase).cos()
        })
        .collect()
}

fn hamming(size: usize, n: usize) -> Vec<f64> {
    let alpha = 0.54;
    let beta = 1.0 - alpha;
    (0..size)
        .map(|i| alpha - beta * (2.0 * PI * i as f64 / n as f64).cos())
        .collect()
}

fn hann(size: usize, n: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / n as f64).cos()))
        .collect()
}

fn welch(size: usize, n: usize) -> Vec<f64> {
    let half = n as f64 / 2.0;
    (0..size)
        .map(|i| {
            let term = (i as f64 - half) / half;
            1.0 - term * term
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_hann_periodic_values() {
        let window = get_window(WindowType::Hann, 4, true).unwrap();
        let expected = [0.0, 0.5, 1.0, 0.5];
        for (value, want) in window.iter().zip(expected.iter()) {
            assert_approx_eq!(*value, *want, 1e-12);
        }
    }

    #[test]
    fn test_hann_symmetric_values() {
        let window = get_window(WindowType::Hann, 5, false).unwrap();
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (value, want) in window.iter().zip(expected.iter()) {
            assert_approx_eq!(*value, *want, 1e-12);
        }
    }

    #[test]
    fn test_hamming_endpoints() {
        let window = get_window(WindowType::Hamming, 9, false).unwrap();
        assert_approx_eq!(window[0], 0.08, 1e-12);
        assert_approx_eq!(window[8], 0.08, 1e-12);
        assert_approx_eq!(window[4], 1.0, 1e-12);
    }

    #[test]
    fn test_bartlett_peak_at_midpoint() {
        let window = get_window(WindowType::Bartlett, 9, false).unwrap();
        assert_approx_eq!(window[0], 0.0, 1e-12);
        assert_approx_eq!(window[4], 1.0, 1e-12);
        assert_approx_eq!(window[8], 0.0, 1e-12);
    }

    #[test]
    fn test_welch_parabola() {
        let window = get_window(WindowType::Welch, 5, false).unwrap();
        assert_approx_eq!(window[0], 0.0, 1e-12);
        assert_approx_eq!(window[2], 1.0, 1e-12);
        assert_approx_eq!(window[4], 0.0, 1e-12);
    }

    #[test]
    fn test_blackman_endpoints_near_zero() {
        let window = get_window(WindowType::Blackman, 7, false).unwrap();
        // 0.42 - 0.5 + 0.08 = 0 at the edges
        assert!(window[0].abs() < 1e-12);
        assert!(window[6].abs() < 1e-12);
        assert_approx_eq!(window[3], 1.0, 1e-12);
    }

    #[test]
    fn test_periodic_matches_longer_symmetric_prefix() {
        // A periodic window of size N equals the first N samples of a
        // symmetric window of size N + 1.
        let periodic = get_window(WindowType::Hann, 8, true).unwrap();
        let symmetric = get_window(WindowType::Hann, 9, false).unwrap();
        for (p, s) in periodic.iter().zip(symmetric.iter()) {
            assert_approx_eq!(*p, *s, 1e-12);
        }
    }

    #[test]
    fn test_unknown_family_rejected() {
        let result = "kaiser".parse::<WindowType>();
        assert!(matches!(
            result,
            Err(AudioFeatureError::UnsupportedWindowType(_))
        ));
    }

    #[test]
    fn test_name_parsing_is_case_insensitive() {
        assert_eq!("Hann".parse::<WindowType>().unwrap(), WindowType::Hann);
        assert_eq!(
            "BLACKMAN".parse::<WindowType>().unwrap(),
            WindowType::Blackman
        );
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(get_window(WindowType::Hann, 0, true).is_err());
        assert!(get_window(WindowType::Hann, 1, false).is_err());
        // periodic size 1 is well defined
        let window = get_window(WindowType::Hann, 1, true).unwrap();
        assert_approx_eq!(window[0], 0.0, 1e-12);
    }
}
