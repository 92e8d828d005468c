//! Mel filterbank construction and application.
//!
//! A filterbank is a sparse-triangular weight matrix mapping FFT bins to mel
//! bands. Each band rises linearly from one mel band edge to the next and
//! falls to the edge after it; Slaney-style banks are area-normalized so
//! filters carry comparable integrated energy regardless of bandwidth.

use crate::convert::{hz_to_mel, mel_to_hz};
use crate::{AudioFeatureError, AudioFeatureResult};
use ndarray::Array2;
use tracing::debug;

/// Builds a mel filterbank of shape `(n_mels, n_fft / 2 + 1)`.
///
/// Band edges are `n_mels + 2` mel-spaced frequencies between `f_min` and
/// `f_max`. With `htk == false` (Slaney, the default convention) each band is
/// area-normalized by `2 / (edge[m + 2] - edge[m])`. With `htk` the raw
/// triangular weight is reinterpreted through the HTK mel→Hz formula; this
/// matches the reference implementation and is intentionally preserved even
/// though it is not the standard HTK filterbank construction.
///
/// # Errors
/// `InvalidParameter` when `sample_rate <= 0`, `n_fft == 0`, `n_mels == 0`,
/// `f_min < 0`, or `f_max <= f_min`.
pub fn mel(
    sample_rate: f64,
    n_fft: usize,
    n_mels: usize,
    f_min: f64,
    f_max: f64,
    htk: bool,
) -> AudioFeatureResult<Array2<f64>> {
    if sample_rate <= 0.0 || n_fft == 0 || n_mels == 0 {
        return Err(AudioFeatureError::InvalidParameter(
            "sample_rate, n_fft and n_mels must be greater than 0".to_string(),
        ));
    }
    if f_min < 0.0 || f_max <= f_min {
        return Err(AudioFeatureError::InvalidParameter(format!(
            "invalid frequency range [{f_min}, {f_max}]"
        )));
    }
    debug!(sample_rate, n_fft, n_mels, f_min, f_max, htk, "building mel filterbank");

    let fft_freqs = fft_frequencies(sample_rate, n_fft);
    let band_edges = mel_frequencies(n_mels + 2, f_min, f_max, htk);

    let fdiff: Vec<f64> = band_edges.windows(2).map(|pair| pair[1] - pair[0]).collect();

    let mut weights = Array2::zeros((n_mels, fft_freqs.len()));
    for m in 0..n_mels {
        for (j, &freq) in fft_freqs.iter().enumerate() {
            let lower = -(band_edges[m] - freq) / fdiff[m];
            let upper = (band_edges[m + 2] - freq) / fdiff[m + 1];
            weights[[m, j]] = lower.min(upper).max(0.0);
        }
    }

    if htk {
        weights.mapv_inplace(|weight| 700.0 * (10.0f64.powf(weight / 2595.0) - 1.0));
    } else {
        for m in 0..n_mels {
            let enorm = 2.0 / (band_edges[m + 2] - band_edges[m]);
            weights.row_mut(m).mapv_inplace(|weight| weight * enorm);
        }
    }

    Ok(weights)
}

/// Applies a mel filterbank to a power spectrogram.
///
/// Computes the matrix product `filters · power`, collapsing the
/// `n_fft / 2 + 1` bin axis into `n_mels` bands while preserving the frame
/// axis.
///
/// # Errors
/// `DimensionMismatch` when the filterbank's bin axis doesn't match the
/// spectrogram's.
pub fn apply_mel_filters(
    power: &Array2<f64>,
    filters: &Array2<f64>,
) -> AudioFeatureResult<Array2<f64>> {
    if filters.ncols() != power.nrows() {
        return Err(AudioFeatureError::DimensionMismatch(format!(
            "filterbank covers {} bins but the spectrogram has {}",
            filters.ncols(),
            power.nrows()
        )));
    }
    Ok(filters.dot(power))
}

/// Center frequencies of the FFT bins: `i * sample_rate / n_fft` for
/// `i in 0..=n_fft / 2`.
pub fn fft_frequencies(sample_rate: f64, n_fft: usize) -> Vec<f64> {
    (0..=n_fft / 2)
        .map(|i| i as f64 * sample_rate / n_fft as f64)
        .collect()
}

/// `count` frequencies linearly spaced on the mel scale between `f_min` and
/// `f_max`, converted back to Hz.
pub fn mel_frequencies(count: usize, f_min: f64, f_max: f64, htk: bool) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![mel_to_hz(hz_to_mel(f_min, htk), htk)];
    }

    let mel_min = hz_to_mel(f_min, htk);
    let mel_max = hz_to_mel(f_max, htk);
    let step = (mel_max - mel_min) / (count - 1) as f64;

    (0..count)
        .map(|i| mel_to_hz(mel_min + i as f64 * step, htk))
        .collect()
}
