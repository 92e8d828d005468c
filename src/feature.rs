//! Perceptual feature extraction: mel spectrograms and MFCCs.
//!
//! Both extractors share the same front end: a centered hann STFT with
//! `win_length == n_fft`, squared into a power spectrum. The mel extractor
//! collapses the power spectrum through a Slaney filterbank; the MFCC
//! extractor continues through decibel compression and a column-wise DCT-II.

use crate::convert::power_to_db;
use crate::filters::{apply_mel_filters, mel};
use crate::spectrum::{dct_with, stft_with};
use crate::window::WindowType;
use crate::fft::{FourierTransform, RustFftBackend};
use crate::{AudioFeatureError, AudioFeatureResult};
use ndarray::Array2;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of mel bands the MFCC pipeline always runs internally before
/// truncating the DCT output to the configured feature size.
const MFCC_MEL_BANDS: usize = 128;

/// dB floor applied to mel energies before the cepstral transform.
const DB_AMIN: f64 = 1e-10;

/// Dynamic range (below the maximum) kept after decibel conversion.
const DB_TOP: f64 = 80.0;

/// Immutable configuration for the feature extractors.
///
/// [`FeatureConfig::new`] computes the Nyquist default `f_max =
/// sample_rate / 2` once at construction; use [`FeatureConfig::with_f_max`]
/// to override it explicitly. No field is re-derived after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Sampling rate of the analyzed signal, in Hz.
    pub sample_rate: u32,
    /// Lowest filterbank frequency, in Hz.
    pub f_min: f64,
    /// Highest filterbank frequency, in Hz.
    pub f_max: f64,
    /// FFT window size in samples.
    pub n_fft: usize,
    /// Samples between successive analysis frames.
    pub hop_length: usize,
    /// Rows of the resulting feature matrix: mel bands for
    /// [`mel_spectrogram`], cepstral coefficients for [`mfcc`].
    pub feature_size: usize,
}

impl FeatureConfig {
    /// Creates a configuration with `f_min = 0` and the Nyquist `f_max`.
    pub fn new(sample_rate: u32, n_fft: usize, hop_length: usize, feature_size: usize) -> Self {
        Self {
            sample_rate,
            f_min: 0.0,
            f_max: sample_rate as f64 / 2.0,
            n_fft,
            hop_length,
            feature_size,
        }
    }

    /// Overrides the lowest filterbank frequency.
    #[must_use]
    pub fn with_f_min(mut self, f_min: f64) -> Self {
        self.f_min = f_min;
        self
    }

    /// Overrides the Nyquist-defaulted highest filterbank frequency.
    #[must_use]
    pub fn with_f_max(mut self, f_max: f64) -> Self {
        self.f_max = f_max;
        self
    }
}

/// Computes a mel spectrogram of shape `(feature_size, n_frames)`.
///
/// Pipeline: centered hann STFT → power spectrum → Slaney mel filterbank
/// with `feature_size` bands.
///
/// # Errors
/// Propagates failures from the STFT and filterbank stages (invalid
/// dimensions, empty signal, invalid frequency range).
pub fn mel_spectrogram(config: &FeatureConfig, signal: &[f64]) -> AudioFeatureResult<Array2<f64>> {
    let mut backend = RustFftBackend::new();
    let power = power_spectrogram(&mut backend, config, signal)?;
    let filters = mel(
        config.sample_rate as f64,
        config.n_fft,
        config.feature_size,
        config.f_min,
        config.f_max,
        false,
    )?;
    apply_mel_filters(&power, &filters)
}

/// Computes mel-frequency cepstral coefficients of shape
/// `(feature_size, n_frames)`.
///
/// Pipeline: centered hann STFT → power spectrum → 128-band Slaney mel
/// filterbank → decibels (power reference 1.0, floor 1e-10, 80 dB range) →
/// column-wise DCT-II → first `feature_size` rows.
///
/// # Errors
/// `InvalidParameter` when `feature_size` exceeds the 128 available cepstral
/// rows; otherwise propagates upstream failures.
pub fn mfcc(config: &FeatureConfig, signal: &[f64]) -> AudioFeatureResult<Array2<f64>> {
    if config.feature_size > MFCC_MEL_BANDS {
        return Err(AudioFeatureError::InvalidParameter(format!(
            "feature_size {} exceeds the {} cepstral coefficients available",
            config.feature_size, MFCC_MEL_BANDS
        )));
    }

    let mut backend = RustFftBackend::new();
    let power = power_spectrogram(&mut backend, config, signal)?;
    let filters = mel(
        config.sample_rate as f64,
        config.n_fft,
        MFCC_MEL_BANDS,
        config.f_min,
        config.f_max,
        false,
    )?;
    let mel_spec = apply_mel_filters(&power, &filters)?;
    let db = power_to_db(&mel_spec, 1.0, DB_AMIN, Some(DB_TOP))?;
    let cepstrum = dct_with(&mut backend, &db)?;

    Ok(cepstrum.slice_move(ndarray::s![..config.feature_size, ..]))
}

/// Shared front end: centered hann STFT squared into a power spectrum.
fn power_spectrogram(
    fft: &mut impl FourierTransform,
    config: &FeatureConfig,
    signal: &[f64],
) -> AudioFeatureResult<Array2<f64>> {
    debug!(
        sample_rate = config.sample_rate,
        n_fft = config.n_fft,
        hop_length = config.hop_length,
        "extracting power spectrogram"
    );
    let spectrogram = stft_with(
        fft,
        signal,
        config.n_fft,
        config.hop_length,
        WindowType::Hann,
        config.n_fft,
        true,
    )?;
    Ok(spectrogram.mapv(|value: Complex<f64>| value.norm_sqr()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::mel_to_hz;
    use crate::filters::mel_frequencies;
    use crate::generation::sine_wave;
    use approx_eq::assert_approx_eq;
    use std::time::Duration;

    fn config() -> FeatureConfig {
        FeatureConfig::new(16_000, 1024, 256, 40)
    }

    #[test]
    fn test_nyquist_default_and_overrides() {
        let config = FeatureConfig::new(16_000, 1024, 256, 40);
        assert_approx_eq!(config.f_max, 8000.0, 1e-12);
        assert_approx_eq!(config.f_min, 0.0, 1e-12);

        let overridden = config.with_f_min(20.0).with_f_max(7000.0);
        assert_approx_eq!(overridden.f_min, 20.0, 1e-12);
        assert_approx_eq!(overridden.f_max, 7000.0, 1e-12);
    }

    #[test]
    fn test_mel_spectrogram_shape() {
        let signal = sine_wave(440.0, Duration::from_secs(1), 16_000, 1.0);
        let mel_spec = mel_spectrogram(&config(), &signal).unwrap();
        // centered framing keeps one frame per hop plus the final one
        assert_eq!(mel_spec.dim(), (40, 16_000 / 256 + 1));
        for &value in mel_spec.iter() {
            assert!(value >= 0.0 && value.is_finite());
        }
    }

    #[test]
    fn test_mel_spectrogram_peak_band_tracks_tone() {
        let config = config();
        let signal = sine_wave(440.0, Duration::from_secs(1), 16_000, 1.0);
        let mel_spec = mel_spectrogram(&config, &signal).unwrap();

        // examine a frame well inside the signal
        let frame = mel_spec.ncols() / 2;
        let mut peak_band = 0;
        let mut peak_energy = f64::NEG_INFINITY;
        for m in 0..mel_spec.nrows() {
            if mel_spec[[m, frame]] > peak_energy {
                peak_energy = mel_spec[[m, frame]];
                peak_band = m;
            }
        }

        // band centers are the interior mel frequencies
        let edges = mel_frequencies(42, config.f_min, config.f_max, false);
        let center = edges[peak_band + 1];
        assert!(
            (center - 440.0).abs() < 80.0,
            "peak band centered at {center} Hz, expected near 440 Hz"
        );
    }

    #[test]
    fn test_mfcc_shape() {
        let signal = sine_wave(440.0, Duration::from_secs(1), 16_000, 1.0);
        let mut config = config();
        config.feature_size = 13;
        let coefficients = mfcc(&config, &signal).unwrap();
        assert_eq!(coefficients.dim(), (13, 16_000 / 256 + 1));
        for &value in coefficients.iter() {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn test_mfcc_of_silence_is_analytic() {
        // silence floors every mel energy at amin: 10*log10(1e-10) = -100 dB
        // in every band, and the DCT of a constant column concentrates all
        // energy in coefficient 0 at -100 * sqrt(128)
        let signal = vec![0.0; 4096];
        let mut config = config();
        config.feature_size = 13;
        let coefficients = mfcc(&config, &signal).unwrap();

        let expected_c0 = -100.0 * (MFCC_MEL_BANDS as f64).sqrt();
        for t in 0..coefficients.ncols() {
            assert_approx_eq!(coefficients[[0, t]], expected_c0, 1e-6);
            for r in 1..coefficients.nrows() {
                assert!(coefficients[[r, t]].abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_mfcc_feature_size_bound() {
        let signal = sine_wave(440.0, Duration::from_secs(1), 16_000, 1.0);
        let mut config = config();
        config.feature_size = MFCC_MEL_BANDS + 1;
        let result = mfcc(&config, &signal);
        assert!(matches!(
            result,
            Err(AudioFeatureError::InvalidParameter(_))
        ));

        // exactly the full coefficient set is allowed
        config.feature_size = MFCC_MEL_BANDS;
        assert!(mfcc(&config, &signal).is_ok());
    }

    #[test]
    fn test_extractors_propagate_upstream_failures() {
        let config = config();
        assert!(mel_spectrogram(&config, &[]).is_err());
        assert!(mfcc(&config, &[]).is_err());

        let bad_range = config.clone().with_f_max(-1.0);
        let signal = sine_wave(440.0, Duration::from_millis(100), 16_000, 1.0);
        assert!(mel_spectrogram(&bad_range, &signal).is_err());
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let config = config().with_f_min(30.0);
        let json = serde_json::to_string(&config).unwrap();
        let restored: FeatureConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_band_center_helper_consistency() {
        // the peak-band test depends on mel_frequencies producing interior
        // centers consistent with hz/mel round-trips
        let edges = mel_frequencies(42, 0.0, 8000.0, false);
        for &edge in &edges {
            let round = mel_to_hz(crate::convert::hz_to_mel(edge, false), false);
            assert_approx_eq!(round, edge, 1e-6);
        }
    }
}
