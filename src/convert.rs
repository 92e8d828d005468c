//! Unit conversions between the scales the pipeline moves through.
//!
//! Covers the mel psychoacoustic scale (HTK and Slaney conventions),
//! power/amplitude ↔ decibel transforms over matrices, and the pure
//! frame/sample/time/block index arithmetic.

use crate::{AudioFeatureError, AudioFeatureResult, RealFloat, to_precision};
use ndarray::Array2;

// =============================================================================
// MEL SCALE
// =============================================================================

/// Converts a frequency in Hz to the mel scale.
///
/// With `htk` the HTK formula `2595 * log10(1 + f/700)` is used. Otherwise the
/// Slaney convention applies: linear below 1000 Hz (`f / (200/3)`),
/// logarithmic above, with the two pieces matched in value and slope at the
/// breakpoint (`logstep = ln(6.4)/27`).
pub fn hz_to_mel<F: RealFloat>(frequency: F, htk: bool) -> F {
    if htk {
        return to_precision::<F, _>(2595.0)
            * (F::one() + frequency / to_precision::<F, _>(700.0)).log10();
    }

    let f_sp = to_precision::<F, _>(200.0 / 3.0);
    let min_log_hz = to_precision::<F, _>(1000.0);
    let min_log_mel = min_log_hz / f_sp;
    let logstep = to_precision::<F, _>(6.4f64.ln() / 27.0);

    if frequency >= min_log_hz {
        min_log_mel + (frequency / min_log_hz).ln() / logstep
    } else {
        frequency / f_sp
    }
}

/// Converts a mel value back to frequency in Hz.
///
/// Exact algebraic inverse of [`hz_to_mel`] for the same `htk` setting.
pub fn mel_to_hz<F: RealFloat>(mel: F, htk: bool) -> F {
    if htk {
        return to_precision::<F, _>(700.0)
            * (to_precision::<F, _>(10.0).powf(mel / to_precision::<F, _>(2595.0)) - F::one());
    }

    let f_sp = to_precision::<F, _>(200.0 / 3.0);
    let min_log_hz = to_precision::<F, _>(1000.0);
    let min_log_mel = min_log_hz / f_sp;
    let logstep = to_precision::<F, _>(6.4f64.ln() / 27.0);

    if mel >= min_log_mel {
        min_log_hz * (logstep * (mel - min_log_mel)).exp()
    } else {
        f_sp * mel
    }
}

// =============================================================================
// DECIBEL CONVERSIONS
// =============================================================================

/// Converts a power matrix to decibels: `10 * log10(max(amin, S) / ref)`.
///
/// When `top_db` is given, the output is clipped to `max(S_db) - top_db`
/// from below.
///
/// # Errors
/// `InvalidParameter` when `reference <= 0`, `amin <= 0`, or `top_db < 0`.
pub fn power_to_db(
    power: &Array2<f64>,
    reference: f64,
    amin: f64,
    top_db: Option<f64>,
) -> AudioFeatureResult<Array2<f64>> {
    to_db(power, reference, amin, top_db, 10.0)
}

/// Converts a decibel matrix back to power: `ref * 10^(S_db / 10)`.
pub fn db_to_power(db: &Array2<f64>, reference: f64) -> Array2<f64> {
    db.mapv(|value| reference * 10.0f64.powf(value / 10.0))
}

/// Converts an amplitude matrix to decibels: `20 * log10(max(amin, S) / ref)`.
///
/// Same clipping behavior as [`power_to_db`].
///
/// # Errors
/// `InvalidParameter` when `reference <= 0`, `amin <= 0`, or `top_db < 0`.
pub fn amplitude_to_db(
    amplitude: &Array2<f64>,
    reference: f64,
    amin: f64,
    top_db: Option<f64>,
) -> AudioFeatureResult<Array2<f64>> {
    to_db(amplitude, reference, amin, top_db, 20.0)
}

/// Converts a decibel matrix back to amplitude: `ref * 10^(S_db / 20)`.
pub fn db_to_amplitude(db: &Array2<f64>, reference: f64) -> Array2<f64> {
    db.mapv(|value| reference * 10.0f64.powf(value / 20.0))
}

fn to_db(
    matrix: &Array2<f64>,
    reference: f64,
    amin: f64,
    top_db: Option<f64>,
    factor: f64,
) -> AudioFeatureResult<Array2<f64>> {
    if reference <= 0.0 || amin <= 0.0 {
        return Err(AudioFeatureError::InvalidParameter(
            "dB reference and amin must be positive".to_string(),
        ));
    }
    if let Some(top) = top_db
        && top < 0.0
    {
        return Err(AudioFeatureError::InvalidParameter(
            "top_db must be non-negative".to_string(),
        ));
    }

    let mut db = matrix.mapv(|value| factor * (value.max(amin) / reference).log10());

    if let Some(top) = top_db {
        let max_db = db.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let threshold = max_db - top;
        db.mapv_inplace(|value| value.max(threshold));
    }

    Ok(db)
}

// =============================================================================
// FRAME / SAMPLE / TIME / BLOCK ARITHMETIC
// =============================================================================

/// Converts a frame index to the audio sample index it starts at.
///
/// `offset` counteracts windowing effects when using a non-centered STFT
/// (typically `n_fft / 2`).
pub fn frames_to_samples(frame: i64, hop_length: usize, offset: i64) -> i64 {
    frame * hop_length as i64 + offset
}

/// Converts a sample index into the STFT frame that covers it.
pub fn samples_to_frames(sample: i64, hop_length: usize, offset: i64) -> i64 {
    ((sample - offset) as f64 / hop_length as f64).floor() as i64
}

/// Converts a frame index to time in seconds.
pub fn frames_to_time(frame: i64, sample_rate: f64, hop_length: usize, offset: i64) -> f64 {
    samples_to_time(frames_to_samples(frame, hop_length, offset), sample_rate)
}

/// Converts a timestamp in seconds into the STFT frame that covers it.
pub fn time_to_frames(time: f64, sample_rate: f64, hop_length: usize, offset: i64) -> i64 {
    samples_to_frames(time_to_samples(time, sample_rate), hop_length, offset)
}

/// Converts a timestamp in seconds to a sample index (truncating).
pub fn time_to_samples(time: f64, sample_rate: f64) -> i64 {
    (time * sample_rate) as i64
}

/// Converts a sample index to time in seconds.
pub fn samples_to_time(sample: i64, sample_rate: f64) -> f64 {
    sample as f64 / sample_rate
}

/// Converts a block index to the first frame index it contains.
pub fn blocks_to_frames(block: i64, block_length: usize) -> i64 {
    block * block_length as i64
}

/// Converts a block index to the first sample index it contains.
pub fn blocks_to_samples(block: i64, block_length: usize, hop_length: usize) -> i64 {
    frames_to_samples(blocks_to_frames(block, block_length), hop_length, 0)
}

/// Converts a block index to time in seconds.
pub fn blocks_to_time(block: i64, block_length: usize, hop_length: usize, sample_rate: f64) -> f64 {
    samples_to_time(blocks_to_samples(block, block_length, hop_length), sample_rate)
}
