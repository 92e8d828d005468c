//! Signal padding with selectable boundary policies.
//!
//! Padding is the framing companion of the STFT: centered analysis pads the
//! signal so the first frame is centered at sample 0, and short analysis
//! windows are zero-extended to the FFT length.

use crate::{AudioFeatureError, AudioFeatureResult};
use std::str::FromStr;

/// Boundary policies supported by [`pad`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    /// Zero-fill outside the signal.
    Constant,
    /// Mirror around the boundary without repeating the edge sample.
    Reflect,
    /// Circular repetition of the signal.
    Wrap,
    /// Repeat the boundary sample.
    Edge,
}

impl FromStr for PadMode {
    type Err = AudioFeatureError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "constant" => Ok(PadMode::Constant),
            "reflect" => Ok(PadMode::Reflect),
            "wrap" => Ok(PadMode::Wrap),
            "edge" => Ok(PadMode::Edge),
            other => Err(AudioFeatureError::UnsupportedPadMode(other.to_string())),
        }
    }
}

/// Pads `signal` with `left` samples before and `right` samples after,
/// yielding a vector of length `signal.len() + left + right`.
///
/// # Errors
/// `InvalidParameter` when a non-constant mode is asked to pad an empty
/// signal (there is no boundary sample to extend).
pub fn pad(
    signal: &[f64],
    left: usize,
    right: usize,
    mode: PadMode,
) -> AudioFeatureResult<Vec<f64>> {
    if signal.is_empty() && (left > 0 || right > 0) && mode != PadMode::Constant {
        return Err(AudioFeatureError::InvalidParameter(
            "cannot pad an empty signal with a boundary-dependent mode".to_string(),
        ));
    }

    let len = signal.len();
    let mut padded = Vec::with_capacity(len + left + right);

    for i in 0..left {
        let pos = i as i64 - left as i64;
        padded.push(boundary_sample(signal, pos, mode));
    }
    padded.extend_from_slice(signal);
    for i in 0..right {
        let pos = (len + i) as i64;
        padded.push(boundary_sample(signal, pos, mode));
    }

    Ok(padded)
}

/// Resolves the sample value at a (possibly out-of-range) position `pos`.
fn boundary_sample(signal: &[f64], pos: i64, mode: PadMode) -> f64 {
    let len = signal.len() as i64;
    match mode {
        PadMode::Constant => 0.0,
        PadMode::Edge => {
            let clamped = pos.clamp(0, len - 1);
            signal[clamped as usize]
        }
        PadMode::Wrap => {
            let index = pos.rem_euclid(len);
            signal[index as usize]
        }
        PadMode::Reflect => signal[reflect_index(pos, signal.len())],
    }
}

/// Folds `pos` back into `0..len` by mirroring around both boundaries
/// without repeating the edge sample (period `2 * (len - 1)`).
fn reflect_index(pos: i64, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as i64 - 1);
    let mut folded = pos.rem_euclid(period);
    if folded >= len as i64 {
        folded = period - folded;
    }
    folded as usize
}
