//! Short-time spectral transforms: STFT, ISTFT and the DCT-II.
//!
//! The forward transform slices the (optionally centered) signal into
//! overlapping windowed frames and keeps the non-negative-frequency half of
//! each frame's spectrum. The inverse rebuilds the full Hermitian spectrum
//! per frame, overlap-adds the windowed inverse transforms, and divides by
//! the window-sum-square envelope so that STFT→ISTFT is a near-identity on
//! the interior of the signal for constant-overlap-add window/hop pairs.

use crate::fft::{FourierTransform, RustFftBackend};
use crate::pad::{PadMode, pad};
use crate::window::{WindowType, get_window};
use crate::{AudioFeatureError, AudioFeatureResult};
use ndarray::Array2;
use num_complex::Complex;
use std::f64::consts::PI;
use tracing::debug;

/// Envelope values at or below this threshold are left unnormalized to avoid
/// division blow-up where no analysis frame contributed meaningful energy.
const WINDOW_SUM_EPSILON: f64 = 1e-15;

/// Computes the Short-Time Fourier Transform of `signal`.
///
/// The analysis window of length `win_length` is zero-padded symmetrically to
/// `n_fft`, so short windows sit centered within the FFT frame. With `center`
/// the signal is zero-padded by `n_fft / 2` on each side so frame `t = 0` is
/// centered at sample 0.
///
/// Returns a complex spectrogram of shape `(n_fft / 2 + 1, n_frames)`; only
/// the non-negative-frequency half is stored since the input is real-valued.
///
/// # Errors
/// `InvalidParameter` on empty input, zero `n_fft`/`hop_length`/`win_length`,
/// `win_length > n_fft`, or an uncentered signal shorter than `n_fft`.
pub fn stft(
    signal: &[f64],
    n_fft: usize,
    hop_length: usize,
    window: WindowType,
    win_length: usize,
    center: bool,
) -> AudioFeatureResult<Array2<Complex<f64>>> {
    let mut backend = RustFftBackend::new();
    stft_with(&mut backend, signal, n_fft, hop_length, window, win_length, center)
}

/// [`stft`] with an injected FFT implementation.
pub fn stft_with(
    fft: &mut impl FourierTransform,
    signal: &[f64],
    n_fft: usize,
    hop_length: usize,
    window: WindowType,
    win_length: usize,
    center: bool,
) -> AudioFeatureResult<Array2<Complex<f64>>> {
    validate_dimensions(n_fft, hop_length, win_length)?;
    if signal.is_empty() {
        return Err(AudioFeatureError::InvalidParameter(
            "cannot transform a zero-length signal".to_string(),
        ));
    }
    if !center && signal.len() < n_fft {
        return Err(AudioFeatureError::InvalidParameter(format!(
            "uncentered signal of {} samples is shorter than n_fft {}",
            signal.len(),
            n_fft
        )));
    }

    let window = padded_window(window, win_length, n_fft)?;

    let padded;
    let data: &[f64] = if center {
        let padding = n_fft / 2;
        padded = pad(signal, padding, padding, PadMode::Constant)?;
        &padded
    } else {
        signal
    };

    let n_frames = if center {
        (data.len() - n_fft) / hop_length + 1
    } else {
        (data.len() - n_fft + hop_length) / hop_length
    };
    let fft_bins = n_fft / 2 + 1;
    debug!(n_fft, hop_length, n_frames, "computing stft");

    let mut matrix = Array2::zeros((fft_bins, n_frames));
    let mut frame = vec![Complex::new(0.0, 0.0); n_fft];

    for t in 0..n_frames {
        let start = t * hop_length;
        let available = n_fft.min(data.len().saturating_sub(start));

        // windowed frame, zero-filled past the signal end
        for i in 0..available {
            frame[i] = Complex::new(data[start + i] * window[i], 0.0);
        }
        for value in frame.iter_mut().skip(available) {
            *value = Complex::new(0.0, 0.0);
        }

        fft.forward(&mut frame)?;

        for (f, &value) in frame.iter().take(fft_bins).enumerate() {
            matrix[[f, t]] = value;
        }
    }

    Ok(matrix)
}

/// Reconstructs a time-domain signal from a spectrogram by overlap-add.
///
/// The spectrogram must hold the non-negative-frequency half of each frame
/// (`n_fft / 2 + 1` rows); the redundant conjugate half is rebuilt before the
/// inverse transform. With `center` the reconstruction strips the `n_fft / 2`
/// centering padding back off, returning
/// `hop_length * (n_frames - 1)` samples instead of
/// `n_fft + hop_length * (n_frames - 1)`.
///
/// Edge samples outside full frame coverage are expected to differ slightly
/// from the original signal; this is inherent to windowed overlap-add.
///
/// # Errors
/// `InvalidParameter` on empty spectrograms or zero dimensions,
/// `DimensionMismatch` when the bin axis doesn't match `n_fft / 2 + 1`.
pub fn istft(
    spectrogram: &Array2<Complex<f64>>,
    n_fft: usize,
    hop_length: usize,
    window: WindowType,
    win_length: usize,
    center: bool,
) -> AudioFeatureResult<Vec<f64>> {
    let mut backend = RustFftBackend::new();
    istft_with(&mut backend, spectrogram, n_fft, hop_length, window, win_length, center)
}

/// [`istft`] with an injected FFT implementation.
pub fn istft_with(
    fft: &mut impl FourierTransform,
    spectrogram: &Array2<Complex<f64>>,
    n_fft: usize,
    hop_length: usize,
    window: WindowType,
    win_length: usize,
    center: bool,
) -> AudioFeatureResult<Vec<f64>> {
    validate_dimensions(n_fft, hop_length, win_length)?;
    let (fft_bins, n_frames) = spectrogram.dim();
    if n_frames == 0 {
        return Err(AudioFeatureError::InvalidParameter(
            "cannot invert a spectrogram with no frames".to_string(),
        ));
    }
    if fft_bins != n_fft / 2 + 1 {
        return Err(AudioFeatureError::DimensionMismatch(format!(
            "spectrogram has {} bins, expected n_fft / 2 + 1 = {}",
            fft_bins,
            n_fft / 2 + 1
        )));
    }

    let window = padded_window(window, win_length, n_fft)?;

    let full_length = n_fft + hop_length * (n_frames - 1);
    let output_length = if center { full_length - n_fft } else { full_length };
    debug!(n_fft, hop_length, n_frames, output_length, "computing istft");

    let mut output = vec![0.0f64; output_length];
    let mut column = vec![Complex::new(0.0, 0.0); n_fft];
    let trim = if center { (n_fft / 2) as i64 } else { 0 };

    for t in 0..n_frames {
        // rebuild the full spectrum: conjugate-mirror the stored bins into the
        // redundant half; bin 0 and the Nyquist bin (when n_fft is even) are
        // their own mirror images and are not duplicated
        for f in 0..fft_bins {
            column[f] = spectrogram[[f, t]];
        }
        for f in 1..fft_bins {
            let mirrored = n_fft - f;
            if mirrored >= fft_bins {
                column[mirrored] = spectrogram[[f, t]].conj();
            }
        }

        fft.inverse(&mut column)?;

        let pos = (t * hop_length) as i64 - trim;
        for (i, value) in column.iter().enumerate() {
            let index = pos + i as i64;
            if index >= 0 && (index as usize) < output.len() {
                output[index as usize] += value.re * window[i];
            }
        }
    }

    let mut envelope = window_sum_square(&window, n_fft, hop_length, n_frames);
    if center {
        envelope.drain(..n_fft / 2);
    }

    for (value, &weight) in output.iter_mut().zip(envelope.iter()) {
        if weight > WINDOW_SUM_EPSILON {
            *value /= weight;
        }
    }

    Ok(output)
}

/// Computes the orthonormal Type-II DCT of each column of `input`.
///
/// Each length-`N` column is mirror-extended to `2N`, forward-transformed,
/// rotated by `exp(-i*pi*k / 2N)`, and scaled to the orthonormal convention
/// (`sqrt(1/N)/2` for coefficient 0, `sqrt(2/N)/2` for the rest, applied to
/// the doubled spectrum).
///
/// # Errors
/// `InvalidParameter` when `input` has no rows or no columns.
pub fn dct(input: &Array2<f64>) -> AudioFeatureResult<Array2<f64>> {
    let mut backend = RustFftBackend::new();
    dct_with(&mut backend, input)
}

/// [`dct`] with an injected FFT implementation.
pub fn dct_with(
    fft: &mut impl FourierTransform,
    input: &Array2<f64>,
) -> AudioFeatureResult<Array2<f64>> {
    let (rows, cols) = input.dim();
    if rows == 0 || cols == 0 {
        return Err(AudioFeatureError::InvalidParameter(
            "cannot transform an empty matrix".to_string(),
        ));
    }

    let mut result = Array2::zeros((rows, cols));
    let mut column = vec![0.0f64; rows];
    for c in 0..cols {
        for r in 0..rows {
            column[r] = input[[r, c]];
        }
        let transformed = dct_1d_with(fft, &column)?;
        for (r, value) in transformed.into_iter().enumerate() {
            result[[r, c]] = value;
        }
    }
    Ok(result)
}

/// Computes the orthonormal Type-II DCT of a single column.
///
/// # Errors
/// `InvalidParameter` on empty input.
pub fn dct_1d(input: &[f64]) -> AudioFeatureResult<Vec<f64>> {
    let mut backend = RustFftBackend::new();
    dct_1d_with(&mut backend, input)
}

/// [`dct_1d`] with an injected FFT implementation.
pub fn dct_1d_with(
    fft: &mut impl FourierTransform,
    input: &[f64],
) -> AudioFeatureResult<Vec<f64>> {
    let n = input.len();
    if n == 0 {
        return Err(AudioFeatureError::InvalidParameter(
            "cannot transform an empty column".to_string(),
        ));
    }

    // mirror-extend to [x0 .. xN-1, xN-1 .. x0]
    let mut extended = vec![Complex::new(0.0, 0.0); 2 * n];
    for (i, &value) in input.iter().enumerate() {
        extended[i] = Complex::new(value, 0.0);
        extended[2 * n - 1 - i] = Complex::new(value, 0.0);
    }

    fft.forward(&mut extended)?;

    let mut output = Vec::with_capacity(n);
    for (i, value) in extended.iter().take(n).enumerate() {
        let theta = PI * i as f64 / (2.0 * n as f64);
        let twiddle = Complex::new(theta.cos(), -theta.sin());
        output.push((value * twiddle).re);
    }

    output[0] *= (1.0 / n as f64).sqrt() / 2.0;
    let scale = (2.0 / n as f64).sqrt() / 2.0;
    for value in output.iter_mut().skip(1) {
        *value *= scale;
    }

    Ok(output)
}

/// Zero-pads the analysis window of `win_length` symmetrically to `n_fft`.
fn padded_window(
    window: WindowType,
    win_length: usize,
    n_fft: usize,
) -> AudioFeatureResult<Vec<f64>> {
    let weights = get_window(window, win_length, true)?;
    let left = (n_fft - win_length) / 2;
    let right = n_fft - win_length - left;
    pad(&weights, left, right, PadMode::Constant)
}

/// Sum-square envelope of a window at a given hop: for each output sample,
/// the total `window[i]^2` energy deposited there across all frames.
fn window_sum_square(window: &[f64], n_fft: usize, hop_length: usize, n_frames: usize) -> Vec<f64> {
    let length = n_fft + hop_length * (n_frames - 1);
    let mut sum = vec![0.0f64; length];

    for frame in 0..n_frames {
        let pos = frame * hop_length;
        for (i, &weight) in window.iter().enumerate() {
            if pos + i < length {
                sum[pos + i] += weight * weight;
            }
        }
    }

    sum
}

fn validate_dimensions(n_fft: usize, hop_length: usize, win_length: usize) -> AudioFeatureResult<()> {
    if n_fft == 0 || hop_length == 0 || win_length == 0 {
        return Err(AudioFeatureError::InvalidParameter(
            "n_fft, hop_length and win_length must be greater than 0".to_string(),
        ));
    }
    if win_length > n_fft {
        return Err(AudioFeatureError::InvalidParameter(format!(
            "win_length {win_length} exceeds n_fft {n_fft}"
        )));
    }
    Ok(())
}
