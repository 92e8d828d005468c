//! Error types and result utilities for audio feature extraction.

use thiserror::Error;

/// Convenience type alias for results that may contain AudioFeatureError
pub type AudioFeatureResult<T> = Result<T, AudioFeatureError>;

/// Error types that can occur during spectral analysis and feature extraction.
#[derive(Error, Debug)]
pub enum AudioFeatureError {
    /// Error that occurs when invalid parameters are provided to an operation.
    ///
    /// This includes cases like zero-length signals, non-positive FFT sizes,
    /// or a requested feature size exceeding the available coefficients.
    #[error("Invalid parameter error: {0}")]
    InvalidParameter(String),

    /// Error that occurs when array dimensions don't match expected values.
    ///
    /// This happens when a spectrogram's bin axis doesn't match the FFT size,
    /// a filterbank doesn't match the spectrogram it is applied to, etc.
    #[error("Dimension mismatch error: {0}")]
    DimensionMismatch(String),

    /// Error that occurs when an unknown window family name is requested.
    #[error("Unsupported window type: {0}")]
    UnsupportedWindowType(String),

    /// Error that occurs when an unknown padding mode name is requested.
    #[error("Unsupported pad mode: {0}")]
    UnsupportedPadMode(String),
}
