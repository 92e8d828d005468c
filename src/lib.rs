// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![deny(missing_docs)] // Documentation is a must for release

//! # audio_features
//!
//! Deterministic spectral analysis and perceptually-motivated feature
//! extraction for audio/ML pipelines: windowed STFT/ISTFT with centered
//! framing and overlap-add reconstruction, mel filterbanks (HTK and Slaney
//! conventions), the orthonormal DCT-II, and mel-spectrogram / MFCC
//! extractors built on top of them.
//!
//! The crate is a pure computational library: every operation is a
//! synchronous function over immutable inputs producing new `ndarray`
//! matrices, with no I/O, shared state, or concurrency.
//!
//! ## Quick Start
//!
//! ```rust
//! use audio_features::{FeatureConfig, mel_spectrogram, mfcc, sine_wave};
//! use std::time::Duration;
//!
//! # fn example() -> audio_features::AudioFeatureResult<()> {
//! let signal = sine_wave(440.0, Duration::from_secs(1), 16_000, 1.0);
//!
//! let config = FeatureConfig::new(16_000, 1024, 256, 40);
//! let mel = mel_spectrogram(&config, &signal)?;
//! assert_eq!(mel.nrows(), 40);
//!
//! let mfcc_config = FeatureConfig::new(16_000, 1024, 256, 13);
//! let coefficients = mfcc(&mfcc_config, &signal)?;
//! assert_eq!(coefficients.nrows(), 13);
//! # Ok(())
//! # }
//! ```
//!
//! ## Transforms
//!
//! The lower-level surface is exported directly: [`stft`]/[`istft`] for the
//! time-frequency analysis pair, [`mel`]/[`apply_mel_filters`] for filterbank
//! construction and application, [`dct`] for the cepstral transform, and the
//! scalar conversion helpers in [`convert`]. Transforms that consume an FFT
//! accept any [`FourierTransform`] implementation through their `*_with`
//! variants; [`RustFftBackend`] is the default.
//!
//! ## Error Handling
//!
//! All fallible operations return [`AudioFeatureResult`]. Failures are
//! detected at the boundary of the offending component and surfaced
//! immediately; there is no partial-result or degraded-mode behavior.

pub mod convert;
pub mod error;
pub mod feature;
pub mod fft;
pub mod filters;
pub mod generation;
pub mod pad;
pub mod spectrum;
pub mod window;

pub use error::{AudioFeatureError, AudioFeatureResult};
pub use feature::{FeatureConfig, mel_spectrogram, mfcc};
pub use fft::{FourierTransform, RustFftBackend};
pub use filters::{apply_mel_filters, fft_frequencies, mel, mel_frequencies};
pub use generation::{impulse, sine_wave};
pub use pad::{PadMode, pad};
pub use spectrum::{dct, dct_1d, istft, stft};
pub use window::{WindowType, get_window};

use num_traits::{Float, FloatConst, NumCast};

/// Marker trait for real floating-point types (f32, f64)
pub trait RealFloat: Float + FloatConst + NumCast {}

impl RealFloat for f32 {}
impl RealFloat for f64 {}

/// Casts a numeric value into the target floating-point type `F`.
///
/// Abstracts over floating-point precision in generic code where the target
/// type `F: RealFloat` may vary, avoiding explicit `as` conversions. If `F`
/// and `T` are the same type the cast is a compile-time no-op.
///
/// # Panics
/// Panics if the numeric conversion fails (out-of-range or non-finite
/// values that the target type cannot represent).
#[inline(always)]
pub fn to_precision<F, T>(value: T) -> F
where
    F: RealFloat,
    T: NumCast,
{
    NumCast::from(value).expect("to_precision: valid numeric conversion")
}
