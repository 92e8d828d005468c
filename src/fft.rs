//! Discrete Fourier transform capability used by the spectral transforms.
//!
//! The STFT/ISTFT/DCT implementations never talk to an FFT library directly;
//! they are written against the [`FourierTransform`] trait so any FFT
//! implementation can be substituted without touching the transform logic.
//! [`RustFftBackend`] is the default implementation, backed by `rustfft` with
//! per-size plan caching.

use crate::{AudioFeatureError, AudioFeatureResult};
use rustfft::{Fft, FftPlanner, num_complex::Complex};
use std::collections::HashMap;
use std::sync::Arc;

/// Forward/inverse discrete Fourier transform over complex buffers.
///
/// Implementations transform `buffer` in place. The inverse transform is
/// expected to include the `1/N` normalization so that
/// `inverse(forward(x)) == x` up to floating-point rounding.
pub trait FourierTransform {
    /// Computes the forward DFT of `buffer` in place.
    fn forward(&mut self, buffer: &mut [Complex<f64>]) -> AudioFeatureResult<()>;

    /// Computes the normalized inverse DFT of `buffer` in place.
    fn inverse(&mut self, buffer: &mut [Complex<f64>]) -> AudioFeatureResult<()>;
}

/// Default [`FourierTransform`] backed by `rustfft`.
///
/// Plans are cached per transform size, so repeated frame-wise calls (the STFT
/// hot path) reuse the same plan.
pub struct RustFftBackend {
    planner: FftPlanner<f64>,
    forward_plans: HashMap<usize, Arc<dyn Fft<f64>>>,
    inverse_plans: HashMap<usize, Arc<dyn Fft<f64>>>,
}

impl RustFftBackend {
    /// Creates a backend with an empty plan cache.
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            forward_plans: HashMap::new(),
            inverse_plans: HashMap::new(),
        }
    }

    fn forward_plan(&mut self, size: usize) -> Arc<dyn Fft<f64>> {
        if let Some(plan) = self.forward_plans.get(&size) {
            plan.clone()
        } else {
            let plan = self.planner.plan_fft_forward(size);
            self.forward_plans.insert(size, plan.clone());
            plan
        }
    }

    fn inverse_plan(&mut self, size: usize) -> Arc<dyn Fft<f64>> {
        if let Some(plan) = self.inverse_plans.get(&size) {
            plan.clone()
        } else {
            let plan = self.planner.plan_fft_inverse(size);
            self.inverse_plans.insert(size, plan.clone());
            plan
        }
    }
}

impl Default for RustFftBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FourierTransform for RustFftBackend {
    fn forward(&mut self, buffer: &mut [Complex<f64>]) -> AudioFeatureResult<()> {
        if buffer.is_empty() {
            return Err(AudioFeatureError::InvalidParameter(
                "FFT input must not be empty".to_string(),
            ));
        }
        self.forward_plan(buffer.len()).process(buffer);
        Ok(())
    }

    fn inverse(&mut self, buffer: &mut [Complex<f64>]) -> AudioFeatureResult<()> {
        if buffer.is_empty() {
            return Err(AudioFeatureError::InvalidParameter(
                "FFT input must not be empty".to_string(),
            ));
        }
        let len = buffer.len();
        self.inverse_plan(len).process(buffer);
        // rustfft leaves the inverse unnormalized
        let scale = 1.0 / len as f64;
        for value in buffer.iter_mut() {
            *value *= scale;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_impulse_is_flat() {
        let mut backend = RustFftBackend::new();
        let mut buffer = vec![Complex::new(0.0, 0.0); 8];
        buffer[0] = Complex::new(1.0, 0.0);

        backend.forward(&mut buffer).unwrap();

        for value in &buffer {
            assert!((value.re - 1.0).abs() < 1e-12);
            assert!(value.im.abs() < 1e-12);
        }
    }

    #[test]
    fn test_forward_inverse_round_trip() {
        let mut backend = RustFftBackend::new();
        let original: Vec<Complex<f64>> = (0..16)
            .map(|i| Complex::new((i as f64 * 0.7).sin(), (i as f64 * 0.3).cos()))
            .collect();
        let mut buffer = original.clone();

        backend.forward(&mut buffer).unwrap();
        backend.inverse(&mut buffer).unwrap();

        for (restored, expected) in buffer.iter().zip(original.iter()) {
            assert!((restored.re - expected.re).abs() < 1e-12);
            assert!((restored.im - expected.im).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let mut backend = RustFftBackend::new();
        let mut buffer: Vec<Complex<f64>> = Vec::new();
        assert!(backend.forward(&mut buffer).is_err());
        assert!(backend.inverse(&mut buffer).is_err());
    }
}
