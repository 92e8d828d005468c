//! Deterministic test-signal generation.
//!
//! Small closed-form generators used by the test suite and available to
//! callers who need reference inputs for the transforms.

use std::f64::consts::PI;
use std::time::Duration;

/// Generates a sine wave.
///
/// # Arguments
/// * `frequency` - Frequency of the sine wave in Hz
/// * `duration` - Duration of the signal
/// * `sample_rate` - Sample rate in Hz
/// * `amplitude` - Peak amplitude of the wave
pub fn sine_wave(frequency: f64, duration: Duration, sample_rate: u32, amplitude: f64) -> Vec<f64> {
    let sample_rate_f = sample_rate as f64;
    let num_samples = (duration.as_secs_f64() * sample_rate_f) as usize;
    let two_pi_freq = 2.0 * PI * frequency;

    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate_f;
            amplitude * (two_pi_freq * t).sin()
        })
        .collect()
}

/// Generates a unit impulse of `length` samples with a single `amplitude`
/// spike at `position` (clamped to the final sample).
pub fn impulse(length: usize, position: usize, amplitude: f64) -> Vec<f64> {
    let mut signal = vec![0.0; length];
    if length > 0 {
        let index = position.min(length - 1);
        signal[index] = amplitude;
    }
    signal
}
