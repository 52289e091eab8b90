//! Glitch analysis of rendered output.
//!
//! A clean tone has one spectral peak at the configured frequency and a
//! bounded sample-to-sample step. Clicks show up as steps beyond that bound.

use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;

use crate::params::{tone_constants::CHANNELS, ToneConfig};

/// Slack on top of the ideal step bound, absorbs rounding and drift
const STEP_TOLERANCE: f32 = 1e-3;

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Left channel of an interleaved stereo buffer
pub fn left_channel(interleaved: &[f32]) -> Vec<f32> {
    interleaved.iter().step_by(CHANNELS).copied().collect()
}

/// Strongest frequency (Hz) in the first `fft_size` samples
///
/// Returns `None` if there are too few samples or `fft_size` is not a power
/// of two.
pub fn dominant_frequency(samples: &[f32], sample_rate_hz: u32, fft_size: usize) -> Option<f32> {
    if !fft_size.is_power_of_two() || fft_size < 2 || samples.len() < fft_size {
        return None;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);

    // Apply Hann window
    let mut spectrum: Vec<Complex<f32>> = samples[..fft_size]
        .iter()
        .enumerate()
        .map(|(i, &s)| Complex::new(s * hann_window(i, fft_size), 0.0))
        .collect();

    fft.process(&mut spectrum);

    // Skip DC, search up to Nyquist
    let peak_bin = spectrum[1..fft_size / 2]
        .iter()
        .enumerate()
        .max_by(|(_, x), (_, y)| x.norm().total_cmp(&y.norm()))
        .map(|(i, _)| i + 1)?;

    Some(peak_bin as f32 * sample_rate_hz as f32 / fft_size as f32)
}

/// Largest step between consecutive samples of a unit sine under a linear
/// fade of `fade_frames` (0 = no fade)
pub fn expected_max_step(sample_rate_hz: u32, frequency_hz: f32, fade_frames: u32) -> f32 {
    let ramp = if fade_frames == 0 {
        0.0
    } else {
        1.0 / fade_frames as f32
    };
    2.0 * (PI * frequency_hz / sample_rate_hz as f32).sin() + ramp + STEP_TOLERANCE
}

/// Frame indices where the left channel jumps by more than `max_step`
pub fn find_discontinuities(interleaved: &[f32], max_step: f32) -> Vec<usize> {
    let left = left_channel(interleaved);
    left.windows(2)
        .enumerate()
        .filter(|(_, pair)| (pair[1] - pair[0]).abs() > max_step)
        .map(|(i, _)| i + 1)
        .collect()
}

/// Summary printed after an offline render
#[derive(Debug, Clone, PartialEq)]
pub struct GlitchReport {
    pub dominant_frequency_hz: Option<f32>,
    /// FFT bin width (Hz)
    pub resolution_hz: f32,
    pub discontinuities: Vec<usize>,
}

impl GlitchReport {
    pub fn analyze(interleaved: &[f32], tone: &ToneConfig, fft_size: usize) -> Self {
        let left = left_channel(interleaved);
        let max_step = expected_max_step(tone.sample_rate_hz, tone.frequency_hz, tone.fade_frames);
        Self {
            dominant_frequency_hz: dominant_frequency(&left, tone.sample_rate_hz, fft_size),
            resolution_hz: tone.sample_rate_hz as f32 / fft_size as f32,
            discontinuities: find_discontinuities(interleaved, max_step),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.discontinuities.is_empty()
    }
}
