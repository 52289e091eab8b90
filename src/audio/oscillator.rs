//! Phasor oscillator.
//!
//! A unit complex number rotated by a fixed angle per sample. The real part
//! feeds the left channel (cosine), the imaginary part the right (sine).
//! Magnitude drift is not renormalized.

use crate::params::tone_constants::CHANNELS;

/// Sine/cosine generator driven by complex rotation
#[derive(Debug, Clone)]
pub struct PhasorOscillator {
    /// Real component of the phasor
    a: f32,
    /// Imaginary component of the phasor
    b: f32,
    /// Cosine of the angle increment
    c: f32,
    /// Sine of the angle increment
    s: f32,
}

impl PhasorOscillator {
    /// Create an oscillator at phase 0 (phasor = 1 + 0i)
    pub fn new(sample_rate_hz: u32, frequency_hz: f32) -> Self {
        let radians = f64::from(frequency_hz) * std::f64::consts::TAU / f64::from(sample_rate_hz);
        Self {
            a: 1.0,
            b: 0.0,
            c: radians.cos() as f32,
            s: radians.sin() as f32,
        }
    }

    /// Emit the current (left, right) pair, then rotate
    #[inline]
    pub fn next_frame(&mut self) -> (f32, f32) {
        let frame = (self.a, self.b);
        let t = self.a * self.c - self.b * self.s;
        self.b = self.a * self.s + self.b * self.c;
        self.a = t;
        frame
    }

    /// Fill an interleaved stereo buffer, one frame per channel pair
    pub fn fill(&mut self, buffer: &mut [f32]) {
        for frame in buffer.chunks_exact_mut(CHANNELS) {
            let (left, right) = self.next_frame();
            frame[0] = left;
            frame[1] = right;
        }
    }

    /// Current phasor (real, imaginary)
    pub fn phase(&self) -> (f32, f32) {
        (self.a, self.b)
    }

    /// Rotation applied per sample (radians)
    pub fn phase_increment(&self) -> f32 {
        self.s.atan2(self.c)
    }
}
