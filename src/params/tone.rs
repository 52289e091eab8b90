//! Tone synthesis configuration and constants.

/// Tone constants (compile-time)
pub mod tone_constants {
    /// Interleaved output channels (left, right)
    pub const CHANNELS: usize = 2;

    /// Default sample rate (Hz)
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 44_100;

    /// Default tone frequency (Hz), low enough to make clicks obvious
    pub const DEFAULT_FREQUENCY_HZ: f32 = 80.0;

    /// Default fade window (frames)
    /// 110 frames ≈ 2.5ms @ 44.1kHz
    pub const DEFAULT_FADE_FRAMES: u32 = 110;

    /// Default callback buffer size (frames)
    /// 256 frames ≈ 5.8ms @ 44.1kHz
    pub const DEFAULT_BUFFER_FRAMES: u32 = 256;
}

use tone_constants::*;

/// Invalid tone or recording configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Sample rate must be > 0")]
    ZeroSampleRate,

    #[error("Frequency must be in (0, {nyquist_hz}) Hz, got {frequency_hz}")]
    FrequencyOutOfRange { frequency_hz: f32, nyquist_hz: f32 },

    #[error("Buffer size must be > 0 frames")]
    ZeroBufferFrames,

    #[error("Render duration must be a finite, non-negative number of seconds, got {0}")]
    InvalidDuration(f32),
}

/// Sine tone configuration
#[derive(Debug, Clone)]
pub struct ToneConfig {
    /// Output sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Tone frequency (Hz), must stay below Nyquist
    pub frequency_hz: f32,

    /// Linear fade-in/fade-out window (frames)
    /// 0 disables fading: full scale at once, immediate stop
    pub fade_frames: u32,

    /// Frames requested per callback
    pub buffer_frames: u32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            fade_frames: DEFAULT_FADE_FRAMES,
            buffer_frames: DEFAULT_BUFFER_FRAMES,
        }
    }
}

impl ToneConfig {
    /// Nyquist frequency (Hz)
    pub fn nyquist_hz(&self) -> f32 {
        self.sample_rate_hz as f32 / 2.0
    }

    /// Fade window duration (seconds)
    pub fn fade_duration_secs(&self) -> f32 {
        self.fade_frames as f32 / self.sample_rate_hz as f32
    }

    /// Validate configuration (non-zero rate and buffer, frequency below Nyquist)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        let nyquist_hz = self.nyquist_hz();
        if !(self.frequency_hz > 0.0 && self.frequency_hz < nyquist_hz) {
            return Err(ConfigError::FrequencyOutOfRange {
                frequency_hz: self.frequency_hz,
                nyquist_hz,
            });
        }
        if self.buffer_frames == 0 {
            return Err(ConfigError::ZeroBufferFrames);
        }
        Ok(())
    }
}
