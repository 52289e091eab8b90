//! Offline render configuration.

use std::path::PathBuf;

use super::ConfigError;

/// Offline render (WAV) configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Steady-state duration before the fade-out is requested (seconds)
    pub duration_secs: f32,

    /// Output WAV path
    pub output_path: PathBuf,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32, output_path: impl Into<PathBuf>) -> Self {
        Self {
            duration_secs,
            output_path: output_path.into(),
        }
    }

    /// Frames to render before requesting fade-out, rounded to the nearest frame
    pub fn frames_before_fade_out(&self, sample_rate_hz: u32) -> u64 {
        (f64::from(self.duration_secs) * f64::from(sample_rate_hz)).round() as u64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            return Err(ConfigError::InvalidDuration(self.duration_secs));
        }
        Ok(())
    }
}
