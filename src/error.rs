//! Error types for the device and stream layer.

use crate::params::ConfigError;

/// Errors raised while selecting a device, opening a stream or writing audio
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown audio host '{name}' (available: {available})")]
    UnknownHost { name: String, available: String },

    #[error("Audio host unavailable: {0}")]
    HostUnavailable(#[from] cpal::HostUnavailable),

    #[error("Could not find default output device")]
    NoDefaultOutputDevice,

    #[error("Unknown device ID {0}")]
    UnknownDevice(usize),

    #[error("Failed to enumerate devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("Failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("WAV output failed: {0}")]
    Wav(#[from] hound::Error),
}
