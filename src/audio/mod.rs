//! Sine tone synthesis, device plumbing and offline analysis.
//!
//! The phasor oscillator and fade envelope form the real-time core; the
//! remaining modules wire them to a cpal output stream or to a WAV file.

pub mod analysis;
mod device;
mod fade;
mod generator;
mod oscillator;
mod recording;
mod system;

// Re-export public types
pub use device::{
    available_host_names, default_device_id, list_output_devices, select_host,
    select_output_device, DeviceInfo,
};
pub use fade::{FadeController, FadePhase};
pub use generator::{FadeOutRequest, GenerateStatus, ToneGenerator};
pub use oscillator::PhasorOscillator;
pub use recording::{read_wav, render_to_vec, render_to_wav, RenderSummary};
pub use system::{select_buffer_size, StreamStats, ToneStream};
