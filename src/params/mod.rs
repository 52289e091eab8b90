//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (Hz, frames, seconds)
//! - Documented ranges and meanings
//! - A `validate()` step before anything touches the audio device

mod recording;
mod tone;

// Re-export all types
pub use recording::RecordingConfig;
pub use tone::{tone_constants, ConfigError, ToneConfig};
