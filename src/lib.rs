//! Sinewave - audio glitch reproduction tool
//!
//! Streams a phasor-generated sine tone with click-free fades to an output
//! device, or renders the same session offline for analysis.

pub mod audio;
pub mod cli;
pub mod error;
pub mod params;
