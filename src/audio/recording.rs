//! Offline rendering: run the generator without an audio device.
//!
//! Blocks are generated exactly as the live callback would request them,
//! so a glitch in the generator shows up in the rendered file too.

use std::path::Path;

use tracing::info;

use super::generator::ToneGenerator;
use crate::error::AudioError;
use crate::params::{tone_constants::CHANNELS, RecordingConfig, ToneConfig};

/// Outcome of an offline render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Frames written, including the trailing silence of the last block
    pub frames: u64,
    /// Generation calls made
    pub blocks: u64,
}

/// Render the session into interleaved stereo samples
pub fn render_to_vec(
    tone: &ToneConfig,
    recording: &RecordingConfig,
) -> Result<(Vec<f32>, RenderSummary), AudioError> {
    let mut samples = Vec::new();
    let summary = render_blocks(tone, recording, |block| {
        samples.extend_from_slice(block);
        Ok(())
    })?;
    Ok((samples, summary))
}

/// Render the session into a 32-bit float stereo WAV file
pub fn render_to_wav(
    tone: &ToneConfig,
    recording: &RecordingConfig,
) -> Result<RenderSummary, AudioError> {
    let spec = hound::WavSpec {
        channels: CHANNELS as u16,
        sample_rate: tone.sample_rate_hz,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&recording.output_path, spec)?;

    let summary = render_blocks(tone, recording, |block| {
        for &sample in block {
            writer.write_sample(sample)?;
        }
        Ok(())
    })?;
    writer.finalize()?;

    info!(
        "Rendered {} frames ({} blocks) to {}",
        summary.frames,
        summary.blocks,
        recording.output_path.display()
    );

    Ok(summary)
}

/// Read back an interleaved float WAV written by [`render_to_wav`]
pub fn read_wav(path: impl AsRef<Path>) -> Result<(Vec<f32>, hound::WavSpec), AudioError> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let samples = reader.into_samples::<f32>().collect::<Result<Vec<_>, _>>()?;
    Ok((samples, spec))
}

/// Generate `buffer_frames` blocks until the fade-out completes
fn render_blocks<F>(
    tone: &ToneConfig,
    recording: &RecordingConfig,
    mut sink: F,
) -> Result<RenderSummary, AudioError>
where
    F: FnMut(&[f32]) -> Result<(), AudioError>,
{
    tone.validate()?;
    recording.validate()?;

    let mut generator = ToneGenerator::new(tone);
    let fade_out = generator.fade_out_handle();
    let fade_out_at = recording.frames_before_fade_out(tone.sample_rate_hz);

    let mut buffer = vec![0.0f32; tone.buffer_frames as usize * CHANNELS];
    let mut summary = RenderSummary {
        frames: 0,
        blocks: 0,
    };

    loop {
        if summary.frames >= fade_out_at {
            fade_out.request();
        }

        let status = generator.generate(&mut buffer);
        sink(&buffer)?;

        summary.frames += u64::from(tone.buffer_frames);
        summary.blocks += 1;

        if status.is_complete() {
            return Ok(summary);
        }
    }
}
