//! Sinewave - stream a sine tone to reproduce output glitches
//!
//! Lists output devices, opens a low-latency stereo float stream on the
//! chosen one and plays an 80 Hz tone until ENTER is pressed, then fades
//! out and closes the stream.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use sinewave::audio::{
    self, analysis::GlitchReport, default_device_id, list_output_devices, select_host,
    select_output_device, ToneStream,
};
use sinewave::cli::{Args, ANALYSIS_FFT_SIZE};
use sinewave::error::AudioError;
use sinewave::params::{RecordingConfig, ToneConfig};

/// Extra wait on top of the fade window before giving up on completion
const COMPLETION_GRACE: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let tone = args.tone_config();
    tone.validate().context("Invalid tone settings")?;

    if let Some(recording) = args.create_recording_config() {
        return render(&tone, &recording, args.analyze);
    }

    let host = select_host(args.host.as_deref())?;
    println!("Audio host: {}", host.id().name());

    if args.list {
        for device in list_output_devices(&host)? {
            let marker = if device.is_default_output { " (default)" } else { "" };
            println!("    {} = [{}]{}", device.id, device.name, marker);
        }
        return Ok(());
    }

    let device = match args.device {
        Some(id) => {
            let device = select_output_device(&host, Some(id))?;
            println!("Device {} = [{}]", id, device_name(&device));
            device
        }
        None => {
            let devices = list_output_devices(&host)?;
            for device in &devices {
                println!("    {} = [{}]", device.id, device.name);
            }
            let id = default_device_id(&devices).ok_or(AudioError::NoDefaultOutputDevice)?;
            println!("Found default output device ID = {}", id);
            select_output_device(&host, Some(id))?
        }
    };

    play(&device, &tone)
}

/// Stream until ENTER, then fade out and close
fn play(device: &cpal::Device, tone: &ToneConfig) -> Result<()> {
    let stream = ToneStream::open(device, tone)?;

    println!("Generating audio. Press ENTER to quit.");
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    stream.request_fade_out();

    let buffer_period =
        Duration::from_secs_f64(f64::from(tone.buffer_frames) / f64::from(tone.sample_rate_hz));
    let timeout = Duration::from_secs_f32(tone.fade_duration_secs()) + buffer_period + COMPLETION_GRACE;
    if !stream.wait_for_completion(timeout) {
        warn!("Fade-out did not complete within {:?}, closing anyway", timeout);
    }

    let stats = stream.close();
    info!(
        "{} callbacks, {} frames, {}..{} frames per callback",
        stats.callbacks, stats.frames, stats.min_callback_frames, stats.max_callback_frames
    );
    if stats.has_irregular_buffers() {
        warn!(
            "Backend delivered irregular buffer sizes (requested {} frames)",
            tone.buffer_frames
        );
    }

    Ok(())
}

/// Offline render, optionally followed by glitch analysis
fn render(tone: &ToneConfig, recording: &RecordingConfig, analyze: bool) -> Result<()> {
    let summary = audio::render_to_wav(tone, recording)?;
    println!(
        "Wrote {} frames to {}",
        summary.frames,
        recording.output_path.display()
    );

    if analyze {
        let (samples, spec) = audio::read_wav(&recording.output_path)?;
        let analyzed = ToneConfig {
            sample_rate_hz: spec.sample_rate,
            ..tone.clone()
        };
        let report = GlitchReport::analyze(&samples, &analyzed, ANALYSIS_FFT_SIZE);

        match report.dominant_frequency_hz {
            Some(hz) => println!(
                "Dominant frequency: {:.1} Hz (±{:.1} Hz)",
                hz, report.resolution_hz
            ),
            None => println!(
                "Dominant frequency: not enough samples for a {}-point FFT",
                ANALYSIS_FFT_SIZE
            ),
        }

        if report.is_clean() {
            println!("No discontinuities found");
        } else {
            println!(
                "{} discontinuities, first at frame {}",
                report.discontinuities.len(),
                report.discontinuities[0]
            );
        }
    }

    Ok(())
}

fn device_name(device: &cpal::Device) -> String {
    use cpal::traits::DeviceTrait;
    device.name().unwrap_or_else(|_| "Unknown".to_string())
}
