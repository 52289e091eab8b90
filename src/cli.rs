//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{tone_constants::*, RecordingConfig, ToneConfig};

/// FFT size used by `--analyze`
pub const ANALYSIS_FFT_SIZE: usize = 8192;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "sinewave")]
#[command(about = "Sine tone generator for reproducing audio output glitches", long_about = None)]
pub struct Args {
    /// Output device ID (see --list); the default output device if omitted
    #[arg(value_name = "DEVICE_ID")]
    pub device: Option<usize>,

    /// Audio host to use (e.g. ALSA, JACK); the platform default if omitted
    #[arg(long, value_name = "NAME")]
    pub host: Option<String>,

    /// List output devices and exit
    #[arg(long)]
    pub list: bool,

    /// Tone frequency (Hz)
    #[arg(long, value_name = "HZ", default_value_t = DEFAULT_FREQUENCY_HZ)]
    pub frequency: f32,

    /// Output sample rate (Hz)
    #[arg(long, value_name = "HZ", default_value_t = DEFAULT_SAMPLE_RATE_HZ)]
    pub sample_rate: u32,

    /// Frames per callback buffer
    #[arg(long, value_name = "FRAMES", default_value_t = DEFAULT_BUFFER_FRAMES)]
    pub buffer_frames: u32,

    /// Fade-in/fade-out window (frames, 0 disables fading)
    #[arg(long, value_name = "FRAMES", default_value_t = DEFAULT_FADE_FRAMES)]
    pub fade_frames: u32,

    /// Render offline to a WAV file instead of streaming (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub render: Option<f32>,

    /// WAV path for --render
    #[arg(long, value_name = "PATH", default_value = "sinewave.wav")]
    pub output: PathBuf,

    /// Check the rendered output for clicks and report its frequency
    #[arg(long, requires = "render")]
    pub analyze: bool,
}

impl Args {
    /// Tone configuration from command-line overrides
    pub fn tone_config(&self) -> ToneConfig {
        ToneConfig {
            sample_rate_hz: self.sample_rate,
            frequency_hz: self.frequency,
            fade_frames: self.fade_frames,
            buffer_frames: self.buffer_frames,
        }
    }

    /// Create recording configuration if offline rendering is enabled
    pub fn create_recording_config(&self) -> Option<RecordingConfig> {
        self.render
            .map(|duration| RecordingConfig::new(duration, self.output.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tone_config() {
        let args = Args::try_parse_from(["sinewave"]).unwrap();
        let tone = args.tone_config();
        let defaults = ToneConfig::default();

        assert_eq!(args.device, None);
        assert_eq!(tone.sample_rate_hz, defaults.sample_rate_hz);
        assert_eq!(tone.frequency_hz, defaults.frequency_hz);
        assert_eq!(tone.fade_frames, defaults.fade_frames);
        assert_eq!(tone.buffer_frames, defaults.buffer_frames);
        assert!(args.create_recording_config().is_none());
    }

    #[test]
    fn test_device_id_and_overrides() {
        let args = Args::try_parse_from([
            "sinewave",
            "3",
            "--frequency",
            "440",
            "--fade-frames",
            "0",
            "--host",
            "jack",
        ])
        .unwrap();

        assert_eq!(args.device, Some(3));
        assert_eq!(args.host.as_deref(), Some("jack"));
        assert_eq!(args.tone_config().frequency_hz, 440.0);
        assert_eq!(args.tone_config().fade_frames, 0);
    }

    #[test]
    fn test_invalid_device_id_is_rejected() {
        assert!(Args::try_parse_from(["sinewave", "speakers"]).is_err());
    }

    #[test]
    fn test_render_options() {
        let args =
            Args::try_parse_from(["sinewave", "--render", "2.5", "--output", "out.wav", "--analyze"])
                .unwrap();
        let recording = args.create_recording_config().unwrap();
        assert_eq!(recording.duration_secs, 2.5);
        assert_eq!(recording.output_path, PathBuf::from("out.wav"));
        assert!(args.analyze);

        // --analyze needs --render
        assert!(Args::try_parse_from(["sinewave", "--analyze"]).is_err());
    }
}
