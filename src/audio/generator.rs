//! Tone generator: phasor oscillator shaped by the fade envelope.
//!
//! The generator is owned by the audio callback. The only state shared with
//! other threads is the fade-out request flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::fade::{FadeController, FadePhase};
use super::oscillator::PhasorOscillator;
use crate::params::{tone_constants::CHANNELS, ToneConfig};

/// Result of one generation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateStatus {
    /// Keep the stream running
    Continue,
    /// Fade-out finished, the buffer ends in silence
    Complete,
}

impl GenerateStatus {
    /// Callback return code: 0 to continue, non-zero when complete
    pub fn code(self) -> i32 {
        match self {
            Self::Continue => 0,
            Self::Complete => 1,
        }
    }

    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }
}

/// Cross-thread "start fade-out" signal
#[derive(Debug, Clone, Default)]
pub struct FadeOutRequest(Arc<AtomicBool>);

impl FadeOutRequest {
    /// Request the fade-out. Repeated calls have no further effect.
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Owned oscillator + fade state for one stream session
#[derive(Debug)]
pub struct ToneGenerator {
    oscillator: PhasorOscillator,
    fade: FadeController,
    fade_out: FadeOutRequest,
}

impl ToneGenerator {
    pub fn new(config: &ToneConfig) -> Self {
        Self {
            oscillator: PhasorOscillator::new(config.sample_rate_hz, config.frequency_hz),
            fade: FadeController::new(config.fade_frames),
            fade_out: FadeOutRequest::default(),
        }
    }

    /// Handle for requesting the fade-out from another thread
    pub fn fade_out_handle(&self) -> FadeOutRequest {
        self.fade_out.clone()
    }

    /// Fill `buffer` with `buffer.len() / 2` interleaved stereo frames.
    ///
    /// Runs on the real-time audio thread: it must not block, allocate or
    /// log, and must finish within one buffer period. The fade-out request is
    /// sampled once, before the first frame.
    ///
    /// Returns [`GenerateStatus::Complete`] once the fade-out has reached
    /// zero. Completion is terminal: every later call writes silence and
    /// returns `Complete` again, so callers that act on the first completion
    /// must latch it themselves.
    pub fn generate(&mut self, buffer: &mut [f32]) -> GenerateStatus {
        if !self.fade.is_fade_out_requested() && self.fade_out.is_requested() {
            self.fade.begin_fade_out();
        }

        for frame in buffer.chunks_exact_mut(CHANNELS) {
            let gain = self.fade.next_gain();
            let (left, right) = self.oscillator.next_frame();
            frame[0] = left * gain;
            frame[1] = right * gain;
        }

        if self.fade.is_complete() {
            GenerateStatus::Complete
        } else {
            GenerateStatus::Continue
        }
    }

    pub fn phase(&self) -> FadePhase {
        self.fade.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(fade_frames: u32) -> ToneConfig {
        ToneConfig {
            fade_frames,
            ..Default::default()
        }
    }

    /// Gain applied to frame `i`, recovered against an unfaded oscillator
    fn gains(buffer: &[f32], reference: &mut PhasorOscillator) -> Vec<f32> {
        buffer
            .chunks_exact(2)
            .map(|frame| {
                let (a, b) = reference.next_frame();
                // a² + b² ≈ 1, so projecting onto the phasor recovers the gain
                frame[0] * a + frame[1] * b
            })
            .collect()
    }

    #[test]
    fn test_fade_in_scales_first_window() {
        let cfg = config(110);
        let mut generator = ToneGenerator::new(&cfg);
        let mut reference = PhasorOscillator::new(cfg.sample_rate_hz, cfg.frequency_hz);

        let mut buffer = vec![0.0; 2 * 200];
        assert_eq!(generator.generate(&mut buffer), GenerateStatus::Continue);

        let gains = gains(&buffer, &mut reference);
        for (i, gain) in gains.iter().enumerate().take(110) {
            assert!((gain - i as f32 / 110.0).abs() < 1e-4, "frame {}: {}", i, gain);
        }
        for gain in &gains[110..] {
            assert!((gain - 1.0).abs() < 1e-4);
        }
        assert_eq!(generator.phase(), FadePhase::Steady);
    }

    #[test]
    fn test_fade_out_scenario_150_frames() {
        let cfg = config(110);
        let mut generator = ToneGenerator::new(&cfg);
        let mut reference = PhasorOscillator::new(cfg.sample_rate_hz, cfg.frequency_hz);

        // Get past the fade-in
        let mut warmup = vec![0.0; 2 * 256];
        generator.generate(&mut warmup);
        gains(&warmup, &mut reference);

        generator.fade_out_handle().request();

        let mut buffer = vec![1.0; 2 * 150];
        assert_eq!(generator.generate(&mut buffer), GenerateStatus::Complete);

        let gains = gains(&buffer, &mut reference);
        for (k, gain) in gains.iter().enumerate().take(110) {
            let expected = (110 - k) as f32 / 110.0;
            assert!((gain - expected).abs() < 1e-4, "frame {}: {}", k, gain);
        }
        for frame in buffer[2 * 110..].chunks_exact(2) {
            assert_eq!(frame, [0.0, 0.0]);
        }
        assert_eq!(generator.phase(), FadePhase::Complete);
    }

    #[test]
    fn test_completion_reported_on_the_call_reaching_zero() {
        let mut generator = ToneGenerator::new(&config(110));
        let mut steady = vec![0.0; 2 * 128];
        generator.generate(&mut steady);

        generator.fade_out_handle().request();

        // 100 of the 110 fade-out frames
        let mut first = vec![0.0; 2 * 100];
        assert_eq!(generator.generate(&mut first), GenerateStatus::Continue);

        // Remaining 10 frames land in this call
        let mut second = vec![0.0; 2 * 64];
        let status = generator.generate(&mut second);
        assert!(status.is_complete());
        assert_eq!(status.code(), 1);
        assert!(second[2 * 10..].iter().all(|&s| s == 0.0));

        // Terminal
        let mut third = vec![1.0; 2 * 64];
        assert_eq!(generator.generate(&mut third), GenerateStatus::Complete);
        assert!(third.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_repeated_request_does_not_extend_fade() {
        let mut generator = ToneGenerator::new(&config(110));
        let handle = generator.fade_out_handle();

        let mut buffer = vec![0.0; 2 * 128];
        generator.generate(&mut buffer);

        handle.request();
        let mut first = vec![0.0; 2 * 60];
        assert_eq!(generator.generate(&mut first), GenerateStatus::Continue);

        handle.request();
        handle.request();
        let mut second = vec![0.0; 2 * 50];
        assert_eq!(generator.generate(&mut second), GenerateStatus::Complete);
    }

    #[test]
    fn test_request_from_another_thread() {
        let mut generator = ToneGenerator::new(&config(4));
        let handle = generator.fade_out_handle();

        std::thread::spawn(move || handle.request())
            .join()
            .unwrap();

        let mut buffer = vec![0.0; 2 * 8];
        assert_eq!(generator.generate(&mut buffer), GenerateStatus::Complete);
        assert!(generator.fade_out_handle().is_requested());
    }

    #[test]
    fn test_continue_code_is_zero() {
        let mut generator = ToneGenerator::new(&config(110));
        let mut buffer = vec![0.0; 2 * 16];
        let status = generator.generate(&mut buffer);
        assert_eq!(status.code(), 0);
        assert!(!status.is_complete());
        // First frame of the session is silent (fade-in starts at 0)
        assert_eq!(&buffer[..2], &[0.0, 0.0]);
    }
}
