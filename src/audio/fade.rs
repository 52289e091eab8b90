//! Linear fade-in/fade-out envelope.
//!
//! Fade-in runs over the first `W` frames of a session, fade-out over the
//! `W` frames following an explicit request. After fade-out the gain is 0
//! forever. Both counters are independent: a fade-out requested during the
//! fade-in multiplies the two ramps.

/// Envelope stage, derived from the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
    /// Nothing generated yet
    Silent,
    FadingIn,
    Steady,
    FadingOut,
    /// Terminal: gain is 0, stream may be stopped
    Complete,
}

/// Fade controller with two countdown counters over a fixed window
#[derive(Debug, Clone)]
pub struct FadeController {
    /// Window length (frames)
    window: u32,
    /// Frames left in the fade-in ramp
    fade_in_remaining: u32,
    /// Frames left in the fade-out ramp, `None` until requested
    fade_out_remaining: Option<u32>,
    /// Whether any frame has been produced
    started: bool,
}

impl FadeController {
    pub fn new(window_frames: u32) -> Self {
        Self {
            window: window_frames,
            fade_in_remaining: window_frames,
            fade_out_remaining: None,
            started: false,
        }
    }

    /// Start the fade-out. Returns `false` if it was already started.
    pub fn begin_fade_out(&mut self) -> bool {
        if self.fade_out_remaining.is_some() {
            return false;
        }
        self.fade_out_remaining = Some(self.window);
        true
    }

    /// Gain for the next frame; advances both counters
    #[inline]
    pub fn next_gain(&mut self) -> f32 {
        self.started = true;

        let mut gain = 1.0;

        if self.fade_in_remaining > 0 {
            gain = (self.window - self.fade_in_remaining) as f32 / self.window as f32;
            self.fade_in_remaining -= 1;
        }

        if let Some(remaining) = self.fade_out_remaining.as_mut() {
            if *remaining == 0 {
                return 0.0;
            }
            gain *= *remaining as f32 / self.window as f32;
            *remaining -= 1;
        }

        gain
    }

    /// True once the fade-out counter has reached zero
    pub fn is_complete(&self) -> bool {
        self.fade_out_remaining == Some(0)
    }

    pub fn is_fade_out_requested(&self) -> bool {
        self.fade_out_remaining.is_some()
    }

    pub fn phase(&self) -> FadePhase {
        match self.fade_out_remaining {
            Some(0) => FadePhase::Complete,
            Some(_) => FadePhase::FadingOut,
            None if !self.started => FadePhase::Silent,
            None if self.fade_in_remaining > 0 => FadePhase::FadingIn,
            None => FadePhase::Steady,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: u32 = 110;

    #[test]
    fn test_fade_in_ramp() {
        let mut fade = FadeController::new(W);
        assert_eq!(fade.phase(), FadePhase::Silent);

        for i in 0..W {
            let gain = fade.next_gain();
            assert!((gain - i as f32 / W as f32).abs() < 1e-6, "frame {}", i);
            if i + 1 < W {
                assert_eq!(fade.phase(), FadePhase::FadingIn);
            }
        }

        assert_eq!(fade.phase(), FadePhase::Steady);
        assert_eq!(fade.next_gain(), 1.0);
        assert_eq!(fade.next_gain(), 1.0);
    }

    #[test]
    fn test_fade_out_ramp_then_silence() {
        let mut fade = FadeController::new(W);
        for _ in 0..W {
            fade.next_gain();
        }

        assert!(!fade.is_fade_out_requested());
        assert!(fade.begin_fade_out());
        assert!(fade.is_fade_out_requested());
        assert_eq!(fade.phase(), FadePhase::FadingOut);

        for k in 0..W {
            assert!(!fade.is_complete());
            let gain = fade.next_gain();
            assert!((gain - (W - k) as f32 / W as f32).abs() < 1e-6, "frame {}", k);
        }

        assert!(fade.is_complete());
        assert_eq!(fade.phase(), FadePhase::Complete);
        for _ in 0..10 {
            assert_eq!(fade.next_gain(), 0.0);
        }
    }

    #[test]
    fn test_second_fade_out_request_is_ignored() {
        let mut fade = FadeController::new(W);
        for _ in 0..W {
            fade.next_gain();
        }

        assert!(fade.begin_fade_out());
        for _ in 0..50 {
            fade.next_gain();
        }

        // Must not restart the ramp
        assert!(!fade.begin_fade_out());
        let gain = fade.next_gain();
        assert!((gain - (W - 50) as f32 / W as f32).abs() < 1e-6);

        for _ in 0..(W - 51) {
            fade.next_gain();
        }
        assert!(fade.is_complete());
        assert!(!fade.begin_fade_out());
        assert!(fade.is_complete());
    }

    #[test]
    fn test_overlapping_fades_multiply() {
        let mut fade = FadeController::new(10);
        for _ in 0..4 {
            fade.next_gain();
        }

        fade.begin_fade_out();

        // Fade-in at 4/10, fade-out at 10/10
        assert!((fade.next_gain() - 0.4).abs() < 1e-6);
        // Fade-in at 5/10, fade-out at 9/10
        assert!((fade.next_gain() - 0.45).abs() < 1e-6);

        for _ in 0..8 {
            fade.next_gain();
        }
        assert!(fade.is_complete());
        assert_eq!(fade.next_gain(), 0.0);
    }

    #[test]
    fn test_zero_window() {
        let mut fade = FadeController::new(0);
        assert_eq!(fade.next_gain(), 1.0);
        assert_eq!(fade.phase(), FadePhase::Steady);

        fade.begin_fade_out();
        assert!(fade.is_complete());
        assert_eq!(fade.next_gain(), 0.0);
    }
}
