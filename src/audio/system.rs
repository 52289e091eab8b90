//! Live output stream driving a [`ToneGenerator`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{BufferSize, SupportedBufferSize};
use tracing::{debug, error, info, warn};

use super::generator::{FadeOutRequest, ToneGenerator};
use crate::error::AudioError;
use crate::params::{tone_constants::CHANNELS, ToneConfig};

/// Completion polling interval
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Callback counters shared with the audio thread
#[derive(Debug)]
struct CallbackCounters {
    callbacks: AtomicU64,
    frames: AtomicU64,
    min_frames: AtomicU64,
    max_frames: AtomicU64,
    complete: AtomicBool,
}

impl CallbackCounters {
    fn new() -> Self {
        Self {
            callbacks: AtomicU64::new(0),
            frames: AtomicU64::new(0),
            min_frames: AtomicU64::new(u64::MAX),
            max_frames: AtomicU64::new(0),
            complete: AtomicBool::new(false),
        }
    }

    fn record(&self, frames: u64) {
        self.callbacks.fetch_add(1, Ordering::Relaxed);
        self.frames.fetch_add(frames, Ordering::Relaxed);
        self.min_frames.fetch_min(frames, Ordering::Relaxed);
        self.max_frames.fetch_max(frames, Ordering::Relaxed);
    }

    fn snapshot(&self) -> StreamStats {
        let callbacks = self.callbacks.load(Ordering::Relaxed);
        StreamStats {
            callbacks,
            frames: self.frames.load(Ordering::Relaxed),
            min_callback_frames: if callbacks == 0 {
                0
            } else {
                self.min_frames.load(Ordering::Relaxed)
            },
            max_callback_frames: self.max_frames.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of callback activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamStats {
    pub callbacks: u64,
    pub frames: u64,
    /// Smallest buffer handed to the callback (frames)
    pub min_callback_frames: u64,
    /// Largest buffer handed to the callback (frames)
    pub max_callback_frames: u64,
}

impl StreamStats {
    /// True if the backend delivered buffers of varying size
    pub fn has_irregular_buffers(&self) -> bool {
        self.callbacks > 0 && self.min_callback_frames != self.max_callback_frames
    }
}

/// Running stereo f32 output stream
pub struct ToneStream {
    /// Audio output stream (kept alive until close)
    stream: cpal::Stream,

    fade_out: FadeOutRequest,

    counters: Arc<CallbackCounters>,
}

impl ToneStream {
    /// Open and start a stream on `device`
    pub fn open(device: &cpal::Device, config: &ToneConfig) -> Result<Self, AudioError> {
        config.validate()?;

        let stream_config = cpal::StreamConfig {
            channels: CHANNELS as cpal::ChannelCount,
            sample_rate: cpal::SampleRate(config.sample_rate_hz),
            buffer_size: negotiate_buffer_size(device, config),
        };

        let mut generator = ToneGenerator::new(config);
        let fade_out = generator.fade_out_handle();

        let counters = Arc::new(CallbackCounters::new());
        let counters_cb = Arc::clone(&counters);

        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                counters_cb.record((data.len() / CHANNELS) as u64);
                if generator.generate(data).is_complete() {
                    counters_cb.complete.store(true, Ordering::Release);
                }
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )?;

        stream.play()?;

        info!(
            "Streaming {} Hz tone @ {} Hz, buffer {:?}",
            config.frequency_hz, config.sample_rate_hz, stream_config.buffer_size
        );

        Ok(Self {
            stream,
            fade_out,
            counters,
        })
    }

    /// Begin the fade-out; the stream keeps running until it completes
    pub fn request_fade_out(&self) {
        debug!("Fade-out requested");
        self.fade_out.request();
    }

    /// True once the generator has faded to silence
    pub fn is_complete(&self) -> bool {
        self.counters.complete.load(Ordering::Acquire)
    }

    /// Block until the fade-out completes. Returns `false` on timeout.
    pub fn wait_for_completion(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.is_complete() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(POLL_INTERVAL);
        }
        true
    }

    pub fn stats(&self) -> StreamStats {
        self.counters.snapshot()
    }

    /// Stop and release the stream
    pub fn close(self) -> StreamStats {
        let stats = self.stats();
        if let Err(e) = self.stream.pause() {
            debug!("Pausing stream before close failed: {}", e);
        }
        drop(self.stream);
        debug!("Audio stream closed");
        stats
    }
}

/// Buffer size to request given the device's supported range for our
/// rate and channel count. `None` means no matching config was found.
pub fn select_buffer_size(requested: u32, supported: Option<&SupportedBufferSize>) -> BufferSize {
    match supported {
        Some(&SupportedBufferSize::Range { min, max }) if min <= max => {
            BufferSize::Fixed(requested.clamp(min, max))
        }
        _ => BufferSize::Default,
    }
}

/// Look up the device's supported stereo configs at the requested rate and
/// pick a buffer size from them, preferring f32 configs
fn negotiate_buffer_size(device: &cpal::Device, config: &ToneConfig) -> BufferSize {
    let rate = cpal::SampleRate(config.sample_rate_hz);
    let matching: Vec<cpal::SupportedStreamConfigRange> = match device.supported_output_configs()
    {
        Ok(configs) => configs
            .filter(|range| {
                range.channels() as usize >= CHANNELS
                    && range.min_sample_rate() <= rate
                    && rate <= range.max_sample_rate()
            })
            .collect(),
        Err(e) => {
            warn!("Failed to query supported configs: {}", e);
            Vec::new()
        }
    };

    let supported = matching
        .iter()
        .find(|range| range.sample_format() == cpal::SampleFormat::F32)
        .or_else(|| matching.first())
        .map(|range| range.buffer_size());

    let buffer_size = select_buffer_size(config.buffer_frames, supported);
    match buffer_size {
        BufferSize::Fixed(frames) if frames != config.buffer_frames => warn!(
            "Device does not support {} frame buffers, using {}",
            config.buffer_frames, frames
        ),
        BufferSize::Default => warn!(
            "No supported buffer range for {} frames @ {} Hz, using host default buffer size",
            config.buffer_frames, config.sample_rate_hz
        ),
        _ => {}
    }
    buffer_size
}
