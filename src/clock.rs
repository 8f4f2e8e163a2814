//! The render clock: the one time base shared by the control and render paths.
//!
//! The render path is the only writer; it advances the clock after every
//! block. The control path reads `now()` to stamp the breakpoints it schedules.
//! Tests inject a [`ManualClock`] so envelope behaviour can be checked
//! without an audio device.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Time source for scheduling, in seconds since the clock was created.
pub trait RenderClock: Send + Sync {
    fn now(&self) -> f64;

    fn sample_rate(&self) -> f32;

    /// Move the clock forward by `frames` rendered samples.
    fn advance(&self, frames: usize);
}

/// Sample-counting clock driven by the render path.
#[derive(Debug)]
pub struct SampleClock {
    frames: AtomicU64,
    sample_rate: f32,
}

impl SampleClock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            frames: AtomicU64::new(0),
            sample_rate,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }
}

impl RenderClock for SampleClock {
    fn now(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::AcqRel);
    }
}

/// Clock whose time is set by hand.
#[derive(Debug)]
pub struct ManualClock {
    seconds: AtomicU64,
    sample_rate: f32,
}

impl ManualClock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            seconds: AtomicU64::new(0.0f64.to_bits()),
            sample_rate,
        }
    }

    pub fn set(&self, seconds: f64) {
        self.seconds.store(seconds.to_bits(), Ordering::Release);
    }

    pub fn advance_seconds(&self, seconds: f64) {
        self.set(self.now() + seconds);
    }
}

impl RenderClock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.seconds.load(Ordering::Acquire))
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn advance(&self, frames: usize) {
        self.advance_seconds(frames as f64 / self.sample_rate as f64);
    }
}

static SHARED: Mutex<Weak<SampleClock>> = Mutex::new(Weak::new());

/// Get the process-wide clock, creating it on first use.
///
/// The clock lives as long as any handle does. A different `sample_rate` while
/// handles are alive returns the existing clock; its rate wins.
pub fn acquire(sample_rate: f32) -> Arc<SampleClock> {
    let mut shared = SHARED.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(clock) = shared.upgrade() {
        if clock.sample_rate() != sample_rate {
            log::warn!(
                "render clock already running at {} Hz, ignoring request for {} Hz",
                clock.sample_rate(),
                sample_rate
            );
        }
        return clock;
    }

    let clock = Arc::new(SampleClock::new(sample_rate));
    *shared = Arc::downgrade(&clock);
    log::info!("render clock started at {sample_rate} Hz");
    clock
}

/// Give back a handle. The clock is torn down once the last handle is released,
/// and the next `acquire` starts a fresh one from zero.
pub fn release(clock: Arc<SampleClock>) {
    if Arc::strong_count(&clock) == 1 {
        log::info!("render clock stopped at {:.3}s", clock.now());
    }
    drop(clock);
}
