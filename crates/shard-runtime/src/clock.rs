//! Game clock with freeze/resume semantics

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic timestamps for a [`GameClock`]
pub trait TimeSource {
    /// Time since an arbitrary fixed origin. Must never decrease.
    fn now(&self) -> Duration;
}

/// Wall-clock time source backed by [`Instant`]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced time source.
///
/// Clones share the same timeline, so a host (or test) can keep one handle
/// and advance time while the clock owns another.
#[derive(Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `step`
    pub fn advance(&self, step: Duration) {
        self.now.set(self.now.get() + step);
    }

    /// Move time forward by `secs` seconds
    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Tracks elapsed game time and per-frame deltas.
///
/// A stopped clock reports a zero delta and does not accumulate elapsed
/// time. Resuming takes a fresh sample point, so time spent stopped never
/// shows up as a delta spike.
pub struct GameClock {
    source: Box<dyn TimeSource>,
    running: bool,
    /// Total running time in seconds since the last `start()`
    elapsed: f64,
    /// Timestamp of the last delta sample
    last_sample: Duration,
    /// Upper bound on a single delta (seconds)
    max_delta: Option<f64>,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl GameClock {
    /// Create a stopped clock reading wall-clock time
    pub fn new() -> Self {
        Self::with_source(SystemTimeSource::new())
    }

    /// Create a stopped clock reading from a custom time source
    pub fn with_source(source: impl TimeSource + 'static) -> Self {
        let last_sample = source.now();
        Self {
            source: Box::new(source),
            running: false,
            elapsed: 0.0,
            last_sample,
            max_delta: None,
        }
    }

    /// Clamp single deltas to `max_delta` seconds (`None` disables the clamp)
    pub fn set_max_delta(&mut self, max_delta: Option<f64>) {
        self.max_delta = max_delta;
    }

    /// Start from a fresh baseline with zero elapsed time. No-op when running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.elapsed = 0.0;
        self.last_sample = self.source.now();
        self.running = true;
    }

    /// Continue after a stop, keeping elapsed time. No-op when running.
    pub fn resume(&mut self) {
        if self.running {
            return;
        }
        self.last_sample = self.source.now();
        self.running = true;
    }

    /// Freeze the clock. No-op when already stopped.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds since the previous sample; resets the sample point.
    ///
    /// Returns 0 while stopped.
    pub fn delta(&mut self) -> f64 {
        if !self.running {
            return 0.0;
        }

        let now = self.source.now();
        let mut delta = now.saturating_sub(self.last_sample).as_secs_f64();
        self.last_sample = now;

        if let Some(max) = self.max_delta {
            delta = delta.min(max);
        }
        self.elapsed += delta;
        delta
    }

    /// Total running time since the last `start()`, excluding stopped intervals
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed
    }
}
