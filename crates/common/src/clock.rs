//! Session timing.
//!
//! A focus session is anchored to a monotonic instant taken when the
//! pipeline starts, plus the matching wall-clock time for reports. Frames
//! arrive at whatever rate the host delivers them; [`RateController`] only
//! decides whether a delivered frame is applied and never schedules one.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Monotonic session clock.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    epoch: Instant,
    started_at: DateTime<Utc>,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Wall-clock time the session started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Elapsed nanoseconds, saturating after ~584 years.
    pub fn elapsed_ns(&self) -> u64 {
        u64::try_from(self.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Caps how many ticks per second are applied.
#[derive(Debug, Clone)]
pub struct RateController {
    min_interval_ns: u64,
    last_applied_ns: Option<u64>,
}

impl RateController {
    /// `max_hz` of zero is treated as 1.
    pub fn new(max_hz: u32) -> Self {
        Self {
            min_interval_ns: 1_000_000_000 / u64::from(max_hz.max(1)),
            last_applied_ns: None,
        }
    }

    /// Whether a frame arriving at `now_ns` should be applied. The first
    /// frame always is.
    pub fn should_tick(&mut self, now_ns: u64) -> bool {
        let due = self
            .last_applied_ns
            .map_or(true, |last| now_ns.saturating_sub(last) >= self.min_interval_ns);
        if due {
            self.last_applied_ns = Some(now_ns);
        }
        due
    }

    pub fn interval_ns(&self) -> u64 {
        self.min_interval_ns
    }

    /// Forget the last applied tick.
    pub fn reset(&mut self) {
        self.last_applied_ns = None;
    }
}
