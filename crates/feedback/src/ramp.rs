//! Exponential gain ramps.
//!
//! Audio parameters never jump. A ramp approaches its target as
//! `v(t) = target + (v0 - target) * exp(-(t - t0) / tau)` and can be
//! retargeted at any time, starting the new approach from wherever the
//! old one had reached.

/// Below this distance a ramp counts as settled.
const SETTLE_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRamp {
    start_value: f64,
    target: f64,
    start_secs: f64,
    time_constant: f64,
}

impl GainRamp {
    /// A ramp resting at `value`.
    pub fn new(value: f64, time_constant: f64) -> Self {
        Self {
            start_value: value,
            target: value,
            start_secs: 0.0,
            time_constant: time_constant.max(0.0),
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn time_constant(&self) -> f64 {
        self.time_constant
    }

    /// Value at `now_secs`. Times before the ramp started read its start.
    pub fn value_at(&self, now_secs: f64) -> f64 {
        let elapsed = (now_secs - self.start_secs).max(0.0);
        if self.time_constant <= 0.0 {
            return self.target;
        }
        self.target + (self.start_value - self.target) * (-elapsed / self.time_constant).exp()
    }

    /// Start approaching `target` from the current value at `now_secs`.
    pub fn set_target(&mut self, target: f64, now_secs: f64) {
        if !target.is_finite() {
            tracing::warn!(target, "Ignoring non-finite gain target");
            return;
        }
        self.start_value = self.value_at(now_secs);
        self.start_secs = now_secs;
        self.target = target;
    }

    pub fn is_settled(&self, now_secs: f64) -> bool {
        (self.value_at(now_secs) - self.target).abs() < SETTLE_EPSILON
    }
}
