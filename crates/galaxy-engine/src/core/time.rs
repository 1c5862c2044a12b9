/// Monotonic frame clock driven by host timestamps (milliseconds).
/// Produces elapsed time since mount and the delta since the previous tick.
pub struct FrameClock {
    start_ms: f64,
    last_ms: f64,
    /// Upper bound on a single delta, in seconds.
    max_delta: f32,
}

/// Time sample for one render tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous tick (capped).
    pub delta: f32,
}

impl FrameClock {
    pub fn new(now_ms: f64) -> Self {
        Self {
            start_ms: now_ms,
            last_ms: now_ms,
            max_delta: 0.25,
        }
    }

    /// Advance to `now_ms`. Timestamps that go backwards yield a zero delta.
    pub fn tick(&mut self, now_ms: f64) -> FrameTime {
        let now_ms = now_ms.max(self.last_ms);
        let delta = ((now_ms - self.last_ms) / 1000.0) as f32;
        self.last_ms = now_ms;
        FrameTime {
            elapsed: ((now_ms - self.start_ms) / 1000.0) as f32,
            delta: delta.min(self.max_delta),
        }
    }

    pub fn elapsed_secs(&self) -> f32 {
        ((self.last_ms - self.start_ms) / 1000.0) as f32
    }
}
