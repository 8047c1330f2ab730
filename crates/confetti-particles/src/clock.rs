//! Frame clock: turns host frame timestamps into tick deltas

/// Converts the timestamps of a host's animation-frame callback into the
/// delta seconds a tick expects.
///
/// The clock never reads the system time; the host passes its own frame
/// timestamps in, which keeps simulations reproducible.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Total time covered by ticks so far, in seconds
    pub total_time: f64,
    /// Delta of the last tick in seconds
    pub delta_time: f32,
    /// Upper bound applied to a single delta, if any
    max_delta: Option<f32>,
    /// Timestamp of the previous frame
    last_frame_ms: Option<f64>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            max_delta: None,
            last_frame_ms: None,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp every delta to at most `seconds`
    pub fn with_max_delta(seconds: f32) -> Self {
        Self {
            max_delta: Some(seconds),
            ..Self::default()
        }
    }

    /// Record a frame at `frame_ms` and return the seconds since the last one.
    /// The first frame yields 0, as does a timestamp that goes backwards.
    pub fn tick(&mut self, frame_ms: f64) -> f32 {
        let delta = match self.last_frame_ms {
            Some(last) if frame_ms > last => ((frame_ms - last) / 1000.0) as f32,
            _ => 0.0,
        };
        self.last_frame_ms = Some(frame_ms);

        self.delta_time = match self.max_delta {
            Some(max) => delta.min(max),
            None => delta,
        };
        self.total_time += self.delta_time as f64;
        self.delta_time
    }

    /// Forget the previous frame, e.g. after the host paused its loop
    pub fn reset(&mut self) {
        self.last_frame_ms = None;
        self.delta_time = 0.0;
    }
}
