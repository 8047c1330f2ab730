//! Emission schedule: how long an emitter runs and how often it spawns

use confetti_core::{ConfettiError, Result};
use std::time::Duration;

/// How many particles an emitter creates over its lifetime.
///
/// Stores the average spawn interval in milliseconds. A schedule is a pure
/// value; the emitter does all time accounting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionSchedule {
    emitting_time_ms: f64,
    interval_ms: f64,
}

impl EmissionSchedule {
    /// Emit exactly `count` particles spread over `duration`
    pub fn max_count(duration: Duration, count: u32) -> Result<Self> {
        if count == 0 {
            return Err(ConfettiError::invalid(
                "emitter max particle count must be greater than 0",
            ));
        }
        let emitting_time_ms = duration_ms(duration);
        Ok(Self {
            emitting_time_ms,
            interval_ms: emitting_time_ms / count as f64,
        })
    }

    /// Emit `rate` particles per second for `duration`
    pub fn per_second(duration: Duration, rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConfettiError::invalid(format!(
                "emitter rate must be a positive number of particles per second, got {rate}"
            )));
        }
        Ok(Self {
            emitting_time_ms: duration_ms(duration),
            interval_ms: 1000.0 / rate,
        })
    }

    /// Total time the emitter keeps spawning, in milliseconds
    pub fn emitting_time_ms(&self) -> f64 {
        self.emitting_time_ms
    }

    /// Average milliseconds between two spawns
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Number of particles this schedule produces over its whole duration
    pub fn total_particles(&self) -> u64 {
        if self.interval_ms > 0.0 {
            spawn_index(self.emitting_time_ms, self.interval_ms)
        } else {
            0
        }
    }
}

/// Count of whole intervals contained in `elapsed_ms`.
///
/// Tolerates the rounding error of `duration / count * count`, so the last
/// particle of a max-count schedule lands on the final millisecond.
pub(crate) fn spawn_index(elapsed_ms: f64, interval_ms: f64) -> u64 {
    const EPSILON: f64 = 1e-9;
    let steps = elapsed_ms / interval_ms + EPSILON;
    if steps <= 0.0 {
        0
    } else {
        steps.floor() as u64
    }
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
