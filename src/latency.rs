//! Simulated processing latency for the analyze endpoint

use std::time::Duration;

use rand::Rng;

/// Decides how long an analyze request waits before answering
pub trait LatencyPolicy: Send + Sync {
    fn sample(&self) -> Duration;
}

/// Uniform random delay in `[min, max]`
#[derive(Debug, Clone)]
pub struct UniformDelay {
    min: Duration,
    max: Duration,
}

impl UniformDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Bounds in seconds; negative or non-finite values clamp to zero
    pub fn from_secs_f64(min_secs: f64, max_secs: f64) -> Self {
        let to_duration = |secs: f64| {
            if secs.is_finite() && secs > 0.0 {
                Duration::from_secs_f64(secs)
            } else {
                Duration::ZERO
            }
        };
        Self::new(to_duration(min_secs), to_duration(max_secs))
    }
}

impl Default for UniformDelay {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(8))
    }
}

impl LatencyPolicy for UniformDelay {
    fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

/// No delay at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl LatencyPolicy for NoDelay {
    fn sample(&self) -> Duration {
        Duration::ZERO
    }
}
