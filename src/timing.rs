use std::ops::Add;
use std::time::{Duration, Instant};

/// A point in time on the monotonic clock.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp(Instant);

impl Timestamp {
    pub fn now() -> Self {
        Timestamp(Instant::now())
    }

    pub fn elapsed(self) -> Duration {
        self.0.elapsed()
    }

    /// Time left until `self`; zero once it has passed.
    pub fn remaining(self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0 + rhs)
    }
}

/// Milliseconds from `t0` to `t1`; negative when `t1` precedes `t0`.
pub fn delta_ms(t0: Timestamp, t1: Timestamp) -> f64 {
    match t1.0.checked_duration_since(t0.0) {
        Some(forward) => duration_ms(forward),
        None => -duration_ms(t0.0 - t1.0),
    }
}

#[allow(clippy::cast_precision_loss)]
fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs() as f64 * 1000.0 + f64::from(duration.subsec_nanos()) / 1_000_000.0
}
