use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::ports::Clock;

/// Wall clock and real sleeps
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration)
    }
}
