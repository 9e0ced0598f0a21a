//! App-responds check

use std::time::Duration;

use crate::domain::ports::{AppProbe, Clock};
use crate::error::{CutoverError, CutoverResult};

/// Poll settings for [`wait_until_responds`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl HealthPolicy {
    pub fn new(timeout_secs: u64, interval_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self::new(60, 1)
    }
}

/// Probe until the app answers or the policy's timeout is used up.
///
/// The timeout is a deadline on the clock: no probe gets more than the time
/// left before it, and sleeps are cut short at it. With the defaults and an
/// app that answers instantly "no", that is one probe plus up to 60 retries
/// a second apart.
pub fn wait_until_responds(
    probe: &dyn AppProbe,
    clock: &dyn Clock,
    policy: HealthPolicy,
) -> CutoverResult<()> {
    let target = probe.target();
    tracing::info!(%target, "testing connection");

    let timeout = chrono::Duration::from_std(policy.timeout)
        .map_err(|_| CutoverError::internal("health timeout is out of range"))?;
    let deadline = clock.now() + timeout;
    let time_left = || (deadline - clock.now()).to_std().unwrap_or(Duration::ZERO);

    let mut attempt = 0u32;
    loop {
        if probe.responds(time_left()) {
            tracing::debug!(%target, attempt, "app responds");
            return Ok(());
        }
        let left = time_left();
        if left.is_zero() {
            break;
        }
        tracing::debug!("waiting for the app to start");
        clock.sleep(policy.interval.min(left));
        attempt += 1;
    }

    Err(CutoverError::check(format!(
        "{} did not respond within {}s",
        target,
        policy.timeout.as_secs()
    )))
}
