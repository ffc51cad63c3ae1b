//! Politeness delay policies
//!
//! Every deliberate pause in a run (between reveal attempts and between page
//! requests) is asked of a `DelayPolicy`, so tests can run with `NoDelay`.

use rand::Rng;
use std::fmt::Debug;
use std::time::Duration;

/// Decides how long to pause before the given attempt
///
/// `attempt` is 1-based: the first reveal on a page, the first page
/// transition of a run, and so on.
pub trait DelayPolicy: Send + Sync + Debug {
    fn delay(&self, attempt: u32) -> Duration;
}

/// Uniformly random pause in `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterDelay {
    min: Duration,
    max: Duration,
}

impl JitterDelay {
    /// Create a jitter policy; bounds are swapped if given in reverse
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Create a jitter policy from a range in seconds
    #[must_use]
    pub fn from_secs_f64(min_secs: f64, max_secs: f64) -> Self {
        Self::new(
            Duration::from_secs_f64(min_secs.max(0.0)),
            Duration::from_secs_f64(max_secs.max(0.0)),
        )
    }

    #[must_use]
    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }
}

impl DelayPolicy for JitterDelay {
    fn delay(&self, _attempt: u32) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let nanos = rand::rng().random_range(self.min.as_nanos()..=self.max.as_nanos());
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// Same pause every time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl DelayPolicy for FixedDelay {
    fn delay(&self, _attempt: u32) -> Duration {
        self.0
    }
}

/// Never pause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn delay(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

/// Sleep for the policy's delay, skipping the timer entirely for zero
pub(crate) async fn pause(policy: &dyn DelayPolicy, attempt: u32) {
    let delay = policy.delay(attempt);
    if !delay.is_zero() {
        tracing::debug!("Politeness pause of {:.2}s (attempt {})", delay.as_secs_f64(), attempt);
        tokio::time::sleep(delay).await;
    }
}
