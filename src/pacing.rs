use rand::Rng;
use std::time::Duration;

use crate::config::PacingConfig;

/// Upper bound accepted for either pacing bound, in seconds.
pub const MAX_PACING_SECS: f64 = 3600.0;

/// Randomized delay between retailer requests, to stay under anti-automation
/// thresholds. Not needed for correctness; tests use `Pacer::disabled()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    min: Duration,
    max: Duration,
}

impl Pacer {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn from_config(config: &PacingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self::new(bound(config.min_secs), bound(config.max_secs))
    }

    pub fn is_disabled(&self) -> bool {
        self.max.is_zero()
    }

    pub fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let millis = rand::thread_rng().gen_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(millis as u64)
    }

    pub async fn pause(&self) {
        if self.is_disabled() {
            return;
        }
        let delay = self.next_delay();
        tracing::debug!("Waiting {:.1}s before the next request", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}

// Clamps values `AppConfig::validate` would reject.
fn bound(secs: f64) -> Duration {
    if secs.is_nan() {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs.min(MAX_PACING_SECS)).unwrap_or(Duration::ZERO)
}
