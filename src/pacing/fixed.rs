//! Fixed-duration pauses.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::config::TimingConfig;
use crate::observability::metrics;
use crate::pacing::{Pacer, Pause};

/// Sleeps the configured delay on every pause.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelays {
    request_delay: Duration,
    process_delay: Duration,
}

impl FixedDelays {
    pub fn new(request_delay: Duration, process_delay: Duration) -> Self {
        Self {
            request_delay,
            process_delay,
        }
    }

    pub fn from_config(timing: &TimingConfig) -> Self {
        Self::new(timing.request_delay(), timing.process_delay())
    }

    pub fn delay(&self, kind: Pause) -> Duration {
        match kind {
            Pause::Request => self.request_delay,
            Pause::Process => self.process_delay,
        }
    }
}

#[async_trait]
impl Pacer for FixedDelays {
    async fn pause(&self, kind: Pause) {
        let delay = self.delay(kind);
        tracing::debug!(pause = kind.as_str(), delay_ms = delay.as_millis() as u64, "Pausing");
        metrics::record_pause(kind.as_str(), delay);
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_pauses_use_virtual_time() {
        let pacer = FixedDelays::new(Duration::from_millis(250), Duration::from_secs(3));

        let start = Instant::now();
        pacer.pause(Pause::Request).await;
        assert_eq!(start.elapsed(), Duration::from_millis(250));

        pacer.pause(Pause::Process).await;
        assert_eq!(start.elapsed(), Duration::from_millis(3250));
    }

    #[test]
    fn test_zero_delay() {
        let pacer = FixedDelays::new(Duration::ZERO, Duration::ZERO);
        assert_eq!(pacer.delay(Pause::Process), Duration::ZERO);
    }
}
