//! Token-bucket pacing for request pauses.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};

use crate::config::TimingConfig;
use crate::observability::metrics;
use crate::pacing::{Pacer, Pause};

/// A simple token bucket.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    /// Take a token, or report how long until one is available.
    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> Result<(), Duration> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - self.tokens) / refill_rate))
        }
    }
}

/// Request pauses wait for a token; process pauses sleep a fixed delay.
pub struct TokenBucketPacer {
    bucket: Mutex<TokenBucket>,
    capacity: f64,
    refill_rate: f64,
    process_delay: Duration,
}

impl TokenBucketPacer {
    pub fn new(requests_per_second: u32, burst_size: u32, process_delay: Duration) -> Self {
        let capacity = burst_size.max(1) as f64;
        Self {
            bucket: Mutex::new(TokenBucket::new(capacity)),
            capacity,
            refill_rate: requests_per_second.max(1) as f64,
            process_delay,
        }
    }

    pub fn from_config(timing: &TimingConfig) -> Self {
        Self::new(
            timing.requests_per_second,
            timing.burst_size,
            timing.process_delay(),
        )
    }

    async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().expect("token bucket mutex poisoned");
                bucket.try_acquire(self.capacity, self.refill_rate)
            };
            match wait {
                Ok(()) => return,
                Err(delay) => {
                    tracing::debug!(wait_ms = delay.as_millis() as u64, "Waiting for request token");
                    metrics::record_pause(Pause::Request.as_str(), delay);
                    sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl Pacer for TokenBucketPacer {
    async fn pause(&self, kind: Pause) {
        match kind {
            Pause::Request => self.acquire().await,
            Pause::Process => {
                metrics::record_pause(kind.as_str(), self.process_delay);
                sleep(self.process_delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_refill_after_burst() {
        let pacer = TokenBucketPacer::new(2, 1, Duration::from_secs(1));

        let start = Instant::now();
        pacer.pause(Pause::Request).await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        // Empty bucket at 2 tokens/s
        pacer.pause(Pause::Request).await;
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert!(start.elapsed() < Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refills_while_idle() {
        let pacer = TokenBucketPacer::new(1, 1, Duration::from_secs(1));
        pacer.pause(Pause::Request).await;

        sleep(Duration::from_secs(2)).await;
        let start = Instant::now();
        pacer.pause(Pause::Request).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_process_pause_is_fixed() {
        let pacer = TokenBucketPacer::new(100, 100, Duration::from_secs(4));
        let start = Instant::now();
        pacer.pause(Pause::Process).await;
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }
}
