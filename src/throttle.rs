//! Leaky-bucket request throttle.
//!
//! PIM instances enforce tight call quotas (ours allows 20 calls per minute;
//! the default here stays at 18 to absorb clock skew). The bucket fills by
//! one per acquired permit and drains at a constant rate; when full,
//! [`LeakyBucket::acquire`] sleeps until a permit fits. The client calls
//! this before dispatching, so rate limiting stays an injected capability
//! rather than a property of the compiled request.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Conservative default matching the 20-per-minute production quota.
pub const DEFAULT_REQUESTS_PER_MINUTE: f64 = 18.0;

/// Slowest drain rate `new` accepts (one permit per hour); keeps the wait
/// computed by `acquire` finite for any constructor input.
const MIN_DRAIN_PER_SEC: f64 = 1.0 / 3600.0;

#[derive(Debug)]
struct BucketState {
    level: f64,
    last_drain: Instant,
}

/// A leaky bucket: capacity bounds the burst, drain rate bounds the
/// sustained request rate.
#[derive(Debug)]
pub struct LeakyBucket {
    state: Mutex<BucketState>,
    capacity: f64,
    drain_per_sec: f64,
}

impl LeakyBucket {
    /// Bucket with an explicit burst capacity and sustained drain rate.
    /// Both are clamped: capacity to at least one permit, the drain rate to
    /// [`MIN_DRAIN_PER_SEC`] so a full bucket always drains eventually.
    #[must_use]
    pub fn new(capacity: f64, drain_per_sec: f64) -> Self {
        Self {
            state: Mutex::new(BucketState {
                level: 0.0,
                last_drain: Instant::now(),
            }),
            capacity: capacity.max(1.0),
            drain_per_sec: drain_per_sec.max(MIN_DRAIN_PER_SEC),
        }
    }

    /// Bucket allowing `requests` per minute, with a burst of the same size.
    #[must_use]
    pub fn per_minute(requests: f64) -> Self {
        Self::new(requests, requests / 60.0)
    }

    fn drain(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_drain).as_secs_f64();
        state.level = (state.level - elapsed * self.drain_per_sec).max(0.0);
        state.last_drain = now;
    }

    /// Take a permit immediately if one fits, without waiting.
    pub async fn try_acquire(&self) -> bool {
        let mut state = self.state.lock().await;
        self.drain(&mut state);
        if state.level + 1.0 <= self.capacity {
            state.level += 1.0;
            true
        } else {
            false
        }
    }

    /// Take a permit, sleeping until the bucket has drained enough.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                self.drain(&mut state);
                if state.level + 1.0 <= self.capacity {
                    state.level += 1.0;
                    return;
                }
                Duration::from_secs_f64((state.level + 1.0 - self.capacity) / self.drain_per_sec)
            };
            tracing::debug!(?wait, "throttle: bucket full, waiting");
            tokio::time::sleep(wait).await;
        }
    }
}

impl Default for LeakyBucket {
    fn default() -> Self {
        Self::per_minute(DEFAULT_REQUESTS_PER_MINUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn burst_up_to_capacity_then_refuses() {
        // The clamped minimum drain rate is far too slow to free a permit
        // within the test, so the outcome is independent of wall time.
        let bucket = LeakyBucket::new(3.0, 0.0);
        assert!(bucket.try_acquire().await);
        assert!(bucket.try_acquire().await);
        assert!(bucket.try_acquire().await);
        assert!(!bucket.try_acquire().await, "fourth permit exceeds capacity");
    }

    #[tokio::test]
    async fn acquire_returns_immediately_while_capacity_remains() {
        let bucket = LeakyBucket::default();
        bucket.acquire().await;
        bucket.acquire().await;
        assert!(bucket.try_acquire().await);
    }

    #[test]
    fn capacity_is_never_below_one_permit() {
        let bucket = LeakyBucket::new(0.0, 1.0);
        assert!((bucket.capacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn drain_rate_is_clamped_to_a_positive_minimum() {
        assert!(LeakyBucket::new(1.0, 0.0).drain_per_sec >= MIN_DRAIN_PER_SEC);
        assert!(LeakyBucket::new(1.0, -5.0).drain_per_sec >= MIN_DRAIN_PER_SEC);
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_on_a_stalled_bucket_waits_instead_of_panicking() {
        let bucket = LeakyBucket::new(1.0, 0.0);
        bucket.acquire().await;
        // The bucket is full and its requested drain rate was zero; the
        // clamped rate must yield a finite wait that the paused clock can
        // advance through.
        bucket.acquire().await;
        assert!(!bucket.try_acquire().await);
    }
}
