//! Minimum-interval throttle for a single source

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::sync::Arc;
use std::time::Duration;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Spaces out requests to one source by at least a fixed interval
///
/// The first request passes immediately. A zero interval disables the
/// throttle.
#[derive(Clone)]
pub struct Throttle {
    rate_limiter: Option<SharedRateLimiter>,
    interval: Duration,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        let rate_limiter =
            Quota::with_period(interval).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self {
            rate_limiter,
            interval,
        }
    }

    /// Throttle that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Wait until the next request may go out
    pub async fn ready(&self) {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.rate_limiter.is_some()
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("interval", &self.interval)
            .finish()
    }
}
