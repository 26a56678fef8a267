use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Client-side rate budget for the lookup service.
#[derive(Clone)]
pub struct LookupThrottle {
    limiter: Arc<DirectRateLimiter>,
    per_minute: u32,
}

impl LookupThrottle {
    pub fn per_minute(limit: u32) -> Self {
        Self::new(Duration::from_secs(60), limit)
    }

    pub fn new(quota_window: Duration, quota_limit: u32) -> Self {
        let safe_limit = quota_limit.max(1);
        Self {
            limiter: Arc::new(RateLimiter::direct(quota_from_window(
                quota_window,
                safe_limit,
            ))),
            per_minute: safe_limit,
        }
    }

    /// Waits until a lookup may be sent.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Takes budget without waiting; `false` when the window is exhausted.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }

    pub const fn limit(&self) -> u32 {
        self.per_minute
    }
}

impl std::fmt::Debug for LookupThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupThrottle")
            .field("limit", &self.per_minute)
            .finish()
    }
}

fn quota_from_window(quota_window: Duration, quota_limit: u32) -> Quota {
    let burst = NonZeroU32::new(quota_limit).unwrap_or(NonZeroU32::MIN);

    let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(quota_limit)).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst)
}
