//! @ai:module:intent Rate limiting for outbound vendor requests
//! @ai:module:layer infrastructure
//! @ai:module:public_api RateLimiter
//! @ai:module:stateless false

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// @ai:intent Token bucket limiter shared by one adapter's requests
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    per_minute: u32,
}

struct Bucket {
    tokens: f64,
    refilled_at: Instant,
}

impl Bucket {
    /// @ai:intent Refill tokens based on elapsed time
    /// @ai:effects state:write
    fn refill(&mut self, per_minute: u32) {
        let now = Instant::now();
        let rate = per_minute as f64 / 60.0;
        let earned = now.duration_since(self.refilled_at).as_secs_f64() * rate;
        self.tokens = (self.tokens + earned).min(per_minute as f64);
        self.refilled_at = now;
    }
}

impl RateLimiter {
    /// @ai:intent Create a limiter allowing `per_minute` requests; 0 disables limiting
    /// @ai:effects pure
    pub fn new(per_minute: u32) -> Self {
        Self {
            bucket: Mutex::new(Bucket {
                tokens: per_minute as f64,
                refilled_at: Instant::now(),
            }),
            per_minute,
        }
    }

    /// @ai:intent Wait until a request is allowed
    /// @ai:effects state:write, time
    pub async fn acquire(&self) {
        if self.per_minute == 0 {
            return;
        }

        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                bucket.refill(self.per_minute);

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }

                let missing = 1.0 - bucket.tokens;
                Duration::from_secs_f64(missing / (self.per_minute as f64 / 60.0))
            };

            tokio::time::sleep(wait).await;
        }
    }
}
