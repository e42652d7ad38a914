//! Rate limiting for NCBI E-utilities compliance

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::error::{PubMedError, Result};

/// Token bucket rate limiter shared by all clones of a client
///
/// NCBI E-utilities rate limits:
/// - 3 requests per second without API key
/// - 10 requests per second with API key
/// - Violations can result in IP blocking
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<Mutex<TokenBucket>>,
}

struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_rate: f64, // tokens per second
    last_refill: Instant,
}

impl TokenBucket {
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }
}

impl RateLimiter {
    /// Create a new rate limiter allowing `rate` requests per second
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_affiliations::rate_limit::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(3.0);
    /// ```
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_finite() && rate > 0.0 { rate } else { 1.0 };
        let capacity = rate.max(1.0);
        Self {
            bucket: Arc::new(Mutex::new(TokenBucket {
                tokens: capacity,
                capacity,
                refill_rate: rate,
                last_refill: Instant::now(),
            })),
        }
    }

    /// Acquire a token, sleeping until one is available
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Result<()> {
        let wait_time = {
            let mut bucket = self.bucket.lock().await;
            bucket.refill();

            if bucket.tokens >= 1.0 {
                bucket.tokens -= 1.0;
                debug!(remaining_tokens = %bucket.tokens, "Token acquired immediately");
                None
            } else {
                let missing = 1.0 - bucket.tokens;
                let wait_duration = Duration::from_secs_f64(missing / bucket.refill_rate);
                debug!(
                    wait_duration_ms = wait_duration.as_millis(),
                    "Need to wait for token"
                );
                Some(wait_duration)
            }
        };

        if let Some(duration) = wait_time {
            sleep(duration).await;

            let mut bucket = self.bucket.lock().await;
            bucket.refill();

            // Concurrent waiters may have drained the bucket meanwhile
            if bucket.tokens >= 1.0 - f64::EPSILON {
                bucket.tokens = (bucket.tokens - 1.0).max(0.0);
                debug!(remaining_tokens = %bucket.tokens, "Token acquired after waiting");
            } else {
                warn!("Failed to acquire token after waiting");
                return Err(PubMedError::RateLimitExceeded);
            }
        }

        Ok(())
    }
}
