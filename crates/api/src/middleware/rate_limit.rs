//! Per-client token bucket applied to every route.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

#[derive(Debug)]
struct Buckets {
    by_key: HashMap<String, Bucket>,
    last_sweep: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    capacity: f64,
    refill_per_sec: f64,
    /// Time for an empty bucket to refill completely. A bucket idle for
    /// longer is full again and can be dropped.
    window: Duration,
    buckets: Mutex<Buckets>,
}

impl RateLimiter {
    pub fn per_minute(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(60))
    }

    /// Allow `requests` per `window`, refilled continuously.
    pub fn new(requests: u32, window: Duration) -> Self {
        let capacity = f64::from(requests.max(1));
        let window = window.max(Duration::from_millis(1));
        Self {
            capacity,
            refill_per_sec: capacity / window.as_secs_f64(),
            window,
            buckets: Mutex::new(Buckets {
                by_key: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    pub async fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut lock = self.buckets.lock().await;
        if now.duration_since(lock.last_sweep) >= self.window {
            let window = self.window;
            lock.by_key
                .retain(|_, bucket| now.duration_since(bucket.last_refill) < window);
            lock.last_sweep = now;
        }

        let bucket = lock.by_key.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: self.capacity,
            last_refill: now,
        });
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = (bucket.tokens + (elapsed * self.refill_per_sec)).min(self.capacity);
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.buckets.lock().await.by_key.len()
    }
}

/// Reject the request with 429 once the caller's bucket is empty. Clients are
/// keyed by peer IP; requests without connection info share one bucket.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !state.limiter().allow(&key).await {
        tracing::warn!(client = %key, "rate limit exceeded");
        return Err(ApiError::TooManyRequests);
    }
    Ok(next.run(request).await)
}
