use std::sync::Arc;

use site_forge_core::WebsiteService;

use crate::cache::ResponseCache;
use crate::config::AppConfig;
use crate::middleware::rate_limit::RateLimiter;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    service: WebsiteService,
    config: AppConfig,
    cache: ResponseCache,
    limiter: RateLimiter,
}

impl AppState {
    pub fn new(service: WebsiteService, config: AppConfig, cache: ResponseCache) -> Self {
        let limiter = RateLimiter::per_minute(config.rate_limit_per_minute);
        Self {
            inner: Arc::new(InnerState {
                service,
                config,
                cache,
                limiter,
            }),
        }
    }

    pub fn service(&self) -> &WebsiteService {
        &self.inner.service
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.inner.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.inner.limiter
    }
}
