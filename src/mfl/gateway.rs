use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    error::transport::TransportError,
    mfl::{client::HostClient, rate_limit::RateLimiter},
};

/// Factory for per-host clients.
///
/// Authentication is issued per subdomain, so one global client cannot serve
/// a user whose leagues live on different hosts; every league-scoped call
/// goes through a [`HostClient`] bound to that league's host. The gateway
/// owns the pieces they share: the HTTP connection pool, the process-wide
/// rate limiter, and the transport tunables.
#[derive(Clone)]
pub struct MflGateway {
    http: reqwest::Client,
    limiter: Arc<RateLimiter>,
    canonical_host: String,
    api_key: Option<String>,
    retry_attempts: u32,
    backoff_base: Duration,
    log_body_chars: usize,
}

impl MflGateway {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("Gridiron/0.1 (+support@gridiron.app)")
            .build()?;

        Ok(Self {
            http,
            limiter: Arc::new(RateLimiter::new(
                config.rate_limit_calls,
                Duration::from_secs(config.rate_limit_window_secs),
            )),
            canonical_host: config.canonical_host.clone(),
            api_key: config.api_key.clone(),
            retry_attempts: config.retry_attempts,
            backoff_base: Duration::from_millis(config.retry_backoff_base_ms),
            log_body_chars: config.log_body_chars,
        })
    }

    /// Client for the canonical, league-agnostic host.
    pub fn canonical(&self, season: i32) -> HostClient {
        let host = self.canonical_host.clone();
        self.host(&host, season)
    }

    /// Client bound to a league host. Accepts a bare hostname or a full
    /// origin (test servers pass `http://...`).
    pub fn host(&self, host: &str, season: i32) -> HostClient {
        HostClient::new(
            self.http.clone(),
            self.limiter.clone(),
            host,
            season,
            self.api_key.clone(),
            self.retry_attempts,
            self.backoff_base,
            self.log_body_chars,
        )
    }

    pub fn canonical_host(&self) -> &str {
        &self.canonical_host
    }
}
