use crate::error::config::ConfigError;

/// Runtime configuration, sourced from the environment with sensible
/// defaults for every tunable except the database URL.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// Shared, league-agnostic host used for login and league discovery.
    pub canonical_host: String,
    /// Optional platform API key appended to export/import calls.
    pub api_key: Option<String>,
    /// Token-bucket limit shared per process.
    pub rate_limit_calls: usize,
    pub rate_limit_window_secs: u64,
    pub retry_attempts: u32,
    pub retry_backoff_base_ms: u64,
    pub request_timeout_secs: u64,
    /// Character cap for response-body log snippets.
    pub log_body_chars: usize,
    /// Free tier: maximum recipients in one mass-offer batch.
    pub free_recipients_cap: u32,
    /// Free tier: free mass-offer sends per ISO week.
    pub free_weekly_allowance: u32,
    /// Default proposal expiration offset in days.
    pub offer_expiry_days: i64,
    /// How fresh a league sync must be before the offer builder opens.
    pub sync_max_age_hours: i64,
    /// Upper bound on concurrent fetch workers (further capped by host count).
    pub fetch_workers: usize,
    pub live_cache_ttl_secs: u64,
    pub trades_cache_ttl_secs: u64,
    /// Soft cap on users held in the per-process caches.
    pub cache_max_users: usize,
}

impl Config {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVariable("DATABASE_URL".to_string()))?;

        let mut config = Self::new(database_url, host_or_default()?);
        config.bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| config.bind_address.clone());
        config.api_key = std::env::var("MFL_APIKEY").ok().filter(|k| !k.is_empty());
        config.rate_limit_calls = read_var("RATE_LIMIT_CALLS", config.rate_limit_calls)?;
        config.rate_limit_window_secs =
            read_var("RATE_LIMIT_WINDOW_SECS", config.rate_limit_window_secs)?;
        config.retry_attempts = read_var("RETRY_ATTEMPTS", config.retry_attempts)?;
        config.retry_backoff_base_ms =
            read_var("RETRY_BACKOFF_BASE_MS", config.retry_backoff_base_ms)?;
        config.request_timeout_secs =
            read_var("REQUEST_TIMEOUT_SECS", config.request_timeout_secs)?;
        config.log_body_chars = read_var("LOG_BODY_CHARS", config.log_body_chars)?;
        config.free_recipients_cap = read_var("FREE_RECIPIENTS_CAP", config.free_recipients_cap)?;
        config.free_weekly_allowance =
            read_var("FREE_WEEKLY_ALLOWANCE", config.free_weekly_allowance)?;
        config.offer_expiry_days = read_var("OFFER_EXPIRY_DAYS", config.offer_expiry_days)?;
        config.sync_max_age_hours = read_var("SYNC_MAX_AGE_HOURS", config.sync_max_age_hours)?;
        config.fetch_workers = read_var("FETCH_WORKERS", config.fetch_workers)?;
        config.live_cache_ttl_secs = read_var("LIVE_CACHE_TTL_SECS", config.live_cache_ttl_secs)?;
        config.trades_cache_ttl_secs =
            read_var("TRADES_CACHE_TTL_SECS", config.trades_cache_ttl_secs)?;
        config.cache_max_users = read_var("CACHE_MAX_USERS", config.cache_max_users)?;

        Ok(config)
    }

    /// Build a configuration with defaults for everything but the database
    /// URL and canonical host. Used directly by tests.
    pub fn new(database_url: String, canonical_host: String) -> Self {
        Self {
            database_url,
            bind_address: "0.0.0.0:8080".to_string(),
            canonical_host,
            api_key: None,
            rate_limit_calls: 60,
            rate_limit_window_secs: 60,
            retry_attempts: 3,
            retry_backoff_base_ms: 750,
            request_timeout_secs: 20,
            log_body_chars: 800,
            free_recipients_cap: 6,
            free_weekly_allowance: 1,
            offer_expiry_days: 7,
            sync_max_age_hours: 4,
            fetch_workers: 8,
            live_cache_ttl_secs: 300,
            trades_cache_ttl_secs: 120,
            cache_max_users: 200,
        }
    }
}

fn host_or_default() -> Result<String, ConfigError> {
    Ok(std::env::var("MFL_CANONICAL_HOST")
        .unwrap_or_else(|_| "api.myfantasyleague.com".to_string()))
}

fn read_var<T: std::str::FromStr>(variable: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(variable) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            variable: variable.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
