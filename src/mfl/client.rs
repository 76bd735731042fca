use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};
use tokio::time::Instant;

use crate::{
    error::{retry::RETRY_STATUSES, transport::TransportError},
    mfl::rate_limit::RateLimiter,
};

/// Byte cap for the body snippet embedded in a [`TransportError::Status`].
const ERROR_SNIPPET_CHARS: usize = 300;

/// Cookie-first client bound to a single `(host, season)` pair, speaking the
/// platform's XML export/import endpoints.
pub struct HostClient {
    http: reqwest::Client,
    limiter: Arc<RateLimiter>,
    host: String,
    base: String,
    api_key: Option<String>,
    retry_attempts: u32,
    backoff_base: Duration,
    log_body_chars: usize,
}

impl HostClient {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        http: reqwest::Client,
        limiter: Arc<RateLimiter>,
        host: &str,
        season: i32,
        api_key: Option<String>,
        retry_attempts: u32,
        backoff_base: Duration,
        log_body_chars: usize,
    ) -> Self {
        let origin = normalize_origin(host);
        let base = format!("{origin}/{season}");
        Self {
            http,
            limiter,
            host: host_name(&origin),
            base,
            api_key,
            retry_attempts,
            backoff_base,
            log_body_chars,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Log in and return a raw `Cookie` header string.
    ///
    /// Tries the known endpoint variants in order; credentials are never
    /// logged (the login path logs URLs with the query stripped).
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, TransportError> {
        self.limiter.acquire().await;

        const CANDIDATES: [(&str, &str); 4] = [
            ("POST", "login"),
            ("POST", "account/login"),
            ("GET", "login"),
            ("GET", "account/login"),
        ];

        let params = [
            ("USERNAME", username),
            ("PASSWORD", password),
            ("XML", "1"),
        ];

        let mut last_error = String::new();
        for (method, path) in CANDIDATES {
            let url = format!("{}/{}", self.base, path);
            tracing::info!(host = %self.host, method, path, "login attempt");

            let result = if method == "POST" {
                self.http.post(&url).form(&params).send().await
            } else {
                self.http.get(&url).query(&params).send().await
            };

            let response = match result {
                Ok(response) => response,
                Err(err) => {
                    last_error = err.to_string();
                    continue;
                }
            };

            let status = response.status().as_u16();
            tracing::info!(host = %self.host, method, path, status, "login response");

            if status >= 400 {
                last_error = format!("{path} {status}");
                continue;
            }

            let cookie = extract_cookie_header(response.headers());
            if !cookie.is_empty() {
                return Ok(cookie);
            }
            last_error = format!("{path}: no session cookie returned");
        }

        Err(TransportError::LoginFailed {
            host: self.host.clone(),
            reason: if last_error.is_empty() {
                "unknown error".to_string()
            } else {
                last_error
            },
        })
    }

    /// GET against the read-side `export` endpoint.
    pub async fn export(
        &self,
        type_: &str,
        params: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<String, TransportError> {
        self.request("export", type_, params, token).await
    }

    /// GET against the write-side `import` endpoint.
    pub async fn import(
        &self,
        type_: &str,
        params: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<String, TransportError> {
        self.request("import", type_, params, token).await
    }

    async fn request(
        &self,
        endpoint: &str,
        type_: &str,
        params: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<String, TransportError> {
        let url = format!("{}/{}", self.base, endpoint);
        let label = format!("GET {endpoint}:{type_}");

        let mut query: Vec<(String, String)> =
            vec![("TYPE".to_string(), type_.to_string()), ("XML".to_string(), "1".to_string())];
        for (key, value) in params {
            query.push((key.to_string(), value.to_string()));
        }

        // Cross-subdomain auth helpers: the user id from the cookie travels
        // as a query parameter too, alongside the optional platform API key.
        if let Some(user_id) = token.and_then(extract_user_id) {
            if !query.iter().any(|(k, _)| k == "MFL_USER_ID") {
                query.push(("MFL_USER_ID".to_string(), user_id));
            }
        }
        if let Some(api_key) = &self.api_key {
            if !query.iter().any(|(k, _)| k == "APIKEY") {
                query.push(("APIKEY".to_string(), api_key.clone()));
            }
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            self.limiter.acquire().await;

            let started = Instant::now();
            let mut request = self.http.get(&url).query(&query);
            if let Some(token) = token {
                request = request.header(COOKIE, token);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    if err.status().is_none() && attempt <= self.retry_attempts {
                        tracing::warn!(host = %self.host, %label, attempt, error = %err, "transport error, retrying");
                        tokio::time::sleep(self.backoff(attempt)).await;
                        continue;
                    }
                    return Err(TransportError::Network(err));
                }
            };

            let status = response.status().as_u16();
            let final_url = response.url().to_string();
            let elapsed_ms = started.elapsed().as_millis() as u64;
            let body = response.text().await.unwrap_or_default();

            if RETRY_STATUSES.contains(&status) && attempt <= self.retry_attempts {
                self.log_call(&label, &final_url, status, elapsed_ms, &body);
                tokio::time::sleep(self.backoff(attempt)).await;
                continue;
            }

            if status == 401 || status == 403 {
                return Err(TransportError::AuthExpired);
            }

            if !(200..300).contains(&status) {
                return Err(TransportError::Status {
                    status,
                    snippet: truncate_chars(body.trim(), ERROR_SNIPPET_CHARS),
                });
            }

            self.log_call(&label, &final_url, status, elapsed_ms, &body);
            return Ok(body);
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base * 2_u32.pow(attempt.saturating_sub(1))
    }

    fn log_call(&self, label: &str, url: &str, status: u16, elapsed_ms: u64, body: &str) {
        tracing::info!(
            %label,
            status,
            elapsed_ms,
            %url,
            body_snippet = %truncate_chars(body, self.log_body_chars),
            "remote call"
        );
    }
}

/// Accept a bare hostname or a full origin; strip any trailing slash.
fn normalize_origin(host: &str) -> String {
    let trimmed = host.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn host_name(origin: &str) -> String {
    origin
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Build a `Cookie` header from the response's `Set-Cookie` headers.
fn extract_cookie_header(headers: &reqwest::header::HeaderMap) -> String {
    let cookies: Vec<String> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|raw| raw.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(str::to_string)
        .collect();

    cookies.join("; ")
}

/// Pull `MFL_USER_ID` out of the cookie string, decoding percent escapes so
/// the value is not double-encoded when it travels as a query parameter.
pub fn extract_user_id(cookie: &str) -> Option<String> {
    for part in cookie.split(';') {
        if let Some((key, value)) = part.trim().split_once('=') {
            if key == "MFL_USER_ID" && !value.is_empty() {
                return Some(
                    urlencoding::decode(value)
                        .map(|decoded| decoded.into_owned())
                        .unwrap_or_else(|_| value.to_string()),
                );
            }
        }
    }
    None
}

fn truncate_chars(text: &str, limit: usize) -> String {
    let count = text.chars().count();
    if count <= limit {
        return text.to_string();
    }
    let head: String = text.chars().take(limit).collect();
    format!("{head}... [truncated {} chars]", count - limit)
}
