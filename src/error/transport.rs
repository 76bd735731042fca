use thiserror::Error;

/// Errors raised by the remote-host transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The remote host rejected our credentials (401/403). Callers must
    /// prompt the user to re-link rather than retry.
    #[error("Remote host auth failed or session expired")]
    AuthExpired,
    /// Non-2xx response that is neither an auth failure nor retryable, with
    /// a body snippet capped at 300 characters.
    #[error("Remote request failed ({status}): {snippet}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        snippet: String,
    },
    /// No login endpoint variant produced a session cookie.
    #[error("Login to {host} failed: {reason}")]
    LoginFailed {
        /// Host the login was attempted against.
        host: String,
        /// Last error seen while cycling login endpoint variants.
        reason: String,
    },
    /// Underlying network failure (timeout, DNS, connection reset).
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}
