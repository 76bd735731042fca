use super::transport::TransportError;

/// Strategy for handling a transport failure in a retry context.
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (rate limiting, server errors).
    Retry,
    /// Failed permanently (bad request, expired auth).
    Fail,
}

/// HTTP statuses the transport retries before giving up.
pub const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

impl TransportError {
    /// Determine the retry strategy for a transport failure.
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            // The session is gone; retrying the same cookie cannot succeed.
            Self::AuthExpired => ErrorRetryStrategy::Fail,

            Self::Status { status, .. } => {
                if RETRY_STATUSES.contains(status) {
                    ErrorRetryStrategy::Retry
                } else {
                    ErrorRetryStrategy::Fail
                }
            }

            // Cycling login variants already embeds its own fallback chain.
            Self::LoginFailed { .. } => ErrorRetryStrategy::Fail,

            Self::Network(err) => {
                if let Some(status) = err.status() {
                    if RETRY_STATUSES.contains(&status.as_u16()) {
                        ErrorRetryStrategy::Retry
                    } else {
                        ErrorRetryStrategy::Fail
                    }
                } else {
                    // Timeout, DNS, or connection issue - worth another attempt.
                    ErrorRetryStrategy::Retry
                }
            }
        }
    }
}
