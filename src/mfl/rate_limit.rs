use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Sliding-window rate limiter shared by every remote call in the process.
///
/// The call history is an explicit field of this service, not module state;
/// the limiter is owned by `AppState` and passed by reference.
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            calls: Mutex::new(VecDeque::new()),
        }
    }

    /// Wait until a call slot is free, then claim it.
    pub async fn acquire(&self) {
        loop {
            let now = Instant::now();
            let mut calls = self.calls.lock().await;
            while calls
                .front()
                .is_some_and(|t| now.duration_since(*t) >= self.window)
            {
                calls.pop_front();
            }

            if calls.len() < self.max_calls {
                calls.push_back(now);
                return;
            }

            // Sleep until the oldest call ages out of the window.
            let oldest = *calls.front().expect("non-empty at capacity");
            drop(calls);
            let wait = self.window.saturating_sub(now.duration_since(oldest));
            tokio::time::sleep(wait).await;
        }
    }
}
