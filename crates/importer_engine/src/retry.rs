use std::future::Future;
use std::time::Duration;

use importer_logging::import_warn;

use crate::types::{StoreError, StoreFailure};

/// Bounded retry around a single outbound store call.
///
/// Connectivity failures (network, timeout) are always retried after a
/// fixed delay. Of the HTTP statuses only the configured server-busy
/// status is retried; anything else surfaces immediately. The policy
/// keeps no state between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    /// HTTP status treated as "server busy, try again".
    pub busy_status: u16,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(20),
            busy_status: 429,
        }
    }
}

impl RetryPolicy {
    /// Runs `call` until it succeeds, fails non-retryably, or the attempt
    /// budget is spent. The last attempt's error is surfaced.
    pub async fn run<T, F, Fut>(&self, mut call: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && self.is_retryable(&err) => {
                    import_warn!(
                        "store call attempt {attempt}/{} failed ({err}), retrying in {:?}",
                        self.max_attempts,
                        self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn is_retryable(&self, err: &StoreError) -> bool {
        match err.kind {
            StoreFailure::Network | StoreFailure::Timeout => true,
            StoreFailure::HttpStatus(status) => status == self.busy_status,
            StoreFailure::InvalidResponse => false,
        }
    }
}
