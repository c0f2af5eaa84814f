//! Bounded, fixed-delay retries around remote calls.

use crate::error::PipelineError;
use std::thread;
use std::time::Duration;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts made after the first one fails.
    pub retries: u32,
    pub delay: Duration,
}

/// Catalog listing: one call per run, so it can afford a long back-off.
pub const CATALOG_RETRY: RetryPolicy = RetryPolicy {
    retries: 3,
    delay: Duration::from_secs(10),
};

pub const DETAIL_RETRY: RetryPolicy = RetryPolicy {
    retries: 2,
    delay: Duration::from_secs(5),
};

impl RetryPolicy {
    pub fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Run `op` until it succeeds or the policy is exhausted.
///
/// Only `RemoteFetch` failures are retried; anything else is returned on the
/// spot.
pub fn retry<T>(
    policy: &RetryPolicy,
    label: &str,
    mut op: impl FnMut() -> Result<T, PipelineError>,
) -> Result<T, PipelineError> {
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_remote_fetch() && attempt < max_attempts => {
                warn!(
                    "{label}: attempt {attempt}/{max_attempts} failed: {err}; retrying in {:?}",
                    policy.delay
                );
                thread::sleep(policy.delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
