// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bounded exponential-backoff retry for persistence calls.
//!
//! Decoupled from any particular operation: callers supply the operation
//! and a retryability classifier. Permission and authentication failures
//! should classify as non-retryable so they abort immediately.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry policy: bounded attempts with exponentially growing delay.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each attempt
    pub factor: u32,
    /// Cap on the delay between attempts
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            factor: 2,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Run `op`, retrying failures that `is_retryable` accepts, until it
    /// succeeds or attempts are exhausted. The final error is returned
    /// unchanged.
    pub async fn execute<T, E, F, Fut, C>(&self, mut op: F, is_retryable: C) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> bool,
        E: Display,
    {
        let mut attempt = 0u32;
        let mut delay = self.initial_delay;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && is_retryable(&err) => {
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Operation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * self.factor, self.max_delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
