//! Exponential backoff around outbound provider calls.
//!
//! A call is retried when it fails at the transport level or when the provider
//! answers `429 Too Many Requests`. Every other response is handed back
//! untouched for the caller to interpret.

use crate::models::RetryPolicy;
use crate::{Error, Result};
use reqwest::StatusCode;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio_retry::Retry;

/// Responses that can signal provider-side rate limiting.
pub trait RateLimitSignal {
    fn is_rate_limited(&self) -> bool;
}

impl RateLimitSignal for reqwest::Response {
    fn is_rate_limited(&self) -> bool {
        self.status() == StatusCode::TOO_MANY_REQUESTS
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BackoffExecutor {
    policy: RetryPolicy,
}

impl Default for BackoffExecutor {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl BackoffExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Total attempts made before giving up. Never less than one.
    pub fn max_attempts(&self) -> usize {
        self.policy.max_retries.max(1)
    }

    /// Sleeps between attempts: `initial, 2*initial, 4*initial, ...`, one fewer
    /// than the number of attempts.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        std::iter::successors(Some(self.policy.initial_delay), |delay| {
            Some(delay.saturating_mul(2))
        })
        .take(self.max_attempts() - 1)
    }

    /// Runs `call` until it yields a response that is not rate limited.
    ///
    /// Dropping the returned future cancels any pending sleep along with the
    /// remaining attempts.
    pub async fn execute<F, Fut, R, E>(&self, mut call: F) -> Result<R>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<R, E>>,
        R: RateLimitSignal,
        E: Display,
    {
        let max_attempts = self.max_attempts();
        let mut attempts = 0usize;

        let strategy = self.delays().inspect(|delay| {
            tracing::debug!("Backing off for {:?} before next attempt", delay);
        });

        let outcome = Retry::spawn(strategy, || {
            attempts += 1;
            let attempt = attempts;
            let pending = call();
            async move {
                match pending.await {
                    Ok(response) if response.is_rate_limited() => {
                        tracing::warn!(
                            "API call rate limited (429) on attempt {}/{}",
                            attempt,
                            max_attempts
                        );
                        Err("rate limited (status 429)".to_string())
                    }
                    Ok(response) => Ok(response),
                    Err(e) => {
                        tracing::error!(
                            "API call failed on attempt {}/{}: {}",
                            attempt,
                            max_attempts,
                            e
                        );
                        Err(e.to_string())
                    }
                }
            }
        })
        .await;

        outcome.map_err(|last_error| {
            tracing::error!("API call failed after {} attempts", attempts);
            Error::RetriesExhausted {
                attempts,
                last_error,
            }
        })
    }
}
