//! Resilience layer for the Nexla API client.
//!
//! Retries transient statuses and transport failures with exponential
//! backoff, honoring `Retry-After` when the server sends one.

mod backoff;

pub use backoff::ExponentialBackoff;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;

use super::transport::HttpTransport;
use crate::{Error, Result};

pub const DEFAULT_RETRY_ON: [u16; 4] = [429, 502, 503, 504];

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub backoff: ExponentialBackoff,
    pub retry_on: HashSet<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: ExponentialBackoff::default(),
            retry_on: DEFAULT_RETRY_ON.into_iter().collect(),
        }
    }
}

impl RetryConfig {
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.backoff = ExponentialBackoff::new(initial, max);
        self
    }

    /// Replaces the set of statuses treated as transient.
    pub fn retry_on(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retry_on = statuses.into_iter().collect();
        self
    }

    pub fn is_retryable(&self, status: u16) -> bool {
        self.retry_on.contains(&status)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backoff.initial().is_zero() {
            return Err(Error::config("retry backoff must be greater than zero"));
        }
        if self.backoff.max() < self.backoff.initial() {
            return Err(Error::config(format!(
                "max backoff ({:?}) must not be below the initial backoff ({:?})",
                self.backoff.max(),
                self.backoff.initial()
            )));
        }
        Ok(())
    }
}

/// Wraps a base transport and replays requests on transient failures.
///
/// Makes at most `max_retries + 1` attempts. When retries run out the last
/// response (whatever its status) or the last transport error is returned
/// unchanged. Requests whose body cannot be cloned are sent exactly once.
#[derive(Debug, Clone)]
pub struct RetryingTransport {
    inner: Arc<dyn HttpTransport>,
    config: RetryConfig,
}

impl RetryingTransport {
    pub fn new(inner: Arc<dyn HttpTransport>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn inner(&self) -> &Arc<dyn HttpTransport> {
        &self.inner
    }
}

#[async_trait]
impl HttpTransport for RetryingTransport {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        let template = request.try_clone();
        if template.is_none() && self.config.max_retries > 0 {
            tracing::debug!(url = %request.url(), "Request body is not replayable, retries disabled");
        }

        let mut next = Some(request);
        let mut attempt: u32 = 0;

        loop {
            let current = match next.take() {
                Some(request) => request,
                None => template
                    .as_ref()
                    .and_then(reqwest::Request::try_clone)
                    .ok_or_else(|| Error::InvalidRequest("request body cannot be replayed".into()))?,
            };
            let can_retry = attempt < self.config.max_retries && template.is_some();

            match self.inner.send(current).await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !can_retry || !self.config.is_retryable(status) {
                        return Ok(response);
                    }

                    let hint = response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok());
                    let delay = self.config.backoff.delay_for(attempt, hint);

                    tracing::debug!(
                        status,
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Retryable status, backing off"
                    );
                    drop(response);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if !can_retry {
                        return Err(e);
                    }

                    let delay = self.config.backoff.delay_for(attempt, None);
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }

            attempt += 1;
        }
    }
}
