//! Base HTTP send primitive.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::{Error, Result};

/// Sends one fully-built request and hands back whatever response arrived.
///
/// Non-success statuses are still `Ok`; only a failure to obtain a response
/// at all is an `Err`. Implement this to swap the HTTP stack, e.g. in tests.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response>;
}

#[async_trait]
impl HttpTransport for reqwest::Client {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        self.execute(request).await.map_err(Error::Network)
    }
}
