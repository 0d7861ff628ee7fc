//! Session token endpoints.

use serde_json::Value;

use crate::Result;
use crate::client::operations::{GetCurrentUser, LoginWithBasicAuth, Logout};
use crate::client::{Client, RequestOptions};

pub struct TokensResource<'a> {
    client: &'a Client,
}

impl<'a> TokensResource<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// User owning the current session.
    pub async fn current_user(&self) -> Result<Value> {
        self.client.call::<GetCurrentUser>(RequestOptions::new()).await
    }

    /// `POST /token` with caller-supplied basic credentials. The client's own
    /// bearer token is not attached.
    pub async fn login(&self, authorization: &str) -> Result<Value> {
        self.client
            .call::<LoginWithBasicAuth>(
                RequestOptions::new().header("Authorization", format!("Basic {authorization}")),
            )
            .await
    }

    /// Invalidates the session token server-side. Prefer
    /// [`Client::logout`], which also clears the cached token.
    pub async fn logout(&self) -> Result<Value> {
        self.client.call::<Logout>(RequestOptions::new()).await
    }
}
