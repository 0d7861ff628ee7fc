//! Self sign-up.

use serde_json::Value;

use crate::Result;
use crate::client::operations::{SelfSignUp, VerifyEmail};
use crate::client::{Client, RequestOptions};

pub struct SelfSignupResource<'a> {
    client: &'a Client,
}

impl<'a> SelfSignupResource<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn sign_up(&self, body: Value) -> Result<Value> {
        self.client
            .call::<SelfSignUp>(RequestOptions::new().body(body))
            .await
    }

    pub async fn verify_email(&self, token: &str) -> Result<Value> {
        self.client
            .call::<VerifyEmail>(RequestOptions::new().query("token", token))
            .await
    }
}
