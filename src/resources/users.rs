//! Users.

use serde_json::Value;

use crate::Result;
use crate::client::operations::{
    CreateUser, GetUser, GetUserExpand, GetUsers, GetUsersExpand, UpdateUser,
};
use crate::client::{Client, RequestOptions};

pub struct UsersResource<'a> {
    client: &'a Client,
}

impl<'a> UsersResource<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: RequestOptions) -> Result<Vec<Value>> {
        self.client.call::<GetUsers>(options).await
    }

    pub async fn list_expanded(&self, options: RequestOptions) -> Result<Vec<Value>> {
        self.client.call::<GetUsersExpand>(options).await
    }

    pub async fn get(&self, user_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<GetUser>(options.path_param("user_id", user_id))
            .await
    }

    pub async fn get_expanded(&self, user_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<GetUserExpand>(options.path_param("user_id", user_id))
            .await
    }

    pub async fn create(&self, body: Value) -> Result<Value> {
        self.client
            .call::<CreateUser>(RequestOptions::new().body(body))
            .await
    }

    pub async fn update(&self, user_id: u64, body: Value) -> Result<Value> {
        self.client
            .call::<UpdateUser>(RequestOptions::new().path_param("user_id", user_id).body(body))
            .await
    }
}
