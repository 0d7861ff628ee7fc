//! Data credentials and connector probing.

use serde_json::Value;

use crate::Result;
use crate::client::operations::{
    CreateDataCredential, DataCredentialProbe, DeleteDataCredential, GetDataCredential,
    GetDataCredentialExpanded, GetDataCredentials, PreviewConnectorContent,
    PreviewStorageStructure, UpdateDataCredential,
};
use crate::client::{Client, RequestOptions};

pub struct CredentialsResource<'a> {
    client: &'a Client,
}

impl<'a> CredentialsResource<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: RequestOptions) -> Result<Vec<Value>> {
        self.client.call::<GetDataCredentials>(options).await
    }

    pub async fn get(&self, credential_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<GetDataCredential>(options.path_param("credential_id", credential_id))
            .await
    }

    pub async fn get_expanded(&self, credential_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<GetDataCredentialExpanded>(options.path_param("credential_id", credential_id))
            .await
    }

    pub async fn create(&self, body: Value) -> Result<Value> {
        self.client
            .call::<CreateDataCredential>(RequestOptions::new().body(body))
            .await
    }

    pub async fn update(&self, credential_id: u64, body: Value) -> Result<Value> {
        self.client
            .call::<UpdateDataCredential>(
                RequestOptions::new()
                    .path_param("credential_id", credential_id)
                    .body(body),
            )
            .await
    }

    pub async fn delete(&self, credential_id: u64) -> Result<Value> {
        self.client
            .call::<DeleteDataCredential>(
                RequestOptions::new().path_param("credential_id", credential_id),
            )
            .await
    }

    /// Checks that the credential can reach its backing system.
    pub async fn probe(&self, credential_id: u64) -> Result<Value> {
        self.client
            .call::<DataCredentialProbe>(
                RequestOptions::new().path_param("credential_id", credential_id),
            )
            .await
    }

    pub async fn preview_content(&self, credential_id: u64, body: Value) -> Result<Value> {
        self.client
            .call::<PreviewConnectorContent>(
                RequestOptions::new()
                    .path_param("credential_id", credential_id)
                    .body(body),
            )
            .await
    }

    pub async fn preview_structure(&self, credential_id: u64, body: Value) -> Result<Value> {
        self.client
            .call::<PreviewStorageStructure>(
                RequestOptions::new()
                    .path_param("credential_id", credential_id)
                    .body(body),
            )
            .await
    }
}
