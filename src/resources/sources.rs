//! Data sources.

use serde_json::Value;

use crate::Result;
use crate::client::operations::{
    ActivateSource, CopySource, CreateDataSource, DeleteDataSource, GetDataSource,
    GetDataSourceExpanded, GetDataSources, PauseSource, UpdateDataSource,
};
use crate::client::{Client, RequestOptions};

pub struct SourcesResource<'a> {
    client: &'a Client,
}

impl<'a> SourcesResource<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: RequestOptions) -> Result<Vec<Value>> {
        self.client.call::<GetDataSources>(options).await
    }

    pub async fn get(&self, source_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<GetDataSource>(options.path_param("source_id", source_id))
            .await
    }

    /// Source with its related resources inlined.
    pub async fn get_expanded(&self, source_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<GetDataSourceExpanded>(options.path_param("source_id", source_id))
            .await
    }

    pub async fn create(&self, body: Value) -> Result<Value> {
        self.client
            .call::<CreateDataSource>(RequestOptions::new().body(body))
            .await
    }

    pub async fn update(&self, source_id: u64, body: Value) -> Result<Value> {
        self.client
            .call::<UpdateDataSource>(
                RequestOptions::new()
                    .path_param("source_id", source_id)
                    .body(body),
            )
            .await
    }

    pub async fn delete(&self, source_id: u64) -> Result<Value> {
        self.client
            .call::<DeleteDataSource>(RequestOptions::new().path_param("source_id", source_id))
            .await
    }

    pub async fn activate(&self, source_id: u64) -> Result<Value> {
        self.client
            .call::<ActivateSource>(RequestOptions::new().path_param("source_id", source_id))
            .await
    }

    pub async fn pause(&self, source_id: u64) -> Result<Value> {
        self.client
            .call::<PauseSource>(RequestOptions::new().path_param("source_id", source_id))
            .await
    }

    pub async fn copy(&self, source_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<CopySource>(options.path_param("source_id", source_id))
            .await
    }
}
