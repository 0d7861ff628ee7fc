//! Nexsets: the platform's logical datasets (`/data_sets`).

use serde_json::Value;

use crate::Result;
use crate::client::operations::{
    ActivateNexset, CopyNexset, CreateNexset, DataSetDocsRecommendation, DeleteNexset, GetNexset,
    GetNexsetSamples, GetNexsets, PauseNexset, UpdateNexset,
};
use crate::client::{Client, RequestOptions};

pub struct NexsetsResource<'a> {
    client: &'a Client,
}

impl<'a> NexsetsResource<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: RequestOptions) -> Result<Vec<Value>> {
        self.client.call::<GetNexsets>(options).await
    }

    pub async fn get(&self, set_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<GetNexset>(options.path_param("set_id", set_id))
            .await
    }

    pub async fn create(&self, body: Value) -> Result<Value> {
        self.client
            .call::<CreateNexset>(RequestOptions::new().body(body))
            .await
    }

    pub async fn update(&self, set_id: u64, body: Value) -> Result<Value> {
        self.client
            .call::<UpdateNexset>(RequestOptions::new().path_param("set_id", set_id).body(body))
            .await
    }

    pub async fn delete(&self, set_id: u64) -> Result<Value> {
        self.client
            .call::<DeleteNexset>(RequestOptions::new().path_param("set_id", set_id))
            .await
    }

    pub async fn activate(&self, set_id: u64) -> Result<Value> {
        self.client
            .call::<ActivateNexset>(RequestOptions::new().path_param("set_id", set_id))
            .await
    }

    pub async fn pause(&self, set_id: u64) -> Result<Value> {
        self.client
            .call::<PauseNexset>(RequestOptions::new().path_param("set_id", set_id))
            .await
    }

    pub async fn copy(&self, set_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<CopyNexset>(options.path_param("set_id", set_id))
            .await
    }

    /// Sample records flowing through the nexset.
    pub async fn samples(&self, set_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<GetNexsetSamples>(options.path_param("set_id", set_id))
            .await
    }

    pub async fn docs_recommendation(
        &self,
        set_id: u64,
        options: RequestOptions,
    ) -> Result<Value> {
        self.client
            .call::<DataSetDocsRecommendation>(options.path_param("data_set_id", set_id))
            .await
    }
}
