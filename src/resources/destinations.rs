//! Destinations (data sinks).

use serde_json::Value;

use crate::Result;
use crate::client::operations::{
    ActivateDataSink, CopyDataSink, CreateDataSink, DeleteDataSink, GetDataSink,
    GetDataSinkExpanded, GetDataSinks, PauseDataSink, UpdateDataSink,
};
use crate::client::{Client, RequestOptions};

pub struct DestinationsResource<'a> {
    client: &'a Client,
}

impl<'a> DestinationsResource<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: RequestOptions) -> Result<Vec<Value>> {
        self.client.call::<GetDataSinks>(options).await
    }

    pub async fn get(&self, sink_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<GetDataSink>(options.path_param("sink_id", sink_id))
            .await
    }

    pub async fn get_expanded(&self, sink_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<GetDataSinkExpanded>(options.path_param("sink_id", sink_id))
            .await
    }

    pub async fn create(&self, body: Value) -> Result<Value> {
        self.client
            .call::<CreateDataSink>(RequestOptions::new().body(body))
            .await
    }

    pub async fn update(&self, sink_id: u64, body: Value) -> Result<Value> {
        self.client
            .call::<UpdateDataSink>(RequestOptions::new().path_param("sink_id", sink_id).body(body))
            .await
    }

    pub async fn delete(&self, sink_id: u64) -> Result<Value> {
        self.client
            .call::<DeleteDataSink>(RequestOptions::new().path_param("sink_id", sink_id))
            .await
    }

    pub async fn activate(&self, sink_id: u64) -> Result<Value> {
        self.client
            .call::<ActivateDataSink>(RequestOptions::new().path_param("sink_id", sink_id))
            .await
    }

    pub async fn pause(&self, sink_id: u64) -> Result<Value> {
        self.client
            .call::<PauseDataSink>(RequestOptions::new().path_param("sink_id", sink_id))
            .await
    }

    pub async fn copy(&self, sink_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<CopyDataSink>(options.path_param("sink_id", sink_id))
            .await
    }
}
