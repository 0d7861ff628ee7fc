//! Flows: the pipelines connecting sources, nexsets and destinations.

use serde_json::Value;

use crate::Result;
use crate::client::operations::{
    DeleteFlow, DeleteFlowByResourceId, FlowActivateWithFlowId, FlowActivateWithResourceId,
    FlowCopyWithFlowId, FlowDocsRecommendation, FlowPauseWithFlowId, FlowPauseWithResourceId,
    GetFlowById, GetFlowByResourceId, GetFlows,
};
use crate::client::{Client, RequestOptions};

pub struct FlowsResource<'a> {
    client: &'a Client,
}

impl<'a> FlowsResource<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: RequestOptions) -> Result<Value> {
        self.client.call::<GetFlows>(options).await
    }

    pub async fn get(&self, flow_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<GetFlowById>(options.path_param("flow_id", flow_id))
            .await
    }

    pub async fn delete(&self, flow_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<DeleteFlow>(options.path_param("flow_id", flow_id))
            .await
    }

    pub async fn activate(&self, flow_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<FlowActivateWithFlowId>(options.path_param("flow_id", flow_id))
            .await
    }

    pub async fn pause(&self, flow_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<FlowPauseWithFlowId>(options.path_param("flow_id", flow_id))
            .await
    }

    pub async fn copy(&self, flow_id: u64, options: RequestOptions) -> Result<Value> {
        self.client
            .call::<FlowCopyWithFlowId>(options.path_param("flow_id", flow_id))
            .await
    }

    pub async fn docs_recommendation(
        &self,
        flow_id: u64,
        options: RequestOptions,
    ) -> Result<Value> {
        self.client
            .call::<FlowDocsRecommendation>(options.path_param("flow_id", flow_id))
            .await
    }

    /// Flow containing the given resource, e.g. `("data_sources", 5)`.
    pub async fn get_by_resource(
        &self,
        resource_type: &str,
        resource_id: u64,
        options: RequestOptions,
    ) -> Result<Value> {
        self.client
            .call::<GetFlowByResourceId>(by_resource(options, resource_type, resource_id))
            .await
    }

    pub async fn delete_by_resource(
        &self,
        resource_type: &str,
        resource_id: u64,
        options: RequestOptions,
    ) -> Result<Value> {
        self.client
            .call::<DeleteFlowByResourceId>(by_resource(options, resource_type, resource_id))
            .await
    }

    pub async fn activate_by_resource(
        &self,
        resource_type: &str,
        resource_id: u64,
        options: RequestOptions,
    ) -> Result<Value> {
        self.client
            .call::<FlowActivateWithResourceId>(by_resource(options, resource_type, resource_id))
            .await
    }

    pub async fn pause_by_resource(
        &self,
        resource_type: &str,
        resource_id: u64,
        options: RequestOptions,
    ) -> Result<Value> {
        self.client
            .call::<FlowPauseWithResourceId>(by_resource(options, resource_type, resource_id))
            .await
    }
}

fn by_resource(options: RequestOptions, resource_type: &str, resource_id: u64) -> RequestOptions {
    options
        .path_param("resource_type", resource_type)
        .path_param("resource_id", resource_id)
}
