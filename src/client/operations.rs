//! Declared API operations.
//!
//! Each operation is a zero-sized type implementing [`Operation`], binding an
//! identifier to its HTTP method, path template and decoded result shape.
//! [`Client::call`](crate::Client::call) dispatches on the type.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A declared API operation.
pub trait Operation {
    const ID: OperationId;
    const METHOD: Method;
    /// Path template relative to the base URL, with `{name}` segments.
    const PATH: &'static str;
    /// Sent without credentials.
    const SKIP_AUTH: bool = false;

    type Output: DeserializeOwned;
}

macro_rules! operations {
    ($(
        $(#[$meta:meta])*
        $name:ident = $id:literal, $method:ident $path:literal -> $output:ty $(, skip_auth = $skip:literal)?;
    )*) => {
        /// Identifier of every declared operation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum OperationId {
            $($name,)*
        }

        impl OperationId {
            pub const ALL: &'static [OperationId] = &[$(OperationId::$name,)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(OperationId::$name => $id,)*
                }
            }

            pub fn method(&self) -> Method {
                match self {
                    $(OperationId::$name => Method::$method,)*
                }
            }

            pub fn path(&self) -> &'static str {
                match self {
                    $(OperationId::$name => $path,)*
                }
            }
        }

        impl std::fmt::Display for OperationId {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            impl Operation for $name {
                const ID: OperationId = OperationId::$name;
                const METHOD: Method = Method::$method;
                const PATH: &'static str = $path;
                $(const SKIP_AUTH: bool = $skip;)?
                type Output = $output;
            }
        )*
    };
}

operations! {
    // Flows
    GetFlows = "get_flows", GET "/flows" -> Value;
    GetFlowById = "get_flow_by_id", GET "/flows/{flow_id}" -> Value;
    GetFlowByResourceId = "get_flow_by_resource_id", GET "/{resource_type}/{resource_id}/flow" -> Value;
    DeleteFlow = "delete_flow", DELETE "/flows/{flow_id}" -> Value;
    DeleteFlowByResourceId = "delete_flow_by_resource_id", DELETE "/{resource_type}/{resource_id}/flow" -> Value;
    FlowActivateWithFlowId = "flow_activate_with_flow_id", PUT "/flows/{flow_id}/activate" -> Value;
    FlowActivateWithResourceId = "flow_activate_with_resource_id", PUT "/{resource_type}/{resource_id}/activate" -> Value;
    FlowPauseWithFlowId = "flow_pause_with_flow_id", PUT "/flows/{flow_id}/pause" -> Value;
    FlowPauseWithResourceId = "flow_pause_with_resource_id", PUT "/{resource_type}/{resource_id}/pause" -> Value;
    FlowCopyWithFlowId = "flow_copy_with_flow_id", POST "/flows/{flow_id}/copy" -> Value;
    FlowDocsRecommendation = "flow_docs_recommendation", POST "/flows/{flow_id}/docs/recommendation" -> Value;

    // Data sources
    GetDataSources = "get_data_sources", GET "/data_sources" -> Vec<Value>;
    CreateDataSource = "create_data_source", POST "/data_sources" -> Value;
    GetDataSource = "get_data_source", GET "/data_sources/{source_id}" -> Value;
    GetDataSourceExpanded = "get_data_source_expanded", GET "/data_sources/{source_id}?expand=1" -> Value;
    UpdateDataSource = "update_data_source", PUT "/data_sources/{source_id}" -> Value;
    DeleteDataSource = "delete_data_source", DELETE "/data_sources/{source_id}" -> Value;
    ActivateSource = "activate_source", PUT "/data_sources/{source_id}/activate" -> Value;
    PauseSource = "pause_source", PUT "/data_sources/{source_id}/pause" -> Value;
    CopySource = "copy_source", POST "/data_sources/{source_id}/copy" -> Value;

    // Data sinks
    GetDataSinks = "get_data_sinks", GET "/data_sinks" -> Vec<Value>;
    CreateDataSink = "create_data_sink", POST "/data_sinks" -> Value;
    GetDataSink = "get_data_sink", GET "/data_sinks/{sink_id}" -> Value;
    GetDataSinkExpanded = "get_data_sink_expanded", GET "/data_sinks/{sink_id}?expand=1" -> Value;
    UpdateDataSink = "update_data_sink", PUT "/data_sinks/{sink_id}" -> Value;
    DeleteDataSink = "delete_data_sink", DELETE "/data_sinks/{sink_id}" -> Value;
    ActivateDataSink = "activate_data_sink", PUT "/data_sinks/{sink_id}/activate" -> Value;
    PauseDataSink = "pause_data_sink", PUT "/data_sinks/{sink_id}/pause" -> Value;
    CopyDataSink = "copy_data_sink_source", POST "/data_sinks/{sink_id}/copy" -> Value;

    // Nexsets
    GetNexsets = "get_nexsets", GET "/data_sets" -> Vec<Value>;
    CreateNexset = "create_nexset", POST "/data_sets" -> Value;
    GetNexset = "get_nexset", GET "/data_sets/{set_id}" -> Value;
    UpdateNexset = "update_nexset", PUT "/data_sets/{set_id}" -> Value;
    DeleteNexset = "delete_nexset", DELETE "/data_sets/{set_id}" -> Value;
    ActivateNexset = "activate_nexset", PUT "/data_sets/{set_id}/activate" -> Value;
    PauseNexset = "pause_nexset", PUT "/data_sets/{set_id}/pause" -> Value;
    CopyNexset = "copy_nexset", POST "/data_sets/{set_id}/copy" -> Value;
    GetNexsetSamples = "get_nexset_samples", GET "/data_sets/{set_id}/samples" -> Value;
    DataSetDocsRecommendation = "data_set_docs_recommendation", POST "/data_sets/{data_set_id}/docs/recommendation" -> Value;

    // Data credentials
    GetDataCredentials = "get_data_credentials", GET "/data_credentials" -> Vec<Value>;
    CreateDataCredential = "create_data_credential", POST "/data_credentials" -> Value;
    GetDataCredential = "get_data_credential", GET "/data_credentials/{credential_id}" -> Value;
    GetDataCredentialExpanded = "get_data_credential_expanded", GET "/data_credentials/{credential_id}?expand=1" -> Value;
    UpdateDataCredential = "update_data_credential", PUT "/data_credentials/{credential_id}" -> Value;
    DeleteDataCredential = "delete_data_credential", DELETE "/data_credentials/{credential_id}" -> Value;
    DataCredentialProbe = "data_credential_probe", GET "/data_credentials/{credential_id}/probe" -> Value;
    PreviewConnectorContent = "preview_connector_content", POST "/data_credentials/{credential_id}/probe/sample" -> Value;
    PreviewStorageStructure = "preview_storage_structure", POST "/data_credentials/{credential_id}/probe/tree" -> Value;

    // Users
    GetUsers = "get_users", GET "/users" -> Vec<Value>;
    GetUsersExpand = "get_users_expand", GET "/users?expand=1" -> Vec<Value>;
    CreateUser = "create_user", POST "/users" -> Value;
    GetUser = "get_user", GET "/users/{user_id}" -> Value;
    GetUserExpand = "get_user_expand", GET "/users/{user_id}?expand=1" -> Value;
    UpdateUser = "update_user", PUT "/users/{user_id}" -> Value;

    // Session tokens
    GetCurrentUser = "get_current_user", GET "/users/current" -> Value;
    /// Exchanges basic-auth credentials for a session token.
    LoginWithBasicAuth = "login_with_basic_auth", POST "/token" -> Value, skip_auth = true;
    Logout = "logout", POST "/token/logout" -> Value;

    // Self sign-up
    SelfSignUp = "self_sign_up", POST "/signup" -> Value;
    VerifyEmail = "verify_email", GET "/signup/verify_email" -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_operation_metadata() {
        assert_eq!(GetFlowById::ID.as_str(), "get_flow_by_id");
        assert_eq!(GetFlowById::METHOD, Method::GET);
        assert_eq!(GetFlowById::PATH, "/flows/{flow_id}");
        assert!(!GetFlowById::SKIP_AUTH);
        assert!(LoginWithBasicAuth::SKIP_AUTH);
        assert_eq!(CopyDataSink::ID.to_string(), "copy_data_sink_source");
    }

    #[test]
    fn test_identifiers_unique() {
        let ids: HashSet<_> = OperationId::ALL.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids.len(), OperationId::ALL.len());
    }

    #[test]
    fn test_id_matches_trait_constants() {
        assert_eq!(OperationId::PauseNexset.method(), PauseNexset::METHOD);
        assert_eq!(OperationId::PauseNexset.path(), PauseNexset::PATH);
    }
}
