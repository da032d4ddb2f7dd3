//! Provider capability served to the orchestrator.
//!
//! # Data Flow
//! ```text
//! version string
//!     → ProviderFactory::construct (pure, no I/O)
//!     → Arc<dyn Provider> (owned by the serve loop)
//!
//! POST /provider/{method} (JSON params)
//!     → dispatch() (method name → typed request)
//!     → Provider trait call
//!     → JSON response
//! ```

pub mod dockhand;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use dockhand::{DockhandProvider, DockhandProviderFactory};
pub use types::{
    ApplyResourceChangeRequest, ConfigureRequest, Diagnostic, DiagnosticsResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, PlanResourceChangeRequest,
    ProviderMetadata, ProviderSchema, ReadDataSourceRequest, ReadResourceRequest, StateResponse,
    ValidateResourceConfigRequest,
};

/// Schema introspection and resource lifecycle dispatch.
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    fn metadata(&self) -> ProviderMetadata;

    fn schema(&self) -> ProviderSchema;

    async fn configure(&self, request: ConfigureRequest) -> DiagnosticsResponse;

    /// Cancel in-flight work. Called before the orchestrator stops the plugin.
    async fn stop(&self) -> DiagnosticsResponse {
        DiagnosticsResponse::default()
    }

    async fn validate_resource_config(
        &self,
        request: ValidateResourceConfigRequest,
    ) -> DiagnosticsResponse;

    async fn read_resource(&self, request: ReadResourceRequest) -> StateResponse;

    async fn plan_resource_change(&self, request: PlanResourceChangeRequest) -> StateResponse;

    async fn apply_resource_change(&self, request: ApplyResourceChangeRequest) -> StateResponse;

    async fn import_resource_state(
        &self,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse;

    async fn read_data_source(&self, request: ReadDataSourceRequest) -> StateResponse;
}

/// Failure while building the provider handle. Always a programming defect.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ConstructionError(pub String);

/// Builds the provider handle for a given build version.
pub trait ProviderFactory: Send + Sync {
    /// Must be deterministic and perform no I/O.
    fn construct(&self, version: &str) -> Result<Arc<dyn Provider>, ConstructionError>;
}

/// Errors from routing an RPC into the provider.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("invalid params for {method}: {source}")]
    InvalidParams {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {method} response: {source}")]
    Encode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

/// RPC method names understood by [`dispatch`].
pub const METHODS: &[&str] = &[
    "GetMetadata",
    "GetProviderSchema",
    "ConfigureProvider",
    "StopProvider",
    "ValidateResourceConfig",
    "ReadResource",
    "PlanResourceChange",
    "ApplyResourceChange",
    "ImportResourceState",
    "ReadDataSource",
];

/// Route one RPC call into the provider.
pub async fn dispatch(
    provider: &dyn Provider,
    method: &str,
    params: Value,
) -> Result<Value, DispatchError> {
    match method {
        "GetMetadata" => encode(method, provider.metadata()),
        "GetProviderSchema" => encode(method, provider.schema()),
        "ConfigureProvider" => {
            let request = decode(method, params)?;
            encode(method, provider.configure(request).await)
        }
        "StopProvider" => encode(method, provider.stop().await),
        "ValidateResourceConfig" => {
            let request = decode(method, params)?;
            encode(method, provider.validate_resource_config(request).await)
        }
        "ReadResource" => {
            let request = decode(method, params)?;
            encode(method, provider.read_resource(request).await)
        }
        "PlanResourceChange" => {
            let request = decode(method, params)?;
            encode(method, provider.plan_resource_change(request).await)
        }
        "ApplyResourceChange" => {
            let request = decode(method, params)?;
            encode(method, provider.apply_resource_change(request).await)
        }
        "ImportResourceState" => {
            let request = decode(method, params)?;
            encode(method, provider.import_resource_state(request).await)
        }
        "ReadDataSource" => {
            let request = decode(method, params)?;
            encode(method, provider.read_data_source(request).await)
        }
        other => Err(DispatchError::UnknownMethod(other.to_string())),
    }
}

fn decode<T: DeserializeOwned>(method: &str, params: Value) -> Result<T, DispatchError> {
    serde_json::from_value(params).map_err(|source| DispatchError::InvalidParams {
        method: method.to_string(),
        source,
    })
}

fn encode<T: Serialize>(method: &str, response: T) -> Result<Value, DispatchError> {
    serde_json::to_value(response).map_err(|source| DispatchError::Encode {
        method: method.to_string(),
        source,
    })
}
