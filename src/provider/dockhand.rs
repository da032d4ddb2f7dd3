//! The Dockhand provider.
//!
//! Holds the build version and the provider-block settings. No resource or
//! data-source types are registered, so every typed request is answered with
//! an "Unknown resource type" diagnostic.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::Deserialize;

use crate::provider::types::{
    ApplyResourceChangeRequest, Attribute, AttributeType, ConfigureRequest, Diagnostic,
    DiagnosticsResponse, ImportResourceStateRequest, ImportResourceStateResponse,
    PlanResourceChangeRequest, ProviderMetadata, ProviderSchema, ReadDataSourceRequest,
    ReadResourceRequest, Schema, StateResponse, ValidateResourceConfigRequest,
};
use crate::provider::{ConstructionError, Provider, ProviderFactory};

pub const TYPE_NAME: &str = "dockhand";

const DEFAULT_AUTH_PROVIDER: &str = "local";

/// Environment lookup used as a fallback for unset provider attributes.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Provider block as sent by the orchestrator. Null attributes are `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderModel {
    endpoint: Option<String>,
    username: Option<String>,
    password: Option<String>,
    mfa_token: Option<String>,
    auth_provider: Option<String>,
    default_env: Option<String>,
    insecure: Option<bool>,
}

/// Resolved provider settings after `configure`.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub mfa_token: String,
    pub auth_provider: String,
    pub default_env: String,
    pub insecure: bool,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("mfa_token", &"<redacted>")
            .field("auth_provider", &self.auth_provider)
            .field("default_env", &self.default_env)
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// Dockhand provider handle.
pub struct DockhandProvider {
    version: String,
    env: EnvLookup,
    settings: RwLock<Option<ProviderSettings>>,
}

impl DockhandProvider {
    /// Create a provider that falls back to the process environment.
    pub fn new(version: impl Into<String>) -> Self {
        Self::with_env(version, Arc::new(|key: &str| std::env::var(key).ok()))
    }

    /// Create a provider with an explicit environment lookup.
    pub fn with_env(version: impl Into<String>, env: EnvLookup) -> Self {
        Self {
            version: version.into(),
            env,
            settings: RwLock::new(None),
        }
    }

    /// Settings stored by the last successful `configure`.
    pub fn settings(&self) -> Option<ProviderSettings> {
        self.settings
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn resolve(&self, configured: Option<String>, env_key: &str) -> String {
        configured
            .or_else(|| (self.env)(env_key))
            .unwrap_or_default()
    }

    fn resolve_settings(&self, model: ProviderModel) -> Result<ProviderSettings, Diagnostic> {
        let endpoint = self.resolve(model.endpoint, "DOCKHAND_ENDPOINT");
        let username = self.resolve(model.username, "DOCKHAND_USERNAME");
        let password = self.resolve(model.password, "DOCKHAND_PASSWORD");
        let mfa_token = self.resolve(model.mfa_token, "DOCKHAND_MFA_TOKEN");
        let mut auth_provider = self.resolve(model.auth_provider, "DOCKHAND_AUTH_PROVIDER");
        if auth_provider.is_empty() {
            auth_provider = DEFAULT_AUTH_PROVIDER.to_string();
        }
        let default_env = self.resolve(model.default_env, "DOCKHAND_DEFAULT_ENV");

        if endpoint.is_empty() {
            return Err(Diagnostic::error(
                "Missing Dockhand endpoint",
                "Set `endpoint` in the provider block or export `DOCKHAND_ENDPOINT`.",
            ));
        }

        match (username.is_empty(), password.is_empty()) {
            (true, true) => {
                return Err(Diagnostic::error(
                    "Missing Dockhand authentication",
                    "Set provider `username` and `password` (or export `DOCKHAND_USERNAME`/`DOCKHAND_PASSWORD`).",
                ))
            }
            (false, true) => {
                return Err(Diagnostic::error(
                    "Incomplete Dockhand authentication",
                    "`username` was set but `password` was not. Set both `username` and `password`.",
                ))
            }
            (true, false) => {
                return Err(Diagnostic::error(
                    "Incomplete Dockhand authentication",
                    "`password` was set but `username` was not. Set both `username` and `password`.",
                ))
            }
            (false, false) => {}
        }

        Ok(ProviderSettings {
            endpoint,
            username,
            password,
            mfa_token,
            auth_provider,
            default_env,
            insecure: model.insecure.unwrap_or(false),
        })
    }
}

fn unknown_type(type_name: &str) -> Diagnostic {
    Diagnostic::error(
        "Unknown resource type",
        format!("The \"{}\" provider does not support type \"{}\".", TYPE_NAME, type_name),
    )
}

#[async_trait]
impl Provider for DockhandProvider {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: TYPE_NAME.to_string(),
            version: self.version.clone(),
            resources: Vec::new(),
            data_sources: Vec::new(),
        }
    }

    fn schema(&self) -> ProviderSchema {
        let provider = Schema::default()
            .with_attribute(
                "endpoint",
                Attribute::optional(
                    AttributeType::String,
                    "Dockhand API base URL. Can also be set with `DOCKHAND_ENDPOINT`.",
                ),
            )
            .with_attribute(
                "username",
                Attribute::optional(
                    AttributeType::String,
                    "Dockhand username for login-based auth. Can also be set with `DOCKHAND_USERNAME`.",
                ),
            )
            .with_attribute(
                "password",
                Attribute::optional(
                    AttributeType::String,
                    "Dockhand password for login-based auth. Can also be set with `DOCKHAND_PASSWORD`.",
                )
                .sensitive(),
            )
            .with_attribute(
                "mfa_token",
                Attribute::optional(
                    AttributeType::String,
                    "Optional MFA token for login-based auth. Can also be set with `DOCKHAND_MFA_TOKEN`.",
                )
                .sensitive(),
            )
            .with_attribute(
                "auth_provider",
                Attribute::optional(
                    AttributeType::String,
                    "Auth provider id for login-based auth (e.g. `local`). Can also be set with `DOCKHAND_AUTH_PROVIDER`.",
                ),
            )
            .with_attribute(
                "default_env",
                Attribute::optional(
                    AttributeType::String,
                    "Default Dockhand environment ID sent as `env` query parameter when omitted by resources. Can also be set with `DOCKHAND_DEFAULT_ENV`.",
                ),
            )
            .with_attribute(
                "insecure",
                Attribute::optional(
                    AttributeType::Bool,
                    "Disable TLS verification for API requests. Useful only for local development.",
                ),
            );

        ProviderSchema {
            provider,
            ..Default::default()
        }
    }

    async fn configure(&self, request: ConfigureRequest) -> DiagnosticsResponse {
        let model = if request.config.is_null() {
            ProviderModel::default()
        } else {
            match serde_json::from_value::<ProviderModel>(request.config) {
                Ok(model) => model,
                Err(e) => {
                    return vec![Diagnostic::error("Invalid provider configuration", e.to_string())]
                        .into()
                }
            }
        };

        match self.resolve_settings(model) {
            Ok(settings) => {
                tracing::info!(
                    endpoint = %settings.endpoint,
                    auth_provider = %settings.auth_provider,
                    insecure = settings.insecure,
                    "Provider configured"
                );
                match self.settings.write() {
                    Ok(mut guard) => *guard = Some(settings),
                    Err(poisoned) => *poisoned.into_inner() = Some(settings),
                }
                DiagnosticsResponse::default()
            }
            Err(diagnostic) => {
                tracing::warn!(summary = %diagnostic.summary, "Provider configuration rejected");
                vec![diagnostic].into()
            }
        }
    }

    async fn validate_resource_config(
        &self,
        request: ValidateResourceConfigRequest,
    ) -> DiagnosticsResponse {
        vec![unknown_type(&request.type_name)].into()
    }

    async fn read_resource(&self, request: ReadResourceRequest) -> StateResponse {
        StateResponse::failed(unknown_type(&request.type_name))
    }

    async fn plan_resource_change(&self, request: PlanResourceChangeRequest) -> StateResponse {
        StateResponse::failed(unknown_type(&request.type_name))
    }

    async fn apply_resource_change(&self, request: ApplyResourceChangeRequest) -> StateResponse {
        StateResponse::failed(unknown_type(&request.type_name))
    }

    async fn import_resource_state(
        &self,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        ImportResourceStateResponse {
            imported_resources: Vec::new(),
            diagnostics: vec![unknown_type(&request.type_name)],
        }
    }

    async fn read_data_source(&self, request: ReadDataSourceRequest) -> StateResponse {
        StateResponse::failed(unknown_type(&request.type_name))
    }
}

/// Factory producing [`DockhandProvider`] handles.
#[derive(Clone, Default)]
pub struct DockhandProviderFactory {
    env: Option<EnvLookup>,
}

impl DockhandProviderFactory {
    /// Factory whose providers use `env` instead of the process environment.
    pub fn with_env(env: EnvLookup) -> Self {
        Self { env: Some(env) }
    }
}

impl ProviderFactory for DockhandProviderFactory {
    fn construct(&self, version: &str) -> Result<Arc<dyn Provider>, ConstructionError> {
        let provider = match &self.env {
            Some(env) => DockhandProvider::with_env(version, Arc::clone(env)),
            None => DockhandProvider::new(version),
        };
        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn provider_with_env(vars: &[(&str, &str)]) -> DockhandProvider {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DockhandProvider::with_env("dev", Arc::new(move |key: &str| vars.get(key).cloned()))
    }

    async fn configure(provider: &DockhandProvider, config: serde_json::Value) -> Vec<Diagnostic> {
        provider.configure(ConfigureRequest { config }).await.diagnostics
    }

    #[test]
    fn metadata_carries_version() {
        let provider = provider_with_env(&[]);
        let metadata = provider.metadata();
        assert_eq!(metadata.type_name, "dockhand");
        assert_eq!(metadata.version, "dev");
        assert!(metadata.resources.is_empty());
    }

    #[test]
    fn schema_marks_secrets_sensitive() {
        let schema = provider_with_env(&[]).schema();
        assert_eq!(schema.provider.attributes.len(), 7);
        assert!(schema.provider.attributes["password"].sensitive);
        assert!(schema.provider.attributes["mfa_token"].sensitive);
        assert!(!schema.provider.attributes["endpoint"].sensitive);
        assert_eq!(schema.provider.attributes["insecure"].kind, AttributeType::Bool);
    }

    #[tokio::test]
    async fn configure_requires_endpoint() {
        let provider = provider_with_env(&[]);
        let diags = configure(&provider, json!({"username": "admin", "password": "pw"})).await;
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].summary, "Missing Dockhand endpoint");
        assert!(provider.settings().is_none());
    }

    #[tokio::test]
    async fn configure_requires_credentials() {
        let provider = provider_with_env(&[]);
        let diags = configure(&provider, json!({"endpoint": "https://dockhand.local"})).await;
        assert_eq!(diags[0].summary, "Missing Dockhand authentication");

        let diags = configure(
            &provider,
            json!({"endpoint": "https://dockhand.local", "username": "admin"}),
        )
        .await;
        assert_eq!(diags[0].summary, "Incomplete Dockhand authentication");
        assert!(diags[0].detail.starts_with("`username` was set"));

        let diags = configure(
            &provider,
            json!({"endpoint": "https://dockhand.local", "password": "pw"}),
        )
        .await;
        assert!(diags[0].detail.starts_with("`password` was set"));
    }

    #[tokio::test]
    async fn configure_falls_back_to_environment() {
        let provider = provider_with_env(&[
            ("DOCKHAND_ENDPOINT", "https://env.local"),
            ("DOCKHAND_USERNAME", "env-user"),
            ("DOCKHAND_PASSWORD", "env-pass"),
        ]);
        let diags = configure(&provider, json!({"username": "admin", "insecure": true})).await;
        assert!(diags.is_empty());

        let settings = provider.settings().unwrap();
        assert_eq!(settings.endpoint, "https://env.local");
        assert_eq!(settings.username, "admin");
        assert_eq!(settings.password, "env-pass");
        assert_eq!(settings.auth_provider, "local");
        assert!(settings.insecure);
        assert!(!format!("{:?}", settings).contains("env-pass"));
    }

    #[tokio::test]
    async fn configure_rejects_wrong_types() {
        let provider = provider_with_env(&[]);
        let diags = configure(&provider, json!({"insecure": "yes"})).await;
        assert_eq!(diags[0].summary, "Invalid provider configuration");
    }

    #[tokio::test]
    async fn resource_requests_report_unknown_type() {
        let provider = provider_with_env(&[]);
        let response = provider
            .read_resource(ReadResourceRequest {
                type_name: "dockhand_stack".to_string(),
                current_state: json!({"id": "1"}),
            })
            .await;
        assert!(response.new_state.is_none());
        assert_eq!(response.diagnostics[0].summary, "Unknown resource type");
        assert!(response.diagnostics[0].detail.contains("dockhand_stack"));
    }

    #[test]
    fn factory_binds_version() {
        let provider = DockhandProviderFactory::default().construct("1.2.3").unwrap();
        assert_eq!(provider.metadata().version, "1.2.3");
    }
}
