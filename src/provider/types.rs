//! Request, response and schema types exchanged with the orchestrator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A user-facing problem report attached to a response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

/// Identity of the provider and the type names it serves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderMetadata {
    pub type_name: String,
    pub version: String,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub data_sources: Vec<String>,
}

/// Value type of a schema attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Bool,
}

/// A single attribute in a block schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub sensitive: bool,
}

impl Attribute {
    pub fn optional(kind: AttributeType, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            required: false,
            optional: true,
            computed: false,
            sensitive: false,
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// Block schema: attribute name to attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Schema {
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }
}

/// Full schema set of the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    #[serde(default)]
    pub resources: BTreeMap<String, Schema>,
    #[serde(default)]
    pub data_sources: BTreeMap<String, Schema>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConfigureRequest {
    #[serde(default)]
    pub config: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValidateResourceConfigRequest {
    pub type_name: String,
    #[serde(default)]
    pub config: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReadResourceRequest {
    pub type_name: String,
    #[serde(default)]
    pub current_state: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlanResourceChangeRequest {
    pub type_name: String,
    #[serde(default)]
    pub prior_state: Option<Value>,
    #[serde(default)]
    pub proposed_new_state: Option<Value>,
    #[serde(default)]
    pub config: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApplyResourceChangeRequest {
    pub type_name: String,
    #[serde(default)]
    pub prior_state: Option<Value>,
    #[serde(default)]
    pub planned_state: Option<Value>,
    #[serde(default)]
    pub config: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImportResourceStateRequest {
    pub type_name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReadDataSourceRequest {
    pub type_name: String,
    #[serde(default)]
    pub config: Value,
}

/// Response carrying only diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiagnosticsResponse {
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl From<Vec<Diagnostic>> for DiagnosticsResponse {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

/// Response carrying a (possibly absent) state value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StateResponse {
    #[serde(default)]
    pub new_state: Option<Value>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl StateResponse {
    pub fn failed(diagnostic: Diagnostic) -> Self {
        Self {
            new_state: None,
            diagnostics: vec![diagnostic],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImportedResource {
    pub type_name: String,
    pub state: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ImportResourceStateResponse {
    #[serde(default)]
    pub imported_resources: Vec<ImportedResource>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}
