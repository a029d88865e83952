//! schema_associations tool implementation.
//!
//! Collects the `yamlValidation` contributions of the configured extension
//! directories so the language server can map files to schemas.

use std::path::PathBuf;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemabridge_core::{Error, SchemaAssociation, collect_associations, load_manifests};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output from the schema_associations tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssociationsOutput {
    pub associations: Vec<SchemaAssociation>,
}

/// Implementation of the schema_associations tool.
pub async fn associations_impl(extension_dirs: &[PathBuf]) -> Result<CallToolResult, McpError> {
    let manifests = load_manifests(extension_dirs).await;
    let associations = collect_associations(&manifests);
    tracing::debug!(
        extensions = manifests.len(),
        associations = associations.len(),
        "collected schema associations"
    );

    let json = serde_json::to_string_pretty(&AssociationsOutput { associations })
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize associations: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
