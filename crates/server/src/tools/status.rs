//! schema_status tool implementation.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemabridge_core::{SchemaInfo, status_text};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the schema_status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SchemaStatusParams {
    /// Schemas the language server applies to the active document.
    #[serde(default)]
    pub schemas: Vec<SchemaInfo>,
}

/// Implementation of the schema_status tool.
pub fn status_impl(prefix: &str, params: &SchemaStatusParams) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(status_text(prefix, &params.schemas))]))
}
