//! schema_cache_get tool implementation.
//!
//! Returns the cached entry for a schema URI, for inspecting what the bridge
//! would serve when offline.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemabridge_core::{CacheEntry, Error, SchemaCache};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the schema_cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// The schema URI the entry was cached under.
    pub uri: String,
}

/// Output from the schema_cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub entry: CacheEntry,
}

/// Implementation of the schema_cache_get tool.
pub async fn get_impl(cache: &SchemaCache, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let entry = cache
        .get_entry(&params.uri)
        .await?
        .ok_or_else(|| Error::CacheMiss(params.uri.clone()))?;

    let json = serde_json::to_string_pretty(&CacheGetOutput { entry })
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize cache entry: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
