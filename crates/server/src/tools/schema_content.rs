//! schema_content tool implementation.
//!
//! Relays the language server's "resolve schema content" request to the
//! content provider.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemabridge_client::{SchemaFetcher, SchemaTransport};
use schemabridge_core::{Error, SchemaCacheStore};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the schema_content tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SchemaContentParams {
    /// Absolute URI of the schema document.
    pub uri: String,
}

/// Implementation of the schema_content tool.
pub async fn content_impl<T: SchemaTransport>(
    fetcher: &SchemaFetcher<T>, cache: &dyn SchemaCacheStore, params: SchemaContentParams,
) -> Result<CallToolResult, McpError> {
    let uri = params.uri.trim();
    if uri.is_empty() {
        return Err(Error::InvalidInput("uri cannot be empty".into()).into());
    }
    url::Url::parse(uri).map_err(|e| Error::InvalidUrl(format!("{uri}: {e}")))?;

    let content = fetcher.fetch_schema_content(uri, cache).await?;

    Ok(CallToolResult::success(vec![Content::text(content)]))
}
