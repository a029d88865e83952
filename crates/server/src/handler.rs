//! Bridge server handler.
//!
//! Routes tool calls from the editor side to the schema cache, the content
//! provider and the association/selection helpers.
use std::sync::Arc;

use crate::tools::{
    SchemaChoicesParams, SchemaContentParams, SchemaSelectParams, SchemaStatusParams, associations_impl,
    cache::{CacheGetParams, get_impl},
    choices_impl, content_impl, select_impl, status_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use schemabridge_client::SchemaFetcher;
use schemabridge_core::{AppConfig, SchemaCache};

/// Shared state behind every tool call.
pub struct BridgeState {
    pub config: AppConfig,
    pub cache: SchemaCache,
    pub fetcher: SchemaFetcher,
}

#[derive(Clone)]
pub struct SchemaBridgeServer {
    tool_router: ToolRouter<Self>,
    state: Arc<BridgeState>,
}

#[tool_router]
impl SchemaBridgeServer {
    pub fn new(state: BridgeState) -> Self {
        Self { tool_router: Self::tool_router(), state: Arc::new(state) }
    }

    /// Resolve schema content, using the ETag cache and falling back to it when offline.
    #[tool(description = "Return the content of a schema URI. Revalidates cached copies with ETags and \
                          serves the cached copy when the network fails.")]
    async fn schema_content(&self, params: Parameters<SchemaContentParams>) -> Result<CallToolResult, McpError> {
        content_impl(&self.state.fetcher, &self.state.cache, params.0).await
    }

    #[tool(description = "Show the cached entry (ETag, content, fetch time) for a schema URI.")]
    async fn schema_cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.state.cache, params.0).await
    }

    #[tool(description = "List the schema associations contributed by installed extensions.")]
    async fn schema_associations(&self) -> Result<CallToolResult, McpError> {
        associations_impl(&self.state.config.extension_dirs).await
    }

    #[tool(description = "Associate a file with a schema in the yaml.schemas setting. Returns the updated setting.")]
    async fn schema_select(&self, params: Parameters<SchemaSelectParams>) -> Result<CallToolResult, McpError> {
        select_impl(params.0)
    }

    #[tool(description = "Label and order schema choices for a picker, schemas in use first.")]
    async fn schema_choices(&self, params: Parameters<SchemaChoicesParams>) -> Result<CallToolResult, McpError> {
        choices_impl(params.0)
    }

    #[tool(description = "Status text for the schemas applied to the active YAML document.")]
    async fn schema_status(&self, params: Parameters<SchemaStatusParams>) -> Result<CallToolResult, McpError> {
        status_impl(&self.state.config.status_text, &params.0)
    }
}

impl ServerHandler for SchemaBridgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "yaml-schema-bridge".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemabridge_client::FetchConfig;
    use schemabridge_core::CacheDb;

    #[tokio::test]
    async fn test_all_tools_are_routed() {
        let config = AppConfig::default();
        let state = BridgeState {
            cache: SchemaCache::load(CacheDb::open_in_memory().await.unwrap()).await.unwrap(),
            fetcher: SchemaFetcher::with_reqwest(FetchConfig::from(&config)),
            config,
        };
        let server = SchemaBridgeServer::new(state);

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "schema_associations",
                "schema_cache_get",
                "schema_choices",
                "schema_content",
                "schema_select",
                "schema_status"
            ]
        );
    }
}
