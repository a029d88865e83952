//! Bridge tool implementations.
//!
//! This module contains all tools exposed by the yaml-schema-bridge server.

pub mod associations;
pub mod cache;
pub mod schema_content;
pub mod selection;
pub mod status;

pub use associations::associations_impl;
pub use schema_content::{SchemaContentParams, content_impl};
pub use selection::{SchemaChoicesParams, SchemaSelectParams, choices_impl, select_impl};
pub use status::{SchemaStatusParams, status_impl};

/// Text of the first content block of a tool result.
#[cfg(test)]
pub(crate) fn text_of(result: &rmcp::model::CallToolResult) -> String {
    let value = serde_json::to_value(result).unwrap();
    value["content"][0]["text"].as_str().unwrap().to_string()
}
