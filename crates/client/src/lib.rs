//! Client side of the YAML schema bridge.
//!
//! This crate provides the HTTP transport for schema documents and the
//! content provider that combines it with the schema cache.

pub mod content;
pub mod fetch;

pub use content::{FetchConfig, SchemaFetcher};
pub use fetch::{HttpSettings, ReqwestTransport, SchemaRequest, SchemaResponse, SchemaTransport, TransportError};
