//! Schema cache: the `SchemaCacheStore` capability and its implementations.
//!
//! - [`SchemaCache`] persists entries in SQLite through tokio-rusqlite and
//!   keeps an in-memory ETag index loaded at open time.
//! - [`MemorySchemaCache`] keeps everything in a map, for tests and embedding.

pub mod connection;
pub mod hash;
pub mod memory;
pub mod migrations;
pub mod schemas;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use memory::MemorySchemaCache;
pub use schemas::{CacheEntry, SchemaCache};
pub use store::SchemaCacheStore;
