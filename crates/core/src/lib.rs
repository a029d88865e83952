//! Core types for the YAML schema bridge.
//!
//! This crate provides:
//! - The schema cache (`SchemaCacheStore` trait, SQLite and in-memory stores)
//! - The unified error type
//! - Layered configuration
//! - Schema associations, schema selection and status text helpers

pub mod associations;
pub mod cache;
pub mod config;
pub mod error;
pub mod selection;
pub mod status;

pub use associations::{ExtensionManifest, SchemaAssociation, collect_associations, load_manifests};
pub use cache::{CacheDb, CacheEntry, MemorySchemaCache, SchemaCache, SchemaCacheStore};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use selection::{SchemaChoice, SchemaInfo, SchemaSettings, assign_schema, sort_choices};
pub use status::status_text;
