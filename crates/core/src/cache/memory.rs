//! In-process schema cache with no durable backing.

use super::store::SchemaCacheStore;
use crate::Error;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Schema cache held entirely in memory.
///
/// Entries are `(etag, content)` pairs written under one lock, so the ETag
/// and the content it validates can never drift apart.
#[derive(Debug, Default)]
pub struct MemorySchemaCache {
    entries: RwLock<HashMap<String, (String, String)>>,
}

impl MemorySchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SchemaCacheStore for MemorySchemaCache {
    fn get_etag(&self, schema_uri: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(schema_uri).map(|(etag, _)| etag.clone())
    }

    async fn put_schema(&self, schema_uri: &str, etag: &str, content: &str) -> Result<(), Error> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(schema_uri.to_string(), (etag.to_string(), content.to_string()));
        Ok(())
    }

    async fn get_schema(&self, schema_uri: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(schema_uri).map(|(_, content)| content.clone())
    }
}
