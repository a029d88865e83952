//! SQLite-backed schema cache.
//!
//! Rows live in the `schema_cache` table; the ETag of every row is mirrored
//! into an in-memory index when the cache is opened so that `get_etag` can
//! answer without touching the database.

use super::connection::CacheDb;
use super::hash::content_digest;
use super::store::SchemaCacheStore;
use crate::Error;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio_rusqlite::{params, rusqlite};

/// A cached schema document and the validator it was served with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheEntry {
    pub schema_uri: String,
    pub etag: String,
    pub content: String,
    pub content_sha256: String,
    pub fetched_at: String,
}

impl CacheEntry {
    fn is_intact(&self) -> bool {
        content_digest(&self.content) == self.content_sha256
    }
}

/// Persistent schema cache with a synchronous ETag index.
#[derive(Clone, Debug)]
pub struct SchemaCache {
    db: CacheDb,
    etags: Arc<RwLock<HashMap<String, String>>>,
}

impl SchemaCache {
    /// Wrap an open database and load the ETag index from it.
    pub async fn load(db: CacheDb) -> Result<Self, Error> {
        let etags = db
            .conn
            .call(|conn| -> Result<HashMap<String, String>, Error> {
                let mut stmt = conn.prepare("SELECT schema_uri, etag FROM schema_cache")?;
                let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
                let mut index = HashMap::new();
                for row in rows {
                    let (uri, etag) = row?;
                    index.insert(uri, etag);
                }
                Ok(index)
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(entries = etags.len(), "loaded schema ETag index");
        Ok(Self { db, etags: Arc::new(RwLock::new(etags)) })
    }

    /// Number of schemas in the ETag index.
    pub fn len(&self) -> usize {
        self.etags.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full cached row for `schema_uri`.
    pub async fn get_entry(&self, schema_uri: &str) -> Result<Option<CacheEntry>, Error> {
        let schema_uri = schema_uri.to_string();
        self.db
            .conn
            .call(move |conn| -> Result<Option<CacheEntry>, Error> {
                let result = conn.query_row(
                    "SELECT schema_uri, etag, content, content_sha256, fetched_at
                     FROM schema_cache WHERE schema_uri = ?1",
                    params![schema_uri],
                    |row| {
                        Ok(CacheEntry {
                            schema_uri: row.get(0)?,
                            etag: row.get(1)?,
                            content: row.get(2)?,
                            content_sha256: row.get(3)?,
                            fetched_at: row.get(4)?,
                        })
                    },
                );

                match result {
                    Ok(entry) => Ok(Some(entry)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn upsert(&self, entry: CacheEntry) -> Result<(), Error> {
        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO schema_cache (schema_uri, etag, content, content_sha256, fetched_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(schema_uri) DO UPDATE SET
                        etag = excluded.etag,
                        content = excluded.content,
                        content_sha256 = excluded.content_sha256,
                        fetched_at = excluded.fetched_at",
                    params![
                        &entry.schema_uri,
                        &entry.etag,
                        &entry.content,
                        &entry.content_sha256,
                        &entry.fetched_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl SchemaCacheStore for SchemaCache {
    fn get_etag(&self, schema_uri: &str) -> Option<String> {
        self.etags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(schema_uri)
            .cloned()
    }

    async fn put_schema(&self, schema_uri: &str, etag: &str, content: &str) -> Result<(), Error> {
        let entry = CacheEntry {
            schema_uri: schema_uri.to_string(),
            etag: etag.to_string(),
            content: content.to_string(),
            content_sha256: content_digest(content),
            fetched_at: chrono::Utc::now().to_rfc3339(),
        };
        self.upsert(entry).await?;

        self.etags
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(schema_uri.to_string(), etag.to_string());
        Ok(())
    }

    async fn get_schema(&self, schema_uri: &str) -> Option<String> {
        match self.get_entry(schema_uri).await {
            Ok(Some(entry)) if entry.is_intact() => Some(entry.content),
            Ok(Some(_)) => {
                tracing::warn!(schema_uri, "cached schema content does not match its digest");
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(schema_uri, error = %e, "failed to read cached schema");
                None
            }
        }
    }
}
