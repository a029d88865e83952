//! The capability the content provider needs from a schema cache.

use crate::Error;
use async_trait::async_trait;

/// Schema cache keyed by schema URI.
///
/// `get_etag` answers from memory so callers can decide on a conditional
/// request without waiting on storage. Content reads are asynchronous and
/// never fail loudly: anything that prevents a read is reported as `None`.
#[async_trait]
pub trait SchemaCacheStore: Send + Sync {
    /// ETag of the cached entry for `schema_uri`, if any. Never performs I/O.
    fn get_etag(&self, schema_uri: &str) -> Option<String>;

    /// Persist `(etag, content)` for `schema_uri`, replacing any previous entry.
    ///
    /// The ETag index only changes once the write has succeeded.
    async fn put_schema(&self, schema_uri: &str, etag: &str, content: &str) -> Result<(), Error>;

    /// Cached content for `schema_uri`, or `None` when missing or unreadable.
    async fn get_schema(&self, schema_uri: &str) -> Option<String>;
}
