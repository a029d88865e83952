//! Unified error type for the schema bridge.
//!
//! Every variant carries a stable code prefix so that messages relayed to the
//! editor stay greppable, and converts into a JSON-RPC error for the bridge.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid tool or request parameters.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A schema URI or extension path could not be turned into a URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// No content could be produced for a schema, fresh or cached.
    #[error("FETCH_FAILED: {0}")]
    FetchFailed(String),

    /// No cache entry exists for the given schema URI.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// An extension manifest could not be read or parsed.
    #[error("MANIFEST_ERROR: {0}")]
    Manifest(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl Error {
    /// JSON-RPC error code reported to the bridge client.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidInput(_) => -32602,
            Error::InvalidUrl(_) => -32003,
            Error::FetchFailed(_) => -32008,
            Error::CacheMiss(_) => -32001,
            Error::Database(_) | Error::MigrationFailed(_) => -32002,
            Error::Manifest(_) => -32013,
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = err.code();
        let message = match err {
            Error::InvalidInput(msg)
            | Error::InvalidUrl(msg)
            | Error::FetchFailed(msg)
            | Error::CacheMiss(msg)
            | Error::MigrationFailed(msg)
            | Error::Manifest(msg) => msg,
            Error::Database(e) => e.to_string(),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FetchFailed("Not Found. The requested location could not be found.".to_string());
        assert!(err.to_string().starts_with("FETCH_FAILED: "));
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::CacheMiss("https://example.com/schema.json".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);
        assert_eq!(mcp_err.message, "https://example.com/schema.json");
    }

    #[test]
    fn test_database_error_code() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.code(), -32002);
        assert!(err.to_string().starts_with("CACHE_ERROR"));
    }
}
