//! The content-source boundary.

use async_trait::async_trait;
use serde_json::Value;

/// Error type for content-source queries.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("query rejected: {0}")]
    Query(String),
}

/// The storefront data API, specified only at its boundary.
///
/// Accepts a structured query document plus variables and returns a
/// JSON-shaped tree, or `None` when the source answered with no data at
/// all. Query execution, authentication, and caching all live behind
/// this trait.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn query(&self, document: &str, variables: Value) -> Result<Option<Value>, SourceError>;
}
