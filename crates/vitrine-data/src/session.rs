//! The session boundary: commit-once header finalization.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

/// Errors from session finalization.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `commit` was called a second time. Header mutation after
    /// response start is disallowed by the transport, so a second
    /// commit can never be attached and is a bug in the caller.
    #[error("session already committed for this request")]
    AlreadyCommitted,

    #[error("session store error: {0}")]
    Store(String),
}

/// Session persistence, specified only at its boundary: finalize all
/// pending mutations into a `set-cookie` header value, once per request.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn commit(&self) -> Result<String, SessionError>;
}

/// A cookie-backed session for one request.
///
/// Mutations accumulate in memory; `commit` serializes them into a
/// cookie value exactly once. The store is request-owned, so interior
/// mutability here never crosses requests.
pub struct CookieSession {
    id: String,
    values: Mutex<HashMap<String, Value>>,
    committed: AtomicBool,
}

impl CookieSession {
    /// Cookie name carrying the session payload.
    pub const COOKIE_NAME: &'static str = "__session";

    /// Create an empty session with a fresh ID.
    pub fn new() -> Self {
        use rand::Rng;
        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self::with_id(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Rehydrate a session from an existing ID (e.g. a request cookie).
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: Mutex::new(HashMap::new()),
            committed: AtomicBool::new(false),
        }
    }

    /// The session ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set a session value.
    pub async fn insert(&self, key: impl Into<String>, value: Value) {
        self.values.lock().await.insert(key.into(), value);
    }

    /// Get a session value.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().await.get(key).cloned()
    }

    /// Remove a session value.
    pub async fn remove(&self, key: &str) -> Option<Value> {
        self.values.lock().await.remove(key)
    }
}

impl Default for CookieSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for CookieSession {
    async fn commit(&self) -> Result<String, SessionError> {
        if self.committed.swap(true, Ordering::SeqCst) {
            return Err(SessionError::AlreadyCommitted);
        }

        let values = self.values.lock().await;
        let payload = serde_json::json!({
            "id": self.id,
            "data": *values,
        });
        let encoded = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&payload).map_err(|e| SessionError::Store(e.to_string()))?,
        );

        debug!(session = %self.id, keys = values.len(), "session committed");
        Ok(format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            Self::COOKIE_NAME,
            encoded
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_commit_produces_cookie_header_value() {
        let session = CookieSession::new();
        session.insert("cart_id", json!("cart/1")).await;

        let header = session.commit().await.unwrap();
        assert!(header.starts_with("__session="));
        assert!(header.ends_with("; Path=/; HttpOnly; SameSite=Lax"));
    }

    #[tokio::test]
    async fn test_commit_payload_round_trips() {
        let session = CookieSession::with_id("sess_fixed");
        session.insert("locale", json!("EN-US")).await;

        let header = session.commit().await.unwrap();
        let encoded = header
            .strip_prefix("__session=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        let payload: Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(encoded).unwrap()).unwrap();

        assert_eq!(payload["id"], "sess_fixed");
        assert_eq!(payload["data"]["locale"], "EN-US");
    }

    #[tokio::test]
    async fn test_second_commit_is_rejected() {
        let session = CookieSession::new();
        session.commit().await.unwrap();
        assert!(matches!(
            session.commit().await,
            Err(SessionError::AlreadyCommitted)
        ));
    }

    #[tokio::test]
    async fn test_mutations_before_commit_are_visible() {
        let session = CookieSession::new();
        session.insert("a", json!(1)).await;
        session.remove("a").await;
        session.insert("b", json!(2)).await;

        assert_eq!(session.get("a").await, None);
        assert_eq!(session.get("b").await, Some(json!(2)));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(CookieSession::new().id(), CookieSession::new().id());
    }
}
