//! Per-request nonce minting.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;

/// An unpredictable per-request token permitting specific inline
/// script/style execution under the security policy.
///
/// Minted once per request and never reused; reuse across requests would
/// allow replay and defeat the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    /// Mint a fresh nonce.
    pub fn mint() -> Self {
        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// The raw token, as threaded into script/style tags.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The token as a CSP source expression, e.g. `'nonce-abc123'`.
    pub fn source_expression(&self) -> String {
        format!("'nonce-{}'", self.0)
    }
}

impl std::fmt::Display for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
