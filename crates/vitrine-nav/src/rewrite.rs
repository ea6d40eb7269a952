//! Type-keyed URL rewrite rules.

use std::collections::HashMap;

/// Rewrite rules mapping a raw menu-item type to a replacement path
/// segment, applied once at normalization time.
///
/// For handle-bearing kinds (collections, pages, blogs) the mapped value
/// replaces the leading path segment and the remainder is kept; for
/// single-route kinds (the catalog root, search) it becomes the whole
/// path. `{"CATALOG": "products"}` maps `/collections/all` to
/// `/products`.
#[derive(Debug, Clone, Default)]
pub struct RewriteRules {
    map: HashMap<String, String>,
}

impl RewriteRules {
    /// Create an empty rule set (no rewrites).
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a raw item type to a replacement path segment.
    pub fn map(mut self, item_type: impl Into<String>, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        self.map
            .insert(item_type.into(), segment.trim_matches('/').to_string());
        self
    }

    /// Look up the replacement segment for a raw item type.
    pub fn get(&self, item_type: &str) -> Option<&str> {
        self.map.get(item_type).map(|s| s.as_str())
    }

    /// Whether any rules are defined.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
