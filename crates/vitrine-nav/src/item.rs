//! Raw and normalized navigation item shapes.

use serde::Deserialize;

/// A menu as returned by the content source, untouched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMenu {
    pub id: String,
    #[serde(default)]
    pub items: Vec<RawMenuItem>,
}

/// A menu item as returned by the content source.
///
/// The API shape is recursive with no declared depth limit; anything
/// nested beyond one child level is dropped at normalization time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMenuItem {
    pub id: String,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub title: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub items: Vec<RawMenuItem>,
}

/// Semantic kind of a menu item, parsed from the API's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// The storefront's front page.
    Frontpage,
    /// The catalog root (all products).
    Catalog,
    /// A single collection.
    Collection,
    /// The collections index.
    Collections,
    /// A single product.
    Product,
    /// A content page.
    Page,
    /// A blog index.
    Blog,
    /// A single article.
    Article,
    /// The search page.
    Search,
    /// A shop policy page.
    Policy,
    /// A plain hyperlink.
    Http,
    /// Anything this core does not recognize.
    Other,
}

impl ItemKind {
    /// Parse the API's type tag.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "FRONTPAGE" => Self::Frontpage,
            "CATALOG" => Self::Catalog,
            "COLLECTION" => Self::Collection,
            "COLLECTIONS" => Self::Collections,
            "PRODUCT" => Self::Product,
            "PAGE" => Self::Page,
            "BLOG" => Self::Blog,
            "ARTICLE" => Self::Article,
            "SEARCH" => Self::Search,
            "SHOP_POLICY" => Self::Policy,
            "HTTP" => Self::Http,
            _ => Self::Other,
        }
    }

    /// Whether items of this kind point at a single fixed route, so a
    /// rewrite replaces the whole path rather than the leading segment.
    pub fn is_single_route(&self) -> bool {
        matches!(self, Self::Frontpage | Self::Catalog | Self::Search)
    }
}

/// Where a normalized item points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    /// A path resolved against the storefront's own origin.
    Internal(String),
    /// An absolute URL on a foreign origin, left untouched.
    External(String),
}

impl NavTarget {
    /// The href to render, internal or not.
    pub fn href(&self) -> &str {
        match self {
            Self::Internal(path) => path,
            Self::External(url) => url,
        }
    }

    /// Whether this target leaves the storefront.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

/// A normalized, render-ready menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationMenu {
    pub id: String,
    pub items: Vec<NavItem>,
}

/// A top-level normalized menu item. May carry one level of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub id: String,
    pub resource_id: Option<String>,
    pub tags: Vec<String>,
    pub title: String,
    pub kind: ItemKind,
    pub target: NavTarget,
    pub children: Vec<NavChild>,
}

/// A child menu item. Has no children field: the depth cap is part of
/// the type, not a runtime check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavChild {
    pub id: String,
    pub resource_id: Option<String>,
    pub tags: Vec<String>,
    pub title: String,
    pub kind: ItemKind,
    pub target: NavTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_from_raw() {
        assert_eq!(ItemKind::from_raw("CATALOG"), ItemKind::Catalog);
        assert_eq!(ItemKind::from_raw("HTTP"), ItemKind::Http);
        assert_eq!(ItemKind::from_raw("SOMETHING_NEW"), ItemKind::Other);
    }

    #[test]
    fn test_single_route_kinds() {
        assert!(ItemKind::Catalog.is_single_route());
        assert!(ItemKind::Search.is_single_route());
        assert!(!ItemKind::Collection.is_single_route());
        assert!(!ItemKind::Page.is_single_route());
    }

    #[test]
    fn test_raw_menu_deserializes_api_shape() {
        let raw: RawMenu = serde_json::from_str(
            r#"{
                "id": "menu/1",
                "items": [{
                    "id": "item/1",
                    "resourceId": "collection/9",
                    "tags": ["featured"],
                    "title": "Shop",
                    "type": "CATALOG",
                    "url": "https://shop.example/collections/all",
                    "items": []
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(raw.items.len(), 1);
        assert_eq!(raw.items[0].item_type, "CATALOG");
        assert_eq!(raw.items[0].resource_id.as_deref(), Some("collection/9"));
    }

    #[test]
    fn test_nav_target_href() {
        assert_eq!(NavTarget::Internal("/products".into()).href(), "/products");
        assert!(NavTarget::External("https://other.example/".into()).is_external());
    }
}
