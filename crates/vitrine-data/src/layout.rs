//! Layout aggregation: shop identity plus header and footer menus.

use serde::Deserialize;
use serde_json::json;

use vitrine_core::{Locale, RequestError, StorefrontEnv};
use vitrine_nav::{normalize_menu, NavigationMenu, RawMenu, RewriteRules};

use crate::source::{ContentSource, SourceError};

/// The one layout query issued per request: shop fields plus the two
/// named menus, selected by handle in the request's language.
pub const LAYOUT_QUERY: &str = r#"
query layout(
  $language: LanguageCode
  $headerMenuHandle: String!
  $footerMenuHandle: String!
) @inContext(language: $language) {
  shop {
    id
    name
    description
    primaryDomain { url }
    brand { logo { image { url } } }
  }
  headerMenu: menu(handle: $headerMenuHandle) { ...Menu }
  footerMenu: menu(handle: $footerMenuHandle) { ...Menu }
}
fragment MenuItem on MenuItem {
  id
  resourceId
  tags
  title
  type
  url
}
fragment Menu on Menu {
  id
  items {
    ...MenuItem
    items { ...MenuItem }
  }
}
"#;

/// Errors from layout aggregation.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// The content source returned no data at all. Fatal: the page
    /// cannot render without shop identity.
    #[error("no data returned from the content source")]
    MissingData,

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("unexpected layout shape: {0}")]
    Shape(String),
}

impl From<LayoutError> for RequestError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::MissingData => RequestError::MissingData,
            other => RequestError::Upstream(other.to_string()),
        }
    }
}

// Raw API shapes, deserialized straight off the query response.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLayout {
    shop: RawShop,
    #[serde(default)]
    header_menu: Option<RawMenu>,
    #[serde(default)]
    footer_menu: Option<RawMenu>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawShop {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    primary_domain: RawDomain,
    #[serde(default)]
    brand: Option<RawBrand>,
}

#[derive(Debug, Deserialize)]
struct RawDomain {
    url: String,
}

#[derive(Debug, Deserialize)]
struct RawBrand {
    #[serde(default)]
    logo: Option<RawLogo>,
}

#[derive(Debug, Deserialize)]
struct RawLogo {
    #[serde(default)]
    image: Option<RawImage>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    url: String,
}

/// Shop identity, flattened from the API shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shop {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// The shop's own primary domain URL, scheme included.
    pub primary_domain: String,
    pub logo_url: Option<String>,
}

impl From<RawShop> for Shop {
    fn from(raw: RawShop) -> Self {
        let logo_url = raw
            .brand
            .and_then(|b| b.logo)
            .and_then(|l| l.image)
            .map(|i| i.url);
        Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            primary_domain: raw.primary_domain.url,
            logo_url,
        }
    }
}

/// The per-request layout aggregate: constructed once, read-only
/// afterward, owned by the request's page composer.
#[derive(Debug, Clone)]
pub struct Layout {
    pub shop: Shop,
    /// Absent when the shop has no header menu configured - a valid,
    /// renderable state.
    pub header_menu: Option<NavigationMenu>,
    pub footer_menu: Option<NavigationMenu>,
}

/// Issue the layout query and normalize both menus.
///
/// No retries here; transient source failures propagate to the caller.
pub async fn fetch_layout(
    source: &dyn ContentSource,
    env: &StorefrontEnv,
    locale: &Locale,
    rules: &RewriteRules,
) -> Result<Layout, LayoutError> {
    let variables = json!({
        "language": locale.language,
        "headerMenuHandle": env.header_menu_handle,
        "footerMenuHandle": env.footer_menu_handle,
    });

    let data = source
        .query(LAYOUT_QUERY, variables)
        .await?
        .ok_or(LayoutError::MissingData)?;

    let raw: RawLayout =
        serde_json::from_value(data).map_err(|e| LayoutError::Shape(e.to_string()))?;

    let shop_domain = raw.shop.primary_domain.url.clone();
    let header_menu = raw
        .header_menu
        .map(|menu| normalize_menu(&menu, &shop_domain, rules).menu);
    let footer_menu = raw
        .footer_menu
        .map(|menu| normalize_menu(&menu, &shop_domain, rules).menu);

    Ok(Layout {
        shop: raw.shop.into(),
        header_menu,
        footer_menu,
    })
}
