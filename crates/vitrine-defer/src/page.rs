//! The page-data payload: named slots plus response headers.

use http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use vitrine_core::Locale;
use vitrine_data::{Layout, Shop};

use crate::slot::Slot;

/// Analytics identity for the shop, shipped to the client-side tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopAnalytics {
    pub shop_id: String,
    pub shop_name: String,
    #[serde(default)]
    pub storefront_id: Option<String>,
}

/// Consent-banner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
    #[serde(default)]
    pub checkout_domain: Option<String>,
    #[serde(default)]
    pub storefront_api_token: Option<String>,
}

/// A visitor's cart, as returned by the cart boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    pub total_quantity: u32,
}

/// Root SEO payload derived from shop identity and the request URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
}

impl SeoPayload {
    /// The root-route payload: shop name and description.
    pub fn root(shop: &Shop, url: &str) -> Self {
        Self {
            title: shop.name.clone(),
            description: shop.description.clone(),
            url: url.to_string(),
        }
    }
}

/// Theme settings produced by the theming tool, opaque to this core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings(pub Value);

/// The composed page payload: every named slot the renderer consumes,
/// each either resolved or still pending.
#[derive(Debug)]
pub struct PageData {
    pub shop_analytics: ShopAnalytics,
    pub consent: Consent,
    /// Login status is not needed for above-the-fold content.
    pub is_logged_in: Slot<bool>,
    pub layout: Layout,
    pub selected_locale: Locale,
    /// Cart state streams in after the initial flush.
    pub cart: Slot<Option<Cart>>,
    pub seo: SeoPayload,
    pub theme_settings: ThemeSettings,
    pub analytics_id: Option<String>,
}

impl PageData {
    /// Names of slots still resolving in the background.
    pub fn deferred_slots(&self) -> Vec<&'static str> {
        let mut pending = Vec::new();
        if self.is_logged_in.is_deferred() {
            pending.push("is_logged_in");
        }
        if self.cart.is_deferred() {
            pending.push("cart");
        }
        pending
    }
}

/// The composite response descriptor handed to the streaming layer: the
/// payload plus headers finalized before the first byte (session
/// cookie included).
#[derive(Debug)]
pub struct PageDocument {
    pub data: PageData,
    pub headers: HeaderMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> Shop {
        Shop {
            id: "shop/1".to_string(),
            name: "Demo Shop".to_string(),
            description: Some("A shop".to_string()),
            primary_domain: "https://shop.example".to_string(),
            logo_url: None,
        }
    }

    #[test]
    fn test_seo_root_payload() {
        let seo = SeoPayload::root(&shop(), "https://shop.example/");
        assert_eq!(seo.title, "Demo Shop");
        assert_eq!(seo.description.as_deref(), Some("A shop"));
        assert_eq!(seo.url, "https://shop.example/");
    }

    #[tokio::test]
    async fn test_deferred_slot_census() {
        let data = PageData {
            shop_analytics: ShopAnalytics {
                shop_id: "shop/1".to_string(),
                shop_name: "Demo Shop".to_string(),
                storefront_id: None,
            },
            consent: Consent {
                checkout_domain: None,
                storefront_api_token: None,
            },
            is_logged_in: Slot::deferred("is_logged_in", async { Ok(false) }),
            layout: Layout {
                shop: shop(),
                header_menu: None,
                footer_menu: None,
            },
            selected_locale: Locale::default(),
            cart: Slot::eager(None),
            seo: SeoPayload::root(&shop(), "https://shop.example/"),
            theme_settings: ThemeSettings::default(),
            analytics_id: None,
        };

        assert_eq!(data.deferred_slots(), vec!["is_logged_in"]);
    }
}
