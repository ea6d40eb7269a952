//! Per-deployment storefront configuration.

use serde::{Deserialize, Serialize};

/// Locale selected for the request (language + country).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// ISO language code (e.g. "EN").
    pub language: String,
    /// ISO country code (e.g. "US").
    pub country: String,
}

impl Locale {
    /// Create a locale from language and country codes.
    pub fn new(language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            country: country.into(),
        }
    }

    /// Stable key for this locale, e.g. "EN-US".
    pub fn key(&self) -> String {
        format!("{}-{}", self.language, self.country)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("EN", "US")
    }
}

/// Storefront environment for one deployment.
///
/// Assembled once at startup from the host's configuration and treated as
/// read-only per request. Anything request-scoped (nonce, policy, layout)
/// is constructed fresh elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontEnv {
    /// Public storefront domain, scheme included (e.g. "https://shop.example").
    pub store_domain: String,
    /// Checkout domain, if hosted separately from the storefront.
    #[serde(default)]
    pub checkout_domain: Option<String>,
    /// Public storefront identifier for analytics payloads.
    #[serde(default)]
    pub storefront_id: Option<String>,
    /// Public content-source API token, surfaced to the consent layer.
    #[serde(default)]
    pub storefront_api_token: Option<String>,
    /// Tag-manager container ID, if analytics are enabled.
    #[serde(default)]
    pub analytics_id: Option<String>,
    /// Origin of the visual theming editor allowed to preview pages.
    #[serde(default)]
    pub editor_origin: Option<String>,
    /// Handle of the header navigation menu.
    #[serde(default = "default_header_menu")]
    pub header_menu_handle: String,
    /// Handle of the footer navigation menu.
    #[serde(default = "default_footer_menu")]
    pub footer_menu_handle: String,
}

fn default_header_menu() -> String {
    "main-menu".to_string()
}

fn default_footer_menu() -> String {
    "footer".to_string()
}

impl StorefrontEnv {
    /// Create an environment for the given storefront domain.
    pub fn new(store_domain: impl Into<String>) -> Self {
        Self {
            store_domain: store_domain.into(),
            checkout_domain: None,
            storefront_id: None,
            storefront_api_token: None,
            analytics_id: None,
            editor_origin: None,
            header_menu_handle: default_header_menu(),
            footer_menu_handle: default_footer_menu(),
        }
    }

    /// Set the checkout domain.
    pub fn with_checkout_domain(mut self, domain: impl Into<String>) -> Self {
        self.checkout_domain = Some(domain.into());
        self
    }

    /// Set the public storefront identifier.
    pub fn with_storefront_id(mut self, id: impl Into<String>) -> Self {
        self.storefront_id = Some(id.into());
        self
    }

    /// Set the public content-source API token.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.storefront_api_token = Some(token.into());
        self
    }

    /// Set the analytics container ID.
    pub fn with_analytics_id(mut self, id: impl Into<String>) -> Self {
        self.analytics_id = Some(id.into());
        self
    }

    /// Set the theming editor origin.
    pub fn with_editor_origin(mut self, origin: impl Into<String>) -> Self {
        self.editor_origin = Some(origin.into());
        self
    }

    /// Set the menu handles queried for the layout.
    pub fn with_menu_handles(
        mut self,
        header: impl Into<String>,
        footer: impl Into<String>,
    ) -> Self {
        self.header_menu_handle = header.into();
        self.footer_menu_handle = footer.into();
        self
    }
}
