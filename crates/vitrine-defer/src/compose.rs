//! The per-request page composer.

use std::sync::Arc;

use async_trait::async_trait;
use http::header::SET_COOKIE;
use http::{HeaderMap, HeaderValue};
use tracing::warn;

use vitrine_core::{Locale, RequestContext, RequestError, StorefrontEnv};
use vitrine_data::{fetch_layout, ContentSource, SessionStore};
use vitrine_nav::RewriteRules;

use crate::page::{Cart, Consent, PageData, PageDocument, SeoPayload, ShopAnalytics, ThemeSettings};
use crate::slot::Slot;

/// Login-status boundary; the check is deferred because nothing above
/// the fold depends on it.
#[async_trait]
pub trait CustomerAccount: Send + Sync {
    async fn is_logged_in(&self) -> anyhow::Result<bool>;
}

/// Cart boundary; `None` means the visitor has no cart yet.
#[async_trait]
pub trait CartSource: Send + Sync {
    async fn get(&self) -> anyhow::Result<Option<Cart>>;
}

/// Theming-tool boundary delivering the shop's theme settings.
#[async_trait]
pub trait ThemeSource: Send + Sync {
    async fn load_settings(&self) -> anyhow::Result<ThemeSettings>;
}

/// Everything the composer needs to build one page: the storefront
/// environment plus the external collaborators feeding the slots.
#[derive(Clone)]
pub struct LoadContext {
    pub env: StorefrontEnv,
    /// Locale selected for this request (by domain or URL prefix).
    pub locale: Locale,
    pub source: Arc<dyn ContentSource>,
    pub session: Arc<dyn SessionStore>,
    pub customer: Arc<dyn CustomerAccount>,
    pub cart: Arc<dyn CartSource>,
    pub theme: Arc<dyn ThemeSource>,
    pub rewrites: RewriteRules,
}

/// Assemble the page payload for one request.
///
/// Eager slots (layout, theme settings, seo, analytics, consent) are
/// resolved here; deferred slots (login status, cart) are spawned and
/// never awaited. The session is committed exactly once, after all
/// slot assembly, and its cookie lands on the document's headers before
/// the transport sees them.
pub async fn compose_page(
    ctx: &RequestContext,
    load: &LoadContext,
) -> Result<PageDocument, RequestError> {
    let locale = load.locale.clone();

    // Deferred slots start fetching first so they overlap the eager
    // aggregation below.
    let customer = load.customer.clone();
    let is_logged_in = Slot::deferred("is_logged_in", async move {
        customer.is_logged_in().await
    });
    let cart_source = load.cart.clone();
    let cart = Slot::deferred("cart", async move { cart_source.get().await });

    let (layout, theme_settings) = tokio::join!(
        fetch_layout(load.source.as_ref(), &load.env, &locale, &load.rewrites),
        load.theme.load_settings(),
    );
    let layout = layout?;
    let theme_settings = theme_settings.unwrap_or_else(|err| {
        // The page renders with default styling rather than not at all.
        warn!(request = %ctx.request_id, error = %err, "theme settings unavailable");
        ThemeSettings::default()
    });

    let seo = SeoPayload::root(&layout.shop, &ctx.url);
    let data = PageData {
        shop_analytics: ShopAnalytics {
            shop_id: layout.shop.id.clone(),
            shop_name: layout.shop.name.clone(),
            storefront_id: load.env.storefront_id.clone(),
        },
        consent: Consent {
            checkout_domain: load.env.checkout_domain.clone(),
            storefront_api_token: load.env.storefront_api_token.clone(),
        },
        is_logged_in,
        layout,
        selected_locale: locale,
        cart,
        seo,
        theme_settings,
        analytics_id: load.env.analytics_id.clone(),
    };

    let mut headers = HeaderMap::new();
    match load.session.commit().await {
        Ok(cookie) => match HeaderValue::try_from(cookie) {
            Ok(value) => {
                headers.insert(SET_COOKIE, value);
            }
            Err(err) => warn!(request = %ctx.request_id, error = %err, "session cookie not header-safe"),
        },
        Err(err) => {
            // A lost session cookie degrades the visit, not the page.
            warn!(request = %ctx.request_id, error = %err, "session commit failed");
        }
    }

    Ok(PageDocument { data, headers })
}
