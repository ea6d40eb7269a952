//! End-to-end pipeline: compose a page, stream it through the
//! controller, and read the response the way a transport would.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use http::header::{CONTENT_SECURITY_POLICY, SET_COOKIE};
use http::{HeaderMap, StatusCode};
use serde_json::{json, Value};

use vitrine_sdk::prelude::*;

const CRAWLER_UA: &str = "Mozilla/5.0 (compatible; Googlebot/2.1)";

struct ApiSource;

#[async_trait]
impl ContentSource for ApiSource {
    async fn query(&self, _document: &str, _variables: Value) -> Result<Option<Value>, SourceError> {
        Ok(Some(json!({
            "shop": {
                "id": "shop/1",
                "name": "Demo Shop",
                "description": "Things we like",
                "primaryDomain": {"url": "https://shop.example"},
            },
            "headerMenu": {
                "id": "menu/main",
                "items": [
                    {
                        "id": "shop-all",
                        "title": "Shop all",
                        "type": "CATALOG",
                        "url": "https://shop.example/collections/all",
                        "items": []
                    },
                    {
                        "id": "journal",
                        "title": "Journal",
                        "type": "HTTP",
                        "url": "https://journal.example/",
                        "items": []
                    }
                ]
            },
            "footerMenu": null
        })))
    }
}

struct Customer;

#[async_trait]
impl CustomerAccount for Customer {
    async fn is_logged_in(&self) -> anyhow::Result<bool> {
        Ok(true)
    }
}

struct CartApi;

#[async_trait]
impl CartSource for CartApi {
    async fn get(&self) -> anyhow::Result<Option<Cart>> {
        Ok(Some(Cart {
            id: "cart/9".to_string(),
            total_quantity: 3,
        }))
    }
}

struct Theme;

#[async_trait]
impl ThemeSource for Theme {
    async fn load_settings(&self) -> anyhow::Result<ThemeSettings> {
        Ok(ThemeSettings(json!({"accent": "#224"})))
    }
}

/// A renderer that writes the shell immediately and streams the
/// deferred slots as continuations, the way the real one does.
struct HtmlRenderer;

#[async_trait]
impl Renderer for HtmlRenderer {
    async fn render(
        &self,
        document: PageData,
        options: RenderOptions,
    ) -> Result<RenderHandle, RenderError> {
        let (notifier, completion) = CompletionHandle::channel();
        let (tx, rx) = futures::channel::mpsc::unbounded();
        let nonce = options.nonce;

        tokio::spawn(async move {
            let mut shell = String::new();
            shell.push_str("<!DOCTYPE html><html><head>");
            shell.push_str(&format!("<title>{}</title>", document.seo.title));
            shell.push_str(&format!(
                r#"<script nonce="{}">window.__locale = "{}";</script>"#,
                nonce,
                document.selected_locale.key()
            ));
            shell.push_str("</head><body><nav>");
            if let Some(menu) = &document.layout.header_menu {
                for item in &menu.items {
                    shell.push_str(&format!(
                        r#"<a href="{}">{}</a>"#,
                        item.target.href(),
                        item.title
                    ));
                }
            }
            shell.push_str("</nav>");
            let _ = tx.unbounded_send(shell.into_bytes());

            // Deferred continuations arrive after the initial flush.
            let logged_in = document.is_logged_in.resolve().await.unwrap_or(false);
            let _ = tx.unbounded_send(
                format!(r#"<template data-slot="is_logged_in">{logged_in}</template>"#)
                    .into_bytes(),
            );
            let quantity = document
                .cart
                .resolve()
                .await
                .ok()
                .flatten()
                .map(|cart| cart.total_quantity)
                .unwrap_or(0);
            let _ = tx.unbounded_send(
                format!(r#"<template data-slot="cart">{quantity}</template>"#).into_bytes(),
            );

            let _ = tx.unbounded_send(b"</body></html>".to_vec());
            notifier.complete();
        });

        Ok(RenderHandle {
            body: rx.boxed(),
            completion,
        })
    }
}

fn load_context() -> LoadContext {
    LoadContext {
        env: StorefrontEnv::new("https://shop.example")
            .with_checkout_domain("checkout.example")
            .with_editor_origin("https://editor.example"),
        locale: Locale::default(),
        source: Arc::new(ApiSource),
        session: Arc::new(CookieSession::new()),
        customer: Arc::new(Customer),
        cart: Arc::new(CartApi),
        theme: Arc::new(Theme),
        rewrites: RewriteRules::new().map("CATALOG", "products"),
    }
}

#[tokio::test]
async fn test_crawler_receives_a_complete_document() {
    let ctx = RequestContext::new("https://shop.example/").with_header("user-agent", CRAWLER_UA);
    let document = compose_page(&ctx, &load_context()).await.unwrap();
    let controller = StreamController::new(HtmlRenderer, StorefrontEnv::new("https://shop.example"));

    let response = controller
        .respond(&ctx, StatusCode::OK, HeaderMap::new(), document)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let html = String::from_utf8(response.body.concat().await).unwrap();

    // Fully formed markup, deferred slots included.
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.ends_with("</body></html>"));
    assert!(html.contains("<title>Demo Shop</title>"));
    assert!(html.contains(r#"<a href="/products">Shop all</a>"#));
    assert!(html.contains(r#"<a href="https://journal.example/">Journal</a>"#));
    assert!(html.contains(r#"<template data-slot="is_logged_in">true</template>"#));
    assert!(html.contains(r#"<template data-slot="cart">3</template>"#));
}

#[tokio::test]
async fn test_response_headers_cover_the_contract() {
    let ctx = RequestContext::new("https://shop.example/").with_header("user-agent", CRAWLER_UA);
    let document = compose_page(&ctx, &load_context()).await.unwrap();
    let controller = StreamController::new(
        HtmlRenderer,
        StorefrontEnv::new("https://shop.example").with_editor_origin("https://editor.example"),
    );

    let response = controller
        .respond(&ctx, StatusCode::OK, HeaderMap::new(), document)
        .await;

    let csp = response
        .headers
        .get(CONTENT_SECURITY_POLICY)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(csp.contains("frame-ancestors 'self' https://editor.example"));

    let cookie = response.headers.get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("__session="));

    let html = String::from_utf8(response.body.concat().await).unwrap();
    // The nonce in the markup is the one the policy allows.
    let nonce = html
        .split("nonce=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap();
    assert!(csp.contains(&format!("'nonce-{nonce}'")));
}

#[tokio::test]
async fn test_empty_content_source_is_fatal_before_render() {
    struct EmptySource;

    #[async_trait]
    impl ContentSource for EmptySource {
        async fn query(
            &self,
            _document: &str,
            _variables: Value,
        ) -> Result<Option<Value>, SourceError> {
            Ok(None)
        }
    }

    let mut load = load_context();
    load.source = Arc::new(EmptySource);
    let ctx = RequestContext::new("https://shop.example/");

    let err = compose_page(&ctx, &load).await.unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.status_code(), 500);
}
