//! Content security policy assembly.

use std::collections::BTreeMap;

use vitrine_core::StorefrontEnv;

use crate::nonce::Nonce;

/// The platform's asset CDN, allowed by default for images and media.
const PLATFORM_CDN: &str = "https://cdn.vitrinecdn.net";

/// CSP directives this core manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Directive {
    DefaultSrc,
    ConnectSrc,
    ScriptSrc,
    StyleSrc,
    ImgSrc,
    FontSrc,
    FrameSrc,
    FrameAncestors,
    BaseUri,
}

impl Directive {
    /// The directive name as serialized into the header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultSrc => "default-src",
            Self::ConnectSrc => "connect-src",
            Self::ScriptSrc => "script-src",
            Self::StyleSrc => "style-src",
            Self::ImgSrc => "img-src",
            Self::FontSrc => "font-src",
            Self::FrameSrc => "frame-src",
            Self::FrameAncestors => "frame-ancestors",
            Self::BaseUri => "base-uri",
        }
    }
}

/// Builder merging the three origin layers - platform defaults, theming
/// editor origins, shop origins - into one per-request policy.
///
/// Always construct fresh per request; issuing mints the nonce, and a
/// shared policy object would leak it across requests.
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    sources: BTreeMap<Directive, Vec<String>>,
}

impl PolicyBuilder {
    /// Start from the platform defaults.
    pub fn new() -> Self {
        let mut builder = Self {
            sources: BTreeMap::new(),
        };
        builder.push(Directive::DefaultSrc, "'self'");
        builder.push(Directive::ConnectSrc, "'self'");
        builder.push(Directive::ScriptSrc, "'self'");
        builder.push(Directive::StyleSrc, "'self'");
        builder.push(Directive::ImgSrc, "'self'");
        builder.push(Directive::ImgSrc, "data:");
        builder.push(Directive::ImgSrc, PLATFORM_CDN);
        builder.push(Directive::FontSrc, "'self'");
        builder.push(Directive::FrameAncestors, "'self'");
        builder.push(Directive::BaseUri, "'self'");
        builder
    }

    /// Build the full three-layer policy for a storefront environment.
    pub fn for_env(env: &StorefrontEnv) -> Self {
        let mut builder = Self::new().with_shop(
            Some(env.store_domain.as_str()),
            env.checkout_domain.as_deref(),
        );
        if let Some(editor) = env.editor_origin.as_deref() {
            builder = builder.with_editor(editor);
        }
        builder
    }

    /// Allow an extra source under a directive.
    pub fn allow(mut self, directive: Directive, source: impl Into<String>) -> Self {
        self.push(directive, normalize_source(source.into()));
        self
    }

    /// Allow the theming editor to preview the page: the editor origin
    /// may frame the storefront and the page may call back to it.
    pub fn with_editor(mut self, origin: &str) -> Self {
        let origin = normalize_source(origin.to_string());
        self.push(Directive::FrameAncestors, origin.clone());
        self.push(Directive::ConnectSrc, origin);
        self
    }

    /// Allow the shop's own origins: storefront domain for data calls,
    /// checkout domain for data calls and embedded checkout frames.
    pub fn with_shop(mut self, store_domain: Option<&str>, checkout_domain: Option<&str>) -> Self {
        if let Some(store) = store_domain {
            let store = normalize_source(store.to_string());
            self.push(Directive::ConnectSrc, store.clone());
            self.push(Directive::ImgSrc, store);
        }
        if let Some(checkout) = checkout_domain {
            let checkout = normalize_source(checkout.to_string());
            self.push(Directive::ConnectSrc, checkout.clone());
            self.push(Directive::FrameSrc, checkout);
        }
        self
    }

    /// Issue the policy: mint a fresh nonce, thread it into script-src
    /// and style-src, and serialize the header.
    pub fn issue(mut self) -> ContentSecurityPolicy {
        let nonce = Nonce::mint();
        self.push(Directive::ScriptSrc, nonce.source_expression());
        self.push(Directive::StyleSrc, nonce.source_expression());

        let header = self
            .sources
            .iter()
            .map(|(directive, sources)| format!("{} {}", directive.as_str(), sources.join(" ")))
            .collect::<Vec<_>>()
            .join("; ");

        ContentSecurityPolicy {
            nonce,
            header,
            sources: self.sources,
        }
    }

    fn push(&mut self, directive: Directive, source: impl Into<String>) {
        let source = source.into();
        let sources = self.sources.entry(directive).or_default();
        if !sources.contains(&source) {
            sources.push(source);
        }
    }
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Absent schemes default to https; keyword sources (quoted) and data:
/// URLs pass through.
fn normalize_source(source: String) -> String {
    if source.starts_with('\'') || source.contains(':') {
        source
    } else {
        format!("https://{source}")
    }
}

/// An issued per-request policy: the minted nonce, the serialized header
/// value, and the merged source lists.
#[derive(Debug, Clone)]
pub struct ContentSecurityPolicy {
    nonce: Nonce,
    header: String,
    sources: BTreeMap<Directive, Vec<String>>,
}

impl ContentSecurityPolicy {
    /// Build the full policy for a storefront environment and issue it.
    pub fn issue_for(env: &StorefrontEnv) -> Self {
        PolicyBuilder::for_env(env).issue()
    }

    /// The per-request nonce, consumed by the renderer.
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// The serialized `content-security-policy` header value.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Whether a source is allowed under a directive.
    pub fn allows(&self, directive: Directive, source: &str) -> bool {
        self.sources
            .get(&directive)
            .is_some_and(|sources| sources.iter().any(|s| s == source))
    }
}
