//! Public SDK for the Vitrine storefront request core.
//!
//! This crate re-exports the whole request pipeline:
//!
//! ```ignore
//! use vitrine_sdk::prelude::*;
//!
//! async fn handle(ctx: RequestContext, load: LoadContext) -> StreamedResponse {
//!     let controller = StreamController::new(renderer, load.env.clone());
//!     match compose_page(&ctx, &load).await {
//!         Ok(document) => {
//!             controller
//!                 .respond(&ctx, StatusCode::OK, HeaderMap::new(), document)
//!                 .await
//!         }
//!         Err(err) => error_page(err),
//!     }
//! }
//! ```

pub use vitrine_core;
pub use vitrine_data;
pub use vitrine_defer;
pub use vitrine_nav;
pub use vitrine_observability;
pub use vitrine_security;
pub use vitrine_streaming;

/// Prelude for convenient imports.
pub mod prelude {
    pub use vitrine_core::*;
    pub use vitrine_data::*;
    pub use vitrine_defer::*;
    pub use vitrine_nav::*;
    pub use vitrine_observability::*;
    pub use vitrine_security::*;
    pub use vitrine_streaming::*;
}
