//! Content-source access and layout aggregation.
//!
//! This crate provides:
//! - `ContentSource` - The storefront API boundary (query + variables)
//! - `fetch_layout` - One query for shop identity plus both menus,
//!   normalized through `vitrine-nav`
//! - `SessionStore` / `CookieSession` - The commit-once session boundary

mod layout;
mod session;
mod source;

pub use layout::*;
pub use session::*;
pub use source::*;
