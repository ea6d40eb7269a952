//! Streaming render control.
//!
//! This crate drives the renderer and owns the response contract:
//! - `Renderer` / `RenderHandle` - The opaque renderer boundary
//! - `AutomationClassifier` / `KnownCrawlers` - Crawler detection
//! - `StreamController` - Policy-before-render ordering, the
//!   crawler/human completion policy, and the 500 downgrade that keeps
//!   the stream well-formed
//!
//! Crawlers get control back only once the stream reports a terminal
//! state; humans get the response as soon as bytes are flowing.

mod bot;
mod controller;
mod render;

pub use bot::*;
pub use controller::*;
pub use render::*;
