//! Core abstractions for the Vitrine storefront request core.
//!
//! This crate provides the fundamental types shared by every stage of a
//! page request:
//! - `RequestContext` - Typed view of the incoming request
//! - `CancelSignal` - Client-disconnect propagation
//! - `StorefrontEnv` - Per-deployment storefront configuration
//! - `RequestPhase` / `TimingContext` - Request lifecycle tracking
//! - `RequestError` - The request-level error taxonomy

mod context;
mod env;
mod error;
mod lifecycle;

pub use context::*;
pub use env::*;
pub use error::*;
pub use lifecycle::*;
