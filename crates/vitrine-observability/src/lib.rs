//! Request-scoped observability.
//!
//! This crate provides:
//! - `RequestLogger` - Structured logging correlated by request ID
//! - `RenderMetrics` - Timing marks for the streaming render path
//!
//! Log lines are emitted through `tracing`, so hosts choose the
//! subscriber; nothing here writes to stdio directly.

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;

pub use vitrine_core::{RequestId, TimingContext};
