//! Request lifecycle tracking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Lifecycle phases for a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPhase {
    /// Request received, processing started.
    Received,
    /// Security policy computed, nonce minted.
    PolicyIssued,
    /// Render stream has begun emitting bytes.
    Streaming,
    /// Stream reached its terminal state successfully.
    Complete,
    /// Stream reached its terminal state with an error.
    Failed(String),
}

impl RequestPhase {
    /// Whether this phase is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed(_))
    }
}

/// Timing context for observability.
///
/// Records named marks relative to request start. Cloned into the
/// streaming layer so the controller and the metrics collector see the
/// same clock origin.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<String, Instant>,
}

impl TimingContext {
    /// Create a new timing context anchored at now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a timing mark.
    pub fn mark(&mut self, name: &str) {
        self.marks.insert(name.to_string(), Instant::now());
    }

    /// Elapsed time since request start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time from request start to a named mark, if recorded.
    pub fn time_to(&self, name: &str) -> Option<Duration> {
        self.marks.get(name).map(|t| t.duration_since(self.start))
    }

    /// Time from request start to policy issuance.
    pub fn time_to_policy(&self) -> Option<Duration> {
        self.time_to("policy_issued")
    }

    /// Time from request start to the first streamed byte.
    pub fn time_to_first_byte(&self) -> Option<Duration> {
        self.time_to("first_byte")
    }

    /// Time from request start to stream completion.
    pub fn time_to_complete(&self) -> Option<Duration> {
        self.time_to("complete")
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}
