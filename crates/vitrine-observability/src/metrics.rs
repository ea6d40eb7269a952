//! Timing metrics for the streaming render path.

use std::time::Instant;

use serde::Serialize;
use vitrine_core::RequestId;

/// Collector for one request's render timings.
#[derive(Debug)]
pub struct RenderMetrics {
    request_id: RequestId,
    route: Option<String>,
    start: Instant,
    policy_issued: Option<Instant>,
    render_started: Option<Instant>,
    first_byte: Option<Instant>,
    completed: Option<Instant>,
    waited_for_completion: bool,
    slot_failures: u32,
}

impl RenderMetrics {
    /// Create a collector anchored at request start.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            route: None,
            start: Instant::now(),
            policy_issued: None,
            render_started: None,
            first_byte: None,
            completed: None,
            waited_for_completion: false,
            slot_failures: 0,
        }
    }

    /// Attach the route path.
    pub fn set_route(&mut self, route: impl Into<String>) {
        self.route = Some(route.into());
    }

    /// Record that the security policy was issued.
    pub fn record_policy_issued(&mut self) {
        self.policy_issued = Some(Instant::now());
    }

    /// Record that the renderer was invoked.
    pub fn record_render_started(&mut self) {
        self.render_started = Some(Instant::now());
    }

    /// Record that the stream began emitting bytes.
    pub fn record_first_byte(&mut self) {
        self.first_byte = Some(Instant::now());
    }

    /// Record that the stream reached a terminal state.
    pub fn record_completed(&mut self) {
        self.completed = Some(Instant::now());
    }

    /// Record that the response was held for stream completion
    /// (automated requester).
    pub fn record_completion_wait(&mut self) {
        self.waited_for_completion = true;
    }

    /// Count a deferred slot that resolved to its error marker.
    pub fn record_slot_failure(&mut self) {
        self.slot_failures += 1;
    }

    /// Close the collector into a serializable report.
    pub fn finalize(self, status_code: u16) -> RenderReport {
        let start = self.start;
        let us = |t: Option<Instant>| t.map(|t| t.duration_since(start).as_micros() as u64);
        RenderReport {
            request_id: self.request_id.to_string(),
            route: self.route,
            time_to_policy_us: us(self.policy_issued),
            time_to_render_us: us(self.render_started),
            time_to_first_byte_us: us(self.first_byte),
            time_to_complete_us: us(self.completed),
            total_us: self.start.elapsed().as_micros() as u64,
            waited_for_completion: self.waited_for_completion,
            slot_failures: self.slot_failures,
            status_code,
        }
    }
}

/// Finalized render timings for one request.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_policy_us: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_render_us: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_first_byte_us: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_complete_us: Option<u64>,
    pub total_us: u64,
    pub waited_for_completion: bool,
    pub slot_failures: u32,
    pub status_code: u16,
}

impl RenderReport {
    /// One-line human summary.
    pub fn to_summary(&self) -> String {
        let ttfb = self
            .time_to_first_byte_us
            .map(|us| format!("{us}us"))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "request={} status={} ttfb={} total={}us waited={} slot_failures={}",
            self.request_id,
            self.status_code,
            ttfb,
            self.total_us,
            self.waited_for_completion,
            self.slot_failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_marks_are_monotonic() {
        let mut metrics = RenderMetrics::new(RequestId::from_string("req_x"));
        metrics.record_policy_issued();
        metrics.record_render_started();
        metrics.record_first_byte();
        metrics.record_completed();
        let report = metrics.finalize(200);

        assert!(report.time_to_policy_us <= report.time_to_render_us);
        assert!(report.time_to_render_us <= report.time_to_first_byte_us);
        assert!(report.time_to_first_byte_us <= report.time_to_complete_us);
        assert!(report.total_us >= report.time_to_complete_us.unwrap());
    }

    #[test]
    fn test_unrecorded_marks_are_absent() {
        let report = RenderMetrics::new(RequestId::from_string("req_x")).finalize(500);
        assert!(report.time_to_first_byte_us.is_none());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("time_to_first_byte_us").is_none());
        assert_eq!(json["status_code"], 500);
    }

    #[test]
    fn test_summary_shape() {
        let mut metrics = RenderMetrics::new(RequestId::from_string("req_x"));
        metrics.record_completion_wait();
        metrics.record_slot_failure();
        let summary = metrics.finalize(500).to_summary();

        assert!(summary.contains("status=500"));
        assert!(summary.contains("waited=true"));
        assert!(summary.contains("slot_failures=1"));
        assert!(summary.contains("ttfb=-"));
    }
}
