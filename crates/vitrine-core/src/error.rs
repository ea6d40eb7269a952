//! Request-level error taxonomy.

use thiserror::Error;

/// Errors surfaced at the request boundary.
///
/// Only `MissingData` aborts a request before rendering; `Render` is
/// recovered at the render boundary (status downgrade, stream kept), and
/// `SlotResolution` never propagates past its slot.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The content source returned nothing; the page cannot render
    /// without shop identity.
    #[error("no data returned from the content source")]
    MissingData,

    /// A required upstream call failed before rendering could begin.
    #[error("content source request failed: {0}")]
    Upstream(String),

    /// An error was raised while producing the render stream.
    #[error("render failed: {0}")]
    Render(String),

    /// A deferred data slot failed to resolve.
    #[error("slot '{slot}' failed to resolve: {reason}")]
    SlotResolution { slot: String, reason: String },

    /// No route matched the request. Consumed by the error boundary to
    /// select a not-found presentation instead of a generic error page.
    #[error("route not found: {0}")]
    RouteNotFound(String),
}

impl RequestError {
    /// The HTTP status this error maps to at the boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RouteNotFound(_) => 404,
            _ => 500,
        }
    }

    /// Whether this error aborts the request before any render attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RequestError::MissingData.status_code(), 500);
        assert_eq!(RequestError::Upstream("timeout".into()).status_code(), 500);
        assert_eq!(RequestError::Render("x".into()).status_code(), 500);
        assert_eq!(
            RequestError::RouteNotFound("/nope".into()).status_code(),
            404
        );
    }

    #[test]
    fn test_only_missing_data_is_fatal() {
        assert!(RequestError::MissingData.is_fatal());
        assert!(!RequestError::Render("x".into()).is_fatal());
        assert!(!RequestError::SlotResolution {
            slot: "cart".into(),
            reason: "timeout".into()
        }
        .is_fatal());
    }

    #[test]
    fn test_display_includes_slot_name() {
        let err = RequestError::SlotResolution {
            slot: "is_logged_in".into(),
            reason: "connection reset".into(),
        };
        assert_eq!(
            err.to_string(),
            "slot 'is_logged_in' failed to resolve: connection reset"
        );
    }
}
