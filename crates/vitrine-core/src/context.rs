//! Request context with typed parameters.

use std::sync::Arc;

use http::{HeaderMap, Method};
use tokio::sync::watch;

use crate::lifecycle::TimingContext;

/// Unique request identifier for log correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 9] = rand::thread_rng().gen();
        Self(format!("req_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Create from an existing ID string (e.g. a trace header).
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signal fired when the client disconnects mid-request.
///
/// Cloned freely into deferred work; consumers observe cancellation, they
/// never trigger it. The triggering side holds the [`CancelHandle`].
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
    // Keeps the channel open for signals created without a handle.
    _hold: Option<Arc<watch::Sender<bool>>>,
}

/// Triggering side of a [`CancelSignal`], owned by the transport.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Fire the signal. Idempotent; observers that are already gone are
    /// ignored.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl CancelSignal {
    /// Create a connected handle/signal pair.
    pub fn pair() -> (CancelHandle, CancelSignal) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelSignal { rx, _hold: None })
    }

    /// A signal that never fires (requests with no disconnect tracking).
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            rx,
            _hold: Some(Arc::new(tx)),
        }
    }

    /// Check whether the signal has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Suspend until the signal fires. If the triggering side is dropped
    /// without firing, this pends forever - the request is simply never
    /// cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Typed view of an incoming page request.
///
/// One instance per request; nothing in here is shared across requests.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Request URL (absolute, as received).
    pub url: String,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Fired if the client disconnects.
    pub cancel: CancelSignal,
    /// Timing marks for observability.
    pub timing: TimingContext,
}

impl RequestContext {
    /// Create a new request context for a GET page request.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::generate(),
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
            cancel: CancelSignal::never(),
            timing: TimingContext::new(),
        }
    }

    /// Set the HTTP method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a header. Invalid names or values are ignored rather than
    /// failing request construction.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::try_from(name),
            http::header::HeaderValue::try_from(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Attach a disconnect signal.
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get a header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the `user-agent` header, used for automation detection.
    pub fn user_agent(&self) -> Option<&str> {
        self.header("user-agent")
    }
}
