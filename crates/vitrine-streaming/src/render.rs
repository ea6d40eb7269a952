//! The renderer boundary.

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::sync::oneshot;

use vitrine_core::CancelSignal;
use vitrine_defer::PageData;
use vitrine_security::Nonce;

/// The response body: a stream of chunks, possibly still being written
/// while the consumer reads.
pub type BodyStream = BoxStream<'static, Vec<u8>>;

/// Error raised while producing the render stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("render failed: {reason}")]
pub struct RenderError {
    pub reason: String,
}

impl RenderError {
    /// Create an error with a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Options threaded into every render call.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// The per-request policy nonce; the renderer must tag every inline
    /// script/style reference with it.
    pub nonce: Nonce,
    /// Fired when the client disconnects; the renderer may stop writing.
    pub cancel: CancelSignal,
}

/// Notifying side of a render's terminal state, held by the renderer.
#[derive(Debug)]
pub struct CompletionNotifier {
    tx: oneshot::Sender<Result<(), RenderError>>,
}

impl CompletionNotifier {
    /// Report that the whole document was written.
    pub fn complete(self) {
        let _ = self.tx.send(Ok(()));
    }

    /// Report a mid-stream failure. Already-flushed bytes stay valid.
    pub fn fail(self, err: RenderError) {
        let _ = self.tx.send(Err(err));
    }
}

/// Waiting side of a render's terminal state.
#[derive(Debug)]
pub struct CompletionHandle {
    rx: oneshot::Receiver<Result<(), RenderError>>,
}

impl CompletionHandle {
    /// Create a connected notifier/handle pair.
    pub fn channel() -> (CompletionNotifier, CompletionHandle) {
        let (tx, rx) = oneshot::channel();
        (CompletionNotifier { tx }, CompletionHandle { rx })
    }

    /// Suspend until the stream reports a terminal state. A renderer
    /// that drops its notifier without reporting counts as failed.
    pub async fn wait(self) -> Result<(), RenderError> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(RenderError::new("renderer abandoned the stream")),
        }
    }
}

/// A started render: the body stream plus its completion handle.
pub struct RenderHandle {
    pub body: BodyStream,
    pub completion: CompletionHandle,
}

/// The visual rendering layer, treated as opaque by this core.
///
/// `render` resolves once the stream has begun emitting bytes - not
/// when it finishes. Failing to even start is an `Err`; failures after
/// the first byte are reported through the completion handle while the
/// body keeps whatever was already buffered.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(
        &self,
        document: PageData,
        options: RenderOptions,
    ) -> Result<RenderHandle, RenderError>;
}

/// Terminal result of a streaming render. The body is always present;
/// only the status and diagnostics differ.
pub enum RenderOutcome {
    Success { body: BodyStream },
    Failed { body: BodyStream },
}

impl RenderOutcome {
    /// Whether the stream reached (or is expected to reach) completion
    /// without error.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Take the body stream, success or not.
    pub fn into_body(self) -> BodyStream {
        match self {
            Self::Success { body } | Self::Failed { body } => body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completion_success() {
        let (notifier, handle) = CompletionHandle::channel();
        notifier.complete();
        assert_eq!(handle.wait().await, Ok(()));
    }

    #[tokio::test]
    async fn test_completion_failure_carries_reason() {
        let (notifier, handle) = CompletionHandle::channel();
        notifier.fail(RenderError::new("template blew up"));
        let err = handle.wait().await.unwrap_err();
        assert!(err.reason.contains("template blew up"));
    }

    #[tokio::test]
    async fn test_dropped_notifier_counts_as_failure() {
        let (notifier, handle) = CompletionHandle::channel();
        drop(notifier);
        assert!(handle.wait().await.is_err());
    }

    #[test]
    fn test_outcome_always_yields_a_body() {
        use futures::StreamExt;
        let failed = RenderOutcome::Failed {
            body: futures::stream::iter(vec![b"partial".to_vec()]).boxed(),
        };
        assert!(!failed.is_success());
        let _body = failed.into_body();
    }
}
