//! The eager/deferred slot union.

use std::future::Future;

use tokio::sync::oneshot;

/// Error marker recorded when a deferred slot's fetch fails.
///
/// Isolated to its slot: the rendering layer shows a degraded state for
/// this slot while the rest of the page is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("slot '{slot}' failed to resolve: {reason}")]
pub struct SlotError {
    pub slot: String,
    pub reason: String,
}

/// A named page-data slot: either resolved before the first byte, or a
/// handle resolving after streaming has started.
#[derive(Debug)]
pub enum Slot<T> {
    /// Fully resolved before the response body may begin streaming.
    Eager(T),
    /// Resolving in the background; the transport streams the value as
    /// a continuation of the same response.
    Deferred(DeferredSlot<T>),
}

impl<T: Send + 'static> Slot<T> {
    /// Wrap an already-resolved value.
    pub fn eager(value: T) -> Self {
        Self::Eager(value)
    }

    /// Spawn a background fetch for this slot. Failure is caught and
    /// stored as the slot's error marker; it never crashes the response.
    pub fn deferred<F>(name: impl Into<String>, fut: F) -> Self
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Self::Deferred(DeferredSlot::spawn(name, fut))
    }

    /// Whether this slot is still resolving in the background.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// The resolved value, if eager.
    pub fn as_eager(&self) -> Option<&T> {
        match self {
            Self::Eager(value) => Some(value),
            Self::Deferred(_) => None,
        }
    }

    /// Resolve the slot: immediate for eager values, awaiting the
    /// background task for deferred ones.
    pub async fn resolve(self) -> Result<T, SlotError> {
        match self {
            Self::Eager(value) => Ok(value),
            Self::Deferred(slot) => slot.resolve().await,
        }
    }
}

/// Handle to a deferred slot's background task.
///
/// Dropping the handle abandons the value: the task still runs to
/// completion, and its send into the dropped receiver is a silent no-op.
/// That is exactly the behavior wanted when the client disconnects
/// mid-stream.
#[derive(Debug)]
pub struct DeferredSlot<T> {
    name: String,
    rx: oneshot::Receiver<Result<T, SlotError>>,
}

impl<T: Send + 'static> DeferredSlot<T> {
    /// Spawn the slot's fetch as a background task.
    pub fn spawn<F>(name: impl Into<String>, fut: F) -> Self
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let name = name.into();
        let (tx, rx) = oneshot::channel();
        let task_name = name.clone();
        tokio::spawn(async move {
            let result = fut.await.map_err(|err| SlotError {
                slot: task_name.clone(),
                reason: err.to_string(),
            });
            if let Err(unsent) = tx.send(result) {
                // Consumer is gone (disconnect); drop the value quietly.
                drop(unsent);
            }
        });
        Self { name, rx }
    }

    /// The slot's name, for diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Await the background task. A task that died without reporting
    /// (e.g. it panicked) resolves to the slot's error marker.
    pub async fn resolve(self) -> Result<T, SlotError> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(SlotError {
                slot: self.name,
                reason: "background task abandoned".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_eager_resolves_immediately() {
        let slot = Slot::eager(7);
        assert!(!slot.is_deferred());
        assert_eq!(slot.as_eager(), Some(&7));
        assert_eq!(slot.resolve().await, Ok(7));
    }

    #[tokio::test]
    async fn test_deferred_resolves_to_value() {
        let slot = Slot::deferred("answer", async { Ok(42) });
        assert!(slot.is_deferred());
        assert_eq!(slot.resolve().await, Ok(42));
    }

    #[tokio::test]
    async fn test_deferred_failure_is_isolated_to_marker() {
        let slot: Slot<u32> =
            Slot::deferred("cart", async { Err(anyhow::anyhow!("upstream 503")) });
        let err = slot.resolve().await.unwrap_err();
        assert_eq!(err.slot, "cart");
        assert!(err.reason.contains("upstream 503"));
    }

    #[tokio::test]
    async fn test_panicking_task_becomes_marker() {
        let slot: Slot<u32> = Slot::deferred("boom", async { panic!("render me unusable") });
        let err = slot.resolve().await.unwrap_err();
        assert_eq!(err.slot, "boom");
    }

    #[tokio::test]
    async fn test_dropped_slot_is_a_silent_no_op() {
        let slot: Slot<u32> = Slot::deferred("abandoned", async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(1)
        });
        drop(slot);
        // Give the background task time to finish its send into the
        // dropped receiver; nothing should surface.
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_does_not_block_creation() {
        // A fetch that never completes must still allow the slot to be
        // created and handed off without suspending.
        let slot: Slot<u32> = Slot::deferred("stuck", std::future::pending());
        assert!(slot.is_deferred());
    }
}
