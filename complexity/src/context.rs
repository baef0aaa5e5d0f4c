//! Cancellation context shared by every network call of a run.
//!
//! A [`CancelHandle`] and any number of [`CancelContext`] clones are linked
//! by a `tokio::sync::watch` channel. Flipping the handle makes every
//! context report cancellation, and every call wrapped in
//! [`CancelContext::run`] returns [`ClientError::Cancelled`] at its next
//! poll, dropping the in-flight request.

use std::future::Future;

use tokio::sync::watch;

use crate::client::ClientError;

/// Owner side of a cancellation context.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel every context created from this handle. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Observer side of a cancellation context. Cheap to clone.
#[derive(Clone, Debug)]
pub struct CancelContext {
    rx: watch::Receiver<bool>,
}

/// Creates a linked handle/context pair.
pub fn channel() -> (CancelHandle, CancelContext) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelContext { rx })
}

impl CancelContext {
    /// A context that is never cancelled.
    pub fn background() -> CancelContext {
        let (_handle, ctx) = channel();
        ctx
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the context is cancelled. Never resolves for a context
    /// whose handle was dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Drive `fut` to completion unless the context is cancelled first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        if self.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(ClientError::Cancelled),
            res = fut => res,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_completes_when_not_cancelled() {
        let ctx = CancelContext::background();
        let out = ctx.run(async { Ok::<_, ClientError>(42) }).await.unwrap();
        assert_eq!(out, 42);
    }

    #[tokio::test]
    async fn test_already_cancelled_short_circuits() {
        let (handle, ctx) = channel();
        handle.cancel();
        assert!(ctx.is_cancelled());
        let out = ctx.run(async { Ok::<_, ClientError>(1) }).await;
        assert!(matches!(out, Err(ClientError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_pending_future() {
        let (handle, ctx) = channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.cancel();
        });

        let out = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok::<_, ClientError>(())
            })
            .await;
        assert!(matches!(out, Err(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn test_clones_observe_cancellation() {
        let (handle, ctx) = channel();
        let clone = ctx.clone();
        assert!(!handle.is_cancelled());
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(clone.is_cancelled());
        clone.cancelled().await;
    }
}
