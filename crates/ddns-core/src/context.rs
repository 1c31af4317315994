//! Caller-owned cancellation and deadline for provider calls
//!
//! A [`Context`] travels with every [`DnsProvider::update`] call. The
//! scheduler decides when to give up; the provider only has to run its
//! network exchange through [`Context::run`] so that a cancelled or expired
//! context aborts the in-flight request and surfaces
//! [`Error::Cancelled`] or [`Error::DeadlineExceeded`].
//!
//! [`DnsProvider::update`]: crate::DnsProvider::update

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Cancellation signal and optional deadline for a single operation
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels the [`Context`] it was created with
///
/// Dropping the handle does not cancel the context.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel the context and every clone of it
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that can be cancelled through the returned handle
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancel: Some(rx),
            deadline: None,
        };
        (ctx, CancelHandle { tx })
    }

    /// Derive a context that expires `timeout` from now
    ///
    /// An earlier deadline already set on `self` is kept. A timeout too large
    /// to represent as an instant leaves the deadline unchanged.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Derive a context that expires at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the context has been cancelled through its handle
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// The reason this context is done, or `None` while it is still live
    pub fn err(&self) -> Option<Error> {
        if self.is_cancelled() {
            return Some(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Error::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled; pending forever otherwise
    pub async fn cancelled(&self) {
        let Some(rx) = &self.cancel else {
            return std::future::pending().await;
        };

        let mut rx = rx.clone();
        // A dropped handle can no longer cancel.
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Drive `fut` to completion unless the context is done first
    ///
    /// When the context wins, `fut` is dropped, which aborts whatever I/O
    /// it had in flight.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output> {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancelled() => {
                tracing::debug!("Operation cancelled by caller");
                Err(Error::Cancelled)
            }
            _ = expired => {
                tracing::debug!("Operation deadline exceeded");
                Err(Error::DeadlineExceeded)
            }
            output = fut => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn background_is_never_done() {
        let ctx = Context::background();

        assert!(!ctx.is_cancelled());
        assert!(ctx.err().is_none());
        assert!(ctx.deadline().is_none());

        let mut cancelled = task::spawn(ctx.cancelled());
        assert_pending!(cancelled.poll());
    }

    #[test]
    fn cancel_wakes_waiters() {
        let (ctx, handle) = Context::with_cancel();
        let clone = ctx.clone();

        let mut cancelled = task::spawn(clone.cancelled());
        assert_pending!(cancelled.poll());

        handle.cancel();

        assert!(cancelled.is_woken());
        assert_ready!(cancelled.poll());
        assert!(ctx.is_cancelled());
        assert!(matches!(ctx.err(), Some(Error::Cancelled)));
    }

    #[test]
    fn dropped_handle_does_not_cancel() {
        let (ctx, handle) = Context::with_cancel();
        drop(handle);

        assert!(!ctx.is_cancelled());
        let mut cancelled = task::spawn(ctx.cancelled());
        assert_pending!(cancelled.poll());
    }

    #[tokio::test]
    async fn earliest_deadline_wins() {
        let ctx = Context::background()
            .with_timeout(Duration::from_secs(1))
            .with_timeout(Duration::from_secs(60));

        let deadline = ctx.deadline().expect("deadline set");
        assert!(deadline <= Instant::now() + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn unrepresentable_timeout_keeps_existing_deadline() {
        let ctx = Context::background().with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(ctx.err().is_none());

        let bounded = Context::background()
            .with_timeout(Duration::from_secs(1))
            .with_timeout(Duration::MAX);
        let deadline = bounded.deadline().expect("deadline kept");
        assert!(deadline <= Instant::now() + Duration::from_secs(1));

        let output = ctx.run(async { 7 }).await.expect("live context");
        assert_eq!(output, 7);
    }

    #[tokio::test]
    async fn run_returns_output_when_live() {
        let ctx = Context::background().with_timeout(Duration::from_secs(5));

        let output = ctx.run(async { 42 }).await.expect("live context");
        assert_eq!(output, 42);
    }

    #[tokio::test]
    async fn run_fails_fast_on_cancelled_context() {
        let (ctx, handle) = Context::with_cancel();
        handle.cancel();

        let result = ctx.run(async { 42 }).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn run_aborts_pending_future_on_cancel() {
        let (ctx, handle) = Context::with_cancel();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        });

        let result = ctx.run(std::future::pending::<()>()).await;
        canceller.await.unwrap();

        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn run_aborts_pending_future_on_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_millis(20));

        let result = ctx.run(std::future::pending::<()>()).await;
        assert!(matches!(result, Err(Error::DeadlineExceeded)));
    }
}
