//! Request context carrying cancellation and deadline signals.
//!
//! Every operation that may block on external I/O (store lookups and
//! delegated engines) runs through [`Context::run`], which races the
//! operation against the cancellation token and the optional deadline.
//! The losing future is dropped, so I/O that honors drop semantics
//! (e.g. child processes spawned with `kill_on_drop`) stops promptly.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::ConvertError;

/// Why a context stopped an operation early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    /// The token was cancelled.
    Cancelled,
    /// The deadline passed.
    DeadlineExceeded,
}

impl From<Interrupted> for ConvertError {
    fn from(reason: Interrupted) -> Self {
        match reason {
            Interrupted::Cancelled => ConvertError::Cancelled,
            Interrupted::DeadlineExceeded => ConvertError::DeadlineExceeded,
        }
    }
}

/// Cancellation and deadline for a single conversion request.
///
/// Cloning a context shares its token: cancelling any clone cancels all.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Create a context driven by an existing token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Return a copy of this context that also expires after `timeout`.
    ///
    /// An earlier existing deadline is kept.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing <= candidate => existing,
            _ => candidate,
        };
        Self {
            token: self.token.clone(),
            deadline: Some(deadline),
        }
    }

    /// Cancel this context and every clone of it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The deadline, if one was set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Check the context without waiting.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.token.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupted::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` to completion unless the context is cancelled or expires first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, Interrupted>
    where
        F: Future<Output = T>,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Interrupted::Cancelled),
            _ = deadline => Err(Interrupted::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn background_runs_to_completion() {
        let ctx = Context::background();
        assert_eq!(ctx.run(async { 42 }).await, Ok(42));
    }

    #[tokio::test]
    async fn cancelled_context_refuses_to_start() {
        let ctx = Context::background();
        ctx.cancel();
        assert_eq!(ctx.run(async { 1 }).await, Err(Interrupted::Cancelled));
    }

    #[tokio::test]
    async fn cancel_aborts_pending_future() {
        let ctx = Context::background();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result = ctx.run(std::future::pending::<()>()).await;
        assert_eq!(result, Err(Interrupted::Cancelled));
    }

    #[tokio::test]
    async fn deadline_aborts_slow_future() {
        let ctx = Context::background().with_timeout(Duration::from_millis(20));
        let result = ctx.run(tokio::time::sleep(Duration::from_secs(60))).await;
        assert_eq!(result, Err(Interrupted::DeadlineExceeded));
    }

    #[test]
    fn with_timeout_keeps_earlier_deadline() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        rt.block_on(async {
            let short = Context::background().with_timeout(Duration::from_secs(1));
            let long = short.with_timeout(Duration::from_secs(60));
            assert_eq!(short.deadline(), long.deadline());
        });
    }

    #[test]
    fn interrupted_maps_to_convert_error() {
        assert!(matches!(
            ConvertError::from(Interrupted::Cancelled),
            ConvertError::Cancelled
        ));
        assert!(matches!(
            ConvertError::from(Interrupted::DeadlineExceeded),
            ConvertError::DeadlineExceeded
        ));
    }
}
