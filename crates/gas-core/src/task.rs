//! Cancellable background operations.

use crate::Outcome;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Message of an operation stopped through [`OperationHandle::cancel`].
pub const CANCELLED: &str = "Operation cancelled";

/// A running operation that can be awaited or cancelled.
///
/// Cancelling drops the operation at its next await point; whatever it had
/// already done stays done.
pub struct OperationHandle<T> {
    token: CancellationToken,
    join: JoinHandle<Outcome<T>>,
}

impl<T: Send + 'static> OperationHandle<T> {
    /// Run `operation` on the current tokio runtime.
    pub fn spawn<F>(operation: F) -> Self
    where
        F: Future<Output = Outcome<T>> + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();
        let join = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = child.cancelled() => Outcome::failure(CANCELLED),
                outcome = operation => outcome,
            }
        });
        Self { token, join }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token that cancels this operation, for wiring to signals.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for the outcome.
    pub async fn wait(self) -> Outcome<T> {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => Outcome::failure(CANCELLED),
            Err(err) => {
                tracing::warn!(error = %err, "Operation task failed");
                Outcome::failure("Operation failed unexpectedly")
            }
        }
    }
}
