//! Execution context carried by every repository call
//!
//! An [`OpContext`] combines a shared cancellation flag with an optional
//! deadline. Child contexts derived with [`OpContext::with_timeout`] share the
//! parent's cancellation and never extend its deadline.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

use super::DomainError;

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cancellable, deadline-aware operation context
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    cancel: Arc<CancelState>,
    deadline: Option<Instant>,
}

impl OpContext {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a child context that expires after `timeout`
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a child context that expires at `deadline` (or earlier, if the
    /// parent expires first)
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        };

        Self {
            cancel: Arc::clone(&self.cancel),
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel this context and every context derived from it
    pub fn cancel(&self) {
        self.cancel.cancelled.store(true, Ordering::SeqCst);
        self.cancel.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.cancelled.load(Ordering::SeqCst)
    }

    /// Fail fast if the context is already cancelled or expired
    pub fn check(&self) -> Result<(), DomainError> {
        if self.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(DomainError::DeadlineExceeded);
            }
        }

        Ok(())
    }

    /// Resolves once the context is cancelled
    pub async fn cancelled(&self) {
        let notified = self.cancel.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.is_cancelled() {
            return;
        }

        notified.await;
    }

    /// Run `operation` unless the context is already done, aborting it if the
    /// context is cancelled or expires while it is pending
    pub async fn run<F, T>(&self, operation: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        self.check()?;

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.cancelled() => Err(DomainError::Cancelled),
                    result = tokio::time::timeout_at(deadline, operation) => {
                        result.map_err(|_| DomainError::DeadlineExceeded)?
                    }
                }
            }
            None => {
                tokio::select! {
                    biased;
                    _ = self.cancelled() => Err(DomainError::Cancelled),
                    result = operation => result,
                }
            }
        }
    }
}
