use std::future::{pending, Future};
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::errors::VkpnsError;

/// Caller-supplied cancellation and deadline for a single send
///
/// `SendContext::background()` carries neither; such a send is bounded only by
/// the transport's request timeout.
#[derive(Debug, Clone, Default)]
pub struct SendContext {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

impl SendContext {
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline relative to now
    ///
    /// A timeout too large to represent leaves the context without a deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Fail fast if the context is already done
    pub(crate) fn check(&self) -> Result<(), VkpnsError> {
        if self.is_cancelled() {
            return Err(VkpnsError::Canceled);
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(VkpnsError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `future` until it completes or the context is done.
    ///
    /// On cancellation or deadline the future is dropped.
    pub(crate) async fn run<F: Future>(&self, future: F) -> Result<F::Output, VkpnsError> {
        self.check()?;

        let cancelled = async {
            match &self.cancellation {
                Some(token) => token.cancelled().await,
                None => pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(VkpnsError::Canceled),
            _ = expired => Err(VkpnsError::DeadlineExceeded),
            output = future => Ok(output),
        }
    }
}
