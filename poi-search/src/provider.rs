//! Trait definition for pluggable POI providers.
//!
//! The orchestrator only ever talks to providers through [`PoiProvider`], so
//! it does not care whether a source is an on-device model, a remote catalog
//! or a fixed test double.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;
use crate::types::{ProviderOutput, ProviderQuery};

/// Deadline and cancellation signal for one provider call.
///
/// The orchestrator creates one context per call. Adapters should wrap their
/// own suspension points in [`QueryContext::guard`] so that an expired
/// deadline or an explicit cancel makes them return [`ProviderError::Timeout`]
/// promptly instead of finishing the work.
#[derive(Debug, Clone)]
pub struct QueryContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl QueryContext {
    /// A context whose deadline is `budget` from now.
    pub fn with_budget(budget: Duration) -> Self {
        Self {
            deadline: Instant::now() + budget,
            cancel: CancellationToken::new(),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel any work still running under this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// `true` once cancelled or past the deadline.
    pub fn is_done(&self) -> bool {
        self.cancel.is_cancelled() || Instant::now() >= self.deadline
    }

    /// Run `work` until it completes, the deadline passes, or the context is
    /// cancelled, whichever comes first.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Timeout`] on deadline or cancellation, or
    /// whatever error `work` itself produced.
    pub async fn guard<F, T>(&self, work: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        tokio::select! {
            () = self.cancel.cancelled() => {
                Err(ProviderError::Timeout("query cancelled".into()))
            }
            () = tokio::time::sleep_until(self.deadline) => {
                Err(ProviderError::Timeout("deadline exceeded".into()))
            }
            result = work => result,
        }
    }
}

/// A source of POI candidates.
///
/// Implementations must be `Send + Sync` so the orchestrator can poll two of
/// them concurrently, and a call must not mutate anything the orchestrator
/// can observe. Retries, if any, are the implementation's own business.
pub trait PoiProvider: Send + Sync {
    /// Query the source for POIs near `query.origin`.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Unavailable`] when the source cannot be reached or
    ///   initialised
    /// - [`ProviderError::Timeout`] when `ctx` expires or is cancelled
    /// - [`ProviderError::InvalidResponse`] when the source answered with
    ///   data that cannot be turned into valid POIs
    fn query(
        &self,
        query: &ProviderQuery,
        ctx: &QueryContext,
    ) -> impl Future<Output = Result<ProviderOutput, ProviderError>> + Send;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

impl<T: PoiProvider> PoiProvider for &T {
    fn query(
        &self,
        query: &ProviderQuery,
        ctx: &QueryContext,
    ) -> impl Future<Output = Result<ProviderOutput, ProviderError>> + Send {
        (**self).query(query, ctx)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
