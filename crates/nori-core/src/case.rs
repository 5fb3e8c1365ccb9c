//! Test case construction and execution

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::error::CaseFailure;

/// Outcome of one test case body.
///
/// Assertions are expressed however the author likes (`anyhow::ensure!`,
/// early returns, plain panics); the runner folds an `Err` and a panic
/// into the same failed state.
pub type CaseResult = anyhow::Result<()>;

/// Terminal state of one executed test case
#[derive(Debug)]
pub enum CaseOutcome {
    Passed,
    Failed(CaseFailure),
    Skipped(String),
}

/// The deferred work behind a test case.
///
/// `Spawned` bodies are already running on the blocking pool; awaiting
/// only observes their result. `Inline` bodies are cold and make no
/// progress until the runner polls them.
enum CaseWork {
    Spawned(JoinHandle<CaseResult>),
    Inline(BoxFuture<'static, CaseResult>),
}

/// A named unit of work evaluated for pass/fail/skip outcome
pub struct TestCase {
    description: String,
    work: CaseWork,
    skip_reason: Option<String>,
}

impl TestCase {
    /// Create a case from an asynchronous body.
    ///
    /// The future is stored cold: it starts executing only when the
    /// runner reaches this case, and never if the case is skipped.
    pub fn new(
        description: impl Into<String>,
        future: impl Future<Output = CaseResult> + Send + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            work: CaseWork::Inline(future.boxed()),
            skip_reason: None,
        }
    }

    /// Create a case from a synchronous body.
    ///
    /// The closure is handed to the blocking pool immediately, so it may
    /// run concurrently with other cases constructed up front. The runner
    /// awaiting the case fixes only when the result is observed and
    /// reported, not when the work happens.
    pub fn blocking(
        description: impl Into<String>,
        body: impl FnOnce() -> CaseResult + Send + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            work: CaseWork::Spawned(tokio::task::spawn_blocking(body)),
            skip_reason: None,
        }
    }

    /// Mark this case as skipped, leaving the underlying work untouched
    pub fn skipped(mut self, reason: impl Into<String>) -> Self {
        self.skip_reason = Some(reason.into());
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }

    /// Await the case's work and classify the result.
    ///
    /// Panics in either form are caught at this boundary and folded into
    /// a [`CaseFailure`] so a broken case cannot take the run down.
    pub(crate) async fn execute(self) -> Result<(), CaseFailure> {
        match self.work {
            CaseWork::Spawned(handle) => match handle.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(err)) => Err(CaseFailure::from_error(err)),
                Err(join) => Err(CaseFailure::from_join(join)),
            },
            CaseWork::Inline(future) => match AssertUnwindSafe(future).catch_unwind().await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(err)) => Err(CaseFailure::from_error(err)),
                Err(payload) => Err(CaseFailure::from_panic(payload)),
            },
        }
    }
}
