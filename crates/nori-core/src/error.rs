//! Failure records for test-case execution

use std::any::Any;

use thiserror::Error;
use tokio::task::JoinError;

/// Terminal failure of one test case's work.
///
/// The runner treats every failure identically, whatever raised it: an
/// `Err` returned from the body, a panic, or a cancelled task. The
/// `message` is what went wrong; `trace` is a best-effort diagnostic
/// rendering (cause chain and, when backtraces are enabled, the captured
/// backtrace).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CaseFailure {
    message: String,
    trace: Option<String>,
}

impl CaseFailure {
    /// Create a failure with a bare message and no trace
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: None,
        }
    }

    /// Create a failure from an error returned by the case body
    pub fn from_error(err: anyhow::Error) -> Self {
        Self {
            message: err.to_string(),
            trace: Some(format!("{err:?}")),
        }
    }

    /// Create a failure from a panic payload
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::new(panic_message(payload))
    }

    /// Create a failure from a spawned task that did not run to completion
    pub fn from_join(err: JoinError) -> Self {
        if err.is_panic() {
            Self::from_panic(err.into_panic())
        } else {
            Self::new("work was cancelled before completion")
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_string(),
            Err(_) => "non-string panic payload".to_string(),
        },
    }
}
