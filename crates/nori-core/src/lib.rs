//! nori core
//!
//! Minimal asynchronous test-execution harness.
//! This crate provides the fundamental components for describing,
//! running, and reporting test cases:
//! - Building test cases from synchronous or asynchronous bodies
//! - Running them strictly sequentially with per-case failure isolation
//! - Reporting styled pass/fail/skip lines and an exit-code summary

pub mod case;
pub mod console;
pub mod error;
pub mod report;
pub mod runner;

// Re-export commonly used types
pub use case::{CaseOutcome, CaseResult, TestCase};
pub use console::{Color, Console};
pub use error::CaseFailure;
pub use report::{
    CaptureReporter, ConsoleReporter, Reporter, STACK_TRACE_END_MARKER, Style, visible_trace,
};
pub use runner::{RunSummary, TestRunner};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nori=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
