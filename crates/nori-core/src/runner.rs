//! Sequential test execution and reporting

use tracing::debug;

use crate::case::{CaseOutcome, TestCase};
use crate::report::{ConsoleReporter, Reporter, Style, visible_trace};

/// Aggregate result of one run.
///
/// Skipped cases are excluded from both pass and fail accounting, so
/// `passed() + failed + skipped == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.total - self.failed - self.skipped
    }

    /// A run succeeds when nothing failed; skips do not count against it
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit code for this run: 0 all-passed, 1 any failure
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Runs an ordered sequence of test cases and reports their outcomes.
///
/// Execution is strictly sequential from the runner's perspective: each
/// case is awaited to completion before the next is reached. Cases built
/// with [`TestCase::blocking`] may have started in the background long
/// before; the runner only fixes the order results are observed in.
pub struct TestRunner<R> {
    reporter: R,
}

impl TestRunner<ConsoleReporter> {
    /// Runner wired to stdout with automatic color detection
    pub fn stdout() -> Self {
        Self::new(ConsoleReporter::new())
    }
}

impl<R: Reporter> TestRunner<R> {
    pub fn new(reporter: R) -> Self {
        Self { reporter }
    }

    /// Recover the reporter, e.g. to inspect a captured report
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Run every case in order and report a summary.
    ///
    /// A failing case never aborts the run; its failure is recorded and
    /// the next case proceeds. The returned summary's
    /// [`exit_code`](RunSummary::exit_code) is the canonical
    /// process-level result.
    pub async fn run(&mut self, cases: Vec<TestCase>) -> RunSummary {
        let total = cases.len();
        let noun = if total == 1 { "test" } else { "tests" };
        self.reporter
            .line(Style::Normal, &format!("Running {total} {noun}"));
        debug!(total, "test run started");

        let mut summary = RunSummary {
            total,
            ..RunSummary::default()
        };
        for (index, case) in cases.into_iter().enumerate() {
            match self.run_case(index + 1, total, case).await {
                CaseOutcome::Passed => {}
                CaseOutcome::Failed(_) => summary.failed += 1,
                CaseOutcome::Skipped(_) => summary.skipped += 1,
            }
        }

        self.reporter.line(Style::Normal, "");
        let (style, line) = summary_line(&summary);
        self.reporter.line(style, &line);
        debug!(
            passed = summary.passed(),
            failed = summary.failed,
            skipped = summary.skipped,
            "test run finished"
        );
        summary
    }

    async fn run_case(&mut self, index: usize, total: usize, case: TestCase) -> CaseOutcome {
        let description = case.description().to_owned();

        if let Some(reason) = case.skip_reason().map(str::to_owned) {
            // The work is dropped unawaited; a spawned body that already
            // started finishes unobserved on the blocking pool.
            self.reporter.line(Style::Normal, &description);
            self.reporter
                .line(Style::Warning, &format!("[SKIPPED] reason: {reason}"));
            debug!(case = %description, %reason, "case skipped");
            return CaseOutcome::Skipped(reason);
        }

        self.reporter
            .line(Style::Normal, &format!("Running test {index}/{total}"));
        self.reporter.line(Style::Normal, &description);
        debug!(case = %description, index, "case running");

        match case.execute().await {
            Ok(()) => {
                self.reporter
                    .line(Style::Success, &format!("[PASSED] {description}"));
                CaseOutcome::Passed
            }
            Err(failure) => {
                self.reporter
                    .line(Style::Failure, &format!("[FAILED] {description}"));
                if let Some(trace) = failure.trace() {
                    self.reporter.line(Style::Failure, visible_trace(trace));
                }
                debug!(case = %description, error = %failure, "case failed");
                CaseOutcome::Failed(failure)
            }
        }
    }
}

fn summary_line(summary: &RunSummary) -> (Style, String) {
    let passed = summary.passed();
    let total = summary.total;

    if summary.failed == 0 {
        if summary.skipped == 0 {
            (
                Style::Success,
                format!("[SUCCESS] all {total} tests passed"),
            )
        } else {
            (
                Style::Success,
                format!(
                    "[SUCCESS] {passed}/{total} tests passed + {} skipped",
                    summary.skipped
                ),
            )
        }
    } else if summary.skipped > 0 {
        (
            Style::Failure,
            format!(
                "{passed}/{total} tests passed + {} skipped",
                summary.skipped
            ),
        )
    } else {
        (Style::Failure, format!("{passed}/{total} tests passed"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::report::{CaptureReporter, STACK_TRACE_END_MARKER};

    async fn run_captured(cases: Vec<TestCase>) -> (RunSummary, Vec<(Style, String)>) {
        let mut runner = TestRunner::new(CaptureReporter::new());
        let summary = runner.run(cases).await;
        let lines = runner.into_reporter().lines().to_vec();
        (summary, lines)
    }

    fn texts(lines: &[(Style, String)]) -> Vec<&str> {
        lines.iter().map(|(_, text)| text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_run_is_vacuously_successful() {
        let (summary, lines) = run_captured(Vec::new()).await;

        assert_eq!(summary.exit_code(), 0);
        assert_eq!(
            texts(&lines),
            vec!["Running 0 tests", "", "[SUCCESS] all 0 tests passed"]
        );
    }

    #[tokio::test]
    async fn test_single_case_header_is_singular() {
        let cases = vec![TestCase::new("only one", async { Ok(()) })];
        let (_, lines) = run_captured(cases).await;

        assert_eq!(lines[0], (Style::Normal, "Running 1 test".to_string()));
    }

    #[tokio::test]
    async fn test_all_passing_run() {
        let cases = vec![
            TestCase::blocking("first", || Ok(())),
            TestCase::new("second", async { Ok(()) }),
        ];
        let (summary, lines) = run_captured(cases).await;

        assert_eq!(summary.exit_code(), 0);
        assert_eq!(summary.passed(), 2);
        assert!(
            lines.contains(&(Style::Success, "[PASSED] first".to_string())),
            "missing pass line: {lines:?}"
        );
        assert_eq!(
            lines.last(),
            Some(&(Style::Success, "[SUCCESS] all 2 tests passed".to_string()))
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_the_run() {
        let cases = vec![
            TestCase::blocking("before", || Ok(())),
            TestCase::blocking("breaks", || anyhow::bail!("boom")),
            TestCase::blocking("after", || Ok(())),
        ];
        let (summary, lines) = run_captured(cases).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exit_code(), 1);
        assert!(lines.contains(&(Style::Failure, "[FAILED] breaks".to_string())));
        assert!(lines.contains(&(Style::Success, "[PASSED] after".to_string())));
    }

    #[tokio::test]
    async fn test_panicking_case_counts_as_failure() {
        let cases = vec![TestCase::new("explodes", async { panic!("kaput") })];
        let (summary, lines) = run_captured(cases).await;

        assert_eq!(summary.failed, 1);
        assert!(lines.contains(&(Style::Failure, "[FAILED] explodes".to_string())));
    }

    #[tokio::test]
    async fn test_skipped_case_never_runs_its_work() {
        let executed = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&executed);
        let cases = vec![
            TestCase::new("watched", async move {
                probe.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .skipped("needs a network fixture"),
        ];
        let (summary, lines) = run_captured(cases).await;

        assert_eq!(executed.load(Ordering::SeqCst), 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.passed(), 0);
        assert!(lines.contains(&(
            Style::Warning,
            "[SKIPPED] reason: needs a network fixture".to_string()
        )));
    }

    #[tokio::test]
    async fn test_accounting_always_adds_up() {
        let cases = vec![
            TestCase::blocking("pass", || Ok(())),
            TestCase::blocking("fail", || anyhow::bail!("no")),
            TestCase::new("skip", async { Ok(()) }).skipped("later"),
            TestCase::new("pass too", async { Ok(()) }),
        ];
        let (summary, _) = run_captured(cases).await;

        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed() + summary.failed + summary.skipped, 4);
        assert_eq!(summary.passed(), 2);
    }

    #[tokio::test]
    async fn test_report_order_matches_input_order() {
        // The slow case finishes last in the background, but must still be
        // reported first.
        let cases = vec![
            TestCase::blocking("slow", || {
                std::thread::sleep(Duration::from_millis(100));
                Ok(())
            }),
            TestCase::blocking("fast", || Ok(())),
        ];
        let (_, lines) = run_captured(cases).await;

        let order: Vec<&str> = texts(&lines)
            .into_iter()
            .filter(|text| text.starts_with("[PASSED]"))
            .collect();
        assert_eq!(order, vec!["[PASSED] slow", "[PASSED] fast"]);
    }

    #[tokio::test]
    async fn test_trace_marker_is_stripped_from_output() {
        let message = format!("useful frame\n{STACK_TRACE_END_MARKER}\nscheduler frame");
        let cases = vec![TestCase::blocking("traced", move || {
            anyhow::bail!(message)
        })];
        let (_, lines) = run_captured(cases).await;

        assert!(lines.contains(&(Style::Failure, "useful frame".to_string())));
        assert!(
            texts(&lines)
                .iter()
                .all(|text| !text.contains(STACK_TRACE_END_MARKER)),
            "marker leaked into the report: {lines:?}"
        );
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let cases = vec![
            TestCase::blocking("A", || Ok(())),
            TestCase::blocking("B", || anyhow::bail!("boom")),
            TestCase::new("C", async { Ok(()) }).skipped("flaky"),
        ];
        let (summary, lines) = run_captured(cases).await;

        assert_eq!(summary.exit_code(), 1);
        assert_eq!(
            texts(&lines),
            vec![
                "Running 3 tests",
                "Running test 1/3",
                "A",
                "[PASSED] A",
                "Running test 2/3",
                "B",
                "[FAILED] B",
                "boom",
                "C",
                "[SKIPPED] reason: flaky",
                "",
                "1/3 tests passed + 1 skipped",
            ]
        );
        assert_eq!(lines.last().unwrap().0, Style::Failure);
    }

    #[tokio::test]
    async fn test_skips_with_no_failures_still_succeed() {
        let cases = vec![
            TestCase::blocking("works", || Ok(())),
            TestCase::new("ignored", async { Ok(()) }).skipped("quarantined"),
        ];
        let (summary, lines) = run_captured(cases).await;

        assert_eq!(summary.exit_code(), 0);
        assert_eq!(
            lines.last(),
            Some(&(
                Style::Success,
                "[SUCCESS] 1/2 tests passed + 1 skipped".to_string()
            ))
        );
    }
}
