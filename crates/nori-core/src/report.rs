//! Styled-line reporting
//!
//! All runner output flows through the [`Reporter`] seam, so console
//! color-state stays confined to one backend and tests can capture the
//! report verbatim.

use crate::console::{Color, Console};

/// Delimiter some runtimes insert between the frames a test author cares
/// about and the scheduler frames behind them. Everything from the marker
/// on is noise and is trimmed before display.
pub const STACK_TRACE_END_MARKER: &str = "--- End of stack trace from previous location ---";

/// Semantic severity of one reported line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Normal,
    Success,
    Failure,
    Warning,
}

/// Write one styled line of report output
pub trait Reporter {
    fn line(&mut self, style: Style, text: &str);
}

/// Reporter backend that writes colorized lines to stdout
pub struct ConsoleReporter {
    console: Console,
}

impl ConsoleReporter {
    /// Create a reporter with automatic color detection
    pub fn new() -> Self {
        Self {
            console: Console::new(),
        }
    }

    /// Create a reporter that never emits color codes
    pub fn no_colors() -> Self {
        Self {
            console: Console::no_colors(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn line(&mut self, style: Style, text: &str) {
        match style {
            Style::Normal => println!("{text}"),
            Style::Success => println!("{}", self.console.colorize(text, Color::Green)),
            Style::Failure => println!("{}", self.console.colorize(text, Color::Red)),
            Style::Warning => println!("{}", self.console.colorize(text, Color::Yellow)),
        }
    }
}

/// Reporter backend that records lines in memory.
///
/// Used by the harness's own tests and by embedders that want to render
/// the report elsewhere.
#[derive(Debug, Default)]
pub struct CaptureReporter {
    lines: Vec<(Style, String)>,
}

impl CaptureReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[(Style, String)] {
        &self.lines
    }
}

impl Reporter for CaptureReporter {
    fn line(&mut self, style: Style, text: &str) {
        self.lines.push((style, text.to_string()));
    }
}

/// Trim a diagnostic trace to the portion a test author should see.
///
/// Text from [`STACK_TRACE_END_MARKER`] onwards is dropped, trailing
/// whitespace included.
pub fn visible_trace(trace: &str) -> &str {
    match trace.find(STACK_TRACE_END_MARKER) {
        Some(at) => trace[..at].trim_end(),
        None => trace,
    }
}
