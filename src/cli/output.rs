/// Error/warning writers and stage timing diagnostics.
use std::io::Write;

use crate::types::ErrorOutput;

/// Write a terminal error to stderr, as the JSON envelope when JSON output
/// was requested, plain text otherwise.
pub fn write_error(err: &ErrorOutput, json: bool) {
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    if json {
        let s = serde_json::to_string_pretty(err).unwrap_or_default();
        let _ = writeln!(out, "{s}");
    } else {
        let _ = writeln!(out, "macblk: error: {}", err.error.message);
    }
}

/// Write accumulated non-fatal warnings to stderr.
pub fn write_warnings(warnings: &[String]) {
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    for warning in warnings {
        let _ = writeln!(out, "macblk: warning: {warning}");
    }
}

/// Diagnostics context for one invocation.
pub struct OutputCtx {
    /// When true, print stage timing spans to stderr.
    pub debug: bool,
}

impl OutputCtx {
    #[must_use]
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Start a named debug timer. Prints elapsed on drop only when `--debug`
    /// is set.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label, self.debug)
    }
}

/// A RAII timer that prints elapsed milliseconds to stderr on drop.
///
/// Created via [`OutputCtx::timer`]. Does nothing when `debug` is false.
pub struct DebugTimer {
    label: &'static str,
    start: std::time::Instant,
    active: bool,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str, active: bool) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
            active,
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        if self.active {
            let ms = self.start.elapsed().as_secs_f64() * 1000.0;
            eprintln!("[debug] {}: {ms:.2}ms", self.label);
        }
    }
}
