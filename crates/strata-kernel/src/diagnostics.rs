//! Diagnostic capability consumed by the engine.
//!
//! The engine emits warnings and errors, it never formats them into a
//! shared buffer: each implementation owns its own sink, so there is no
//! global mutable scratch state to synchronize across calls.
//!
//! Every message is bounded by [`MESSAGE_CAP`]. A message that exceeds the
//! cap is truncated, emitted, and then escalated through
//! [`Diagnostics::fatal_exit`] — an overflowing diagnostic signals a logic
//! error (runaway recursion, corrupted state) the system cannot reason
//! about further, so it is process-fatal rather than a normal error path.

use serde::{Deserialize, Serialize};

/// Upper bound on a single diagnostic message, in bytes.
pub const MESSAGE_CAP: usize = 512;

/// Severity of an emitted diagnostic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticEntry {
    pub severity: Severity,
    /// The operation that emitted the diagnostic.
    pub site: String,
    pub message: String,
}

/// Truncate a message at the cap, respecting char boundaries.
///
/// Returns `None` when the message already fits.
fn truncated(message: &str) -> Option<&str> {
    if message.len() <= MESSAGE_CAP {
        return None;
    }
    let mut end = MESSAGE_CAP;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    Some(&message[..end])
}

/// Abstract warn/error/fatal-exit sink.
///
/// Implementations provide [`emit`](Diagnostics::emit) and
/// [`fatal_exit`](Diagnostics::fatal_exit); the bounded `warn`/`error`
/// entry points are shared.
pub trait Diagnostics {
    /// Deliver one already-bounded diagnostic.
    fn emit(&mut self, severity: Severity, site: &str, message: &str);

    /// Terminate the call irrecoverably. Process-ending in production
    /// implementations.
    fn fatal_exit(&mut self, site: &str, message: &str) -> !;

    /// Emit a warning, escalating to `fatal_exit` on overflow.
    fn warn(&mut self, site: &str, message: &str) {
        match truncated(message) {
            None => self.emit(Severity::Warning, site, message),
            Some(prefix) => {
                self.emit(Severity::Warning, site, prefix);
                self.fatal_exit(site, "diagnostic message overflows the bounded buffer");
            }
        }
    }

    /// Emit an error, escalating to `fatal_exit` on overflow.
    fn error(&mut self, site: &str, message: &str) {
        match truncated(message) {
            None => self.emit(Severity::Error, site, message),
            Some(prefix) => {
                self.emit(Severity::Error, site, prefix);
                self.fatal_exit(site, "diagnostic message overflows the bounded buffer");
            }
        }
    }
}

/// Production sink: `*** WARNING`/`*** ERROR` lines on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrDiagnostics;

impl Diagnostics for StderrDiagnostics {
    fn emit(&mut self, severity: Severity, site: &str, message: &str) {
        let tag = match severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        eprintln!("*** {tag}: {site}: {message}");
    }

    fn fatal_exit(&mut self, site: &str, message: &str) -> ! {
        eprintln!("*** FATAL: {site}: {message}");
        std::process::exit(2);
    }
}

/// Recording sink for tests and for machine-readable CLI output.
///
/// `fatal_exit` panics instead of exiting: a fatal diagnostic inside a
/// test is a test failure, not a silent process death.
#[derive(Debug, Default, Clone)]
pub struct MemoryDiagnostics {
    pub entries: Vec<DiagnosticEntry>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded entries of the given severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &DiagnosticEntry> {
        self.entries.iter().filter(move |e| e.severity == severity)
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn emit(&mut self, severity: Severity, site: &str, message: &str) {
        self.entries.push(DiagnosticEntry {
            severity,
            site: site.to_string(),
            message: message.to_string(),
        });
    }

    fn fatal_exit(&mut self, site: &str, message: &str) -> ! {
        panic!("fatal diagnostic at {site}: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_in_order() {
        let mut diag = MemoryDiagnostics::new();
        diag.warn("make", "level invalid; Layer0 assumed");
        diag.error("tunnel", "assertion failed at Layer2");

        assert_eq!(diag.entries.len(), 2);
        assert_eq!(diag.entries[0].severity, Severity::Warning);
        assert_eq!(diag.entries[0].site, "make");
        assert_eq!(diag.entries[1].severity, Severity::Error);
        assert_eq!(diag.with_severity(Severity::Warning).count(), 1);
    }

    #[test]
    fn short_messages_pass_through_untruncated() {
        let mut diag = MemoryDiagnostics::new();
        let message = "x".repeat(MESSAGE_CAP);
        diag.warn("site", &message);
        assert_eq!(diag.entries[0].message.len(), MESSAGE_CAP);
    }

    #[test]
    #[should_panic(expected = "overflows the bounded buffer")]
    fn overflowing_message_is_fatal() {
        let mut diag = MemoryDiagnostics::new();
        let message = "x".repeat(MESSAGE_CAP + 1);
        diag.warn("site", &message);
    }

    #[test]
    fn entries_serialize_camel_case() {
        let entry = DiagnosticEntry {
            severity: Severity::Warning,
            site: "shift".to_string(),
            message: "ignored".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["site"], "shift");
        assert_eq!(json["message"], "ignored");
    }
}
