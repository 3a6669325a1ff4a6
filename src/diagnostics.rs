//! Where sops stderr goes.
//!
//! sops writes logs to stderr and file content to stdout. Callers that want to
//! see those logs pass a [`DiagnosticSink`]; the runner never logs stderr on
//! its own.

/// Receives diagnostic text at the most verbose level.
pub trait DiagnosticSink {
    fn verbose(&self, message: &str);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str),
{
    fn verbose(&self, message: &str) {
        self(message)
    }
}

/// Forwards diagnostics as `TRACE` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn verbose(&self, message: &str) {
        tracing::trace!(target: "sops", "{}", message);
    }
}
