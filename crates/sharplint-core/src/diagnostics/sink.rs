//! Diagnostic sinks

use std::sync::Mutex;

use super::Diagnostic;

/// Receiver of diagnostics; shared by analyzers running in parallel
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Thread-safe diagnostic collector
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Collected diagnostics sorted by (offset, rule id)
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut diagnostics = self
            .diagnostics
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sort_diagnostics(&mut diagnostics);
        diagnostics
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        // A panicking analyzer must not take the collected output down with it
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}

/// Deterministic order: offset, then length, then rule id, then message
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        (a.location.offset, a.location.length, &a.rule_id, &a.message).cmp(&(
            b.location.offset,
            b.location.length,
            &b.rule_id,
            &b.message,
        ))
    });
}
