//! Accumulates diagnostics across a pass so that every problem in a block is
//! reported at once.

use log::warn;

use crate::error::{Diagnostic, ParseError};

#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.errors.push(diagnostic);
        } else {
            self.warnings.push(diagnostic);
        }
    }

    /// Logs warnings and returns `Err` if any error was emitted.
    pub(crate) fn finish(self) -> Result<(), ParseError> {
        for warning in &self.warnings {
            warn!(message = warning.message(); "Treebank warning");
        }
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ParseError::new(self.errors))
        }
    }
}
