use rowan::TextRange;

use super::{
    Diagnostic, DiagnosticBuilder, DiagnosticKind, DiagnosticSink, Diagnostics, Severity,
};
use crate::ParseConfig;

/// What the parse should do after a diagnostic is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop lexing and parsing; the lexer reports end of input from here on.
    Abort,
}

/// Caller-injected policy consulted for every reported diagnostic.
pub trait ErrorHandler {
    fn handle(&mut self, diagnostic: &Diagnostic) -> Flow;
}

/// Collects everything and never aborts.
impl ErrorHandler for Diagnostics {
    fn handle(&mut self, diagnostic: &Diagnostic) -> Flow {
        self.push(diagnostic.clone());
        Flow::Continue
    }
}

impl<F> ErrorHandler for F
where
    F: FnMut(&Diagnostic) -> Flow,
{
    fn handle(&mut self, diagnostic: &Diagnostic) -> Flow {
        self(diagnostic)
    }
}

/// Aborts on the first error; warnings are let through.
#[derive(Debug, Default)]
pub struct FailFast {
    first: Option<Diagnostic>,
}

impl FailFast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.first.as_ref()
    }
}

impl ErrorHandler for FailFast {
    fn handle(&mut self, diagnostic: &Diagnostic) -> Flow {
        if !diagnostic.is_error() {
            return Flow::Continue;
        }
        if self.first.is_none() {
            self.first = Some(diagnostic.clone());
        }
        Flow::Abort
    }
}

/// Shared by the lexer and parser of one file: forwards each diagnostic to
/// the caller's handler and remembers whether it asked to stop.
pub(crate) struct Reporter<'h> {
    handler: &'h mut dyn ErrorHandler,
    extended_syntax: bool,
    seen: Diagnostics,
    aborted: bool,
}

impl<'h> Reporter<'h> {
    pub(crate) fn new(handler: &'h mut dyn ErrorHandler, config: &ParseConfig) -> Self {
        Self {
            handler,
            extended_syntax: config.extended_syntax,
            seen: Diagnostics::new(),
            aborted: false,
        }
    }

    pub(crate) fn report(
        &mut self,
        kind: DiagnosticKind,
        range: TextRange,
    ) -> DiagnosticBuilder<'_> {
        let severity = match kind {
            DiagnosticKind::ExtendedSyntax(_) if self.extended_syntax => Severity::Warning,
            _ => kind.default_severity(),
        };
        DiagnosticBuilder::new(self, kind, range).severity(severity)
    }

    pub(crate) fn extended_syntax(&self) -> bool {
        self.extended_syntax
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub(crate) fn len(&self) -> usize {
        self.seen.len()
    }

    pub(crate) fn finish(self) -> (Diagnostics, bool) {
        (self.seen, self.aborted)
    }
}

impl DiagnosticSink for Reporter<'_> {
    fn accept(&mut self, diagnostic: Diagnostic) {
        if self.aborted {
            return;
        }
        if self.handler.handle(&diagnostic) == Flow::Abort {
            tracing::debug!(kind = ?diagnostic.kind(), "error handler requested abort");
            self.aborted = true;
        }
        self.seen.push(diagnostic);
    }
}
