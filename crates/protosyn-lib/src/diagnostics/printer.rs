//! Human-readable rendering of diagnostics.
//!
//! With source text attached, each diagnostic becomes an annotated snippet;
//! a fix is shown as a patch. Without source the one-line `Display` form is
//! used.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Patch, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{Diagnostic, Severity};

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// File name shown in the `-->` line.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = match (self.source, self.colored) {
            (None, _) => None,
            (Some(_), true) => Some(Renderer::styled()),
            (Some(_), false) => Some(Renderer::plain()),
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            match (&renderer, self.source) {
                (Some(renderer), Some(source)) => {
                    write!(w, "{}", renderer.render(&self.groups(diag, source)))?;
                }
                _ => write!(w, "{diag}")?,
            }
        }
        Ok(())
    }

    fn groups<'a>(&'a self, diag: &'a Diagnostic, source: &'a str) -> Vec<Group<'a>> {
        let primary = widen(diag.range(), source.len());

        let mut snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(primary.clone()).label(diag.message()));
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for related in diag.related() {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(widen(related.range(), source.len()))
                    .label(related.message()),
            );
        }

        let level = match diag.severity() {
            Severity::Error => Level::ERROR,
            Severity::Warning => Level::WARNING,
        };
        let mut groups = vec![level.primary_title(diag.message()).element(snippet)];

        if let Some(fix) = diag.fix() {
            groups.push(
                Level::HELP.secondary_title(fix.description()).element(
                    Snippet::source(source)
                        .line_start(1)
                        .patch(Patch::new(primary, fix.replacement())),
                ),
            );
        }
        groups
    }
}

/// Zero-width ranges (missing tokens, end of file) are widened to one byte
/// so the renderer has something to underline.
fn widen(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();
    if start == end {
        return start..(start + 1).min(limit);
    }
    start..end
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}
