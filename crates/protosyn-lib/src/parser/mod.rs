//! Parser producing the typed AST of one file.
//!
//! # Architecture
//!
//! The lexer runs to completion first; the parser then walks the token vector
//! with a cursor. Productions build [`crate::ast`] nodes directly, holding only
//! token handles, so the tree borrows nothing and the file's text and comments
//! stay in the shared [`protosyn_core::FileInfo`].
//!
//! # Recovery Strategy
//!
//! The parser always produces a tree that covers every real token:
//!
//! 1. Tokens a body cannot place are reported once and swept, up to the end
//!    of their statement, into an `ErrorNode` element
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. A `;` or `,` the lexer inferred satisfies the grammar and is reported
//!    as a missing token
//! 4. An unclosed body is reported at end of input with a pointer back at its
//!    opening brace
//!
//! Fuel exhaustion, the recursion limit and an aborting error handler stop
//! parsing; the rest of the file becomes one error element and the reason is
//! returned alongside the tree.

mod core;
mod grammar;
mod invariants;

#[cfg(test)]
mod parser_tests;
#[cfg(test)]
mod recovery_tests;

use std::borrow::Cow;
use std::sync::Arc;

pub(crate) use self::core::Parser;

use crate::ast::FileNode;
use crate::diagnostics::{Diagnostics, ErrorHandler, Reporter};
use crate::lexer::Lexer;
use crate::{Error, ParseConfig, Result};

/// Parses one file.
///
/// Every diagnostic goes to `handler` as it is found. The returned tree is
/// complete even when the result is an error: an empty input yields a file
/// node holding only the end-of-file token. Invalid UTF-8 is replaced before
/// lexing, so the tree then no longer reproduces `source` byte for byte.
pub fn parse(
    name: &str,
    source: &[u8],
    handler: &mut dyn ErrorHandler,
    config: &ParseConfig,
) -> (FileNode, Result<()>) {
    tracing::debug!(file = name, bytes = source.len(), dialect = %config.dialect, "parsing");

    let (text, utf8_error) = match std::str::from_utf8(source) {
        Ok(text) => (Cow::Borrowed(text), None),
        Err(e) => (
            String::from_utf8_lossy(source),
            Some(Error::InvalidUtf8 {
                offset: e.valid_up_to(),
            }),
        ),
    };

    let mut reporter = Reporter::new(handler, config);
    let lexed = Lexer::new(name, &text, &mut reporter, config).run();
    let token_count = lexed.tokens.len();

    let (header, elements, eof, fatal, fuel) = {
        let mut parser = Parser::new(lexed.tokens, lexed.dialect, &mut reporter, config);
        let (header, elements, eof) = parser.parse_file();
        (header, elements, eof, parser.take_fatal_error(), parser.exec_fuel_consumed())
    };
    let (diagnostics, aborted) = reporter.finish();

    tracing::debug!(
        file = name,
        tokens = token_count,
        diagnostics = diagnostics.len(),
        fuel,
        "parsed"
    );

    let file = FileNode::new(Arc::new(lexed.file), lexed.dialect, header, elements, eof);
    let result = match utf8_error.or(fatal) {
        Some(error) => Err(error),
        None if aborted => Err(Error::Aborted(diagnostics)),
        None if diagnostics.has_errors() => Err(Error::ParseFailed(diagnostics)),
        None => Ok(()),
    };
    (file, result)
}

/// Parses `source`, collecting every diagnostic.
///
/// The diagnostics are returned whatever the outcome; warnings alone leave
/// the result `Ok`.
pub fn parse_str(
    name: &str,
    source: &str,
    config: &ParseConfig,
) -> (FileNode, Diagnostics, Result<()>) {
    let mut diagnostics = Diagnostics::new();
    let (file, result) = parse(name, source.as_bytes(), &mut diagnostics, config);
    (file, diagnostics, result)
}
