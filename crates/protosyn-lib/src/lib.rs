//! Protosyn: lossless, error-tolerant frontend for protobuf IDL sources.
//!
//! Every byte of the input is accounted for: tokens, whitespace and comments
//! live in a [`FileInfo`] store, and printing a parsed file reproduces its
//! source exactly.
//!
//! # Example
//!
//! ```
//! use protosyn::{ParseConfig, parse_str, printer::print_file};
//!
//! let source = "syntax = \"proto2\";\nmessage Foo { optional int32 bar = 1; }\n";
//! let (file, diagnostics, result) = parse_str("foo.proto", source, &ParseConfig::default());
//!
//! assert!(result.is_ok(), "{}", diagnostics.render(source));
//! let foo = file.messages().next().expect("one message");
//! assert_eq!(foo.name(), Some("Foo"));
//! assert_eq!(print_file(&file), source);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod ast;
pub mod diagnostics;
pub mod driver;
pub mod dump;
pub mod lexer;
pub mod parser;
pub mod pragma;
pub mod printer;
pub mod scanner;
pub mod walk;

mod config;

#[cfg(test)]
mod driver_tests;
#[cfg(test)]
mod properties_tests;
#[cfg(test)]
mod roundtrip_tests;

pub use config::{Dialect, ParseConfig, UnknownDialect};
pub use diagnostics::{
    Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsPrinter, ErrorHandler, FailFast, Flow,
    Severity,
};
pub use parser::{parse, parse_str};
pub use protosyn_core::{
    Comment, Comments, FileInfo, Item, ItemInfo, NodeInfo, Sequence, SourcePos, TextRange,
    TextSize, Token,
};

/// Errors that can occur while parsing a file.
///
/// The tree is returned alongside any of these; they tell the caller it
/// cannot be trusted as a faithful model of a valid file.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// At least one error-severity diagnostic was reported.
    #[error("parsing failed with {} errors", .0.error_count())]
    ParseFailed(Diagnostics),

    /// The error handler asked to stop.
    #[error("parsing aborted after {} diagnostics", .0.len())]
    Aborted(Diagnostics),

    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("source is not valid UTF-8 (first invalid byte at {offset})")]
    InvalidUtf8 { offset: usize },
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, Error>;
