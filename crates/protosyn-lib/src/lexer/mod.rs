//! Lexer for protobuf sources.
//!
//! Runs the [`Scanner`] over the whole file before parsing starts and records
//! every token and comment in a [`FileInfoBuilder`]. Besides real tokens it
//! synthesizes zero-length `;`/`,` tokens where a line break implies them, so
//! the grammar can assume regular punctuation while the user is still typing.
//!
//! ## Error handling
//!
//! Lexical problems become diagnostics plus an `Error` token (or a literal
//! with a best-effort value). After `max_lexer_errors` diagnostics, or when
//! the error handler aborts, the lexer stops and reports end of input; the
//! unread rest of the file becomes leading whitespace of the EOF token.

mod attribution;
mod heuristics;
mod literals;
mod raw;
mod token;

#[cfg(test)]
mod literals_tests;

use protosyn_core::{FileInfo, FileInfoBuilder, Token};
use rowan::{TextRange, TextSize};

pub use token::{LexValue, LexedToken, RUNES, TokenKind, TokenSet};

pub(crate) use heuristics::is_declaration_keyword;

use crate::diagnostics::{DiagnosticKind, Diagnostics, Reporter};
use crate::scanner::Scanner;
use crate::{Dialect, ParseConfig};
use heuristics::{Context, DialectWatch, Lookahead};
use literals::{LexError, Number};
use raw::RawKind;

/// Output of lexing one file.
#[derive(Debug)]
pub struct Lexed {
    pub file: FileInfo,
    /// Terminals in order, virtual ones included, ending with `Eof`.
    pub tokens: Vec<LexedToken>,
    /// Dialect in effect at the end of the file.
    pub dialect: Dialect,
}

/// Lexes `source`, collecting every diagnostic.
pub fn lex(name: &str, source: &str, config: &ParseConfig) -> (Lexed, Diagnostics) {
    let mut sink = Diagnostics::new();
    let mut reporter = Reporter::new(&mut sink, config);
    let lexed = Lexer::new(name, source, &mut reporter, config).run();
    let (diagnostics, _) = reporter.finish();
    (lexed, diagnostics)
}

#[derive(Debug, Clone, Copy)]
pub(super) struct PendingComment {
    pub(super) offset: usize,
    pub(super) len: usize,
    pub(super) is_line: bool,
}

impl PendingComment {
    pub(super) fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// The last terminal emitted, real or virtual.
#[derive(Debug, Clone, Copy)]
pub(super) struct Prev {
    pub(super) kind: TokenKind,
    pub(super) token: Token,
    pub(super) end: usize,
    /// A `}` or `>` that closed a message literal.
    pub(super) closes_literal: bool,
    pub(super) is_option_keyword: bool,
}

/// What the cursor is on, after context trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    /// No rule accepts this character.
    Invalid(usize),
    String,
    Number { raw: RawKind, len: usize, glued: bool },
    Ident(usize),
    Qualified(usize),
    Extension(usize),
    Rune(char),
}

pub(crate) struct Lexer<'s, 'r, 'h> {
    source: &'s str,
    pub(super) scanner: Scanner<'s>,
    pub(super) builder: FileInfoBuilder,
    reporter: &'r mut Reporter<'h>,
    pub(super) dialect: Dialect,
    max_errors: usize,
    error_count: usize,
    gave_up: bool,
    tokens: Vec<LexedToken>,
    pub(super) pending: Vec<PendingComment>,
    /// Trivia since the previous terminal contained a line break.
    pub(super) saw_newline: bool,
    pub(super) prev: Option<Prev>,
    pub(super) last_real: Option<Token>,
    pub(super) contexts: Vec<Context>,
    pub(super) in_rpc_signature: bool,
    pub(super) dialect_watch: DialectWatch,
}

impl<'s, 'r, 'h> Lexer<'s, 'r, 'h> {
    pub(crate) fn new(
        name: &str,
        source: &'s str,
        reporter: &'r mut Reporter<'h>,
        config: &ParseConfig,
    ) -> Self {
        Self {
            source,
            scanner: Scanner::new(source),
            builder: FileInfo::builder(name, source),
            reporter,
            dialect: config.dialect,
            max_errors: config.max_lexer_errors,
            error_count: 0,
            gave_up: false,
            tokens: Vec::new(),
            pending: Vec::new(),
            saw_newline: false,
            prev: None,
            last_real: None,
            contexts: Vec::new(),
            in_rpc_signature: false,
            dialect_watch: DialectWatch::Idle,
        }
    }

    pub(crate) fn run(mut self) -> Lexed {
        loop {
            self.skip_trivia();
            self.flush_lines();
            if self.is_stopped() {
                break;
            }
            let Some((raw, len)) = raw::peek(self.scanner.rest()) else {
                break;
            };
            let lexeme = self.classify(raw, len);
            let lookahead = self.lookahead(lexeme);
            self.insert_virtual(Some(&lookahead));
            self.attribute_comments(self.scanner.offset(), false);
            self.read_lexeme(lexeme);
            self.flush_lines();
        }
        self.finish()
    }

    fn finish(mut self) -> Lexed {
        if self.is_stopped() {
            // Unread text still needs its line starts.
            self.scanner.advance(self.scanner.rest().len());
            self.flush_lines();
        } else {
            self.insert_virtual(None);
        }
        let eof = self.source.len();
        self.attribute_comments(eof, true);
        self.emit(TokenKind::Eof, eof, 0, LexValue::None);

        let file = self.builder.finish();
        tracing::debug!(
            file = file.name(),
            bytes = file.len(),
            tokens = self.tokens.len(),
            comments = file.comment_count(),
            "lexed"
        );
        Lexed {
            file,
            tokens: self.tokens,
            dialect: self.dialect,
        }
    }

    fn is_stopped(&self) -> bool {
        self.gave_up || self.reporter.is_aborted()
    }

    fn flush_lines(&mut self) {
        for line in self.scanner.take_lines() {
            self.builder.add_line(line);
        }
    }

    fn skip_trivia(&mut self) {
        while !self.is_stopped() {
            let Some((Some(raw), len)) = raw::peek(self.scanner.rest()) else {
                return;
            };
            if !raw.is_trivia() {
                return;
            }
            let source = self.source;
            let offset = self.scanner.offset();
            let text = &source[offset..offset + len];
            match raw {
                RawKind::Newline => self.saw_newline = true,
                RawKind::LineComment | RawKind::BlockComment => {
                    self.saw_newline |= text.contains('\n');
                    self.pending.push(PendingComment {
                        offset,
                        len,
                        is_line: raw == RawKind::LineComment,
                    });
                }
                RawKind::UnterminatedBlockComment => {
                    let len = self.scanner.rest().len();
                    self.error(LexError {
                        kind: DiagnosticKind::UnterminatedBlockComment,
                        range: text_range(offset, offset + 2),
                        detail: None,
                    });
                    self.saw_newline |= self.scanner.rest().contains('\n');
                    self.pending.push(PendingComment {
                        offset,
                        len,
                        is_line: false,
                    });
                    self.scanner.advance(len);
                    continue;
                }
                RawKind::ControlChar => {
                    let detail = format!("U+{:04X}", text.chars().next().map_or(0, u32::from));
                    self.error(LexError {
                        kind: DiagnosticKind::InvalidControlCharacter,
                        range: text_range(offset, offset + len),
                        detail: Some(detail),
                    });
                }
                _ => {}
            }
            self.scanner.advance(len);
        }
    }

    fn classify(&self, raw: Option<RawKind>, len: usize) -> Lexeme {
        let offset = self.scanner.offset();
        let text = &self.source[offset..offset + len];
        let Some(raw) = raw else {
            return Lexeme::Invalid(len);
        };
        match raw {
            RawKind::Quote => Lexeme::String,
            RawKind::Ident => Lexeme::Ident(len),
            RawKind::QualifiedIdent if text.starts_with('.') && self.after_extension_name() => {
                Lexeme::Rune('.')
            }
            RawKind::QualifiedIdent => Lexeme::Qualified(len),
            RawKind::ExtensionIdent if self.extension_name_allowed() => Lexeme::Extension(len),
            RawKind::ExtensionIdent => Lexeme::Rune('('),
            raw if raw.is_number() => {
                let tail = &self.source[offset + len..];
                let glued = tail
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
                let extra = if glued {
                    tail.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
                        .unwrap_or(tail.len())
                } else {
                    0
                };
                Lexeme::Number {
                    raw,
                    len: len + extra,
                    glued,
                }
            }
            RawKind::Punct => match text.chars().next() {
                Some(c) => Lexeme::Rune(c),
                None => Lexeme::Invalid(len),
            },
            // Trivia was consumed by `skip_trivia`.
            _ => Lexeme::Invalid(len),
        }
    }

    fn lookahead(&self, lexeme: Lexeme) -> Lookahead<'s> {
        let source = self.source;
        let rest = &source[self.scanner.offset()..];
        let rune = rest.chars().next().unwrap_or('\0');
        let word = match lexeme {
            Lexeme::Ident(len) => Some(&rest[..len]),
            _ => None,
        };
        let starts_value = matches!(
            lexeme,
            Lexeme::String
                | Lexeme::Number { .. }
                | Lexeme::Ident(_)
                | Lexeme::Qualified(_)
                | Lexeme::Extension(_)
        ) || matches!(lexeme, Lexeme::Rune('-' | '(' | '{' | '['));
        Lookahead {
            rune,
            word,
            starts_value,
        }
    }

    fn read_lexeme(&mut self, lexeme: Lexeme) {
        let source = self.source;
        let offset = self.scanner.offset();
        match lexeme {
            Lexeme::Invalid(len) => {
                self.scanner.advance(len);
                let text = &source[offset..offset + len];
                self.error(LexError {
                    kind: DiagnosticKind::InvalidCharacter,
                    range: text_range(offset, offset + len),
                    detail: Some(format!("`{text}`")),
                });
                self.emit(TokenKind::Error, offset, len, LexValue::None);
            }
            Lexeme::String => {
                let lit = literals::read_string(&mut self.scanner);
                for error in lit.errors {
                    self.error(error);
                }
                self.emit(TokenKind::String, offset, lit.len, LexValue::Str(lit.value));
            }
            Lexeme::Number { raw, len, glued } => {
                self.scanner.advance(len);
                let text = &source[offset..offset + len];
                if glued {
                    self.error(LexError {
                        kind: DiagnosticKind::InvalidNumber,
                        range: text_range(offset, offset + len),
                        detail: Some(format!("`{text}`")),
                    });
                    self.emit(TokenKind::Error, offset, len, LexValue::None);
                    return;
                }
                debug_assert!(raw.is_number());
                let (number, error) = literals::parse_number(text, offset);
                if let Some(error) = error {
                    self.error(error);
                }
                let (kind, value) = match number {
                    Number::Int(v) => (TokenKind::Int, LexValue::Int(v)),
                    Number::Float(v) => (TokenKind::Float, LexValue::Float(v)),
                };
                self.emit(kind, offset, len, value);
            }
            Lexeme::Ident(len) => {
                self.scanner.advance(len);
                self.emit(TokenKind::Ident, offset, len, LexValue::None);
            }
            Lexeme::Qualified(len) => {
                self.scanner.advance(len);
                self.emit(TokenKind::QualifiedIdent, offset, len, LexValue::None);
            }
            Lexeme::Extension(len) => {
                self.scanner.advance(len);
                self.emit(TokenKind::ExtensionIdent, offset, len, LexValue::None);
            }
            Lexeme::Rune(c) => {
                self.scanner.advance(c.len_utf8());
                self.emit(TokenKind::Rune(c), offset, c.len_utf8(), LexValue::None);
            }
        }
    }

    /// Records a terminal in the store and the token stream.
    pub(super) fn emit(&mut self, kind: TokenKind, offset: usize, len: usize, value: LexValue) {
        let token = self.builder.add_token(offset, len);
        let text = self.source[offset..offset + len].to_string();
        self.track_context(kind, token, offset + len, &text, &value);
        self.tokens.push(LexedToken {
            kind,
            token,
            range: text_range(offset, offset + len),
            text,
            value,
        });
        self.saw_newline = false;
    }

    fn error(&mut self, error: LexError) {
        if self.gave_up {
            return;
        }
        let mut builder = self.reporter.report(error.kind, error.range);
        if let Some(detail) = error.detail {
            builder = builder.message(detail);
        }
        builder.emit();

        self.error_count += 1;
        if self.error_count >= self.max_errors {
            tracing::warn!(
                file = self.builder.name(),
                errors = self.error_count,
                "lexer error bound hit, skipping the rest of the file"
            );
            self.reporter
                .report(DiagnosticKind::TooManyLexerErrors, error.range)
                .message(format!(
                    "{} lexical errors, giving up on the rest of the file",
                    self.error_count
                ))
                .emit();
            self.gave_up = true;
        }
    }
}

pub(crate) fn text_range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}
