//! Bracket contexts and virtual punctuation.
//!
//! The lexer tracks which kind of bracket it is inside. In statement
//! position a line break after something that can end a statement yields a
//! zero-length `;`; inside `[...]` a line break between two values yields a
//! zero-length `,`. Message literals, parens and map type arguments never get
//! virtual tokens.

use protosyn_core::Token;

use super::{LexValue, Lexer, Prev, TokenKind};
use crate::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Context {
    /// `{ ... }` of a declaration.
    Body,
    /// `{ ... }` or `< ... >` of a message literal.
    Literal,
    List,
    Paren,
    /// `<` of `map<K, V>`.
    Angle,
}

/// Recognizes `syntax = "..."` and `edition = "..."` as they stream by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DialectWatch {
    Idle,
    Keyword { edition: bool },
    Equals { edition: bool },
}

/// The lexeme after the trivia being examined.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lookahead<'s> {
    pub(crate) rune: char,
    /// Set for plain identifiers.
    pub(crate) word: Option<&'s str>,
    pub(crate) starts_value: bool,
}

/// Runes that continue the current statement when they start the next line.
const CONTINUATION_RUNES: &[char] = &[';', '{', '[', '=', '(', '.', ',', '<', '>', ')', ']', ':'];

const DECLARATION_KEYWORDS: &[&str] = &[
    "message",
    "enum",
    "service",
    "extend",
    "option",
    "import",
    "package",
    "syntax",
    "edition",
    "reserved",
    "extensions",
    "oneof",
    "rpc",
    "map",
    "optional",
    "repeated",
];

pub(crate) fn is_declaration_keyword(word: &str, dialect: Dialect) -> bool {
    match word {
        "required" => dialect != Dialect::Editions,
        "group" => dialect != Dialect::Proto3,
        _ => DECLARATION_KEYWORDS.contains(&word),
    }
}

impl Lexer<'_, '_, '_> {
    pub(super) fn context(&self) -> Option<Context> {
        self.contexts.last().copied()
    }

    fn in_statement_context(&self) -> bool {
        matches!(self.context(), None | Some(Context::Body))
    }

    /// A `.name` right after `)` belongs to an option name path, not a
    /// fully-qualified reference.
    pub(super) fn after_extension_name(&self) -> bool {
        self.prev
            .is_some_and(|p| matches!(p.kind, TokenKind::Rune(')') | TokenKind::ExtensionIdent))
    }

    /// `(a.b)` is one token only where an option name can start.
    pub(super) fn extension_name_allowed(&self) -> bool {
        if self.in_rpc_signature {
            return false;
        }
        self.prev.is_some_and(|p| {
            p.is_option_keyword || matches!(p.kind, TokenKind::Rune('[' | ',' | '.'))
        })
    }

    /// Emits a virtual terminal before `next` (`None` at end of input) if the
    /// layout calls for one.
    pub(super) fn insert_virtual(&mut self, next: Option<&Lookahead<'_>>) {
        let Some(prev) = self.prev else {
            return;
        };
        if prev.kind.is_virtual() {
            return;
        }
        let closes_block = next.is_some_and(|n| n.rune == '}');
        if !(self.saw_newline || next.is_none() || closes_block) {
            return;
        }

        let kind = match self.context() {
            None | Some(Context::Body) if self.ends_statement(&prev, next) => {
                TokenKind::VirtualSemicolon
            }
            Some(Context::List)
                if is_value_end(&prev) && next.is_some_and(|n| n.starts_value) =>
            {
                TokenKind::VirtualComma
            }
            _ => return,
        };
        tracing::trace!(?kind, offset = prev.end, "virtual token");
        self.emit(kind, prev.end, 0, LexValue::None);
    }

    fn ends_statement(&self, prev: &Prev, next: Option<&Lookahead<'_>>) -> bool {
        let ender = matches!(
            prev.kind,
            TokenKind::String
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Ident
                | TokenKind::QualifiedIdent
                | TokenKind::ExtensionIdent
                | TokenKind::Rune(']' | ')')
        ) || prev.closes_literal;
        if !ender {
            return false;
        }
        let Some(next) = next else {
            return true;
        };
        if CONTINUATION_RUNES.contains(&next.rune) {
            return false;
        }
        if matches!(next.word, Some("returns" | "to")) {
            return false;
        }
        // Adjacent strings concatenate.
        if prev.kind == TokenKind::String && matches!(next.rune, '"' | '\'') {
            return false;
        }
        if prev.kind.is_ident() {
            return next.rune == '}'
                || next
                    .word
                    .is_some_and(|w| is_declaration_keyword(w, self.dialect));
        }
        true
    }

    /// Updates bracket contexts, rpc signature mode and dialect after a
    /// terminal is emitted.
    pub(super) fn track_context(
        &mut self,
        kind: TokenKind,
        token: Token,
        end: usize,
        text: &str,
        value: &LexValue,
    ) {
        let mut closes_literal = false;
        match kind {
            TokenKind::Rune('{') => {
                let context = if self.opens_literal() {
                    Context::Literal
                } else {
                    Context::Body
                };
                self.contexts.push(context);
                self.in_rpc_signature = false;
            }
            TokenKind::Rune('<') => {
                let context = if self.opens_literal() {
                    Context::Literal
                } else {
                    Context::Angle
                };
                self.contexts.push(context);
            }
            TokenKind::Rune('[') => self.contexts.push(Context::List),
            TokenKind::Rune('(') => self.contexts.push(Context::Paren),
            TokenKind::Rune('}') => {
                let closed = self.close(&[Context::Body, Context::Literal]);
                closes_literal = closed == Some(Context::Literal);
            }
            TokenKind::Rune('>') => {
                closes_literal =
                    self.close(&[Context::Literal, Context::Angle]) == Some(Context::Literal);
            }
            TokenKind::Rune(']') => {
                self.close(&[Context::List]);
            }
            TokenKind::Rune(')') => {
                self.close(&[Context::Paren]);
            }
            TokenKind::Rune(';') | TokenKind::VirtualSemicolon => self.in_rpc_signature = false,
            TokenKind::Ident if text == "rpc" && self.in_statement_context() => {
                self.in_rpc_signature = true;
            }
            _ => {}
        }
        self.watch_dialect(kind, text, value);

        self.prev = Some(Prev {
            kind,
            token,
            end,
            closes_literal,
            is_option_keyword: kind == TokenKind::Ident && text == "option",
        });
        if !kind.is_virtual() {
            self.last_real = Some(token);
        }
    }

    fn opens_literal(&self) -> bool {
        let after_value_start = self
            .prev
            .is_some_and(|p| matches!(p.kind, TokenKind::Rune('=' | ':' | '[' | ',')));
        after_value_start || matches!(self.context(), Some(Context::Literal | Context::List))
    }

    /// Pops back to the innermost context in `families`. Unmatched closers
    /// leave the stack alone.
    fn close(&mut self, families: &[Context]) -> Option<Context> {
        let index = self.contexts.iter().rposition(|c| families.contains(c))?;
        let context = self.contexts[index];
        self.contexts.truncate(index);
        Some(context)
    }

    fn watch_dialect(&mut self, kind: TokenKind, text: &str, value: &LexValue) {
        self.dialect_watch = match (self.dialect_watch, kind) {
            (DialectWatch::Idle, TokenKind::Ident)
                if (text == "syntax" || text == "edition") && self.contexts.is_empty() =>
            {
                DialectWatch::Keyword {
                    edition: text == "edition",
                }
            }
            (DialectWatch::Keyword { edition }, TokenKind::Rune('=')) => {
                DialectWatch::Equals { edition }
            }
            (DialectWatch::Equals { edition }, TokenKind::String) => {
                let selected = match value {
                    LexValue::Str(_) if edition => Some(Dialect::Editions),
                    LexValue::Str(bytes) => {
                        std::str::from_utf8(bytes).ok().and_then(Dialect::from_syntax)
                    }
                    _ => None,
                };
                if let Some(dialect) = selected {
                    if dialect != self.dialect {
                        tracing::debug!(%dialect, "dialect switched by declaration");
                    }
                    self.dialect = dialect;
                }
                DialectWatch::Idle
            }
            _ => DialectWatch::Idle,
        };
    }
}

fn is_value_end(prev: &Prev) -> bool {
    matches!(
        prev.kind,
        TokenKind::String
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Ident
            | TokenKind::QualifiedIdent
            | TokenKind::ExtensionIdent
            | TokenKind::Rune(']')
    ) || prev.closes_literal
}
