//! Maximal-munch lexeme recognition.
//!
//! The logos automaton is run at the scanner cursor to find the longest
//! lexeme starting there. It never decides context: the lexer may cut a
//! compound lexeme back to its first rune.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RawKind {
    #[regex(r"[ \t\r\x0B\x0C]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*+[^*/])*\*+/")]
    BlockComment,

    /// `/*` with no closing `*/` anywhere after it.
    #[token("/*")]
    UnterminatedBlockComment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"\.?[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)+")]
    #[regex(r"\.[A-Za-z_][A-Za-z0-9_]*")]
    QualifiedIdent,

    #[regex(r"\(\.?[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*\)")]
    ExtensionIdent,

    #[regex(r"0[xX][0-9A-Fa-f]*")]
    HexInt,

    #[regex(r"[0-9]+")]
    DecInt,

    #[regex(r"[0-9]+\.[0-9]*(?:[eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+(?:[eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[token("\"")]
    #[token("'")]
    Quote,

    #[regex(r"[\x00-\x08\x0E-\x1F\x7F]")]
    ControlChar,

    #[token(";")]
    #[token(",")]
    #[token(".")]
    #[token("=")]
    #[token(":")]
    #[token("(")]
    #[token(")")]
    #[token("[")]
    #[token("]")]
    #[token("{")]
    #[token("}")]
    #[token("<")]
    #[token(">")]
    #[token("/")]
    #[token("-")]
    #[token("+")]
    Punct,
}

impl RawKind {
    pub(super) fn is_trivia(self) -> bool {
        matches!(
            self,
            RawKind::Whitespace
                | RawKind::Newline
                | RawKind::LineComment
                | RawKind::BlockComment
                | RawKind::UnterminatedBlockComment
                | RawKind::ControlChar
        )
    }

    pub(super) fn is_number(self) -> bool {
        matches!(self, RawKind::HexInt | RawKind::DecInt | RawKind::Float)
    }
}

/// Longest lexeme at the start of `rest`: its kind (`None` for a character
/// no rule accepts) and byte length. `None` at end of input.
pub(super) fn peek(rest: &str) -> Option<(Option<RawKind>, usize)> {
    let mut lexer = RawKind::lexer(rest);
    match lexer.next()? {
        Ok(kind) => Some((Some(kind), lexer.span().len())),
        Err(()) => {
            let size = rest.chars().next().map_or(1, char::len_utf8);
            Some((None, size))
        }
    }
}
