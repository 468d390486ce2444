//! Token kinds handed from the lexer to the parser.

use protosyn_core::Token;
use rowan::TextRange;

/// Every terminal kind the parser can see. Comments never reach the parser;
/// they live only in the `FileInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    /// Contiguous dotted name: `a.b.c` or `.a.b`.
    QualifiedIdent,
    /// Contiguous parenthesized extension name: `(a.b)`.
    ExtensionIdent,
    String,
    Int,
    Float,
    /// Single-character punctuation.
    Rune(char),
    /// Zero-length `;` inferred at a line break.
    VirtualSemicolon,
    /// Zero-length `,` inferred inside `[...]`.
    VirtualComma,
    Error,
    Eof,
}

/// Punctuation the lexer recognizes, in [`TokenSet`] bit order.
pub const RUNES: &[char] = &[
    ';', ',', '.', '=', ':', '(', ')', '[', ']', '{', '}', '<', '>', '/', '-', '+',
];

impl TokenKind {
    pub fn is_virtual(self) -> bool {
        matches!(self, TokenKind::VirtualSemicolon | TokenKind::VirtualComma)
    }

    pub fn is_ident(self) -> bool {
        matches!(
            self,
            TokenKind::Ident | TokenKind::QualifiedIdent | TokenKind::ExtensionIdent
        )
    }

    /// The punctuation this token stands for, counting inferred ones.
    pub fn rune(self) -> Option<char> {
        match self {
            TokenKind::Rune(c) => Some(c),
            TokenKind::VirtualSemicolon => Some(';'),
            TokenKind::VirtualComma => Some(','),
            _ => None,
        }
    }

    const fn bit(self) -> u32 {
        match self {
            TokenKind::Ident => 0,
            TokenKind::QualifiedIdent => 1,
            TokenKind::ExtensionIdent => 2,
            TokenKind::String => 3,
            TokenKind::Int => 4,
            TokenKind::Float => 5,
            TokenKind::VirtualSemicolon => 6,
            TokenKind::VirtualComma => 7,
            TokenKind::Error => 8,
            TokenKind::Eof => 9,
            TokenKind::Rune(c) => {
                let mut i = 0;
                while i < RUNES.len() {
                    if RUNES[i] == c {
                        return 10 + i as u32;
                    }
                    i += 1;
                }
                63
            }
        }
    }

    pub fn describe(self) -> String {
        match self {
            TokenKind::Ident => "identifier".to_string(),
            TokenKind::QualifiedIdent => "qualified name".to_string(),
            TokenKind::ExtensionIdent => "extension name".to_string(),
            TokenKind::String => "string literal".to_string(),
            TokenKind::Int => "integer literal".to_string(),
            TokenKind::Float => "float literal".to_string(),
            TokenKind::Rune(c) => format!("`{c}`"),
            TokenKind::VirtualSemicolon => "end of line".to_string(),
            TokenKind::VirtualComma => "end of line".to_string(),
            TokenKind::Error => "invalid token".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// Decoded payload of a literal token.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexValue {
    #[default]
    None,
    Str(Vec<u8>),
    Int(u64),
    Float(f64),
}

/// A terminal as the parser sees it: kind, store index, byte range, text
/// and decoded literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct LexedToken {
    pub kind: TokenKind,
    pub token: Token,
    pub range: TextRange,
    pub text: String,
    pub value: LexValue,
}

impl LexedToken {
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == keyword
    }
}

/// A set of token kinds as a 64-bit mask.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    #[inline]
    pub const fn new(kinds: &[TokenKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1 << kinds[i].bit();
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn single(kind: TokenKind) -> Self {
        TokenSet(1 << kind.bit())
    }

    #[inline]
    pub const fn contains(&self, kind: TokenKind) -> bool {
        self.0 & (1 << kind.bit()) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fixed = [
            TokenKind::Ident,
            TokenKind::QualifiedIdent,
            TokenKind::ExtensionIdent,
            TokenKind::String,
            TokenKind::Int,
            TokenKind::Float,
            TokenKind::VirtualSemicolon,
            TokenKind::VirtualComma,
            TokenKind::Error,
            TokenKind::Eof,
        ];
        let runes = RUNES.iter().map(|c| TokenKind::Rune(*c));
        let mut list = f.debug_set();
        for kind in fixed.into_iter().chain(runes) {
            if self.contains(kind) {
                list.entry(&kind);
            }
        }
        list.finish()
    }
}
