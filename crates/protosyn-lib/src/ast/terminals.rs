//! Leaf nodes. Each covers one token, except [`CompoundIdentNode`] and
//! [`ErrorNode`] which may cover a contiguous run.

use protosyn_core::Token;

use super::ConstructionError;

/// A punctuation token. Virtual (inferred) `;` and `,` keep a node so the
/// grammar sees regular statements, but contribute no bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct RuneNode {
    pub token: Token,
    pub rune: char,
    pub is_virtual: bool,
}

impl RuneNode {
    pub fn new(token: Token, rune: char) -> Self {
        Self {
            token,
            rune,
            is_virtual: false,
        }
    }

    pub fn inferred(token: Token, rune: char) -> Self {
        Self {
            token,
            rune,
            is_virtual: true,
        }
    }
}

terminal_node!(RuneNode: Rune, |n| (n.token, n.token));

/// An identifier used in keyword position (`message`, `optional`, `max`).
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordNode {
    pub token: Token,
    pub value: String,
}

impl KeywordNode {
    pub fn is(&self, keyword: &str) -> bool {
        self.value == keyword
    }
}

terminal_node!(KeywordNode: Keyword, |n| (n.token, n.token));

#[derive(Debug, Clone, PartialEq)]
pub struct IdentNode {
    pub token: Token,
    pub value: String,
}

terminal_node!(IdentNode: Ident, |n| (n.token, n.token));

/// A dotted name. Normally a single qualified-name token; a name written
/// with whitespace around its dots (already reported) spans several tokens
/// and `value` joins them without the whitespace.
///
/// Also holds parenthesized extension names lexed as one token, in which
/// case `value` keeps the parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundIdentNode {
    pub first: Token,
    pub last: Token,
    pub value: String,
}

impl CompoundIdentNode {
    pub fn single(token: Token, value: impl Into<String>) -> Self {
        Self {
            first: token,
            last: token,
            value: value.into(),
        }
    }

    pub fn is_fully_qualified(&self) -> bool {
        self.value.starts_with('.')
    }

    pub fn is_extension(&self) -> bool {
        self.value.starts_with('(')
    }
}

terminal_node!(CompoundIdentNode: CompoundIdent, |n| (n.first, n.last));

/// A single quoted string; `value` holds the decoded bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteralNode {
    pub token: Token,
    pub value: Vec<u8>,
}

impl StringLiteralNode {
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }
}

terminal_node!(StringLiteralNode: StringLiteral, |n| (n.token, n.token));

#[derive(Debug, Clone, PartialEq)]
pub struct UintLiteralNode {
    pub token: Token,
    pub value: u64,
}

terminal_node!(UintLiteralNode: UintLiteral, |n| (n.token, n.token));

#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteralNode {
    pub token: Token,
    pub value: f64,
}

terminal_node!(FloatLiteralNode: FloatLiteral, |n| (n.token, n.token));

/// Tokens the parser skipped while recovering, `first..=last`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNode {
    pub first: Token,
    pub last: Token,
}

impl ErrorNode {
    pub fn new(first: Token, last: Token) -> Result<Self, ConstructionError> {
        if first > last {
            return Err(ConstructionError::InvertedRange {
                start: first,
                end: last,
            });
        }
        Ok(Self { first, last })
    }
}

terminal_node!(ErrorNode: Error, |n| (n.first, n.last));
