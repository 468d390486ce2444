//! Index types for lexed items.
//!
//! Tokens and comments share one ordered index space. An [`Item`] is any
//! position in that space; a [`Token`] is an item known to be a grammatical
//! terminal. Neither carries a payload: the only thing they encode is order.

use rowan::{TextRange, TextSize};
use serde::Serialize;

/// Index of a lexed item (token or comment) in its [`FileInfo`](crate::FileInfo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Item(u32);

impl Item {
    #[inline]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a grammatical terminal. Orders the same way as the [`Item`] it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Token(u32);

impl Token {
    #[inline]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn as_item(self) -> Item {
        Item(self.0)
    }
}

impl From<Token> for Item {
    fn from(token: Token) -> Self {
        token.as_item()
    }
}

/// Byte extent of one item. Zero length is legal only for synthetic tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemSpan {
    pub offset: TextSize,
    pub len: TextSize,
}

impl ItemSpan {
    #[inline]
    pub fn new(offset: TextSize, len: TextSize) -> Self {
        Self { offset, len }
    }

    #[inline]
    pub fn end(&self) -> TextSize {
        self.offset + self.len
    }

    #[inline]
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, self.len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == TextSize::from(0)
    }
}
