//! Derived, borrow-only views over a [`FileInfo`].
//!
//! None of these are stored: each is rebuilt from a file and a pair of
//! indices whenever a caller asks for it.

use std::fmt;
use std::ops::Range;

use rowan::{TextRange, TextSize};
use serde::Serialize;

use crate::file_info::FileInfo;
use crate::token::{Item, ItemSpan, Token};

/// A 1-based line and byte column, plus the absolute byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourcePos {
    pub offset: u32,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Position, text and comments of a run of tokens `start..=end`.
#[derive(Debug, Clone, Copy)]
pub struct NodeInfo<'a> {
    file: &'a FileInfo,
    start: Token,
    end: Token,
}

impl<'a> NodeInfo<'a> {
    pub(crate) fn new(file: &'a FileInfo, start: Token, end: Token) -> Self {
        Self { file, start, end }
    }

    pub fn file(&self) -> &'a FileInfo {
        self.file
    }

    pub fn start_token(&self) -> Token {
        self.start
    }

    pub fn end_token(&self) -> Token {
        self.end
    }

    pub fn start(&self) -> SourcePos {
        self.file.source_pos(self.file.span(self.start).offset)
    }

    /// Exclusive end: the position just past the end token.
    pub fn end(&self) -> SourcePos {
        self.file.source_pos(self.file.span(self.end).end())
    }

    pub fn span(&self) -> TextRange {
        TextRange::new(
            self.file.span(self.start).offset,
            self.file.span(self.end).end(),
        )
    }

    pub fn leading_whitespace(&self) -> &'a str {
        self.file.leading_whitespace_of(self.start.as_item())
    }

    /// Source text from the start token through the end token, including
    /// any whitespace and comments between them.
    pub fn raw_text(&self) -> &'a str {
        &self.file.data()[self.span()]
    }

    pub fn leading_comments(&self) -> Comments<'a> {
        self.file.leading_comments(self.start)
    }

    pub fn trailing_comments(&self) -> Comments<'a> {
        self.file.trailing_comments(self.end)
    }

    /// A synthetic token: zero length and absent from the source text.
    pub fn is_virtual(&self) -> bool {
        self.start == self.end && self.file.span(self.start).is_empty()
    }
}

/// Position and text of a single item, token or comment.
#[derive(Debug, Clone, Copy)]
pub struct ItemInfo<'a> {
    file: &'a FileInfo,
    item: Item,
}

impl<'a> ItemInfo<'a> {
    pub(crate) fn new(file: &'a FileInfo, item: Item) -> Self {
        Self { file, item }
    }

    pub fn item(&self) -> Item {
        self.item
    }

    pub fn span(&self) -> ItemSpan {
        self.file.span(self.item)
    }

    pub fn start(&self) -> SourcePos {
        self.file.source_pos(self.span().offset)
    }

    pub fn end(&self) -> SourcePos {
        self.file.source_pos(self.span().end())
    }

    pub fn leading_whitespace(&self) -> &'a str {
        self.file.leading_whitespace_of(self.item)
    }

    pub fn raw_text(&self) -> &'a str {
        self.file.text(self.item)
    }

    pub fn is_comment(&self) -> bool {
        self.file.is_comment(self.item)
    }
}

/// What [`FileInfo::get_item`] found at an index.
#[derive(Debug, Clone, Copy)]
pub enum ItemKind<'a> {
    Token(Token),
    Comment(Comment<'a>),
}

impl ItemKind<'_> {
    pub fn as_token(&self) -> Option<Token> {
        match self {
            ItemKind::Token(token) => Some(*token),
            ItemKind::Comment(_) => None,
        }
    }
}

/// One comment and its attribution.
///
/// `is_virtual` is a property of the view, not of the comment: the same
/// comment shows up non-virtual among the trailing comments of the real token
/// it is printed with, and virtual among those of the synthetic token that is
/// its grammatical anchor.
#[derive(Clone, Copy)]
pub struct Comment<'a> {
    file: &'a FileInfo,
    index: usize,
    is_virtual: bool,
}

impl<'a> Comment<'a> {
    pub(crate) fn new(file: &'a FileInfo, index: usize, is_virtual: bool) -> Self {
        Self {
            file,
            index,
            is_virtual,
        }
    }

    pub fn item(&self) -> Item {
        self.file.comments[self.index].item
    }

    pub fn attributed_to(&self) -> Token {
        self.file.comments[self.index].attributed_to
    }

    pub fn virtual_to(&self) -> Option<Token> {
        self.file.comments[self.index].virtual_to
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn span(&self) -> ItemSpan {
        self.file.span(self.item())
    }

    pub fn start(&self) -> SourcePos {
        self.file.source_pos(self.span().offset)
    }

    /// Exclusive end, consistent with [`NodeInfo::end`].
    pub fn end(&self) -> SourcePos {
        self.file.source_pos(self.span().end())
    }

    /// Position of the comment's final byte.
    pub fn last_char_pos(&self) -> SourcePos {
        self.file.source_pos(self.span().end() - TextSize::from(1))
    }

    pub fn leading_whitespace(&self) -> &'a str {
        self.file.leading_whitespace_of(self.item())
    }

    pub fn raw_text(&self) -> &'a str {
        self.file.text(self.item())
    }

    pub fn is_line_comment(&self) -> bool {
        self.raw_text().starts_with("//")
    }
}

impl fmt::Debug for Comment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comment")
            .field("item", &self.item())
            .field("attributed_to", &self.attributed_to())
            .field("virtual_to", &self.virtual_to())
            .field("is_virtual", &self.is_virtual)
            .field("text", &self.raw_text())
            .finish()
    }
}

/// An ordered run of comments: the real attributions first, then the
/// virtual ones.
#[derive(Debug, Clone)]
pub struct Comments<'a> {
    file: &'a FileInfo,
    real: Range<usize>,
    virtual_: Range<usize>,
}

impl<'a> Comments<'a> {
    pub(crate) fn new(file: &'a FileInfo, real: Range<usize>, virtual_: Range<usize>) -> Self {
        Self {
            file,
            real,
            virtual_,
        }
    }

    pub fn len(&self) -> usize {
        self.real.len() + self.virtual_.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Comment<'a>> {
        if index < self.real.len() {
            return Some(Comment::new(self.file, self.real.start + index, false));
        }
        let index = index - self.real.len();
        if index >= self.virtual_.len() {
            return None;
        }
        let entry = self.file.virtual_comments[self.virtual_.start + index];
        Some(Comment::new(self.file, entry, true))
    }

    pub fn iter(&self) -> impl Iterator<Item = Comment<'a>> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }
}
