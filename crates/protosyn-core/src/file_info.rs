//! The position and token store for one source file.
//!
//! [`FileInfo`] is the only owner of raw byte spans. It is filled by a
//! [`FileInfoBuilder`] while the lexer runs (append-only), then frozen. Every
//! other view (node info, comments, source positions) is derived on demand
//! from a `FileInfo` plus token indices.

use std::ops::Range;

use rowan::TextSize;

use crate::info::{Comment, Comments, ItemInfo, ItemKind, NodeInfo, SourcePos};
use crate::sequence::{Items, Tokens};
use crate::token::{Item, ItemSpan, Token};

/// More consecutive zero-length tokens than this means the lexer is looping.
pub const MAX_CONSECUTIVE_ZERO_LEN_TOKENS: usize = 3;

/// Slack added to the file length when bounding the total number of
/// zero-length tokens.
pub const ZERO_LEN_TOKEN_SLACK: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CommentEntry {
    pub(crate) item: Item,
    pub(crate) attributed_to: Token,
    pub(crate) virtual_to: Option<Token>,
}

/// Immutable store of a file's bytes, line starts, item spans and comment
/// attributions.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub(crate) name: String,
    pub(crate) data: String,
    /// Start offset of every line; `lines[0]` is always 0.
    pub(crate) lines: Vec<TextSize>,
    pub(crate) items: Vec<ItemSpan>,
    /// Sorted by item index; `attributed_to` is non-decreasing.
    pub(crate) comments: Vec<CommentEntry>,
    /// Indices into `comments` that carry a virtual attribution, in order.
    pub(crate) virtual_comments: Vec<usize>,
}

impl FileInfo {
    pub fn builder(name: impl Into<String>, data: impl Into<String>) -> FileInfoBuilder {
        FileInfoBuilder::new(name, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Span of any item. Panics if `item` does not belong to this file.
    pub fn span(&self, item: impl Into<Item>) -> ItemSpan {
        let item = item.into();
        *self.items.get(item.index()).unwrap_or_else(|| {
            panic!(
                "FileInfo: item {} out of range for {:?} ({} items)",
                item.index(),
                self.name,
                self.items.len()
            )
        })
    }

    pub fn text(&self, item: impl Into<Item>) -> &str {
        let span = self.span(item);
        &self.data[span.range()]
    }

    pub fn is_comment(&self, item: Item) -> bool {
        self.comment_index(item).is_some()
    }

    pub(crate) fn comment_index(&self, item: Item) -> Option<usize> {
        self.comments.binary_search_by_key(&item, |c| c.item).ok()
    }

    /// Token index if `item` is a token, `None` if it is a comment or out of range.
    pub fn as_token(&self, item: Item) -> Option<Token> {
        if item.index() >= self.items.len() || self.is_comment(item) {
            return None;
        }
        Some(Token::from_raw(item.as_u32()))
    }

    pub fn get_item(&self, item: Item) -> ItemKind<'_> {
        match self.comment_index(item) {
            Some(index) => ItemKind::Comment(Comment::new(self, index, false)),
            None => ItemKind::Token(Token::from_raw(item.as_u32())),
        }
    }

    /// Every comment of the file, in document order.
    pub fn comments(&self) -> impl Iterator<Item = Comment<'_>> + '_ {
        (0..self.comments.len()).map(move |index| Comment::new(self, index, false))
    }

    pub fn token_info(&self, token: Token) -> NodeInfo<'_> {
        NodeInfo::new(self, token, token)
    }

    pub fn node_info(&self, start: Token, end: Token) -> NodeInfo<'_> {
        NodeInfo::new(self, start, end)
    }

    pub fn item_info(&self, item: Item) -> ItemInfo<'_> {
        ItemInfo::new(self, item)
    }

    pub fn tokens(&self) -> Tokens<'_> {
        Tokens::new(self)
    }

    pub fn items(&self) -> Items<'_> {
        Items::new(self)
    }

    /// 1-based line and byte column of `offset`.
    pub fn source_pos(&self, offset: TextSize) -> SourcePos {
        let line = self.lines.partition_point(|start| *start <= offset).max(1);
        let line_start = self.lines[line - 1];
        SourcePos {
            offset: u32::from(offset),
            line: line as u32,
            col: u32::from(offset - line_start) + 1,
        }
    }

    /// Byte range `[start, end)` of the 1-based `line`.
    pub fn line_range(&self, line: usize) -> Option<Range<TextSize>> {
        let start = *self.lines.get(line.checked_sub(1)?)?;
        let end = self
            .lines
            .get(line)
            .copied()
            .unwrap_or_else(|| TextSize::from(self.data.len() as u32));
        Some(start..end)
    }

    /// The token whose span contains `offset`; failing that, the closest
    /// non-empty token on the same line ending exactly at `offset`.
    pub fn token_at_offset(&self, offset: TextSize) -> Option<Token> {
        if usize::from(offset) > self.data.len() {
            return None;
        }
        let line = self.source_pos(offset).line as usize;
        let range = self.line_range(line)?;

        // Items starting inside [line start, offset]. Items spanning from a
        // previous line (block comments) are found via `lo - 1`.
        let lo = self.items.partition_point(|s| s.offset < range.start);
        let hi = self.items.partition_point(|s| s.offset <= offset);
        let first = lo.saturating_sub(1);

        let mut index = hi;
        while index > first {
            index -= 1;
            let item = Item::from_raw(index as u32);
            let span = self.items[index];
            if span.is_empty() {
                continue;
            }
            if self.is_comment(item) {
                if span.offset == offset {
                    // A comment starting at the cursor: the token just
                    // before it may still end here.
                    continue;
                }
                return None;
            }
            let contains = span.offset <= offset && offset < span.end();
            let ends_here = span.end() == offset && span.offset >= range.start;
            return (contains || ends_here).then(|| Token::from_raw(index as u32));
        }
        None
    }

    pub(crate) fn leading_whitespace_of(&self, item: Item) -> &str {
        let span = self.span(item);
        let prev_end = match item.index() {
            0 => TextSize::from(0),
            index => self.items[index - 1].end(),
        };
        &self.data[usize::from(prev_end)..usize::from(span.offset)]
    }

    /// Range in `comments` attributed to `token`, split at the token itself.
    fn attributed_range(&self, token: Token) -> (Range<usize>, Range<usize>) {
        let lo = self.comments.partition_point(|c| c.attributed_to < token);
        let hi = self.comments.partition_point(|c| c.attributed_to <= token);
        let split = lo + self.comments[lo..hi].partition_point(|c| c.item < token.as_item());
        (lo..split, split..hi)
    }

    fn virtual_range(&self, token: Token) -> Range<usize> {
        let virtual_to = |index: &usize| self.comments[*index].virtual_to;
        let lo = self
            .virtual_comments
            .partition_point(|i| virtual_to(i) < Some(token));
        let hi = self
            .virtual_comments
            .partition_point(|i| virtual_to(i) <= Some(token));
        lo..hi
    }

    pub fn leading_comments(&self, token: Token) -> Comments<'_> {
        let (leading, _) = self.attributed_range(token);
        Comments::new(self, leading, 0..0)
    }

    pub fn trailing_comments(&self, token: Token) -> Comments<'_> {
        let (_, trailing) = self.attributed_range(token);
        Comments::new(self, trailing, self.virtual_range(token))
    }
}

/// Append-only construction of a [`FileInfo`].
///
/// Offsets must strictly advance; violations are lexer bugs and panic with
/// the accumulated item table.
#[derive(Debug)]
pub struct FileInfoBuilder {
    pub(crate) info: FileInfo,
    pub(crate) zero_len_run: usize,
    pub(crate) zero_len_total: usize,
}

impl FileInfoBuilder {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        let data = data.into();
        let name = name.into();
        Self::ensure_addressable(&name, data.len());
        Self {
            info: FileInfo {
                name,
                data,
                lines: vec![TextSize::from(0)],
                items: Vec::new(),
                comments: Vec::new(),
                virtual_comments: Vec::new(),
            },
            zero_len_run: 0,
            zero_len_total: 0,
        }
    }

    pub fn data(&self) -> &str {
        &self.info.data
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// The item index the next `add_*` call will return.
    pub fn next_item(&self) -> Item {
        Item::from_raw(self.info.items.len() as u32)
    }

    pub fn item_count(&self) -> usize {
        self.info.items.len()
    }

    /// Records that a new line starts at `offset` (just past a `\n`).
    pub fn add_line(&mut self, offset: usize) {
        let offset = self.size(offset);
        self.ensure_line_order(offset);
        self.info.lines.push(offset);
    }

    pub fn add_token(&mut self, offset: usize, len: usize) -> Token {
        let span = ItemSpan::new(self.size(offset), self.size(len));
        self.push_span(span);
        if span.is_empty() {
            self.zero_len_run += 1;
            self.zero_len_total += 1;
            self.ensure_zero_len_bounds();
        } else {
            self.zero_len_run = 0;
        }
        Token::from_raw(self.info.items.len() as u32 - 1)
    }

    /// Adds a comment attributed to `attributed_to`, which may be a token that
    /// has not been added yet (a leading comment).
    pub fn add_comment(&mut self, offset: usize, len: usize, attributed_to: Token) -> Item {
        self.push_comment(offset, len, attributed_to, None)
    }

    /// Adds a comment whose grammatical anchor is the synthetic token
    /// `virtual_to`; `attributed_to` is the real token it is printed with.
    pub fn add_virtual_comment(
        &mut self,
        offset: usize,
        len: usize,
        attributed_to: Token,
        virtual_to: Token,
    ) -> Item {
        self.push_comment(offset, len, attributed_to, Some(virtual_to))
    }

    fn push_comment(
        &mut self,
        offset: usize,
        len: usize,
        attributed_to: Token,
        virtual_to: Option<Token>,
    ) -> Item {
        let span = ItemSpan::new(self.size(offset), self.size(len));
        self.ensure_comment_len(span);
        self.ensure_attribution_order(attributed_to, virtual_to);
        self.push_span(span);
        let item = Item::from_raw(self.info.items.len() as u32 - 1);
        if virtual_to.is_some() {
            self.info.virtual_comments.push(self.info.comments.len());
        }
        self.info.comments.push(CommentEntry {
            item,
            attributed_to,
            virtual_to,
        });
        item
    }

    fn push_span(&mut self, span: ItemSpan) {
        self.ensure_item_order(span);
        self.info.items.push(span);
    }

    /// Line number (1-based) of `offset`, using the lines recorded so far.
    pub fn line_of(&self, offset: usize) -> usize {
        self.info.source_pos(self.size(offset)).line as usize
    }

    pub fn span(&self, item: Item) -> ItemSpan {
        self.info.span(item)
    }

    /// Freezes the store after checking every comment points at a token.
    pub fn finish(self) -> FileInfo {
        self.ensure_attributions_resolved();
        self.info
    }
}
