//! Bidirectional cursors over a file's tokens or items.

use crate::file_info::FileInfo;
use crate::token::{Item, Token};

/// An ordered, finite sequence walkable from either end.
///
/// Walking forward from `first()` and backward from `last()` visits the same
/// elements in opposite orders.
pub trait Sequence<T: Copy> {
    fn first(&self) -> Option<T>;
    fn next(&self, current: T) -> Option<T>;
    fn last(&self) -> Option<T>;
    fn previous(&self, current: T) -> Option<T>;

    fn iter_forward(&self) -> SequenceIter<'_, Self, T>
    where
        Self: Sized,
    {
        SequenceIter {
            seq: self,
            cursor: self.first(),
            forward: true,
        }
    }

    fn iter_backward(&self) -> SequenceIter<'_, Self, T>
    where
        Self: Sized,
    {
        SequenceIter {
            seq: self,
            cursor: self.last(),
            forward: false,
        }
    }
}

pub struct SequenceIter<'s, S, T> {
    seq: &'s S,
    cursor: Option<T>,
    forward: bool,
}

impl<S: Sequence<T>, T: Copy> Iterator for SequenceIter<'_, S, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let current = self.cursor?;
        self.cursor = if self.forward {
            self.seq.next(current)
        } else {
            self.seq.previous(current)
        };
        Some(current)
    }
}

/// Every item of the file, comments included.
#[derive(Debug, Clone, Copy)]
pub struct Items<'a> {
    file: &'a FileInfo,
}

impl<'a> Items<'a> {
    pub(crate) fn new(file: &'a FileInfo) -> Self {
        Self { file }
    }
}

impl Sequence<Item> for Items<'_> {
    fn first(&self) -> Option<Item> {
        (self.file.item_count() > 0).then(|| Item::from_raw(0))
    }

    fn next(&self, current: Item) -> Option<Item> {
        let next = current.index() + 1;
        (next < self.file.item_count()).then(|| Item::from_raw(next as u32))
    }

    fn last(&self) -> Option<Item> {
        let count = self.file.item_count();
        (count > 0).then(|| Item::from_raw(count as u32 - 1))
    }

    fn previous(&self, current: Item) -> Option<Item> {
        let index = current.index().checked_sub(1)?;
        Some(Item::from_raw(index as u32))
    }
}

/// The file's tokens; comments are stepped over.
#[derive(Debug, Clone, Copy)]
pub struct Tokens<'a> {
    file: &'a FileInfo,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(file: &'a FileInfo) -> Self {
        Self { file }
    }

    fn scan(&self, mut index: usize, forward: bool) -> Option<Token> {
        loop {
            if index >= self.file.item_count() {
                return None;
            }
            if let Some(token) = self.file.as_token(Item::from_raw(index as u32)) {
                return Some(token);
            }
            index = if forward {
                index + 1
            } else {
                index.checked_sub(1)?
            };
        }
    }
}

impl Sequence<Token> for Tokens<'_> {
    fn first(&self) -> Option<Token> {
        self.scan(0, true)
    }

    fn next(&self, current: Token) -> Option<Token> {
        self.scan(current.index() + 1, true)
    }

    fn last(&self) -> Option<Token> {
        let index = self.file.item_count().checked_sub(1)?;
        self.scan(index, false)
    }

    fn previous(&self, current: Token) -> Option<Token> {
        self.scan(current.index().checked_sub(1)?, false)
    }
}
