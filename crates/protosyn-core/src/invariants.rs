//! Invariant checks excluded from coverage reports.
//!
//! A failure here is a lexer defect, never bad user input, so every check
//! aborts with the item table accumulated so far.

#![cfg_attr(coverage_nightly, coverage(off))]

use std::fmt::Write;

use rowan::TextSize;

use crate::file_info::{
    FileInfoBuilder, MAX_CONSECUTIVE_ZERO_LEN_TOKENS, ZERO_LEN_TOKEN_SLACK,
};
use crate::token::{Item, ItemSpan, Token};

impl FileInfoBuilder {
    pub(crate) fn ensure_addressable(name: &str, len: usize) {
        assert!(
            u32::try_from(len).is_ok(),
            "FileInfo: {name:?} is {len} bytes, larger than a u32 offset can address"
        );
    }

    pub(crate) fn size(&self, value: usize) -> TextSize {
        match u32::try_from(value) {
            Ok(v) if value <= self.info.data.len() => TextSize::from(v),
            _ => self.fatal(format_args!(
                "offset {value} is outside the file ({} bytes)",
                self.info.data.len()
            )),
        }
    }

    pub(crate) fn ensure_line_order(&self, offset: TextSize) {
        if let Some(&last) = self.info.lines.last()
            && offset <= last
        {
            self.fatal(format_args!(
                "line offsets must strictly increase: {} after {}",
                u32::from(offset),
                u32::from(last)
            ));
        }
    }

    pub(crate) fn ensure_item_order(&self, span: ItemSpan) {
        if usize::from(span.end()) > self.info.data.len() {
            self.fatal(format_args!(
                "item {}..{} extends past the end of the file",
                u32::from(span.offset),
                u32::from(span.end())
            ));
        }
        if let Some(prev) = self.info.items.last()
            && span.offset < prev.end()
        {
            self.fatal(format_args!(
                "item offsets must advance: {}..{} after {}..{}",
                u32::from(span.offset),
                u32::from(span.end()),
                u32::from(prev.offset),
                u32::from(prev.end())
            ));
        }
    }

    pub(crate) fn ensure_comment_len(&self, span: ItemSpan) {
        if span.is_empty() {
            self.fatal(format_args!(
                "comment at {} has zero length",
                u32::from(span.offset)
            ));
        }
    }

    pub(crate) fn ensure_zero_len_bounds(&self) {
        if self.zero_len_run > MAX_CONSECUTIVE_ZERO_LEN_TOKENS {
            self.fatal(format_args!(
                "{} consecutive zero-length tokens (limit {})",
                self.zero_len_run, MAX_CONSECUTIVE_ZERO_LEN_TOKENS
            ));
        }
        let limit = self.info.data.len() + ZERO_LEN_TOKEN_SLACK;
        if self.zero_len_total > limit {
            self.fatal(format_args!(
                "{} zero-length tokens in a {}-byte file (limit {limit})",
                self.zero_len_total,
                self.info.data.len()
            ));
        }
    }

    pub(crate) fn ensure_attribution_order(&self, attributed_to: Token, virtual_to: Option<Token>) {
        if let Some(last) = self.info.comments.last()
            && attributed_to < last.attributed_to
        {
            self.fatal(format_args!(
                "comment attributions must not decrease: token {} after token {}",
                attributed_to.index(),
                last.attributed_to.index()
            ));
        }
        let Some(virtual_to) = virtual_to else {
            return;
        };
        let last_virtual = self
            .info
            .virtual_comments
            .last()
            .and_then(|index| self.info.comments[*index].virtual_to);
        if last_virtual.is_some_and(|last| virtual_to < last) {
            self.fatal(format_args!(
                "virtual comment attributions must not decrease: token {}",
                virtual_to.index()
            ));
        }
    }

    pub(crate) fn ensure_attributions_resolved(&self) {
        let count = self.info.items.len();
        for entry in &self.info.comments {
            let target = entry.attributed_to.as_item();
            let dangling = target.index() >= count
                || target == entry.item
                || self.info.comment_index(target).is_some();
            if dangling {
                self.fatal(format_args!(
                    "comment item {} is attributed to item {}, which is not a token",
                    entry.item.index(),
                    target.index()
                ));
            }
        }
    }

    #[cold]
    pub(crate) fn fatal(&self, what: std::fmt::Arguments<'_>) -> ! {
        tracing::error!(file = %self.info.name, "corrupt token store: {what}");
        let mut table = String::new();
        for (index, span) in self.info.items.iter().enumerate() {
            let kind = match self.info.comment_index(Item::from_raw(index as u32)) {
                Some(_) => "comment",
                None => "token",
            };
            let _ = writeln!(
                table,
                "  #{index:<5} {kind:<7} {}..{}",
                u32::from(span.offset),
                u32::from(span.end())
            );
        }
        panic!(
            "corrupt token store for {:?}: {what}\naccumulated items:\n{table}",
            self.info.name
        );
    }
}
