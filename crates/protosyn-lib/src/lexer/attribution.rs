//! Assigns comments to the tokens around them.
//!
//! Comments buffered since the previous terminal are flushed right before
//! the next one is stored. At most the first of them trails the previous
//! terminal; everything else leads the next one.

use protosyn_core::Token;

use super::{Lexer, PendingComment, Prev};

impl Lexer<'_, '_, '_> {
    /// Flushes buffered comments ahead of a terminal at `next_offset`.
    pub(super) fn attribute_comments(&mut self, next_offset: usize, next_is_eof: bool) {
        if self.pending.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending);

        let mut leading = &pending[..];
        if let Some(prev) = self.prev
            && self.trails(&prev, &pending, next_offset, next_is_eof)
        {
            let first = pending[0];
            match self.last_real {
                Some(real) if prev.kind.is_virtual() => {
                    self.builder
                        .add_virtual_comment(first.offset, first.len, real, prev.token);
                }
                _ => {
                    self.builder.add_comment(first.offset, first.len, prev.token);
                }
            }
            leading = &pending[1..];
        }

        // The next terminal lands right after its leading comments.
        let next = Token::from_raw(self.builder.next_item().as_u32() + leading.len() as u32);
        for comment in leading {
            self.builder.add_comment(comment.offset, comment.len, next);
        }
    }

    fn trails(
        &self,
        prev: &Prev,
        pending: &[PendingComment],
        next_offset: usize,
        next_is_eof: bool,
    ) -> bool {
        if prev.kind.is_virtual() && self.last_real.is_none() {
            return false;
        }
        let prev_line = self.builder.line_of(prev.end);
        let next_line = self.builder.line_of(next_offset);
        // EOF gates like a later line, but a block comment still has to end
        // before EOF's line to trail.
        if !next_is_eof && next_line <= prev_line {
            return false;
        }
        let first = &pending[0];
        if self.builder.line_of(first.offset) != prev_line {
            return false;
        }
        first.is_line
            || pending.len() > 1
            || self.builder.line_of(first.end()) < next_line
    }
}
