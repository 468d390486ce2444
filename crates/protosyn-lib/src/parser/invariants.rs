//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::core::Parser;
use crate::lexer::TokenKind;

impl Parser<'_, '_> {
    #[inline]
    pub(super) fn ensure_progress(&self) {
        assert!(
            self.debug_fuel.get() != 0,
            "parser is stuck: too many lookaheads"
        );
        self.debug_fuel.set(self.debug_fuel.get() - 1);
    }

    #[inline]
    pub(super) fn assert_not_eof(&self) {
        assert!(
            self.tokens
                .get(self.real_pos(0))
                .is_some_and(|t| t.kind != TokenKind::Eof),
            "broken parser invariant: bump at end of input (upstream caller's responsibility)"
        );
    }

    #[inline]
    pub(super) fn assert_current(&self, expected: TokenKind) {
        let current = self.current();
        assert_eq!(
            current, expected,
            "broken parser invariant: expected {expected:?} but found {current:?} \
             (upstream caller's responsibility)",
        );
    }
}
