//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::NodeKind;

/// Every composite holds at least one child. Reaching this means a node was
/// assembled by hand with all of its fields emptied.
#[cold]
pub(crate) fn childless(kind: NodeKind) -> ! {
    tracing::error!(node = kind.name(), "composite node without children");
    panic!("broken AST invariant: {} has no children", kind.name())
}
