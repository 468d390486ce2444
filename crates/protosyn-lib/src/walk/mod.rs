//! Depth-first traversal over concrete nodes.
//!
//! Unions and lists are structural: the walker steps through them and records
//! them on the [`NodePath`], but only concrete nodes reach a [`Visitor`].
//!
//! ```
//! use protosyn::{ParseConfig, parse_str};
//! use protosyn::ast::{AstNode, NodeKind};
//! use protosyn::walk::inspect;
//!
//! let (file, _, _) = parse_str("a.proto", "message A { int32 x = 1; }", &ParseConfig::default());
//! let mut fields = 0;
//! inspect(file.as_node_ref(), |node| {
//!     fields += usize::from(node.kind() == NodeKind::Field);
//!     true
//! });
//! assert_eq!(fields, 1);
//! ```

mod path;
mod suffix;

#[cfg(test)]
mod walk_tests;

use std::convert::Infallible;

use protosyn_core::Token;

pub use path::{AncestorTracker, NodePath, PathStep, PathValue, path_at_offset};
pub use suffix::{suffix1, suffix2, suffix3, suffix4};

use crate::ast::{FieldRef, Node, NodeRef};

/// Returned by [`Visitor::before`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    /// Don't descend into this node; `after` is still called.
    SkipChildren,
}

pub trait Visitor<'a> {
    type Error;

    fn before(&mut self, _node: NodeRef<'a>, _path: &NodePath<'a>) -> Result<Flow, Self::Error> {
        Ok(Flow::Continue)
    }

    fn after(&mut self, _node: NodeRef<'a>, _path: &NodePath<'a>) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Only nodes overlapping `start..=end`.
    pub range: Option<(Token, Token)>,
    /// Only nodes whose extent contains this token.
    pub intersects: Option<Token>,
    /// Maximum number of concrete nodes on a path.
    pub depth_limit: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            range: None,
            intersects: None,
            depth_limit: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalkError<E> {
    #[error("tree is deeper than the limit of {0} nodes")]
    DepthLimitExceeded(usize),

    #[error(transparent)]
    Visitor(E),
}

/// Walks `root` and everything below it in document order.
///
/// `before` runs on the way down, `after` on the way up, also for nodes
/// whose children were skipped.
pub fn walk<'a, V: Visitor<'a>>(
    root: NodeRef<'a>,
    visitor: &mut V,
    options: &WalkOptions,
) -> Result<(), WalkError<V::Error>> {
    let mut walker = Walker {
        visitor,
        options,
        tracker: AncestorTracker::new(),
    };
    walker.field(PathStep::Root, FieldRef::Node(root))
}

/// Calls `f` on every node in pre-order; returning `false` skips the node's
/// children.
pub fn inspect<'a>(root: NodeRef<'a>, f: impl FnMut(NodeRef<'a>) -> bool) {
    struct Inspect<F>(F);

    impl<'a, F: FnMut(NodeRef<'a>) -> bool> Visitor<'a> for Inspect<F> {
        type Error = Infallible;

        fn before(&mut self, node: NodeRef<'a>, _path: &NodePath<'a>) -> Result<Flow, Infallible> {
            Ok(if (self.0)(node) {
                Flow::Continue
            } else {
                Flow::SkipChildren
            })
        }
    }

    let options = WalkOptions {
        depth_limit: usize::MAX,
        ..WalkOptions::default()
    };
    // Neither the visitor nor an unbounded depth can fail.
    let _ = walk(root, &mut Inspect(f), &options);
}

struct Walker<'v, 'o, 'a, V> {
    visitor: &'v mut V,
    options: &'o WalkOptions,
    tracker: AncestorTracker<'a>,
}

impl<'a, V: Visitor<'a>> Walker<'_, '_, 'a, V> {
    fn admits(&self, node: &dyn Node) -> bool {
        let (start, end) = (node.start(), node.end());
        if let Some((lo, hi)) = self.options.range
            && (end < lo || start > hi)
        {
            return false;
        }
        if let Some(token) = self.options.intersects
            && !(start <= token && token <= end)
        {
            return false;
        }
        true
    }

    fn field(&mut self, step: PathStep, field: FieldRef<'a>) -> Result<(), WalkError<V::Error>> {
        match field {
            FieldRef::Node(node) => {
                if !self.admits(&node) {
                    return Ok(());
                }
                self.tracker.push(step, PathValue::Node(node));
                let result = self.node(node);
                self.tracker.pop();
                result
            }
            FieldRef::Union(union) => {
                if !self.admits(&union) {
                    return Ok(());
                }
                self.tracker.push(step, PathValue::Union(union));
                let result = self.field(PathStep::Unwrap(union.variant_name()), union.unwrap());
                self.tracker.pop();
                result
            }
            FieldRef::List(items) => {
                self.tracker.push(step, PathValue::List(items.len()));
                let result = items
                    .into_iter()
                    .enumerate()
                    .try_for_each(|(index, item)| self.field(PathStep::Index(index), item));
                self.tracker.pop();
                result
            }
        }
    }

    fn node(&mut self, node: NodeRef<'a>) -> Result<(), WalkError<V::Error>> {
        if self.tracker.depth() > self.options.depth_limit {
            return Err(WalkError::DepthLimitExceeded(self.options.depth_limit));
        }
        let flow = self
            .visitor
            .before(node, self.tracker.path())
            .map_err(WalkError::Visitor)?;
        if flow == Flow::Continue {
            for (name, position, child) in children_in_order(node) {
                match position {
                    None => self.field(PathStep::Field(name), child)?,
                    Some((index, len)) => {
                        self.tracker.push(PathStep::Field(name), PathValue::List(len));
                        let result = self.field(PathStep::Index(index), child);
                        self.tracker.pop();
                        result?;
                    }
                }
            }
        }
        self.visitor
            .after(node, self.tracker.path())
            .map_err(WalkError::Visitor)
    }
}

/// A node's children sorted by position. Parallel lists such as elements
/// and their separators are interleaved; list items keep their index and
/// the list's length.
fn children_in_order(
    node: NodeRef<'_>,
) -> Vec<(&'static str, Option<(usize, usize)>, FieldRef<'_>)> {
    let mut children = Vec::new();
    for (name, field) in node.fields() {
        match field {
            FieldRef::List(items) => {
                let len = items.len();
                children.extend(
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(index, item)| (name, Some((index, len)), item)),
                );
            }
            field => children.push((name, None, field)),
        }
    }
    children.sort_by_key(|(_, _, field)| field.start());
    children
}
