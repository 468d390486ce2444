//! The live path from the root to the node being visited.

use std::fmt;

use protosyn_core::TextSize;

use super::{Flow, Visitor, WalkOptions, walk};
use crate::ast::{AstNode, FileNode, NodeRef, UnionRef};

/// How an entry was reached from the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    Root,
    /// A named child slot of the previous node.
    Field(&'static str),
    /// An element of the previous list.
    Index(usize),
    /// The populated variant of the previous union.
    Unwrap(&'static str),
}

/// What sits at a path entry.
#[derive(Debug, Clone, Copy)]
pub enum PathValue<'a> {
    Node(NodeRef<'a>),
    Union(UnionRef<'a>),
    /// A list container, with its length.
    List(usize),
}

impl<'a> PathValue<'a> {
    pub fn as_node(&self) -> Option<NodeRef<'a>> {
        match self {
            PathValue::Node(node) => Some(*node),
            _ => None,
        }
    }
}

/// Ordered entries from the root down to the current position, wrapper
/// layers included.
#[derive(Debug, Clone, Default)]
pub struct NodePath<'a> {
    entries: Vec<(PathStep, PathValue<'a>)>,
}

impl<'a> NodePath<'a> {
    pub fn entries(&self) -> &[(PathStep, PathValue<'a>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The innermost concrete node on the path.
    pub fn node(&self) -> Option<NodeRef<'a>> {
        self.entries.iter().rev().find_map(|(_, value)| value.as_node())
    }

    /// Concrete nodes from the root down; unions and lists are skipped.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = NodeRef<'a>> + '_ {
        self.entries.iter().filter_map(|(_, value)| value.as_node())
    }

    /// Concrete ancestors of the current node, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        self.nodes().rev().skip(1)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.ancestors().next()
    }

    /// Number of concrete nodes on the path.
    pub fn depth(&self) -> usize {
        self.nodes().count()
    }
}

impl fmt::Display for NodePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (step, value) in &self.entries {
            match step {
                PathStep::Root => match value {
                    PathValue::Node(node) => write!(f, "{:?}", node.kind())?,
                    PathValue::Union(union) => write!(f, "{}", union.name())?,
                    PathValue::List(_) => write!(f, "[]")?,
                },
                PathStep::Field(name) => write!(f, ".{name}")?,
                PathStep::Index(index) => write!(f, "[{index}]")?,
                PathStep::Unwrap(variant) => write!(f, "::{variant}")?,
            }
        }
        Ok(())
    }
}

/// Maintains a [`NodePath`] for callers driving their own traversal.
///
/// Push on the way down and pop on the way up; the walker does exactly this.
#[derive(Debug, Default)]
pub struct AncestorTracker<'a> {
    path: NodePath<'a>,
    depth: usize,
}

impl<'a> AncestorTracker<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: PathStep, value: PathValue<'a>) {
        if matches!(value, PathValue::Node(_)) {
            self.depth += 1;
        }
        self.path.entries.push((step, value));
    }

    pub fn pop(&mut self) -> Option<(PathStep, PathValue<'a>)> {
        let entry = self.path.entries.pop()?;
        if matches!(entry.1, PathValue::Node(_)) {
            self.depth -= 1;
        }
        Some(entry)
    }

    pub fn path(&self) -> &NodePath<'a> {
        &self.path
    }

    /// Concrete nodes currently on the path.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// The path to the deepest node covering the token at `offset`.
pub fn path_at_offset(file: &FileNode, offset: TextSize) -> Option<NodePath<'_>> {
    let token = file.token_at_offset(offset)?;
    let options = WalkOptions {
        intersects: Some(token),
        depth_limit: usize::MAX,
        ..WalkOptions::default()
    };

    struct Deepest<'a> {
        path: Option<NodePath<'a>>,
    }

    impl<'a> Visitor<'a> for Deepest<'a> {
        type Error = std::convert::Infallible;

        fn before(&mut self, _node: NodeRef<'a>, path: &NodePath<'a>) -> Result<Flow, Self::Error> {
            // Pre-order: every later hit is nested in the previous one.
            self.path = Some(path.clone());
            Ok(Flow::Continue)
        }
    }

    let mut deepest = Deepest { path: None };
    walk(file.as_node_ref(), &mut deepest, &options).ok()?;
    deepest.path
}
