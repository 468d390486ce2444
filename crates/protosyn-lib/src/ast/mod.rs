//! Owned syntax tree for `.proto` files.
//!
//! Nodes are plain structs owned top-down. Terminals remember the store
//! index of the token(s) they cover; everything positional (line, column,
//! whitespace, comments) is looked up in the file's [`FileInfo`] on demand.
//!
//! Places where the grammar allows alternatives are enums ("unions") whose
//! variants wrap a concrete node. Error recovery shows up as the `Error`
//! variant of the element and value unions, never as a missing node.
//!
//! Generic traversal goes through three borrowed views: [`NodeRef`] for any
//! concrete node, [`UnionRef`] for any union and [`FieldRef`] for one child
//! slot, which may also be a list.

use protosyn_core::Token;

#[macro_use]
mod macros;

mod enums;
mod file;
pub(crate) mod invariants;
mod message;
mod node_ref;
mod options;
mod service;
mod terminals;
mod values;

#[cfg(test)]
mod ast_tests;

pub use enums::{EnumElement, EnumNode, EnumValueNode};
pub use file::{
    EditionNode, EmptyDeclNode, FileElement, FileHeader, FileNode, ImportNode, PackageNode,
    SyntaxNode,
};
pub use message::{
    ExtendElement, ExtendNode, ExtensionRangeNode, FieldLabel, FieldNode, GroupNode,
    MapFieldNode, MapTypeNode, MessageElement, MessageNode, OneofElement, OneofNode, RangeEnd,
    RangeNode, ReservedElement, ReservedNode,
};
pub use node_ref::{NodeKind, NodeRef, UnionRef};
pub use options::{CompactOptionsNode, FieldReferenceNode, OptionNameNode, OptionNode};
pub use service::{RpcElement, RpcNode, RpcTypeNode, ServiceElement, ServiceNode};
pub use terminals::{
    CompoundIdentNode, ErrorNode, FloatLiteralNode, IdentNode, KeywordNode, RuneNode,
    StringLiteralNode, UintLiteralNode,
};
pub use values::{
    ArrayLiteralNode, CompoundStringLiteralNode, FloatValueNode, IdentValueNode, IntValueNode,
    MessageFieldNode, MessageLiteralNode, NegativeIntLiteralNode, SignedFloatLiteralNode,
    SpecialFloatLiteralNode, StringValueNode, ValueNode,
};

/// Anything with a token extent.
///
/// `start()` and `end()` are inclusive: a terminal returns its own token for
/// both, a composite its first and last present child.
pub trait Node {
    fn start(&self) -> Token;
    fn end(&self) -> Token;
}

/// A concrete node type.
pub trait AstNode: Node + Sized {
    const KIND: NodeKind;

    fn cast(node: NodeRef<'_>) -> Option<&Self>;

    fn as_node_ref(&self) -> NodeRef<'_>;

    /// Present children in declaration order. Absent optional children and
    /// empty lists are left out.
    fn fields(&self) -> Vec<(&'static str, FieldRef<'_>)>;
}

/// A sum type over alternative productions.
pub trait AstUnion: Node {
    /// The populated variant, one layer down. May itself be a union.
    fn unwrap(&self) -> FieldRef<'_>;

    /// The concrete node under every union layer.
    fn concrete(&self) -> NodeRef<'_>;

    fn variant_name(&self) -> &'static str;

    fn as_union_ref(&self) -> UnionRef<'_>;
}

/// Anything that can occupy a child slot: a concrete node or a union.
pub trait Child: Node {
    fn as_field(&self) -> FieldRef<'_>;

    fn to_concrete(&self) -> NodeRef<'_>;
}

impl<T: Node + ?Sized> Node for Box<T> {
    fn start(&self) -> Token {
        (**self).start()
    }

    fn end(&self) -> Token {
        (**self).end()
    }
}

impl<T: Child + ?Sized> Child for Box<T> {
    fn as_field(&self) -> FieldRef<'_> {
        (**self).as_field()
    }

    fn to_concrete(&self) -> NodeRef<'_> {
        (**self).to_concrete()
    }
}

/// One child slot of a node.
#[derive(Debug, Clone)]
pub enum FieldRef<'a> {
    Node(NodeRef<'a>),
    Union(UnionRef<'a>),
    List(Vec<FieldRef<'a>>),
}

impl<'a> FieldRef<'a> {
    /// Concrete nodes reachable from this slot, unwrapping unions and
    /// flattening lists.
    pub fn concrete_nodes(&self) -> Vec<NodeRef<'a>> {
        match self {
            FieldRef::Node(node) => vec![*node],
            FieldRef::Union(union) => vec![union.concrete()],
            FieldRef::List(items) => items.iter().flat_map(FieldRef::concrete_nodes).collect(),
        }
    }

    /// First token of the slot; `None` for an empty list.
    pub fn start(&self) -> Option<Token> {
        match self {
            FieldRef::Node(node) => Some(node.start()),
            FieldRef::Union(union) => Some(union.start()),
            FieldRef::List(items) => items.iter().filter_map(FieldRef::start).min(),
        }
    }
}

/// Invalid input to an AST constructor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("compound string needs at least two parts, got {0}")]
    TooFewStringParts(usize),

    #[error("{node} has {elements} elements but {separators} separators")]
    SeparatorMismatch {
        node: &'static str,
        elements: usize,
        separators: usize,
    },

    #[error("{node} needs at least one element")]
    Empty { node: &'static str },

    #[error("error node range is inverted: {start:?} > {end:?}")]
    InvertedRange { start: Token, end: Token },

    #[error("`{open}` cannot be closed by `{close}`")]
    MismatchedDelimiters { open: char, close: char },

    #[error("expected {expected}, got `{found}`")]
    UnexpectedRune { expected: &'static str, found: char },
}

/// Checks that a separated list has exactly one separator between each pair
/// of elements, optionally plus a trailing one.
pub(crate) fn check_separators(
    node: &'static str,
    elements: usize,
    separators: usize,
    trailing_allowed: bool,
) -> Result<(), ConstructionError> {
    let expected = elements.saturating_sub(1);
    let ok = separators == expected || (trailing_allowed && elements > 0 && separators == elements);
    if ok {
        return Ok(());
    }
    Err(ConstructionError::SeparatorMismatch {
        node,
        elements,
        separators,
    })
}
