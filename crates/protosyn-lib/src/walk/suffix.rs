//! Matching the tail of a path against concrete node types.
//!
//! `suffix3::<MessageNode, FieldNode, IdentNode>(path)` asks whether the
//! current node is an identifier directly inside a field directly inside a
//! message, where "directly" ignores union and list layers. It answers the
//! same however many wrappers sit between the nodes.

use super::path::{NodePath, PathStep, PathValue};
use crate::ast::{AstNode, NodeRef};

/// The concrete nodes of `path`, root first.
///
/// # Panics
///
/// When the path could not have come from a tree: a step that doesn't fit
/// the entry before it, or a root anywhere but first.
fn concrete_chain<'a>(path: &NodePath<'a>) -> Vec<NodeRef<'a>> {
    let mut chain = Vec::new();
    let mut prev: Option<&PathValue<'a>> = None;
    for (position, (step, value)) in path.entries().iter().enumerate() {
        let fits = match (step, prev) {
            (PathStep::Root, None) => true,
            (PathStep::Field(_), Some(PathValue::Node(_))) => true,
            (PathStep::Index(index), Some(PathValue::List(len))) => index < len,
            (PathStep::Unwrap(_), Some(PathValue::Union(_))) => true,
            _ => false,
        };
        assert!(
            fits,
            "malformed path `{path}`: {step:?} at entry {position} does not follow {prev:?}"
        );
        if let PathValue::Node(node) = value {
            chain.push(*node);
        }
        prev = Some(value);
    }
    chain
}

fn tail<'a, const N: usize>(path: &NodePath<'a>) -> Option<[NodeRef<'a>; N]> {
    let chain = concrete_chain(path);
    let start = chain.len().checked_sub(N)?;
    <[NodeRef<'a>; N]>::try_from(&chain[start..]).ok()
}

pub fn suffix1<'a, A: AstNode>(path: &NodePath<'a>) -> Option<&'a A> {
    let [a] = tail(path)?;
    a.cast()
}

pub fn suffix2<'a, A: AstNode, B: AstNode>(path: &NodePath<'a>) -> Option<(&'a A, &'a B)> {
    let [a, b] = tail(path)?;
    Some((a.cast()?, b.cast()?))
}

pub fn suffix3<'a, A: AstNode, B: AstNode, C: AstNode>(
    path: &NodePath<'a>,
) -> Option<(&'a A, &'a B, &'a C)> {
    let [a, b, c] = tail(path)?;
    Some((a.cast()?, b.cast()?, c.cast()?))
}

pub fn suffix4<'a, A: AstNode, B: AstNode, C: AstNode, D: AstNode>(
    path: &NodePath<'a>,
) -> Option<(&'a A, &'a B, &'a C, &'a D)> {
    let [a, b, c, d] = tail(path)?;
    Some((a.cast()?, b.cast()?, c.cast()?, d.cast()?))
}
