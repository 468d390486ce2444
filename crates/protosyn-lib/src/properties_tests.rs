//! Invariants checked over every input of the round-trip corpus.

use protosyn_core::{Comments, FileInfo, Item, Sequence, TextSize, Token};

use crate::ast::{
    AstNode, AstUnion, FileElement, FileNode, OptionNode, UintLiteralNode, ValueNode,
};
use crate::roundtrip_tests::CORPUS;
use crate::walk::{AncestorTracker, PathStep, PathValue, path_at_offset, suffix2, suffix3};
use crate::{ParseConfig, parse_str};

fn corpus() -> impl Iterator<Item = (&'static str, FileNode)> {
    CORPUS
        .iter()
        .map(|input| (*input, parse_str("test.proto", input, &ParseConfig::default()).0))
}

#[test]
fn sequences_walk_the_same_elements_both_ways() {
    for (input, file) in corpus() {
        let tokens = file.tokens();
        let forward: Vec<Token> = tokens.iter_forward().collect();
        let mut backward: Vec<Token> = tokens.iter_backward().collect();
        backward.reverse();
        assert_eq!(forward, backward, "{input:?}");
        assert_eq!(forward.last().copied(), Some(file.eof.token), "{input:?}");

        let items = file.items();
        let forward: Vec<Item> = items.iter_forward().collect();
        let mut backward: Vec<Item> = items.iter_backward().collect();
        backward.reverse();
        assert_eq!(forward, backward, "{input:?}");
        assert_eq!(forward.len(), file.info().item_count(), "{input:?}");

        let info = file.info();
        let from_items: Vec<Token> = forward.iter().filter_map(|i| info.as_token(*i)).collect();
        assert_eq!(from_items, tokens.iter_forward().collect::<Vec<_>>(), "{input:?}");
    }
}

fn lists(comments: &Comments<'_>, item: Item, is_virtual: bool) -> bool {
    comments
        .iter()
        .any(|c| c.is_virtual() == is_virtual && c.item() == item)
}

#[test]
fn every_comment_is_attributed_exactly_once() {
    for (input, file) in corpus() {
        let info = file.info();
        let mut seen = 0;
        for token in file.tokens().iter_forward() {
            let node = info.token_info(token);
            seen += node.leading_comments().iter().filter(|c| !c.is_virtual()).count();
            seen += node.trailing_comments().iter().filter(|c| !c.is_virtual()).count();
        }
        assert_eq!(seen, info.comment_count(), "{input:?}");

        for comment in info.comments() {
            let owner = comment.attributed_to();
            let item = comment.item();
            assert!(
                lists(&info.leading_comments(owner), item, false)
                    || lists(&info.trailing_comments(owner), item, false),
                "{input:?}: {comment:?}"
            );
            if let Some(anchor) = comment.virtual_to() {
                assert!(
                    lists(&info.trailing_comments(anchor), item, true),
                    "{input:?}: {comment:?}"
                );
            }
        }
    }
}

/// The non-comment token covering `offset`, by linear scan.
fn containing_token(info: &FileInfo, offset: TextSize) -> Option<Token> {
    info.tokens().iter_forward().find(|t| {
        let span = info.span(*t);
        span.offset <= offset && offset < span.end()
    })
}

#[test]
fn offset_lookup_agrees_with_spans() {
    for (input, file) in corpus() {
        let info = file.info();
        for offset in 0..=input.len() {
            let offset = TextSize::from(offset as u32);
            let found = file.token_at_offset(offset);
            if let Some(token) = containing_token(info, offset) {
                assert_eq!(found, Some(token), "{input:?} at {offset:?}");
            }
            if let Some(token) = found {
                let span = info.span(token);
                let contains = span.offset <= offset && offset < span.end();
                assert!(contains || span.end() == offset, "{input:?} at {offset:?}");
            }
        }
    }
}

#[test]
fn every_offset_path_ends_at_a_terminal() {
    for (input, file) in corpus() {
        for offset in 0..=input.len() {
            let Some(path) = path_at_offset(&file, TextSize::from(offset as u32)) else {
                continue;
            };
            let node = path.node().unwrap();
            assert!(node.is_terminal(), "{input:?} at {offset}: {path}");
            assert_eq!(path.nodes().next().map(|n| n.kind()), Some(crate::ast::NodeKind::File));
        }
    }
}

#[test]
fn suffix_ignores_wrapper_layers() {
    let source = "option a = 1;";
    let file = parse_str("test.proto", source, &ParseConfig::default()).0;
    let FileElement::Option(option) = &file.elements[0] else {
        panic!("expected an option");
    };
    let Some(value @ ValueNode::Int(int)) = &option.value else {
        panic!("expected an integer value");
    };
    let literal = int.concrete().cast::<UintLiteralNode>().unwrap();

    // As the walker records it: element union, value union and int union.
    let real = path_at_offset(&file, TextSize::from(11)).unwrap();
    let unions = real
        .entries()
        .iter()
        .filter(|(_, v)| matches!(v, PathValue::Union(_)))
        .count();
    assert_eq!(unions, 3);

    // The same nodes with no unions in between.
    let mut bare = AncestorTracker::new();
    bare.push(PathStep::Root, PathValue::Node(file.as_node_ref()));
    bare.push(PathStep::Field("elements"), PathValue::List(1));
    bare.push(PathStep::Index(0), PathValue::Node(option.as_node_ref()));
    bare.push(PathStep::Field("value"), PathValue::Node(literal.as_node_ref()));

    // And with one union only.
    let mut partial = AncestorTracker::new();
    partial.push(PathStep::Root, PathValue::Node(file.as_node_ref()));
    partial.push(PathStep::Field("elements"), PathValue::List(1));
    partial.push(PathStep::Index(0), PathValue::Node(option.as_node_ref()));
    partial.push(PathStep::Field("value"), PathValue::Union(value.as_union_ref()));
    partial.push(PathStep::Unwrap("Int"), PathValue::Node(literal.as_node_ref()));

    for path in [&real, bare.path(), partial.path()] {
        let (o, l) = suffix2::<OptionNode, UintLiteralNode>(path).unwrap();
        assert!(std::ptr::eq(o, option), "{path}");
        assert!(std::ptr::eq(l, literal), "{path}");
        assert!(suffix3::<FileNode, OptionNode, UintLiteralNode>(path).is_some(), "{path}");
        assert!(suffix2::<FileNode, UintLiteralNode>(path).is_none(), "{path}");
    }
}
