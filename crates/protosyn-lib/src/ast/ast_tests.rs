use std::sync::Arc;

use protosyn_core::Token;

use super::*;
use crate::{ParseConfig, parse_str};

fn rune(index: u32, rune: char) -> RuneNode {
    RuneNode::new(Token::from_raw(index), rune)
}

fn string(index: u32, value: &str) -> StringLiteralNode {
    StringLiteralNode {
        token: Token::from_raw(index),
        value: value.as_bytes().to_vec(),
    }
}

fn uint(index: u32, value: u64) -> UintLiteralNode {
    UintLiteralNode {
        token: Token::from_raw(index),
        value,
    }
}

fn ident(index: u32, value: &str) -> IdentNode {
    IdentNode {
        token: Token::from_raw(index),
        value: value.to_string(),
    }
}

fn option(index: u32, name: &str) -> OptionNode {
    let part = FieldReferenceNode {
        open: None,
        name: IdentValueNode::Ident(ident(index, name)),
        close: None,
    };
    OptionNode {
        keyword: None,
        name: OptionNameNode::new(vec![part], Vec::new()).unwrap(),
        equals: Some(rune(index + 1, '=')),
        value: Some(ValueNode::Int(IntValueNode::Uint(uint(index + 2, 1)))),
        semicolon: None,
    }
}

#[test]
fn compound_string_needs_two_parts() {
    let error = CompoundStringLiteralNode::new(vec![string(0, "a")]).unwrap_err();
    assert_eq!(error, ConstructionError::TooFewStringParts(1));
    assert_eq!(error.to_string(), "compound string needs at least two parts, got 1");

    let joined = CompoundStringLiteralNode::new(vec![string(0, "a"), string(1, "b")]).unwrap();
    assert_eq!(joined.value(), b"ab");
    assert_eq!((joined.start(), joined.end()), (Token::from_raw(0), Token::from_raw(1)));
}

#[test]
fn option_name_needs_parts() {
    let error = OptionNameNode::new(Vec::new(), Vec::new()).unwrap_err();
    assert_eq!(error.to_string(), "option name needs at least one element");
}

#[test]
fn separators_must_match_elements() {
    let open = rune(0, '[');
    let options = vec![option(1, "a"), option(5, "b")];
    let error = CompactOptionsNode::new(open.clone(), options, Vec::new(), None).unwrap_err();
    assert_eq!(error.to_string(), "compact options has 2 elements but 0 separators");

    let trailing = CompactOptionsNode::new(
        open,
        vec![option(1, "a")],
        vec![rune(4, ',')],
        Some(rune(5, ']')),
    );
    assert!(trailing.is_ok());
}

#[test]
fn error_node_range_must_not_be_inverted() {
    let error = ErrorNode::new(Token::from_raw(5), Token::from_raw(3)).unwrap_err();
    assert!(matches!(error, ConstructionError::InvertedRange { .. }));
    assert!(ErrorNode::new(Token::from_raw(3), Token::from_raw(3)).is_ok());
}

#[test]
fn literal_delimiters_are_checked() {
    let mismatched = MessageLiteralNode::new(rune(0, '{'), Vec::new(), Some(rune(1, '>')));
    assert_eq!(
        mismatched.unwrap_err().to_string(),
        "`{` cannot be closed by `>`"
    );

    let wrong_open = ArrayLiteralNode::new(rune(0, '('), Vec::new(), Vec::new(), None);
    assert_eq!(
        wrong_open.unwrap_err(),
        ConstructionError::UnexpectedRune {
            expected: "`[`",
            found: '(',
        }
    );

    assert!(MessageLiteralNode::new(rune(0, '<'), Vec::new(), Some(rune(1, '>'))).is_ok());
}

#[test]
fn extent_skips_absent_children() {
    let field = FieldNode {
        label: None,
        field_type: IdentValueNode::Ident(ident(3, "int32")),
        name: Some(ident(4, "x")),
        equals: None,
        tag: None,
        options: None,
        semicolon: Some(rune(7, ';')),
    };
    assert_eq!(field.start(), Token::from_raw(3));
    assert_eq!(field.end(), Token::from_raw(7));

    let names: Vec<_> = AstNode::fields(&field).into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["field_type", "name", "semicolon"]);
}

#[test]
fn unions_unwrap_one_layer() {
    let value = ValueNode::Int(IntValueNode::Uint(uint(2, 7)));
    assert_eq!(value.variant_name(), "Int");
    assert!(matches!(value.unwrap(), FieldRef::Union(u) if u.name() == "IntValueNode"));
    assert_eq!(value.concrete().kind(), NodeKind::UintLiteral);
    assert_eq!(value.as_union_ref().name(), "ValueNode");
    assert_eq!(value.start(), Token::from_raw(2));

    let negative = IntValueNode::Negative(NegativeIntLiteralNode {
        minus: rune(0, '-'),
        uint: uint(1, 5),
    });
    assert_eq!(negative.as_i128(), -5);
    assert_eq!(negative.as_u64(), None);
    assert_eq!((negative.start(), negative.end()), (Token::from_raw(0), Token::from_raw(1)));
}

#[test]
fn node_ref_casts() {
    let name = ident(0, "x");
    let node = name.as_node_ref();
    assert!(node.is::<IdentNode>());
    assert!(node.is_terminal());
    assert_eq!(node.cast::<IdentNode>().map(|n| n.value.as_str()), Some("x"));
    assert!(node.cast::<KeywordNode>().is_none());
    assert_eq!(NodeKind::Ident.name(), "IdentNode");
}

#[test]
fn field_ref_concrete_nodes_flatten_lists() {
    let options = CompactOptionsNode::new(
        rune(0, '['),
        vec![option(1, "a"), option(5, "b")],
        vec![rune(4, ',')],
        Some(rune(8, ']')),
    )
    .unwrap();
    let fields = AstNode::fields(&options);
    let (_, list) = fields.iter().find(|(name, _)| *name == "options").unwrap();
    let kinds: Vec<_> = list.concrete_nodes().iter().map(|n| n.kind()).collect();
    assert_eq!(kinds, vec![NodeKind::Option, NodeKind::Option]);
    assert_eq!(list.start(), Some(Token::from_raw(1)));
    assert_eq!(options.get("b").map(|o| o.start()), Some(Token::from_raw(5)));
}

#[test]
fn file_clone_shares_store() {
    let (file, _, _) = parse_str("a.proto", "message A {}", &ParseConfig::default());
    let copy = file.clone();
    assert!(Arc::ptr_eq(file.info(), copy.info()));
    assert_eq!(copy.messages().count(), 1);
    assert_eq!(copy.name(), "a.proto");
}

#[test]
fn empty_file_is_only_eof() {
    let (file, _, result) = parse_str("empty.proto", "", &ParseConfig::default());
    assert!(result.is_ok());
    assert!(file.header.is_none());
    assert!(file.elements.is_empty());
    assert_eq!(file.start(), file.eof.token);
    assert_eq!(file.end(), file.eof.token);
}
