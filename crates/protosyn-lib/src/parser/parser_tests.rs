use indoc::indoc;

use crate::ast::{
    AstUnion, FieldLabel, FileElement, IdentValueNode, MessageElement, ReservedElement,
    StringValueNode, ValueNode,
};
use crate::dump::dump_ast;
use crate::printer::print_file;
use crate::{Dialect, ParseConfig, parse_str};

fn parse_ok(input: &str) -> crate::ast::FileNode {
    let (file, diagnostics, result) = parse_str("test.proto", input, &ParseConfig::default());
    assert!(result.is_ok(), "{}", diagnostics.render(input));
    assert_eq!(print_file(&file), input);
    file
}

fn dump(input: &str) -> String {
    dump_ast(&parse_ok(input))
}

fn diagnostics(input: &str) -> String {
    let (file, diagnostics, _) = parse_str("test.proto", input, &ParseConfig::default());
    assert_eq!(print_file(&file), input);
    diagnostics.iter().map(|d| format!("{d}\n")).collect()
}

#[test]
fn proto2_message() {
    let input = indoc! {r#"
        syntax = "proto2";
        message Foo { optional int32 bar = 1; }"#};
    insta::assert_snapshot!(dump(input), @r#"
    File
      Syntax
        Keyword "syntax"
        Rune "="
        StringLiteral "\"proto2\""
        Rune ";"
      Message
        Keyword "message"
        Ident "Foo"
        Rune "{"
        Field
          Keyword "optional"
          Ident "int32"
          Ident "bar"
          Rune "="
          UintLiteral "1"
          Rune ";"
        Rune "}"
      Rune
    "#);
}

#[test]
fn enum_values_with_options() {
    insta::assert_snapshot!(dump("enum E { A = 0; B = -1 [deprecated = true]; }"), @r#"
    File
      Enum
        Keyword "enum"
        Ident "E"
        Rune "{"
        EnumValue
          Ident "A"
          Rune "="
          UintLiteral "0"
          Rune ";"
        EnumValue
          Ident "B"
          Rune "="
          NegativeIntLiteral
            Rune "-"
            UintLiteral "1"
          CompactOptions
            Rune "["
            Option
              OptionName
                FieldReference
                  Ident "deprecated"
              Rune "="
              Ident "true"
            Rune "]"
          Rune ";"
        Rune "}"
      Rune
    "#);
}

#[test]
fn service_with_streaming_rpc() {
    insta::assert_snapshot!(dump("service S { rpc Get(Req) returns (stream Resp); }"), @r#"
    File
      Service
        Keyword "service"
        Ident "S"
        Rune "{"
        Rpc
          Keyword "rpc"
          Ident "Get"
          RpcType
            Rune "("
            Ident "Req"
            Rune ")"
          Keyword "returns"
          RpcType
            Rune "("
            Keyword "stream"
            Ident "Resp"
            Rune ")"
          Rune ";"
        Rune "}"
      Rune
    "#);
}

#[test]
fn option_with_message_literal() {
    insta::assert_snapshot!(dump("option (my.opt) = { a: 1 b: [1, 2] };"), @r#"
    File
      Option
        Keyword "option"
        OptionName
          FieldReference
            CompoundIdent "(my.opt)"
        Rune "="
        MessageLiteral
          Rune "{"
          MessageField
            FieldReference
              Ident "a"
            Rune ":"
            UintLiteral "1"
          MessageField
            FieldReference
              Ident "b"
            Rune ":"
            ArrayLiteral
              Rune "["
              UintLiteral "1"
              Rune ","
              UintLiteral "2"
              Rune "]"
          Rune "}"
        Rune ";"
      Rune
    "#);
}

#[test]
fn line_break_ends_statement() {
    let input = indoc! {"
        message A {
          int32 x = 1
          int32 y = 2;
        }
    "};
    insta::assert_snapshot!(diagnostics(input), @"error at 24..25: missing `;` (fix: insert `;`)");

    let (file, _, _) = parse_str("test.proto", input, &ParseConfig::default());
    insta::assert_snapshot!(dump_ast(&file), @r#"
    File
      Message
        Keyword "message"
        Ident "A"
        Rune "{"
        Field
          Ident "int32"
          Ident "x"
          Rune "="
          UintLiteral "1"
          Rune (inferred ';')
        Field
          Ident "int32"
          Ident "y"
          Rune "="
          UintLiteral "2"
          Rune ";"
        Rune "}"
      Rune
    "#);
}

#[test]
fn spaced_qualified_name() {
    let input = "message A { foo . bar x = 1; }";
    insta::assert_snapshot!(
        diagnostics(input),
        @"error at 12..21: qualified names cannot contain whitespace: `foo.bar`"
    );

    let (file, _, _) = parse_str("test.proto", input, &ParseConfig::default());
    let message = file.messages().next().unwrap();
    let field = message.fields().next().unwrap();
    assert_eq!(field.type_name(), "foo.bar");
    assert!(matches!(field.field_type, IdentValueNode::Compound(_)));
}

#[test]
fn file_level_declarations() {
    let file = parse_ok(indoc! {r#"
        syntax = "proto3";
        package acme.api.v1;
        import public "other.proto";
        import "google/protobuf/empty.proto";
        option java_package = "com.acme";
    "#});

    assert_eq!(file.dialect(), Dialect::Proto3);
    assert_eq!(file.syntax().and_then(|s| s.value()).as_deref(), Some("proto3"));
    assert_eq!(file.package().and_then(|p| p.name()), Some("acme.api.v1"));

    let imports: Vec<_> = file.imports().map(|i| (i.path(), i.is_public())).collect();
    assert_eq!(
        imports,
        vec![
            (Some("other.proto".to_string()), true),
            (Some("google/protobuf/empty.proto".to_string()), false),
        ]
    );

    let option = file.options().next().unwrap();
    assert_eq!(option.name.text(), "java_package");
    assert!(!option.is_compact());
}

#[test]
fn message_body_declarations() {
    let file = parse_ok(indoc! {r#"
        message M {
          map<string, Other> entries = 1;
          oneof choice {
            string name = 2;
            int64 id = 3;
          }
          reserved 4, 8 to 10, 20 to max;
          reserved "old", "older";
          extensions 100 to 199;
          repeated .pkg.Other others = 5 [packed = true];
        }
    "#});

    let message = file.messages().next().unwrap();
    assert_eq!(message.name(), Some("M"));

    let names: Vec<_> = message.fields().filter_map(|f| f.name()).collect();
    assert_eq!(names, vec!["name", "id", "others"]);

    let mut reserved = message.elements.iter().filter_map(|e| match e {
        MessageElement::Reserved(r) => Some(r),
        _ => None,
    });
    let numbers = reserved.next().unwrap();
    let bounds: Vec<_> = numbers
        .elements
        .iter()
        .filter_map(|e| match e {
            ReservedElement::Range(r) => Some((r.start_value(), r.end_value())),
            _ => None,
        })
        .collect();
    assert_eq!(bounds, vec![(4, Some(4)), (8, Some(10)), (20, None)]);
    assert_eq!(numbers.commas.len(), 2);
    let names = reserved.next().unwrap();
    assert!(matches!(names.elements[1], ReservedElement::Name(_)));

    let others = message.fields().last().unwrap();
    assert_eq!(others.label(), Some(FieldLabel::Repeated));
    assert_eq!(others.type_name(), ".pkg.Other");
    assert_eq!(others.tag_value(), Some(5));
    let packed = others.options.as_ref().and_then(|o| o.get("packed"));
    assert!(packed.is_some());

    let map = message
        .elements
        .iter()
        .find_map(|e| match e {
            MessageElement::MapField(m) => Some(m),
            _ => None,
        })
        .unwrap();
    assert_eq!(map.name(), Some("entries"));
    assert_eq!(map.map_type.key_type.as_ref().map(IdentValueNode::as_str), Some("string"));
}

#[test]
fn group_is_a_declaration_in_proto2() {
    let file = parse_ok("message A { repeated group R = 1 { optional int32 x = 2; } }");
    let message = file.messages().next().unwrap();
    let MessageElement::Group(group) = &message.elements[0] else {
        panic!("expected a group, got {:?}", message.elements[0]);
    };
    assert_eq!(group.name(), Some("R"));
    assert_eq!(group.label(), Some(FieldLabel::Repeated));
    assert_eq!(group.elements.len(), 1);
}

#[test]
fn group_is_a_type_name_in_proto3() {
    let file = parse_ok("syntax = \"proto3\";\nmessage A { group g = 1; }\n");
    let message = file.messages().next().unwrap();
    let field = message.fields().next().unwrap();
    assert_eq!(field.type_name(), "group");
    assert_eq!(field.name(), Some("g"));
}

#[test]
fn adjacent_strings_concatenate() {
    let file = parse_ok("option foo = \"a\" 'b';");
    let option = file.options().next().unwrap();
    let Some(ValueNode::String(StringValueNode::Compound(compound))) = &option.value else {
        panic!("expected a compound string, got {:?}", option.value);
    };
    assert_eq!(compound.parts.len(), 2);
    assert_eq!(compound.value(), b"ab");
}

#[test]
fn signed_values() {
    let file = parse_ok("option a = -inf;\noption b = +2;\noption c = -5;\n");
    let values: Vec<_> = file
        .options()
        .map(|o| match &o.value {
            Some(ValueNode::Float(f)) => format!("float {}", f.value()),
            Some(ValueNode::Int(i)) => format!("int {}", i.as_i128()),
            other => format!("{other:?}"),
        })
        .collect();
    assert_eq!(values, vec!["float -inf", "float 2", "int -5"]);
}

#[test]
fn elements_keep_source_order() {
    let file = parse_ok(indoc! {"
        enum E { A = 0; }
        message M {}
        service S {}
        extend M { optional int32 x = 100; }
        ;
    "});
    let kinds: Vec<_> = file.elements.iter().map(AstUnion::variant_name).collect();
    assert_eq!(kinds, vec!["Enum", "Message", "Service", "Extend", "Empty"]);
    assert!(matches!(file.elements[4], FileElement::Empty(_)));
}
