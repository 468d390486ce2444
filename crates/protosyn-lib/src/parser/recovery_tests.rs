use indoc::indoc;

use crate::ast::{FileElement, MessageElement};
use crate::diagnostics::{Diagnostics, FailFast};
use crate::printer::print_file;
use crate::{Error, ParseConfig, parse, parse_str};

fn errors_with(input: &str, config: &ParseConfig) -> String {
    let (file, diagnostics, _) = parse_str("test.proto", input, config);
    assert_eq!(print_file(&file), input);
    diagnostics.iter().map(|d| format!("{d}\n")).collect()
}

fn errors(input: &str) -> String {
    errors_with(input, &ParseConfig::default())
}

#[test]
fn unclosed_body_reported_at_eof() {
    let input = indoc! {"
        message A {
          int32 x = 1;
    "};
    insta::assert_snapshot!(errors(input), @"error at 10..27: missing closing `}`; message body (related: body opened here at 10..11)");
}

#[test]
fn junk_in_body_becomes_error_element() {
    let input = "message A { int32 x = 1; 42; int32 y = 2; }";
    insta::assert_snapshot!(errors(input), @"error at 25..27: unexpected token: `42`");

    let (file, _, _) = parse_str("test.proto", input, &ParseConfig::default());
    let message = file.messages().next().unwrap();
    let shapes: Vec<_> = message
        .elements
        .iter()
        .map(|e| matches!(e, MessageElement::Error(_)))
        .collect();
    assert_eq!(shapes, vec![false, true, false]);
    assert_eq!(message.fields().count(), 2);
}

#[test]
fn declaration_not_allowed_in_body() {
    let input = "message A { import \"x.proto\"; }";
    insta::assert_snapshot!(errors(input), @"error at 12..18: `import` is not allowed here");
}

#[test]
fn extended_syntax_downgrades_to_warnings() {
    let input = "message A { import \"x.proto\"; }";
    let config = ParseConfig::new().with_extended_syntax(true);
    insta::assert_snapshot!(errors_with(input, &config), @"warning at 12..18: `import` is not allowed here");

    let (_, diagnostics, result) = parse_str("test.proto", input, &config);
    assert!(result.is_ok());
    assert!(diagnostics.has_warnings());
}

#[test]
fn missing_field_number() {
    let input = "message A { int32 x = ; }";
    insta::assert_snapshot!(errors(input), @"error at 22..23: expected integer");

    let (file, _, _) = parse_str("test.proto", input, &ParseConfig::default());
    let field = file.messages().next().unwrap().fields().next().unwrap();
    assert_eq!(field.name(), Some("x"));
    assert_eq!(field.tag_value(), None);
    assert!(field.semicolon.is_some());
}

#[test]
fn option_without_name_is_abandoned() {
    let input = "option = 1;\nmessage A {}\n";
    insta::assert_snapshot!(errors(input), @"error at 7..8: expected option name");

    let (file, _, _) = parse_str("test.proto", input, &ParseConfig::default());
    assert!(matches!(file.elements[0], FileElement::Error(_)));
    assert!(matches!(file.elements[1], FileElement::Message(_)));
}

#[test]
fn unclosed_compact_options() {
    let input = "message A { int32 x = 1 [deprecated = true; }";
    insta::assert_snapshot!(errors(input), @"error at 24..43: missing closing `]`; compact options (related: compact options opened here at 24..25)");
}

#[test]
fn unclosed_rpc_type_points_at_its_paren() {
    let input = "service S { rpc Get(Req returns (Res); }";
    let first = errors(input).lines().next().unwrap_or_default().to_string();
    insta::assert_snapshot!(first, @"error at 19..31: missing closing `)`; rpc type (related: rpc type opened here at 19..20)");
}

#[test]
fn unclosed_array_points_at_innermost_bracket() {
    let input = "message A { int32 x = 1 [(a) = [1, 2; }";
    let first = errors(input).lines().next().unwrap_or_default().to_string();
    insta::assert_snapshot!(first, @"error at 31..37: missing closing `]`; array (related: array opened here at 31..32)");
}

#[test]
fn incomplete_declaration_at_eof() {
    insta::assert_snapshot!(errors("message"), @"error at 0..7: incomplete `message` declaration");
}

#[test]
fn colon_instead_of_equals() {
    insta::assert_snapshot!(errors("option foo: 1;"), @"error at 10..11: expected `=`, found `:`");
}

#[test]
fn invalid_characters_are_swept() {
    let input = "message A { @ }\n";
    let (file, diagnostics, result) = parse_str("test.proto", input, &ParseConfig::default());
    assert_eq!(print_file(&file), input);
    assert!(result.is_err());
    assert_eq!(diagnostics.len(), 1);
    let message = file.messages().next().unwrap();
    assert!(matches!(message.elements[0], MessageElement::Error(_)));
    assert!(message.close.is_some());
}

#[test]
fn recursion_limit_stops_parsing() {
    let input = "message A { message B { message C { message D { } } } }\n";
    let config = ParseConfig::new().with_recursion_limit(Some(3));
    let (file, _, result) = parse_str("test.proto", input, &config);
    assert!(matches!(result, Err(Error::RecursionLimitExceeded)));
    assert_eq!(print_file(&file), input);
}

#[test]
fn exec_fuel_stops_parsing() {
    let input = "message A { int32 a = 1; int32 b = 2; int32 c = 3; }\n";
    let config = ParseConfig::new().with_exec_fuel(Some(5));
    let (file, _, result) = parse_str("test.proto", input, &config);
    assert!(matches!(result, Err(Error::ExecFuelExhausted)));
    assert_eq!(print_file(&file), input);
}

#[test]
fn fail_fast_aborts_after_first_error() {
    let input = "message A { 42; 43; }";
    let mut handler = FailFast::new();
    let config = ParseConfig::default();
    let (file, result) = parse("test.proto", input.as_bytes(), &mut handler, &config);

    let Err(Error::Aborted(diagnostics)) = result else {
        panic!("expected the parse to abort");
    };
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        handler.first_error().map(|d| d.to_string()).as_deref(),
        Some("error at 12..14: unexpected token: `42`")
    );
    assert_eq!(print_file(&file), input);
}

#[test]
fn closure_handler_sees_every_diagnostic() {
    let input = "message A { 42; 43; }";
    let mut seen = Vec::new();
    let mut handler = |d: &crate::Diagnostic| {
        seen.push(d.range());
        crate::Flow::Continue
    };
    let (_, result) = parse("test.proto", input.as_bytes(), &mut handler, &ParseConfig::default());
    assert!(matches!(result, Err(Error::ParseFailed(_))));
    assert_eq!(seen.len(), 2);
}

#[test]
fn invalid_utf8_is_replaced() {
    let mut diagnostics = Diagnostics::new();
    let source = b"message A {}\xff";
    let (file, result) = parse("test.proto", source, &mut diagnostics, &ParseConfig::default());
    assert!(matches!(result, Err(Error::InvalidUtf8 { offset: 12 })));
    assert_eq!(file.messages().count(), 1);
}

#[test]
fn unterminated_string_keeps_tree_lossless() {
    let input = indoc! {r#"
        option a = "abc
        message B {}
    "#};
    let (file, diagnostics, _) = parse_str("test.proto", input, &ParseConfig::default());
    assert_eq!(print_file(&file), input);
    assert!(diagnostics.has_errors());
    assert_eq!(file.messages().next().and_then(|m| m.name()), Some("B"));
}
