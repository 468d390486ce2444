use indoc::indoc;

use crate::ast::{AstNode, FileNode};
use crate::dump::dump_ast;
use crate::printer::{print_file, print_node};
use crate::{ParseConfig, TextSize, parse_str};

/// Inputs that must print back unchanged, well-formed or not.
pub(crate) const CORPUS: &[&str] = &[
    "",
    "\n\n",
    "// only a comment",
    "/* block */\n// line\n",
    indoc! {r#"
        // leading
        syntax = "proto3"; // trailing

        /* detached
           over two lines */
        package acme.v1;

        import public "a.proto";

        message Outer {
          // about inner
          message Inner { int64 id = 1; }
          map<string, Inner> by_name = 2 [(acme.opt).deep = { a: [1, 2] b < c: "d" > }];
          oneof pick { string s = 3; bytes b = 4; }
          reserved 5 to 9, 100 to max;
        }

        enum Kind { KIND_UNSPECIFIED = 0; KIND_A = 1 [deprecated = true]; }

        service Api {
          rpc Get(Outer) returns (stream Outer) {
            option idempotency_level = NO_SIDE_EFFECTS;
          }
        }
    "#},
    indoc! {r#"
        syntax = "proto2"
        message A {
          optional int32 x = 1 // no semicolon
          repeated group G = 2 { required string s = 3; }
          extensions 1000 to 1999;
        }
        extend A { optional bool flag = 1000; }
    "#},
    "syntax = \"proto3\";\nmessage A { int32 x = ; }\n",
    "message A {\n  int32 x = 1;\n",
    "message A { foo . bar x = 1; }",
    "option (my.ext) = { [type.googleapis.com/a.B] { x: 1 } };",
    "option a = -inf;\noption b = +2;\noption c = \"x\" 'y';\n",
    "message A { @ # }\n",
    "option a = \"unterminated\nmessage B {}\n",
    "/* never closed\nmessage A {}\n",
    "message A { import \"x.proto\"; 42; }",
    "}}} message",
    "enum E { A = 1 [a = 1\n  b = 2]; }",
    "\t\r\n  message   A   {  }  \r\n",
];

fn parse(input: &str) -> FileNode {
    parse_str("test.proto", input, &ParseConfig::default()).0
}

#[test]
fn corpus_prints_back_unchanged() {
    for input in CORPUS {
        let file = parse(input);
        assert_eq!(print_file(&file), *input, "tree:\n{}", dump_ast(&file));
    }
}

#[test]
fn extended_syntax_prints_back_unchanged() {
    let config = ParseConfig::new().with_extended_syntax(true);
    for input in CORPUS {
        let (file, _, _) = parse_str("test.proto", input, &config);
        assert_eq!(print_file(&file), *input);
    }
}

#[test]
fn subtree_prints_its_own_text() {
    let source = "message A {\n  int32 x = 1;\n}\n";
    let file = parse(source);
    let message = file.messages().next().unwrap();
    let field = message.fields().next().unwrap();
    assert_eq!(
        print_node(file.info(), field.as_node_ref()),
        "\n  int32 x = 1;"
    );
}

#[test]
fn offset_lookup_finds_field_name() {
    let source = indoc! {r#"
        syntax = "proto2";
        message Foo { optional int32 bar = 1; }
    "#};
    let file = parse(source);
    let foo = file.messages().next().unwrap();
    assert_eq!(foo.name(), Some("Foo"));
    let bar = foo.fields().next().unwrap();
    assert_eq!(bar.name(), Some("bar"));

    let offset = TextSize::from(source.find("bar").unwrap() as u32);
    assert_eq!(file.token_at_offset(offset), bar.name.as_ref().map(|n| n.token));

    let info = file.node_info(bar);
    assert_eq!(info.raw_text(), "optional int32 bar = 1;");
    assert_eq!((info.start().line, info.start().col), (2, 15));
}

#[test]
fn pragma_on_header() {
    let source = indoc! {r#"
        //pragma: mode strict
        //pragma: flag
        //pragma: mode lenient twice
        syntax = "proto3";
        //pragma: ignored here
        message A {}
    "#};
    let file = parse(source);
    assert_eq!(file.pragma("mode"), Some("lenient twice"));
    assert_eq!(file.pragma("flag"), Some(""));
    assert_eq!(file.pragma("ignored"), None);
    let keys: Vec<_> = file.pragmas().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["mode", "flag"]);
}

#[test]
fn pragma_without_header_is_ignored() {
    let file = parse("//pragma: mode strict\nmessage A {}\n");
    assert_eq!(file.pragma("mode"), None);
}

#[test]
fn trailing_text_belongs_to_eof() {
    let source = "message A {}\n// the end\n\n";
    let file = parse(source);
    let eof = file.token_info(file.eof.token);
    assert_eq!(eof.leading_whitespace(), "\n\n");
    let comments: Vec<_> = eof.leading_comments().iter().map(|c| c.raw_text()).collect();
    assert_eq!(comments, vec!["// the end"]);
}
