use std::sync::Arc;
use std::thread;

use crate::ParseConfig;
use crate::driver::{ParseResult, ParsedFile, Registry, parse_all};

#[test]
fn parses_in_input_order() {
    let sources = [
        ("a.proto", "syntax = \"proto3\";\nmessage A {}\n"),
        ("b.proto", "message B { int32 x = ; }\n"),
        ("c.proto", ""),
    ];
    let results = parse_all(&sources, &ParseConfig::default());

    let names: Vec<_> = results.iter().map(ParseResult::name).collect();
    assert_eq!(names, ["a.proto", "b.proto", "c.proto"]);
    let ok: Vec<_> = results.iter().map(ParseResult::is_ok).collect();
    assert_eq!(ok, [true, false, true]);
}

#[test]
fn registry_is_shared_across_threads() {
    let sources = [("a.proto", "message A {}"), ("b.proto", "enum B { X = 0; }")];
    let registry: Registry = parse_all(&sources, &ParseConfig::default())
        .into_iter()
        .collect();
    let registry = Arc::new(registry);

    let counts: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = ["a.proto", "b.proto"]
            .into_iter()
            .map(|name| {
                let registry = Arc::clone(&registry);
                scope.spawn(move || registry.get(name).map_or(0, |f| f.file.elements.len()))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(counts, [1, 1]);
    assert_eq!(registry.names().collect::<Vec<_>>(), ["a.proto", "b.proto"]);
    assert_eq!(registry.failed().count(), 0);
}

#[test]
fn registry_replaces_same_name() {
    let mut registry = Registry::new();
    for source in ["message A {}", "message A {} message B {}"] {
        let (file, diagnostics, _) =
            crate::parse_str("a.proto", source, &ParseConfig::default());
        registry.insert(ParsedFile { file, diagnostics });
    }
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("a.proto").map(|f| f.file.elements.len()), Some(2));
}
