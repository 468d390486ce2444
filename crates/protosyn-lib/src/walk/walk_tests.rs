use super::*;
use crate::ast::{AstNode, FieldNode, FileNode, IdentNode, MessageNode, NodeKind, NodeRef};
use crate::{ParseConfig, TextSize, parse_str};

fn parse(input: &str) -> FileNode {
    let (file, diagnostics, result) = parse_str("test.proto", input, &ParseConfig::default());
    assert!(result.is_ok(), "{}", diagnostics.render(input));
    file
}

fn path_at<'a>(file: &'a FileNode, source: &str, needle: &str) -> NodePath<'a> {
    let offset = source.find(needle).unwrap();
    path_at_offset(file, TextSize::from(offset as u32)).unwrap()
}

/// Records `before`/`after` calls, optionally skipping or failing on a kind.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    skip: Option<NodeKind>,
    fail: Option<NodeKind>,
}

impl<'a> Visitor<'a> for Recorder {
    type Error = String;

    fn before(&mut self, node: NodeRef<'a>, _path: &NodePath<'a>) -> Result<Flow, String> {
        if self.fail == Some(node.kind()) {
            return Err(format!("{:?}", node.kind()));
        }
        self.events.push(format!("before {:?}", node.kind()));
        Ok(if self.skip == Some(node.kind()) {
            Flow::SkipChildren
        } else {
            Flow::Continue
        })
    }

    fn after(&mut self, node: NodeRef<'a>, _path: &NodePath<'a>) -> Result<(), String> {
        self.events.push(format!("after {:?}", node.kind()));
        Ok(())
    }
}

fn kinds(file: &FileNode, options: &WalkOptions) -> Vec<NodeKind> {
    struct Kinds(Vec<NodeKind>);

    impl<'a> Visitor<'a> for Kinds {
        type Error = std::convert::Infallible;

        fn before(&mut self, node: NodeRef<'a>, _path: &NodePath<'a>) -> Result<Flow, Self::Error> {
            self.0.push(node.kind());
            Ok(Flow::Continue)
        }
    }

    let mut kinds = Kinds(Vec::new());
    walk(file.as_node_ref(), &mut kinds, options).unwrap();
    kinds.0
}

#[test]
fn visits_concrete_nodes_in_document_order() {
    let file = parse("enum E { A = 0; }");
    let mut recorder = Recorder::default();
    walk(file.as_node_ref(), &mut recorder, &WalkOptions::default()).unwrap();
    let before: Vec<_> = recorder
        .events
        .iter()
        .filter_map(|e| e.strip_prefix("before "))
        .collect();
    assert_eq!(
        before,
        vec![
            "File", "Enum", "Keyword", "Ident", "Rune", "EnumValue", "Ident", "Rune",
            "UintLiteral", "Rune", "Rune", "Rune",
        ]
    );
}

#[test]
fn parallel_lists_are_interleaved() {
    let file = parse("message A { int32 x = 1 [a = 1, b = 2, c = 3]; }");
    let mut starts = Vec::new();
    inspect(file.as_node_ref(), |node| {
        if node.is_terminal() {
            starts.push(node.start());
        }
        true
    });
    assert!(starts.windows(2).all(|w| w[0] < w[1]), "{starts:?}");
}

#[test]
fn skipped_children_still_get_after() {
    let file = parse("message A { int32 x = 1; }");
    let mut recorder = Recorder {
        skip: Some(NodeKind::Message),
        ..Recorder::default()
    };
    walk(file.as_node_ref(), &mut recorder, &WalkOptions::default()).unwrap();
    assert_eq!(
        recorder.events,
        vec![
            "before File",
            "before Message",
            "after Message",
            "before Rune",
            "after Rune",
            "after File",
        ]
    );
}

#[test]
fn visitor_error_stops_walk() {
    let file = parse("message A { int32 x = 1; int32 y = 2; }");
    let mut recorder = Recorder {
        fail: Some(NodeKind::Field),
        ..Recorder::default()
    };
    let result = walk(file.as_node_ref(), &mut recorder, &WalkOptions::default());
    assert_eq!(result, Err(WalkError::Visitor("Field".to_string())));
    assert_eq!(recorder.events.last().map(String::as_str), Some("after Rune"));
    assert!(!recorder.events.iter().any(|e| e.contains("Field") || e == "after Message"));
}

#[test]
fn depth_limit() {
    let file = parse("message A {}");
    let options = WalkOptions {
        depth_limit: 2,
        ..WalkOptions::default()
    };
    let result = walk(file.as_node_ref(), &mut Recorder::default(), &options);
    assert_eq!(result, Err(WalkError::DepthLimitExceeded(2)));
    assert_eq!(
        result.unwrap_err().to_string(),
        "tree is deeper than the limit of 2 nodes"
    );
}

#[test]
fn range_filter_keeps_overlapping_nodes() {
    let source = "message A { int32 x = 1; }";
    let file = parse(source);
    let x = file.token_at_offset(TextSize::from(18)).unwrap();

    let by_range = WalkOptions {
        range: Some((x, x)),
        ..WalkOptions::default()
    };
    let expected = vec![NodeKind::File, NodeKind::Message, NodeKind::Field, NodeKind::Ident];
    assert_eq!(kinds(&file, &by_range), expected);

    let by_token = WalkOptions {
        intersects: Some(x),
        ..WalkOptions::default()
    };
    assert_eq!(kinds(&file, &by_token), expected);
}

#[test]
fn path_display() {
    let source = "message A { int32 x = 1; }";
    let file = parse(source);

    let name = path_at(&file, source, "x =");
    insta::assert_snapshot!(name, @"File.elements[0]::Message.elements[0]::Field.name");

    let field_type = path_at(&file, source, "int32");
    insta::assert_snapshot!(field_type, @"File.elements[0]::Message.elements[0]::Field.field_type::Ident");
}

#[test]
fn path_ancestors_nearest_first() {
    let source = "message A { int32 x = 1; }";
    let file = parse(source);
    let path = path_at(&file, source, "x =");

    assert_eq!(path.node().map(|n| n.kind()), Some(NodeKind::Ident));
    assert_eq!(path.depth(), 4);
    let ancestors: Vec<_> = path.ancestors().map(|n| n.kind()).collect();
    assert_eq!(ancestors, vec![NodeKind::Field, NodeKind::Message, NodeKind::File]);
    assert_eq!(path.parent().map(|n| n.kind()), Some(NodeKind::Field));
}

#[test]
fn path_at_offset_outside_tokens() {
    let source = "message A {}\n\n";
    let file = parse(source);
    assert!(path_at_offset(&file, TextSize::from(13)).is_none());
}

#[test]
fn suffix_matches_concrete_tail() {
    let source = "message A { int32 x = 1; }";
    let file = parse(source);
    let path = path_at(&file, source, "x =");

    let (message, field, ident) = suffix3::<MessageNode, FieldNode, IdentNode>(&path).unwrap();
    assert_eq!(message.name(), Some("A"));
    assert_eq!(field.tag_value(), Some(1));
    assert_eq!(ident.value, "x");

    assert!(suffix4::<FileNode, MessageNode, FieldNode, IdentNode>(&path).is_some());
    assert!(suffix1::<IdentNode>(&path).is_some());
    assert!(suffix2::<MessageNode, IdentNode>(&path).is_none());
}

#[test]
fn suffix_longer_than_path() {
    let source = "message A { int32 x = 1; }";
    let file = parse(source);
    let path = path_at(&file, source, "message");
    assert_eq!(path.depth(), 3);
    assert!(suffix4::<FileNode, FileNode, MessageNode, IdentNode>(&path).is_none());
}

#[test]
fn tracker_counts_concrete_nodes() {
    let file = parse("message A {}");
    let message = &file.elements[0];
    let mut tracker = AncestorTracker::new();
    tracker.push(PathStep::Root, PathValue::Node(file.as_node_ref()));
    tracker.push(PathStep::Field("elements"), PathValue::List(1));
    tracker.push(PathStep::Index(0), PathValue::Union(crate::ast::AstUnion::as_union_ref(message)));
    assert_eq!(tracker.depth(), 1);
    assert_eq!(tracker.path().len(), 3);

    tracker.pop();
    tracker.pop();
    assert_eq!(tracker.depth(), 1);
    tracker.pop();
    assert_eq!(tracker.depth(), 0);
    assert!(tracker.pop().is_none());
}

#[test]
#[should_panic(expected = "malformed path")]
fn malformed_path_panics() {
    let file = parse("message A {}");
    let message = file.messages().next().unwrap();
    let mut tracker = AncestorTracker::new();
    tracker.push(PathStep::Root, PathValue::Node(file.as_node_ref()));
    tracker.push(PathStep::Index(0), PathValue::Node(message.as_node_ref()));
    suffix1::<MessageNode>(tracker.path());
}
