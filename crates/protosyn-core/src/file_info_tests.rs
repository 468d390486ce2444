use crate::{FileInfo, Item, ItemKind, Token, TextSize};

// syntax = 1;
// // lead
// foo // trail
fn sample() -> FileInfo {
    let src = "syntax = 1;\n// lead\nfoo // trail\n";
    let mut b = FileInfo::builder("sample.proto", src);
    b.add_token(0, 6);
    b.add_token(7, 1);
    b.add_token(9, 1);
    b.add_token(10, 1);
    b.add_line(12);
    b.add_comment(12, 7, Token::from_raw(5));
    b.add_line(20);
    b.add_token(20, 3);
    b.add_comment(24, 8, Token::from_raw(5));
    b.add_line(33);
    b.add_token(33, 0);
    b.finish()
}

fn at(file: &FileInfo, offset: u32) -> Option<u32> {
    file.token_at_offset(TextSize::from(offset)).map(|t| t.as_u32())
}

#[test]
fn builder_counts() {
    let file = sample();
    assert_eq!(file.item_count(), 8);
    assert_eq!(file.comment_count(), 2);
    assert_eq!(file.line_count(), 4);
    assert_eq!(file.name(), "sample.proto");
}

#[test]
fn token_at_offset_inside_token() {
    let file = sample();
    for offset in 0..6 {
        assert_eq!(at(&file, offset), Some(0), "offset {offset}");
    }
    assert_eq!(at(&file, 7), Some(1));
    assert_eq!(at(&file, 20), Some(5));
}

#[test]
fn token_at_offset_prefers_containing_token() {
    let file = sample();
    // `1` ends at 10 but `;` starts there
    assert_eq!(at(&file, 10), Some(3));
}

#[test]
fn token_at_offset_falls_back_to_token_ending_here() {
    let file = sample();
    assert_eq!(at(&file, 6), Some(0));
    assert_eq!(at(&file, 11), Some(3));
    assert_eq!(at(&file, 23), Some(5));
}

#[test]
fn token_at_offset_misses() {
    let file = sample();
    // inside `// lead`
    assert_eq!(at(&file, 15), None);
    // start of `// lead`; `;` is on the previous line
    assert_eq!(at(&file, 12), None);
    // start of `// trail`; `foo` ends one byte earlier
    assert_eq!(at(&file, 24), None);
    assert_eq!(at(&file, 33), None);
    assert_eq!(at(&file, 99), None);
}

#[test]
fn token_at_offset_skips_zero_length_tokens() {
    let src = "a\nb";
    let mut b = FileInfo::builder("v.proto", src);
    b.add_token(0, 1);
    b.add_token(1, 0);
    b.add_line(2);
    b.add_token(2, 1);
    b.add_token(3, 0);
    let file = b.finish();

    assert_eq!(at(&file, 1), Some(0));
    assert_eq!(at(&file, 2), Some(2));
    assert_eq!(at(&file, 3), Some(2));
}

#[test]
fn token_at_offset_every_offset_is_consistent() {
    let file = sample();
    for offset in 0..=file.len() as u32 {
        let Some(token) = file.token_at_offset(TextSize::from(offset)) else {
            continue;
        };
        let span = file.span(token);
        let offset = TextSize::from(offset);
        let contains = span.offset <= offset && offset < span.end();
        assert!(contains || span.end() == offset, "offset {offset:?}");
        assert!(!span.is_empty());
    }
}

#[test]
fn source_positions() {
    let file = sample();
    let pos = file.source_pos(TextSize::from(24));
    assert_eq!((pos.line, pos.col), (3, 5));
    assert_eq!(pos.to_string(), "3:5");
    assert_eq!(file.source_pos(TextSize::from(0)).to_string(), "1:1");
    assert_eq!(file.source_pos(TextSize::from(11)).to_string(), "1:12");
    assert_eq!(file.source_pos(TextSize::from(12)).to_string(), "2:1");
}

#[test]
fn line_ranges() {
    let file = sample();
    assert_eq!(
        file.line_range(2),
        Some(TextSize::from(12)..TextSize::from(20))
    );
    assert_eq!(
        file.line_range(4),
        Some(TextSize::from(33)..TextSize::from(33))
    );
    assert_eq!(file.line_range(0), None);
    assert_eq!(file.line_range(5), None);
}

#[test]
fn leading_and_trailing_comments() {
    let file = sample();
    let foo = Token::from_raw(5);

    let leading: Vec<_> = file.leading_comments(foo).iter().map(|c| c.raw_text()).collect();
    let trailing: Vec<_> = file.trailing_comments(foo).iter().map(|c| c.raw_text()).collect();
    assert_eq!(leading, ["// lead"]);
    assert_eq!(trailing, ["// trail"]);

    assert!(file.leading_comments(Token::from_raw(3)).is_empty());
    assert!(file.trailing_comments(Token::from_raw(3)).is_empty());
    assert!(file.leading_comments(Token::from_raw(7)).is_empty());
}

#[test]
fn get_item_distinguishes_comments() {
    let file = sample();
    assert!(matches!(file.get_item(Item::from_raw(4)), ItemKind::Comment(_)));
    assert_eq!(
        file.get_item(Item::from_raw(5)).as_token(),
        Some(Token::from_raw(5))
    );
    assert_eq!(file.as_token(Item::from_raw(6)), None);
    assert_eq!(file.as_token(Item::from_raw(42)), None);
}

#[test]
fn virtual_comment_attribution() {
    // a // c
    // b
    let src = "a // c\nb";
    let mut b = FileInfo::builder("virt.proto", src);
    let a = b.add_token(0, 1);
    let semi = b.add_token(1, 0);
    b.add_virtual_comment(2, 4, a, semi);
    b.add_line(7);
    let next = b.add_token(7, 1);
    b.add_token(8, 0);
    let file = b.finish();

    let on_real: Vec<_> = file.trailing_comments(a).iter().collect();
    assert_eq!(on_real.len(), 1);
    assert!(!on_real[0].is_virtual());
    assert_eq!(on_real[0].virtual_to(), Some(semi));

    let on_virtual: Vec<_> = file.trailing_comments(semi).iter().collect();
    assert_eq!(on_virtual.len(), 1);
    assert!(on_virtual[0].is_virtual());
    assert_eq!(on_virtual[0].attributed_to(), a);

    assert!(file.leading_comments(next).is_empty());
    assert_eq!(file.leading_comments(semi).len(), 0);
}

#[test]
fn leading_whitespace() {
    let file = sample();
    assert_eq!(file.token_info(Token::from_raw(5)).leading_whitespace(), "\n");
    assert_eq!(file.token_info(Token::from_raw(1)).leading_whitespace(), " ");
    assert_eq!(file.token_info(Token::from_raw(0)).leading_whitespace(), "");
    assert_eq!(file.token_info(Token::from_raw(7)).leading_whitespace(), "\n");
}

#[test]
#[should_panic(expected = "consecutive zero-length tokens")]
fn runaway_zero_length_tokens_abort() {
    let mut b = FileInfo::builder("loop.proto", "abc");
    for _ in 0..4 {
        b.add_token(0, 0);
    }
}

#[test]
#[should_panic(expected = "zero-length tokens in a 4-byte file")]
fn total_zero_length_tokens_abort() {
    let mut b = FileInfo::builder("loop.proto", "abcd");
    for offset in 0..4 {
        for _ in 0..3 {
            b.add_token(offset, 0);
        }
        b.add_token(offset, 1);
    }
    for _ in 0..3 {
        b.add_token(4, 0);
    }
}

#[test]
#[should_panic(expected = "item offsets must advance")]
fn overlapping_items_abort() {
    let mut b = FileInfo::builder("bad.proto", "abcdef");
    b.add_token(2, 2);
    b.add_token(3, 1);
}

#[test]
#[should_panic(expected = "line offsets must strictly increase")]
fn non_monotonic_lines_abort() {
    let mut b = FileInfo::builder("bad.proto", "a\nb\nc");
    b.add_line(4);
    b.add_line(2);
}

#[test]
#[should_panic(expected = "accumulated items")]
fn fatal_message_lists_items() {
    let mut b = FileInfo::builder("bad.proto", "ab");
    b.add_token(0, 1);
    b.add_token(0, 1);
}

#[test]
#[should_panic(expected = "which is not a token")]
fn dangling_attribution_aborts() {
    let mut b = FileInfo::builder("bad.proto", "// x");
    b.add_comment(0, 4, Token::from_raw(7));
    b.finish();
}

#[test]
fn empty_file_has_one_line() {
    let mut b = FileInfo::builder("empty.proto", "");
    b.add_token(0, 0);
    let file = b.finish();
    assert_eq!(file.line_count(), 1);
    assert_eq!(file.item_count(), 1);
    assert_eq!(at(&file, 0), None);
}
