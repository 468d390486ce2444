use crate::{FileInfo, Item, Sequence, Token};

fn sample() -> FileInfo {
    // a /* x */ b
    // // y
    // c
    let src = "a /* x */ b\n// y\nc";
    let mut b = FileInfo::builder("seq.proto", src);
    b.add_token(0, 1);
    b.add_comment(2, 7, Token::from_raw(2));
    b.add_token(10, 1);
    b.add_line(12);
    b.add_comment(12, 4, Token::from_raw(4));
    b.add_line(17);
    b.add_token(17, 1);
    b.add_token(18, 0);
    b.finish()
}

#[test]
fn tokens_skip_comments() {
    let file = sample();
    let forward: Vec<_> = file.tokens().iter_forward().map(Token::as_u32).collect();
    assert_eq!(forward, [0, 2, 4, 5]);
}

#[test]
fn token_sequence_is_symmetric() {
    let file = sample();
    let tokens = file.tokens();
    let forward: Vec<_> = tokens.iter_forward().collect();
    let mut backward: Vec<_> = tokens.iter_backward().collect();
    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn item_sequence_is_symmetric() {
    let file = sample();
    let items = file.items();
    let forward: Vec<_> = items.iter_forward().collect();
    let mut backward: Vec<_> = items.iter_backward().collect();
    backward.reverse();
    assert_eq!(forward.len(), 6);
    assert_eq!(forward, backward);
}

#[test]
fn stepping_by_hand() {
    let file = sample();
    let tokens = file.tokens();
    let first = tokens.first().unwrap();
    assert_eq!(tokens.previous(first), None);
    assert_eq!(tokens.next(first), Some(Token::from_raw(2)));
    let last = tokens.last().unwrap();
    assert_eq!(last, Token::from_raw(5));
    assert_eq!(tokens.next(last), None);
    assert_eq!(tokens.previous(Token::from_raw(4)), Some(Token::from_raw(2)));

    let items = file.items();
    assert_eq!(items.next(Item::from_raw(0)), Some(Item::from_raw(1)));
    assert_eq!(items.previous(Item::from_raw(0)), None);
}

#[test]
fn empty_store_has_empty_sequences() {
    let file = FileInfo::builder("empty.proto", "").finish();
    assert_eq!(file.tokens().first(), None);
    assert_eq!(file.tokens().last(), None);
    assert_eq!(file.items().first(), None);
    assert_eq!(file.items().last(), None);
}

#[test]
fn comment_only_store_has_no_tokens() {
    let mut b = FileInfo::builder("c.proto", "// only");
    b.add_comment(0, 7, Token::from_raw(1));
    b.add_token(7, 0);
    let file = b.finish();
    let tokens: Vec<_> = file.tokens().iter_forward().collect();
    assert_eq!(tokens, [Token::from_raw(1)]);
    assert_eq!(file.tokens().previous(Token::from_raw(1)), None);
}
