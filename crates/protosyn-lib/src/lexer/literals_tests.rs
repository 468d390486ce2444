use super::literals::{MAX_ESCAPE_ERRORS, Number, parse_number, read_string};
use crate::diagnostics::DiagnosticKind;
use crate::scanner::Scanner;

fn string(src: &str) -> (usize, Vec<u8>, Vec<DiagnosticKind>) {
    let mut scanner = Scanner::new(src);
    let lit = read_string(&mut scanner);
    let kinds = lit.errors.iter().map(|e| e.kind).collect();
    (lit.len, lit.value, kinds)
}

#[test]
fn simple_escapes() {
    let (len, value, errors) = string(r#""\a\b\f\n\r\t\v\\\'\"\?" rest"#);
    assert_eq!(len, 24);
    assert_eq!(value, b"\x07\x08\x0C\n\r\t\x0B\\'\"?");
    assert!(errors.is_empty());
}

#[test]
fn unicode_escapes() {
    let (_, value, errors) = string(r#""é\U0001F600""#);
    assert_eq!(value, "é😀".as_bytes());
    assert!(errors.is_empty());
}

#[test]
fn short_unicode_escape() {
    let (_, _, errors) = string(r#""\u12""#);
    assert_eq!(errors, [DiagnosticKind::InvalidEscape]);
}

#[test]
fn octal_escape_out_of_range() {
    let (_, _, errors) = string(r#""\777""#);
    assert_eq!(errors, [DiagnosticKind::InvalidEscape]);
}

#[test]
fn single_quote_inside_double_quotes() {
    let (len, value, errors) = string(r#""it's""#);
    assert_eq!(len, 6);
    assert_eq!(value, b"it's");
    assert!(errors.is_empty());
}

#[test]
fn unterminated_at_newline_leaves_newline_unread() {
    let mut scanner = Scanner::new("\"abc\ndef");
    let lit = read_string(&mut scanner);
    assert_eq!(lit.len, 4);
    assert_eq!(scanner.rest(), "\ndef");
    assert!(scanner.take_lines().is_empty());
    assert_eq!(lit.errors[0].kind, DiagnosticKind::UnterminatedString);
}

#[test]
fn escape_errors_are_bounded() {
    let src = format!("\"{}\"", "\\q".repeat(MAX_ESCAPE_ERRORS + 5));
    let (_, _, errors) = string(&src);
    assert_eq!(errors.len(), MAX_ESCAPE_ERRORS + 1);
    assert_eq!(errors.last(), Some(&DiagnosticKind::TooManyEscapeErrors));
}

#[test]
fn integers() {
    assert_eq!(parse_number("0", 0), (Number::Int(0), None));
    assert_eq!(parse_number("0755", 0), (Number::Int(0o755), None));
    assert_eq!(parse_number("0xff", 0), (Number::Int(255), None));
    assert_eq!(
        parse_number("18446744073709551615", 0),
        (Number::Int(u64::MAX), None)
    );
}

#[test]
fn malformed_integers() {
    let (value, error) = parse_number("0x", 3);
    assert_eq!(value, Number::Int(0));
    assert_eq!(error.map(|e| e.kind), Some(DiagnosticKind::InvalidNumber));

    let (_, error) = parse_number("089", 0);
    assert_eq!(error.map(|e| e.kind), Some(DiagnosticKind::InvalidNumber));

    let (value, error) = parse_number("0x1ffffffffffffffff", 0);
    assert_eq!(value, Number::Int(u64::MAX));
    assert_eq!(error.map(|e| e.kind), Some(DiagnosticKind::IntegerOverflow));
}

#[test]
fn decimal_overflow_becomes_float() {
    let (value, error) = parse_number("99999999999999999999", 0);
    assert!(error.is_none());
    assert!(matches!(value, Number::Float(v) if v > 9.9e19));
}

#[test]
fn floats() {
    assert_eq!(parse_number("1.5e3", 0), (Number::Float(1500.0), None));
    assert_eq!(parse_number("1.", 0), (Number::Float(1.0), None));
}
