//! String and number literal decoding.
//!
//! Readers return their problems instead of reporting them, so the lexer
//! stays the only place that talks to the error handler.

use rowan::{TextRange, TextSize};

use crate::diagnostics::DiagnosticKind;
use crate::scanner::{Rune, Scanner};

/// Escape errors reported individually per string before a summary.
pub(crate) const MAX_ESCAPE_ERRORS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LexError {
    pub(crate) kind: DiagnosticKind,
    pub(crate) range: TextRange,
    pub(crate) detail: Option<String>,
}

impl LexError {
    fn new(kind: DiagnosticKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            range: range(start, end),
            detail: None,
        }
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

#[derive(Debug)]
pub(crate) struct StringLit {
    pub(crate) len: usize,
    pub(crate) value: Vec<u8>,
    pub(crate) errors: Vec<LexError>,
}

/// Reads a quoted string starting at the scanner cursor, which must be on
/// the opening quote. Stops before a raw newline.
pub(crate) fn read_string(scanner: &mut Scanner<'_>) -> StringLit {
    let start = scanner.offset();
    scanner.set_mark();
    let quote = scanner.read_rune().char();
    let mut value = Vec::new();
    let mut escape_errors = Vec::new();
    let mut errors = Vec::new();

    loop {
        let here = scanner.offset();
        match scanner.read_rune() {
            Rune::Eof => {
                errors.push(LexError::new(
                    DiagnosticKind::UnterminatedString,
                    start,
                    scanner.offset(),
                ));
                break;
            }
            Rune::Char('\n', size) => {
                scanner.unread_rune(size);
                errors.push(LexError::new(DiagnosticKind::UnterminatedString, start, here));
                break;
            }
            Rune::Char(c, _) if Some(c) == quote => break,
            Rune::Char('\\', _) => {
                if let Err(error) = read_escape(scanner, here, &mut value) {
                    escape_errors.push(error);
                }
            }
            Rune::Char(c, size) => {
                if c.is_control() && !matches!(c, '\t' | '\x0B' | '\x0C' | '\r') {
                    errors.push(
                        LexError::new(DiagnosticKind::InvalidControlCharacter, here, here + size)
                            .detail(format!("{:?} in string literal", c)),
                    );
                }
                let mut buf = [0u8; 4];
                value.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    let total = escape_errors.len();
    if total > MAX_ESCAPE_ERRORS {
        escape_errors.truncate(MAX_ESCAPE_ERRORS);
        tracing::warn!(offset = start, total, "escape error bound hit");
        escape_errors.push(
            LexError::new(DiagnosticKind::TooManyEscapeErrors, start, scanner.offset()).detail(
                format!(
                    "{total} invalid escapes in string literal; \
                     only the first {MAX_ESCAPE_ERRORS} are reported"
                ),
            ),
        );
    }
    escape_errors.extend(errors);

    StringLit {
        len: scanner.offset() - start,
        value,
        errors: escape_errors,
    }
}

/// Decodes one escape; the backslash at `start` has been consumed.
fn read_escape(scanner: &mut Scanner<'_>, start: usize, out: &mut Vec<u8>) -> Result<(), LexError> {
    let rune = scanner.read_rune();
    let simple = match rune.char() {
        Some('a') => Some(0x07),
        Some('b') => Some(0x08),
        Some('f') => Some(0x0C),
        Some('n') => Some(b'\n'),
        Some('r') => Some(b'\r'),
        Some('t') => Some(b'\t'),
        Some('v') => Some(0x0B),
        Some('\\') => Some(b'\\'),
        Some('\'') => Some(b'\''),
        Some('"') => Some(b'"'),
        Some('?') => Some(b'?'),
        _ => None,
    };
    if let Some(byte) = simple {
        out.push(byte);
        return Ok(());
    }

    match rune {
        Rune::Char(c @ '0'..='7', _) => {
            let mut code = c.to_digit(8).unwrap_or(0);
            for _ in 0..2 {
                let Some(digit) = scanner.peek_rune().char().and_then(|c| c.to_digit(8)) else {
                    break;
                };
                scanner.read_rune();
                code = code * 8 + digit;
            }
            if code > 0xFF {
                let text = &scanner.source()[start..scanner.offset()];
                return Err(LexError::new(DiagnosticKind::InvalidEscape, start, scanner.offset())
                    .detail(format!("octal escape `{text}` is out of range")));
            }
            out.push(code as u8);
            Ok(())
        }
        Rune::Char('x' | 'X', _) => {
            let (code, digits) = read_hex(scanner, 2);
            if digits == 0 {
                return Err(LexError::new(DiagnosticKind::InvalidEscape, start, scanner.offset())
                    .detail("`\\x` must be followed by a hex digit"));
            }
            out.push(code as u8);
            Ok(())
        }
        Rune::Char(u @ ('u' | 'U'), _) => {
            let want = if u == 'u' { 4 } else { 8 };
            let (code, digits) = read_hex(scanner, want);
            let text = &scanner.source()[start..scanner.offset()];
            if digits != want {
                return Err(LexError::new(DiagnosticKind::InvalidEscape, start, scanner.offset())
                    .detail(format!("`\\{u}` needs exactly {want} hex digits, found `{text}`")));
            }
            let Some(c) = char::from_u32(code) else {
                return Err(LexError::new(DiagnosticKind::InvalidEscape, start, scanner.offset())
                    .detail(format!("`{text}` is not a valid Unicode code point")));
            };
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            Ok(())
        }
        Rune::Char('\n', size) => {
            scanner.unread_rune(size);
            Err(LexError::new(DiagnosticKind::InvalidEscape, start, start + 1)
                .detail("backslash at end of line"))
        }
        Rune::Eof => Err(LexError::new(DiagnosticKind::InvalidEscape, start, start + 1)
            .detail("backslash at end of file")),
        Rune::Char(c, _) => Err(
            LexError::new(DiagnosticKind::InvalidEscape, start, scanner.offset())
                .detail(format!("`\\{c}`")),
        ),
    }
}

fn read_hex(scanner: &mut Scanner<'_>, max: usize) -> (u32, usize) {
    let mut code = 0u32;
    let mut digits = 0;
    while digits < max {
        let Some(digit) = scanner.peek_rune().char().and_then(|c| c.to_digit(16)) else {
            break;
        };
        scanner.read_rune();
        code = code.wrapping_mul(16).wrapping_add(digit);
        digits += 1;
    }
    (code, digits)
}

/// Classification of a numeric lexeme.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Number {
    Int(u64),
    Float(f64),
}

/// Decodes an integer or float lexeme. On error a best-effort value is
/// still returned so the parser can build a normal tree.
pub(crate) fn parse_number(text: &str, offset: usize) -> (Number, Option<LexError>) {
    let end = offset + text.len();
    let error = |kind, detail: String| Some(LexError::new(kind, offset, end).detail(detail));

    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if hex.is_empty() {
            return (
                Number::Int(0),
                error(DiagnosticKind::InvalidNumber, format!("`{text}` has no hex digits")),
            );
        }
        return match u64::from_str_radix(hex, 16) {
            Ok(value) => (Number::Int(value), None),
            Err(_) => (
                Number::Int(u64::MAX),
                error(DiagnosticKind::IntegerOverflow, format!("`{text}` does not fit in 64 bits")),
            ),
        };
    }

    let is_float = text.contains(['.', 'e', 'E']);
    if is_float {
        return match text.parse::<f64>() {
            Ok(value) => (Number::Float(value), None),
            Err(_) => (
                Number::Float(0.0),
                error(DiagnosticKind::InvalidNumber, format!("`{text}`")),
            ),
        };
    }

    if text.len() > 1 && text.starts_with('0') {
        let digits = &text[1..];
        if let Some(bad) = digits.chars().find(|c| !c.is_digit(8)) {
            let fallback = text.parse::<u64>().unwrap_or(u64::MAX);
            return (
                Number::Int(fallback),
                error(
                    DiagnosticKind::InvalidNumber,
                    format!("invalid digit `{bad}` in octal literal `{text}`"),
                ),
            );
        }
        return match u64::from_str_radix(digits, 8) {
            Ok(value) => (Number::Int(value), None),
            Err(_) => (
                Number::Int(u64::MAX),
                error(DiagnosticKind::IntegerOverflow, format!("`{text}` does not fit in 64 bits")),
            ),
        };
    }

    match text.parse::<u64>() {
        Ok(value) => (Number::Int(value), None),
        // Decimal overflow degrades to a float rather than failing.
        Err(_) => (Number::Float(text.parse::<f64>().unwrap_or(f64::INFINITY)), None),
    }
}
