//! Grammar productions, one file per area of the language.
//!
//! Productions never fail: a missing piece is reported and left `None`, and
//! whatever a body cannot place becomes an `ErrorNode` element. Each
//! element production either consumes at least one token or returns `None`
//! without touching the cursor.

mod enums;
mod file;
mod message;
mod options;
mod service;
mod values;

use rowan::TextRange;

use crate::ast::{
    CompoundIdentNode, EmptyDeclNode, ErrorNode, IdentNode, IdentValueNode, RuneNode,
    StringLiteralNode, UintLiteralNode,
};
use crate::diagnostics::{DiagnosticKind, ExtendedSyntaxCategory};
use crate::lexer::{LexValue, TokenKind, TokenSet};

use super::core::Parser;

/// Tokens that can begin a name in type or value position.
const NAME_START: TokenSet = TokenSet::new(&[TokenKind::Ident, TokenKind::QualifiedIdent]);

/// Tokens that can begin an option value.
const VALUE_START: TokenSet = TokenSet::new(&[
    TokenKind::Ident,
    TokenKind::QualifiedIdent,
    TokenKind::String,
    TokenKind::Int,
    TokenKind::Float,
    TokenKind::Rune('-'),
    TokenKind::Rune('+'),
    TokenKind::Rune('['),
    TokenKind::Rune('{'),
    TokenKind::Rune('<'),
]);

/// `{ element* }` of a declaration.
pub(super) struct Body<E> {
    pub open: Option<RuneNode>,
    pub elements: Vec<E>,
    pub close: Option<RuneNode>,
}

impl<E> Body<E> {
    fn missing() -> Self {
        Self {
            open: None,
            elements: Vec::new(),
            close: None,
        }
    }
}

impl Parser<'_, '_> {
    /// Parses a braced body. `what` names the declaration for the unclosed
    /// diagnostic; tokens `element` rejects are wrapped by `error`.
    pub(super) fn parse_body<E>(
        &mut self,
        what: &str,
        element: fn(&mut Self) -> Option<E>,
        error: fn(ErrorNode) -> E,
    ) -> Body<E> {
        let Some(open) = self.expect_rune('{') else {
            return Body::missing();
        };
        let mut body = Body {
            open: Some(open),
            elements: Vec::new(),
            close: None,
        };
        if !self.enter_recursion() {
            return body;
        }
        let open_range = self.prev_range();
        self.push_delimiter('{', open_range);

        loop {
            self.skip_inferred();
            if self.at_rune('}') {
                body.close = Some(self.rune());
                break;
            }
            if self.should_stop() {
                if self.at_eof() {
                    self.error_unclosed_delimiter(
                        DiagnosticKind::UnclosedBody,
                        format!("{what} body"),
                        "body opened here",
                    );
                }
                break;
            }
            if let Some(element) = element(self) {
                body.elements.push(element);
            } else if let Some(junk) = self.junk() {
                body.elements.push(error(junk));
            }
        }

        self.pop_delimiter();
        self.exit_recursion();
        body
    }

    /// Takes the rune closing the innermost open delimiter, or reports it
    /// missing with a pointer back at the opening one.
    pub(super) fn close_delimiter(&mut self, kind: DiagnosticKind, what: &str) -> Option<RuneNode> {
        let open = self.delimiter_stack.last().copied()?;
        if let Some(close) = self.eat_rune(open.closing()) {
            return Some(close);
        }
        self.error_unclosed_delimiter(kind, what, format!("{what} opened here"));
        None
    }

    /// Within-statement keyword check; never looks past an inferred end.
    pub(super) fn peek_keyword(&self, keyword: &str) -> bool {
        !self.at_inferred_end() && self.at_keyword(keyword)
    }

    /// A declaration keyword followed by nothing usable is reported as an
    /// incomplete declaration.
    pub(super) fn at_incomplete_decl(&self) -> bool {
        self.at_inferred_end() || self.at_eof() || self.at_rune('}')
    }

    pub(super) fn report_incomplete(&mut self, keyword: &str) {
        let range = self.prev_range();
        self.extended(
            ExtendedSyntaxCategory::IncompleteDecl,
            range,
            Some(format!("`{keyword}` declaration")),
        );
    }

    /// A plain identifier, reported when missing.
    pub(super) fn parse_name(&mut self) -> Option<IdentNode> {
        if self.peek() == TokenKind::Ident {
            return Some(self.ident());
        }
        self.error(DiagnosticKind::ExpectedIdent);
        None
    }

    /// A possibly dotted name. A name written with whitespace around its
    /// dots is joined into one node and reported.
    pub(super) fn parse_ident_value(&mut self) -> Option<IdentValueNode> {
        if !NAME_START.contains(self.peek()) {
            return None;
        }
        let first = self.bump();
        let mut value = first.text.clone();
        let mut last = first.token;
        let mut spaced = false;

        loop {
            // Raw neighbours only: a virtual token in between ends the name.
            let after = self.tokens.get(self.pos + 1);
            let Some(next) = self.tokens.get(self.pos) else {
                break;
            };
            match next.kind {
                TokenKind::Rune('.')
                    if after
                        .is_some_and(|t| NAME_START.contains(t.kind) && !t.text.starts_with('.')) =>
                {
                    value.push('.');
                    self.bump();
                }
                TokenKind::QualifiedIdent if next.text.starts_with('.') => {}
                _ => break,
            }
            let part = self.bump();
            value.push_str(&part.text);
            last = part.token;
            spaced = true;
        }

        if spaced {
            let start = first.range.start();
            let end = self.prev_range().end();
            self.error_at(
                DiagnosticKind::SpacedQualifiedName,
                TextRange::new(start, end),
                format!("`{value}`"),
            );
            return Some(IdentValueNode::Compound(CompoundIdentNode {
                first: first.token,
                last,
                value,
            }));
        }
        Some(match first.kind {
            TokenKind::Ident => IdentValueNode::Ident(IdentNode {
                token: first.token,
                value,
            }),
            _ => IdentValueNode::Compound(CompoundIdentNode::single(first.token, value)),
        })
    }

    /// A type reference, reported when missing.
    pub(super) fn parse_type_name(&mut self) -> Option<IdentValueNode> {
        let name = self.parse_ident_value();
        if name.is_none() {
            self.error(DiagnosticKind::ExpectedType);
        }
        name
    }

    /// `=`, or a `:` written in its place.
    pub(super) fn equals(&mut self) -> Option<RuneNode> {
        if self.peek() == TokenKind::Rune(':') && VALUE_START.contains(self.nth(1)) {
            let range = self.current_range();
            self.extended(
                ExtendedSyntaxCategory::WrongToken,
                range,
                Some("expected `=`, found `:`".to_string()),
            );
            return Some(self.rune());
        }
        self.expect_rune('=')
    }

    /// One string literal token.
    pub(super) fn parse_string_literal(&mut self) -> StringLiteralNode {
        self.assert_current(TokenKind::String);
        let token = self.bump();
        let value = match token.value {
            LexValue::Str(bytes) => bytes,
            _ => token.text.into_bytes(),
        };
        StringLiteralNode {
            token: token.token,
            value,
        }
    }

    /// An unsigned integer such as a field number, reported when missing.
    pub(super) fn parse_uint(&mut self) -> Option<UintLiteralNode> {
        if self.peek() == TokenKind::Int {
            let token = self.bump();
            let value = match token.value {
                LexValue::Int(v) => v,
                _ => 0,
            };
            return Some(UintLiteralNode {
                token: token.token,
                value,
            });
        }
        self.error(DiagnosticKind::ExpectedInt);
        None
    }

    /// Consumes a lone `;` as an empty declaration.
    pub(super) fn parse_empty_decl(&mut self) -> EmptyDeclNode {
        let semicolon = self.rune();
        if self.is_extended_syntax() {
            let range = self.prev_range();
            self.extended(ExtendedSyntaxCategory::EmptyDecl, range, None);
        }
        EmptyDeclNode { semicolon }
    }
}
