use crate::ast::{
    ArrayLiteralNode, CompoundIdentNode, CompoundStringLiteralNode, ErrorNode, FieldReferenceNode,
    FloatLiteralNode, FloatValueNode, IdentValueNode, IntValueNode, MessageFieldNode,
    MessageLiteralNode, NegativeIntLiteralNode, Node, RuneNode, SignedFloatLiteralNode,
    SpecialFloatLiteralNode, StringValueNode, ValueNode,
};
use crate::diagnostics::DiagnosticKind;
use crate::lexer::{LexValue, TokenKind};
use crate::parser::core::Parser;

impl Parser<'_, '_> {
    /// The right-hand side of an option. Reports and consumes nothing when
    /// no value starts here.
    pub(super) fn parse_value(&mut self) -> Option<ValueNode> {
        let value = match self.peek() {
            TokenKind::String => ValueNode::String(self.parse_string_value()?),
            TokenKind::Int => ValueNode::Int(IntValueNode::Uint(self.parse_uint()?)),
            TokenKind::Float => ValueNode::Float(FloatValueNode::Float(self.parse_float_literal())),
            TokenKind::Ident | TokenKind::QualifiedIdent => {
                ValueNode::Ident(self.parse_ident_value()?)
            }
            TokenKind::Rune('-' | '+') => self.parse_signed_value(),
            TokenKind::Rune('[') => ValueNode::Array(self.parse_array_literal()),
            TokenKind::Rune('{' | '<') => ValueNode::Message(self.parse_message_literal()),
            // Already reported by the lexer.
            TokenKind::Error => {
                let token = self.bump().token;
                ValueNode::Error(ErrorNode {
                    first: token,
                    last: token,
                })
            }
            _ => {
                self.error(DiagnosticKind::ExpectedValue);
                return None;
            }
        };
        Some(value)
    }

    /// One or more adjacent string literals.
    pub(super) fn parse_string_value(&mut self) -> Option<StringValueNode> {
        if self.peek() != TokenKind::String {
            return None;
        }
        let first = self.parse_string_literal();
        if self.peek() != TokenKind::String {
            return Some(StringValueNode::Single(first));
        }
        let mut parts = vec![first];
        while self.peek() == TokenKind::String {
            parts.push(self.parse_string_literal());
        }
        Some(StringValueNode::Compound(CompoundStringLiteralNode { parts }))
    }

    /// `5` or `-5`. Consumes nothing otherwise.
    pub(super) fn parse_int_value(&mut self) -> Option<IntValueNode> {
        match self.peek() {
            TokenKind::Int => self.parse_uint().map(IntValueNode::Uint),
            TokenKind::Rune('-') if self.nth(1) == TokenKind::Int => {
                let minus = self.rune();
                let uint = self.parse_uint()?;
                Some(IntValueNode::Negative(NegativeIntLiteralNode { minus, uint }))
            }
            _ => None,
        }
    }

    fn parse_float_literal(&mut self) -> FloatLiteralNode {
        let token = self.bump();
        let value = match token.value {
            LexValue::Float(v) => v,
            LexValue::Int(v) => v as f64,
            _ => 0.0,
        };
        FloatLiteralNode {
            token: token.token,
            value,
        }
    }

    /// `-5`, `-1.5`, `+1.5`, `-inf`. A `+` in front of an integer yields a
    /// float: the text format has no signed positive integers.
    fn parse_signed_value(&mut self) -> ValueNode {
        let sign = self.rune();
        let float = match self.peek() {
            TokenKind::Int if sign.rune == '-' => {
                return match self.parse_uint() {
                    Some(uint) => ValueNode::Int(IntValueNode::Negative(NegativeIntLiteralNode {
                        minus: sign,
                        uint,
                    })),
                    None => lone_sign(&sign),
                };
            }
            TokenKind::Int | TokenKind::Float => FloatValueNode::Float(self.parse_float_literal()),
            TokenKind::Ident if is_special_float(self.current_text()) => {
                let keyword = self.keyword();
                FloatValueNode::Special(SpecialFloatLiteralNode { keyword })
            }
            _ => {
                self.error(DiagnosticKind::ExpectedValue);
                return lone_sign(&sign);
            }
        };
        ValueNode::Float(FloatValueNode::Signed(SignedFloatLiteralNode {
            sign,
            float: Box::new(float),
        }))
    }

    /// `[a, b, c]`
    fn parse_array_literal(&mut self) -> ArrayLiteralNode {
        let open = self.rune();
        let open_range = self.prev_range();
        let mut array = ArrayLiteralNode {
            open,
            elements: Vec::new(),
            commas: Vec::new(),
            close: None,
        };
        if !self.enter_recursion() {
            return array;
        }
        self.push_delimiter('[', open_range);

        array.close = loop {
            if self.at_rune(']') {
                break Some(self.rune());
            }
            if self.should_stop() {
                break self.close_delimiter(DiagnosticKind::UnclosedList, "array");
            }
            let Some(element) = self.parse_value() else {
                break self.close_delimiter(DiagnosticKind::UnclosedList, "array");
            };
            array.elements.push(element);
            match self.comma() {
                Some(comma) => array.commas.push(comma),
                None => {
                    break self.close_delimiter(DiagnosticKind::UnclosedList, "array");
                }
            }
        };

        self.pop_delimiter();
        self.exit_recursion();
        array
    }

    /// `{ name: value ... }` or `< ... >`. Separators between fields are
    /// optional, as is the `:` before a nested literal.
    fn parse_message_literal(&mut self) -> MessageLiteralNode {
        let open = self.rune();
        let closing = if open.rune == '<' { '>' } else { '}' };
        let open_range = self.prev_range();
        let mut literal = MessageLiteralNode {
            open,
            fields: Vec::new(),
            close: None,
        };
        if !self.enter_recursion() {
            return literal;
        }
        self.push_delimiter(literal.open.rune, open_range);

        literal.close = loop {
            if self.at_rune(closing) {
                break Some(self.rune());
            }
            if self.should_stop() && !self.at_eof() {
                break None;
            }
            match self.parse_message_field() {
                Some(field) => literal.fields.push(field),
                None => {
                    self.error_unclosed_delimiter(
                        DiagnosticKind::UnclosedLiteral,
                        format!("expected a field name or `{closing}`"),
                        "literal opened here",
                    );
                    break None;
                }
            }
        };

        self.pop_delimiter();
        self.exit_recursion();
        literal
    }

    fn parse_message_field(&mut self) -> Option<MessageFieldNode> {
        let name = self.parse_literal_field_name()?;
        let colon = self.eat_rune(':');
        if colon.is_none() && !matches!(self.peek(), TokenKind::Rune('{' | '<')) {
            self.error_msg(DiagnosticKind::ExpectedToken, "`:`");
        }
        let value = self.parse_value();
        let separator = match self.peek() {
            TokenKind::Rune(',' | ';') => Some(self.rune()),
            _ => None,
        };
        Some(MessageFieldNode {
            name,
            colon,
            value,
            separator,
        })
    }

    /// `name`, `[ext.name]` or `[type.url/pkg.Msg]`.
    fn parse_literal_field_name(&mut self) -> Option<FieldReferenceNode> {
        match self.peek() {
            TokenKind::Ident => Some(FieldReferenceNode {
                open: None,
                name: IdentValueNode::Ident(self.ident()),
                close: None,
            }),
            TokenKind::Rune('[') if self.nth_is_name(1) => {
                let open = self.rune();
                let name = self.parse_type_url()?;
                let close = self.expect_rune(']');
                Some(FieldReferenceNode {
                    open: Some(open),
                    name,
                    close,
                })
            }
            _ => None,
        }
    }

    /// A name inside `[...]`, possibly a type URL with `/` separators.
    fn parse_type_url(&mut self) -> Option<IdentValueNode> {
        let head = self.parse_ident_value()?;
        if self.peek() != TokenKind::Rune('/') {
            return Some(head);
        }
        let first = head.start();
        let mut value = head.as_str().to_string();
        let mut last = head.end();
        while self.peek() == TokenKind::Rune('/') && self.nth_is_name(1) {
            self.bump();
            let segment = self.bump();
            value.push('/');
            value.push_str(&segment.text);
            last = segment.token;
        }
        Some(IdentValueNode::Compound(CompoundIdentNode { first, last, value }))
    }
}

fn is_special_float(text: &str) -> bool {
    ["inf", "infinity", "nan"]
        .iter()
        .any(|s| text.eq_ignore_ascii_case(s))
}

fn lone_sign(sign: &RuneNode) -> ValueNode {
    ValueNode::Error(ErrorNode {
        first: sign.token,
        last: sign.token,
    })
}
