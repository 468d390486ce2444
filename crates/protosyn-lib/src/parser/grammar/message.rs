use crate::Dialect;
use crate::ast::{
    ErrorNode, ExtendElement, ExtendNode, ExtensionRangeNode, FieldNode, GroupNode, IdentValueNode,
    KeywordNode, MapFieldNode, MapTypeNode, MessageElement, MessageNode, OneofElement, OneofNode,
    RangeEnd, RangeNode, ReservedElement, ReservedNode,
};
use crate::diagnostics::DiagnosticKind;
use crate::lexer::{TokenKind, is_declaration_keyword};
use crate::parser::core::Parser;

impl Parser<'_, '_> {
    pub(super) fn parse_message(&mut self) -> MessageNode {
        let keyword = self.keyword();
        if self.at_incomplete_decl() {
            self.report_incomplete("message");
            return MessageNode {
                keyword,
                name: None,
                open: None,
                elements: Vec::new(),
                close: None,
            };
        }
        let name = self.parse_name();
        let body = self.parse_body("message", Self::parse_message_element, MessageElement::Error);
        MessageNode {
            keyword,
            name,
            open: body.open,
            elements: body.elements,
            close: body.close,
        }
    }

    fn parse_message_element(&mut self) -> Option<MessageElement> {
        let element = match self.current() {
            TokenKind::Rune(';') => MessageElement::Empty(self.parse_empty_decl()),
            TokenKind::Ident => {
                let word = self.current_text().to_string();
                match word.as_str() {
                    "option" => self.parse_option_element(),
                    "message" if !self.looks_like_field() => {
                        MessageElement::Message(self.parse_message())
                    }
                    "enum" if !self.looks_like_field() => MessageElement::Enum(self.parse_enum()),
                    "extend" if !self.looks_like_field() => {
                        MessageElement::Extend(self.parse_extend())
                    }
                    "oneof" if !self.looks_like_field() => {
                        MessageElement::Oneof(self.parse_oneof())
                    }
                    "extensions" if !self.looks_like_field() => {
                        MessageElement::ExtensionRange(self.parse_extension_range())
                    }
                    "reserved" if !self.looks_like_field() => {
                        MessageElement::Reserved(self.parse_reserved())
                    }
                    "map" if self.nth_is_rune(1, '<') => {
                        MessageElement::MapField(self.parse_map_field())
                    }
                    // Belongs elsewhere; left for the caller to report.
                    w if is_misplaced_keyword(w, self.dialect) && !self.looks_like_field() => {
                        return None;
                    }
                    _ => return self.parse_field_decl(),
                }
            }
            TokenKind::QualifiedIdent => return self.parse_field_decl(),
            _ => return None,
        };
        Some(element)
    }

    /// A keyword in front of `name =` is a field type, not a declaration.
    fn looks_like_field(&self) -> bool {
        self.nth_is_name(1) && self.nth_is_rune(2, '=')
    }

    fn at_label(&self) -> bool {
        let is_label = self.nth_token(0).is_some_and(|t| {
            t.kind == TokenKind::Ident
                && matches!(t.text.as_str(), "optional" | "required" | "repeated")
        });
        is_label && self.nth_is_name(1) && !self.looks_like_field()
    }

    fn at_group(&self) -> bool {
        self.dialect != Dialect::Proto3
            && self.peek_keyword("group")
            && self.nth(1) == TokenKind::Ident
    }

    /// A field or group, with or without a label. Consumes nothing and
    /// returns `None` when neither starts here.
    fn parse_field_decl<E>(&mut self) -> Option<E>
    where
        E: From<FieldNode> + From<GroupNode> + From<ErrorNode>,
    {
        let label = self.at_label().then(|| self.keyword());
        if self.at_group() {
            return Some(self.parse_group(label).into());
        }
        let Some(field_type) = self.parse_type_name() else {
            return label.map(|label| self.abandon(label.token).into());
        };
        Some(self.parse_field(label, field_type).into())
    }

    /// `label? type name = tag [options];` once the type is known.
    fn parse_field(&mut self, label: Option<KeywordNode>, field_type: IdentValueNode) -> FieldNode {
        let name = self.parse_name();
        let equals = self.equals();
        let tag = self.parse_uint();
        let options = self.parse_compact_options();
        let semicolon = self.semicolon();
        FieldNode {
            label,
            field_type,
            name,
            equals,
            tag,
            options,
            semicolon,
        }
    }

    fn parse_group(&mut self, label: Option<KeywordNode>) -> GroupNode {
        let keyword = self.keyword();
        let name = self.parse_name();
        let equals = self.equals();
        let tag = self.parse_uint();
        let options = self.parse_compact_options();
        let body = self.parse_body("group", Self::parse_message_element, MessageElement::Error);
        GroupNode {
            label,
            keyword,
            name,
            equals,
            tag,
            options,
            open: body.open,
            elements: body.elements,
            close: body.close,
        }
    }

    fn parse_oneof(&mut self) -> OneofNode {
        let keyword = self.keyword();
        if self.at_incomplete_decl() {
            self.report_incomplete("oneof");
            return OneofNode {
                keyword,
                name: None,
                open: None,
                elements: Vec::new(),
                close: None,
            };
        }
        let name = self.parse_name();
        let body = self.parse_body("oneof", Self::parse_oneof_element, OneofElement::Error);
        OneofNode {
            keyword,
            name,
            open: body.open,
            elements: body.elements,
            close: body.close,
        }
    }

    fn parse_oneof_element(&mut self) -> Option<OneofElement> {
        match self.current() {
            TokenKind::Rune(';') => Some(OneofElement::Empty(self.parse_empty_decl())),
            TokenKind::Ident if self.at_keyword("option") && !self.looks_like_field() => {
                Some(self.parse_option_element())
            }
            TokenKind::Ident
                if is_declaration_keyword(self.current_text(), self.dialect)
                    && !self.at_label()
                    && !self.at_group()
                    && !self.looks_like_field() =>
            {
                None
            }
            TokenKind::Ident | TokenKind::QualifiedIdent => self.parse_field_decl(),
            _ => None,
        }
    }

    fn parse_map_field(&mut self) -> MapFieldNode {
        let map_type = self.parse_map_type();
        let name = self.parse_name();
        let equals = self.equals();
        let tag = self.parse_uint();
        let options = self.parse_compact_options();
        let semicolon = self.semicolon();
        MapFieldNode {
            map_type,
            name,
            equals,
            tag,
            options,
            semicolon,
        }
    }

    /// `map<key, value>`
    fn parse_map_type(&mut self) -> MapTypeNode {
        let keyword = self.keyword();
        let open = self.expect_rune('<');
        let key_type = self.parse_type_name();
        let comma = self.expect_rune(',');
        let value_type = self.parse_type_name();
        let close = self.expect_rune('>');
        MapTypeNode {
            keyword,
            open,
            key_type,
            comma,
            value_type,
            close,
        }
    }

    fn parse_extension_range(&mut self) -> ExtensionRangeNode {
        let keyword = self.keyword();
        let mut ranges = Vec::new();
        let mut commas = Vec::new();
        loop {
            let Some(range) = self.parse_range() else {
                self.error(DiagnosticKind::ExpectedInt);
                break;
            };
            ranges.push(range);
            match self.eat_rune(',') {
                Some(comma) => commas.push(comma),
                None => break,
            }
        }
        let options = self.parse_compact_options();
        let semicolon = self.semicolon();
        ExtensionRangeNode {
            keyword,
            ranges,
            commas,
            options,
            semicolon,
        }
    }

    /// `reserved 1, 5 to 9;`, `reserved "a", "b";` or, in editions,
    /// `reserved a, b;`
    pub(super) fn parse_reserved(&mut self) -> ReservedNode {
        let keyword = self.keyword();
        let mut elements = Vec::new();
        let mut commas = Vec::new();
        loop {
            let element = match self.peek() {
                TokenKind::String => self.parse_string_value().map(ReservedElement::Name),
                TokenKind::Ident => Some(ReservedElement::Ident(self.ident())),
                _ => self.parse_range().map(ReservedElement::Range),
            };
            let Some(element) = element else {
                self.error(DiagnosticKind::ExpectedInt);
                break;
            };
            elements.push(element);
            match self.eat_rune(',') {
                Some(comma) => commas.push(comma),
                None => break,
            }
        }
        let semicolon = self.semicolon();
        ReservedNode {
            keyword,
            elements,
            commas,
            semicolon,
        }
    }

    /// `5`, `5 to 10` or `5 to max`.
    fn parse_range(&mut self) -> Option<RangeNode> {
        let from = self.parse_int_value()?;
        if !self.peek_keyword("to") {
            return Some(RangeNode {
                from,
                to_keyword: None,
                to: None,
            });
        }
        let to_keyword = self.keyword();
        let to = if self.peek_keyword("max") {
            Some(RangeEnd::Max(self.keyword()))
        } else {
            let end = self.parse_int_value().map(RangeEnd::Int);
            if end.is_none() {
                self.error(DiagnosticKind::ExpectedInt);
            }
            end
        };
        Some(RangeNode {
            from,
            to_keyword: Some(to_keyword),
            to,
        })
    }

    pub(super) fn parse_extend(&mut self) -> ExtendNode {
        let keyword = self.keyword();
        if self.at_incomplete_decl() {
            self.report_incomplete("extend");
            return ExtendNode {
                keyword,
                extendee: None,
                open: None,
                elements: Vec::new(),
                close: None,
            };
        }
        let extendee = self.parse_type_name();
        let body = self.parse_body("extend", Self::parse_extend_element, ExtendElement::Error);
        ExtendNode {
            keyword,
            extendee,
            open: body.open,
            elements: body.elements,
            close: body.close,
        }
    }

    fn parse_extend_element(&mut self) -> Option<ExtendElement> {
        match self.current() {
            TokenKind::Rune(';') => Some(ExtendElement::Empty(self.parse_empty_decl())),
            TokenKind::Ident
                if is_declaration_keyword(self.current_text(), self.dialect)
                    && !self.at_label()
                    && !self.at_group()
                    && !self.looks_like_field() =>
            {
                None
            }
            TokenKind::Ident | TokenKind::QualifiedIdent => self.parse_field_decl(),
            _ => None,
        }
    }
}

/// Declaration keywords with no meaning inside a message body. Labels,
/// `group` and `map` lead into fields and are handled there.
fn is_misplaced_keyword(word: &str, dialect: Dialect) -> bool {
    is_declaration_keyword(word, dialect)
        && !matches!(word, "optional" | "required" | "repeated" | "group" | "map")
}
