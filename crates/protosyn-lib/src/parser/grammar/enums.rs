use crate::ast::{EnumElement, EnumNode, EnumValueNode};
use crate::diagnostics::DiagnosticKind;
use crate::lexer::{TokenKind, is_declaration_keyword};
use crate::parser::core::Parser;

impl Parser<'_, '_> {
    pub(super) fn parse_enum(&mut self) -> EnumNode {
        let keyword = self.keyword();
        if self.at_incomplete_decl() {
            self.report_incomplete("enum");
            return EnumNode {
                keyword,
                name: None,
                open: None,
                elements: Vec::new(),
                close: None,
            };
        }
        let name = self.parse_name();
        let body = self.parse_body("enum", Self::parse_enum_element, EnumElement::Error);
        EnumNode {
            keyword,
            name,
            open: body.open,
            elements: body.elements,
            close: body.close,
        }
    }

    /// A value named like a keyword (`option = 1;`) is still a value.
    fn parse_enum_element(&mut self) -> Option<EnumElement> {
        if self.current() == TokenKind::Rune(';') {
            return Some(EnumElement::Empty(self.parse_empty_decl()));
        }
        if self.current() != TokenKind::Ident {
            return None;
        }
        if self.nth_is_rune(1, '=') {
            return Some(EnumElement::Value(self.parse_enum_value()));
        }
        let word = self.current_text().to_string();
        let element = match word.as_str() {
            "option" => self.parse_option_element(),
            "reserved" => EnumElement::Reserved(self.parse_reserved()),
            w if is_declaration_keyword(w, self.dialect) => return None,
            _ => EnumElement::Value(self.parse_enum_value()),
        };
        Some(element)
    }

    /// `NAME = number [options];`
    fn parse_enum_value(&mut self) -> EnumValueNode {
        let name = self.ident();
        let equals = self.equals();
        let number = self.parse_int_value();
        if number.is_none() {
            self.error(DiagnosticKind::ExpectedInt);
        }
        let options = self.parse_compact_options();
        let semicolon = self.semicolon();
        EnumValueNode {
            name,
            equals,
            number,
            options,
            semicolon,
        }
    }
}
