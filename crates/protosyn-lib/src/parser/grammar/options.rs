use crate::ast::{
    CompactOptionsNode, CompoundIdentNode, ErrorNode, FieldReferenceNode, IdentValueNode,
    OptionNameNode, OptionNode,
};
use crate::diagnostics::DiagnosticKind;
use crate::lexer::TokenKind;
use crate::parser::core::Parser;

impl Parser<'_, '_> {
    /// An `option` statement as an element of whatever body it appears in.
    pub(super) fn parse_option_element<E>(&mut self) -> E
    where
        E: From<OptionNode> + From<ErrorNode>,
    {
        match self.parse_option() {
            Ok(option) => option.into(),
            Err(error) => error.into(),
        }
    }

    /// `option name = value;`. Without a name there is nothing to hang the
    /// rest on, so the statement becomes an error node.
    fn parse_option(&mut self) -> Result<OptionNode, ErrorNode> {
        let keyword = self.keyword();
        let Some(name) = self.parse_option_name() else {
            self.error(DiagnosticKind::ExpectedOptionName);
            return Err(self.abandon(keyword.token));
        };
        let equals = self.equals();
        let value = self.parse_value();
        let semicolon = self.semicolon();
        Ok(OptionNode {
            keyword: Some(keyword),
            name,
            equals,
            value,
            semicolon,
        })
    }

    /// `[name = value, ...]` after a field, enum value or extension range.
    pub(super) fn parse_compact_options(&mut self) -> Option<CompactOptionsNode> {
        if self.peek() != TokenKind::Rune('[') {
            return None;
        }
        let open = self.rune();
        let open_range = self.prev_range();
        self.push_delimiter('[', open_range);
        let mut options = Vec::new();
        let mut commas = Vec::new();

        let close = loop {
            if self.at_rune(']') {
                if options.len() == commas.len() {
                    self.error(DiagnosticKind::ExpectedOptionName);
                }
                break Some(self.rune());
            }
            let Some(name) = self.parse_option_name() else {
                self.error(DiagnosticKind::ExpectedOptionName);
                break None;
            };
            let equals = self.equals();
            let value = self.parse_value();
            options.push(OptionNode {
                keyword: None,
                name,
                equals,
                value,
                semicolon: None,
            });
            match self.comma() {
                Some(comma) => commas.push(comma),
                None => {
                    break self.close_delimiter(DiagnosticKind::UnclosedList, "compact options");
                }
            }
        };
        self.pop_delimiter();

        Some(CompactOptionsNode {
            open,
            options,
            commas,
            close,
        })
    }

    /// `a.(b.c).d`
    fn parse_option_name(&mut self) -> Option<OptionNameNode> {
        let mut parts = vec![self.parse_field_ref()?];
        let mut dots = Vec::new();
        while self.peek() == TokenKind::Rune('.') && self.starts_field_ref(1) {
            let dot = self.rune();
            let Some(part) = self.parse_field_ref() else {
                break;
            };
            dots.push(dot);
            parts.push(part);
        }
        Some(OptionNameNode { parts, dots })
    }

    fn starts_field_ref(&self, n: usize) -> bool {
        match self.nth(n) {
            TokenKind::Ident | TokenKind::QualifiedIdent | TokenKind::ExtensionIdent => true,
            TokenKind::Rune('(') => self.nth_is_name(n + 1),
            _ => false,
        }
    }

    /// One component of an option name. Consumes nothing unless a whole
    /// reference follows.
    fn parse_field_ref(&mut self) -> Option<FieldReferenceNode> {
        if self.at_inferred_end() || !self.starts_field_ref(0) {
            return None;
        }
        if self.current() == TokenKind::ExtensionIdent {
            let token = self.bump();
            let name = CompoundIdentNode::single(token.token, token.text);
            return Some(FieldReferenceNode {
                open: None,
                name: IdentValueNode::Compound(name),
                close: None,
            });
        }
        let open = self.eat_rune('(');
        let name = self.parse_ident_value()?;
        let close = match &open {
            Some(_) => self.expect_rune(')'),
            None => None,
        };
        Some(FieldReferenceNode { open, name, close })
    }
}
