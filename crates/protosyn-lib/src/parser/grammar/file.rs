use rowan::TextRange;

use crate::ast::{
    EditionNode, FileElement, FileHeader, ImportNode, PackageNode, RuneNode, SyntaxNode,
};
use crate::diagnostics::DiagnosticKind;
use crate::lexer::TokenKind;
use crate::parser::core::Parser;

impl Parser<'_, '_> {
    /// `header? element* EOF`. Whatever is left once parsing stopped early
    /// becomes one trailing error element, so the tree covers every token.
    pub(crate) fn parse_file(&mut self) -> (Option<FileHeader>, Vec<FileElement>, RuneNode) {
        let header = self.parse_header();
        let mut elements = Vec::new();

        while !self.should_stop() {
            self.skip_inferred();
            if let Some(element) = self.parse_file_element() {
                elements.push(element);
            } else if let Some(junk) = self.junk() {
                elements.push(FileElement::Error(junk));
            }
        }
        if let Some(rest) = self.skip_rest() {
            elements.push(FileElement::Error(rest));
        }

        (header, elements, self.eof_node())
    }

    /// `syntax = "proto3";` or `edition = "2023";`
    fn parse_header(&mut self) -> Option<FileHeader> {
        let is_syntax = self.at_keyword("syntax");
        if !(is_syntax || self.at_keyword("edition")) {
            return None;
        }
        if !matches!(self.nth(1), TokenKind::Rune('=') | TokenKind::String) {
            return None;
        }

        let keyword = self.keyword();
        let equals = self.expect_rune('=');
        let value_start = self.current_range().start();
        let value = self.parse_string_value();
        match &value {
            None => self.error(DiagnosticKind::ExpectedString),
            Some(v) if is_syntax => {
                let text = v.to_string_lossy();
                if !matches!(text.as_str(), "proto2" | "proto3") {
                    let range = TextRange::new(value_start, self.prev_range().end());
                    self.error_at(DiagnosticKind::UnknownSyntax, range, format!("`{text}`"));
                }
            }
            Some(_) => {}
        }
        let semicolon = self.semicolon();

        Some(if is_syntax {
            FileHeader::Syntax(SyntaxNode {
                keyword,
                equals,
                value,
                semicolon,
            })
        } else {
            FileHeader::Edition(EditionNode {
                keyword,
                equals,
                value,
                semicolon,
            })
        })
    }

    fn parse_file_element(&mut self) -> Option<FileElement> {
        let element = match self.current() {
            TokenKind::Rune(';') => FileElement::Empty(self.parse_empty_decl()),
            TokenKind::Ident => match self.current_text().to_string().as_str() {
                "import" => FileElement::Import(self.parse_import()),
                "package" => FileElement::Package(self.parse_package()),
                "option" => self.parse_option_element(),
                "message" => FileElement::Message(self.parse_message()),
                "enum" => FileElement::Enum(self.parse_enum()),
                "extend" => FileElement::Extend(self.parse_extend()),
                "service" => FileElement::Service(self.parse_service()),
                _ => return None,
            },
            _ => return None,
        };
        Some(element)
    }

    /// `import ("public" | "weak")? "path";`
    fn parse_import(&mut self) -> ImportNode {
        let keyword = self.keyword();
        let modifier = (self.peek_keyword("public") || self.peek_keyword("weak"))
            .then(|| self.keyword());
        let name = self.parse_string_value();
        if name.is_none() {
            self.error(DiagnosticKind::ExpectedString);
        }
        let semicolon = self.semicolon();
        ImportNode {
            keyword,
            modifier,
            name,
            semicolon,
        }
    }

    fn parse_package(&mut self) -> PackageNode {
        let keyword = self.keyword();
        let name = self.parse_ident_value();
        if name.is_none() {
            self.error(DiagnosticKind::ExpectedIdent);
        }
        let semicolon = self.semicolon();
        PackageNode {
            keyword,
            name,
            semicolon,
        }
    }
}
