use crate::ast::{RpcElement, RpcNode, RpcTypeNode, ServiceElement, ServiceNode};
use crate::diagnostics::DiagnosticKind;
use crate::lexer::TokenKind;
use crate::parser::core::Parser;

impl Parser<'_, '_> {
    pub(super) fn parse_service(&mut self) -> ServiceNode {
        let keyword = self.keyword();
        if self.at_incomplete_decl() {
            self.report_incomplete("service");
            return ServiceNode {
                keyword,
                name: None,
                open: None,
                elements: Vec::new(),
                close: None,
            };
        }
        let name = self.parse_name();
        let body = self.parse_body("service", Self::parse_service_element, ServiceElement::Error);
        ServiceNode {
            keyword,
            name,
            open: body.open,
            elements: body.elements,
            close: body.close,
        }
    }

    fn parse_service_element(&mut self) -> Option<ServiceElement> {
        match self.current() {
            TokenKind::Rune(';') => Some(ServiceElement::Empty(self.parse_empty_decl())),
            TokenKind::Ident if self.at_keyword("option") => Some(self.parse_option_element()),
            TokenKind::Ident if self.at_keyword("rpc") => {
                Some(ServiceElement::Rpc(self.parse_rpc()))
            }
            _ => None,
        }
    }

    /// `rpc Name(Req) returns (Resp);` or with a `{ option ...; }` body.
    fn parse_rpc(&mut self) -> RpcNode {
        let keyword = self.keyword();
        let name = self.parse_name();
        let input = self.parse_rpc_type();
        let returns = if self.peek_keyword("returns") {
            Some(self.keyword())
        } else {
            self.error_msg(DiagnosticKind::ExpectedToken, "`returns`");
            None
        };
        let output = self.parse_rpc_type();

        let mut rpc = RpcNode {
            keyword,
            name,
            input,
            returns,
            output,
            semicolon: None,
            open: None,
            elements: Vec::new(),
            close: None,
        };
        if self.peek() == TokenKind::Rune('{') {
            let body = self.parse_body("rpc", Self::parse_rpc_element, RpcElement::Error);
            rpc.open = body.open;
            rpc.elements = body.elements;
            rpc.close = body.close;
        } else {
            rpc.semicolon = self.semicolon();
        }
        rpc
    }

    fn parse_rpc_element(&mut self) -> Option<RpcElement> {
        match self.current() {
            TokenKind::Rune(';') => Some(RpcElement::Empty(self.parse_empty_decl())),
            TokenKind::Ident if self.at_keyword("option") => Some(self.parse_option_element()),
            _ => None,
        }
    }

    /// `(stream pkg.Msg)`
    fn parse_rpc_type(&mut self) -> Option<RpcTypeNode> {
        let open = self.expect_rune('(')?;
        let open_range = self.prev_range();
        self.push_delimiter('(', open_range);
        let stream = (self.peek_keyword("stream") && self.nth_is_name(1)).then(|| self.keyword());
        let message_type = self.parse_type_name();
        let close = self.close_delimiter(DiagnosticKind::UnclosedParen, "rpc type");
        self.pop_delimiter();
        Some(RpcTypeNode {
            open,
            stream,
            message_type,
            close,
        })
    }
}
