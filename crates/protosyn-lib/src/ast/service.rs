use super::{EmptyDeclNode, ErrorNode, IdentNode, IdentValueNode, KeywordNode, OptionNode, RuneNode};

ast_node! {
    pub struct ServiceNode: Service {
        keyword: one KeywordNode,
        name: opt IdentNode,
        open: opt RuneNode,
        elements: list ServiceElement,
        close: opt RuneNode,
    }
}

impl ServiceNode {
    pub fn rpcs(&self) -> impl Iterator<Item = &RpcNode> {
        self.elements.iter().filter_map(|e| match e {
            ServiceElement::Rpc(r) => Some(r),
            _ => None,
        })
    }
}

ast_union! {
    pub enum ServiceElement {
        Option(OptionNode),
        Rpc(RpcNode),
        Empty(EmptyDeclNode),
        Error(ErrorNode),
    }
}

ast_node! {
    /// `rpc Get(Req) returns (stream Resp);` or the same with an options
    /// body instead of the semicolon.
    pub struct RpcNode: Rpc {
        keyword: one KeywordNode,
        name: opt IdentNode,
        input: opt RpcTypeNode,
        returns: opt KeywordNode,
        output: opt RpcTypeNode,
        semicolon: opt RuneNode,
        open: opt RuneNode,
        elements: list RpcElement,
        close: opt RuneNode,
    }
}

ast_union! {
    pub enum RpcElement {
        Option(OptionNode),
        Empty(EmptyDeclNode),
        Error(ErrorNode),
    }
}

ast_node! {
    /// `(stream foo.Bar)`
    pub struct RpcTypeNode: RpcType {
        open: one RuneNode,
        stream: opt KeywordNode,
        message_type: opt IdentValueNode,
        close: opt RuneNode,
    }
}

impl RpcTypeNode {
    pub fn is_stream(&self) -> bool {
        self.stream.is_some()
    }
}
