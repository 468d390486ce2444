use super::{
    CompactOptionsNode, EmptyDeclNode, ErrorNode, IdentNode, IntValueNode, KeywordNode,
    OptionNode, ReservedNode, RuneNode,
};

ast_node! {
    pub struct EnumNode: Enum {
        keyword: one KeywordNode,
        name: opt IdentNode,
        open: opt RuneNode,
        elements: list EnumElement,
        close: opt RuneNode,
    }
}

impl EnumNode {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.value.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &EnumValueNode> {
        self.elements.iter().filter_map(|e| match e {
            EnumElement::Value(v) => Some(v),
            _ => None,
        })
    }
}

ast_union! {
    pub enum EnumElement {
        Option(OptionNode),
        Value(EnumValueNode),
        Reserved(ReservedNode),
        Empty(EmptyDeclNode),
        Error(ErrorNode),
    }
}

ast_node! {
    /// `FOO = 1 [deprecated = true];`
    pub struct EnumValueNode: EnumValue {
        name: one IdentNode,
        equals: opt RuneNode,
        number: opt IntValueNode,
        options: opt CompactOptionsNode,
        semicolon: opt RuneNode,
    }
}

impl EnumValueNode {
    pub fn number(&self) -> Option<i128> {
        self.number.as_ref().map(IntValueNode::as_i128)
    }
}
