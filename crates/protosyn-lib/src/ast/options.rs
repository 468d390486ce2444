//! Option declarations and their names.

use super::{
    ConstructionError, IdentValueNode, KeywordNode, RuneNode, ValueNode, check_separators,
};

ast_node! {
    /// `option name = value;` or, inside `[...]`, the bare `name = value`
    /// form without keyword and semicolon.
    pub struct OptionNode: Option {
        keyword: opt KeywordNode,
        name: one OptionNameNode,
        equals: opt RuneNode,
        value: opt ValueNode,
        semicolon: opt RuneNode,
    }
}

impl OptionNode {
    pub fn is_compact(&self) -> bool {
        self.keyword.is_none()
    }
}

ast_node! {
    /// `a.(b.c).d`: dot-separated field references.
    pub struct OptionNameNode: OptionName {
        parts: list FieldReferenceNode,
        dots: list RuneNode,
    }
}

impl OptionNameNode {
    pub fn new(
        parts: Vec<FieldReferenceNode>,
        dots: Vec<RuneNode>,
    ) -> Result<Self, ConstructionError> {
        if parts.is_empty() {
            return Err(ConstructionError::Empty { node: "option name" });
        }
        check_separators("option name", parts.len(), dots.len(), false)?;
        Ok(Self { parts, dots })
    }

    /// The name as written, without whitespace: `(foo.bar).baz`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            if part.is_extension() {
                out.push('(');
                out.push_str(part.name());
                out.push(')');
            } else {
                out.push_str(part.name());
            }
        }
        out
    }
}

ast_node! {
    /// A simple name, `(extension.name)`, or in message literals
    /// `[extension.name]` / `[type.url/Name]`.
    pub struct FieldReferenceNode: FieldReference {
        open: opt RuneNode,
        name: one IdentValueNode,
        close: opt RuneNode,
    }
}

impl FieldReferenceNode {
    pub fn is_extension(&self) -> bool {
        self.open.is_some() || matches!(&self.name, IdentValueNode::Compound(n) if n.is_extension())
    }

    /// `[type.googleapis.com/pkg.Msg]` inside a message literal.
    pub fn is_any_type_reference(&self) -> bool {
        self.open.as_ref().is_some_and(|o| o.rune == '[') && self.name.as_str().contains('/')
    }

    /// The referenced name without any surrounding brackets.
    pub fn name(&self) -> &str {
        let name = self.name.as_str();
        name.strip_prefix('(')
            .and_then(|n| n.strip_suffix(')'))
            .unwrap_or(name)
    }
}

ast_node! {
    /// `[deprecated = true, (custom) = 1]`
    pub struct CompactOptionsNode: CompactOptions {
        open: one RuneNode,
        options: list OptionNode,
        commas: list RuneNode,
        close: opt RuneNode,
    }
}

impl CompactOptionsNode {
    pub fn new(
        open: RuneNode,
        options: Vec<OptionNode>,
        commas: Vec<RuneNode>,
        close: Option<RuneNode>,
    ) -> Result<Self, ConstructionError> {
        check_separators("compact options", options.len(), commas.len(), true)?;
        Ok(Self {
            open,
            options,
            commas,
            close,
        })
    }

    pub fn get(&self, name: &str) -> Option<&OptionNode> {
        self.options.iter().find(|o| o.name.text() == name)
    }
}
