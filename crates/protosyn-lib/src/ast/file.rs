//! The file root and top-level declarations.

use std::sync::Arc;

use indexmap::IndexMap;
use protosyn_core::{FileInfo, Item, ItemInfo, Items, NodeInfo, TextSize, Token, Tokens};

use super::{
    AstNode, Child, EnumNode, ErrorNode, ExtendNode, FieldRef, IdentValueNode, KeywordNode,
    MessageNode, Node, NodeKind, NodeRef, OptionNode, RuneNode, ServiceNode, StringValueNode,
};
use crate::Dialect;
use crate::pragma;

/// Root of a parsed file.
///
/// Owns the shared [`FileInfo`]; cloning copies the tree and shares the
/// store.
#[derive(Debug, Clone)]
pub struct FileNode {
    info: Arc<FileInfo>,
    dialect: Dialect,
    pub header: Option<FileHeader>,
    pub elements: Vec<FileElement>,
    /// Zero-length end-of-file terminal. Carries the file's trailing
    /// whitespace and comments.
    pub eof: RuneNode,
    pragmas: IndexMap<String, String>,
}

impl FileNode {
    pub fn new(
        info: Arc<FileInfo>,
        dialect: Dialect,
        header: Option<FileHeader>,
        elements: Vec<FileElement>,
        eof: RuneNode,
    ) -> Self {
        let pragmas = match &header {
            Some(header) => pragma::parse(info.leading_comments(header.start())),
            None => IndexMap::new(),
        };
        Self {
            info,
            dialect,
            header,
            elements,
            eof,
            pragmas,
        }
    }

    pub fn info(&self) -> &Arc<FileInfo> {
        &self.info
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    /// The dialect the file declares, or the configured one when it has no
    /// header.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn syntax(&self) -> Option<&SyntaxNode> {
        match &self.header {
            Some(FileHeader::Syntax(n)) => Some(n),
            _ => None,
        }
    }

    pub fn edition(&self) -> Option<&EditionNode> {
        match &self.header {
            Some(FileHeader::Edition(n)) => Some(n),
            _ => None,
        }
    }

    pub fn package(&self) -> Option<&PackageNode> {
        self.elements.iter().find_map(|e| match e {
            FileElement::Package(p) => Some(p),
            _ => None,
        })
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportNode> {
        self.elements.iter().filter_map(|e| match e {
            FileElement::Import(n) => Some(n),
            _ => None,
        })
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionNode> {
        self.elements.iter().filter_map(|e| match e {
            FileElement::Option(n) => Some(n),
            _ => None,
        })
    }

    pub fn messages(&self) -> impl Iterator<Item = &MessageNode> {
        self.elements.iter().filter_map(|e| match e {
            FileElement::Message(n) => Some(n),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumNode> {
        self.elements.iter().filter_map(|e| match e {
            FileElement::Enum(n) => Some(n),
            _ => None,
        })
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceNode> {
        self.elements.iter().filter_map(|e| match e {
            FileElement::Service(n) => Some(n),
            _ => None,
        })
    }

    pub fn extends(&self) -> impl Iterator<Item = &ExtendNode> {
        self.elements.iter().filter_map(|e| match e {
            FileElement::Extend(n) => Some(n),
            _ => None,
        })
    }

    /// Value of a `//pragma: key value` comment on the header.
    pub fn pragma(&self, key: &str) -> Option<&str> {
        self.pragmas.get(key).map(String::as_str)
    }

    pub fn pragmas(&self) -> &IndexMap<String, String> {
        &self.pragmas
    }

    pub fn node_info(&self, node: &dyn Node) -> NodeInfo<'_> {
        self.info.node_info(node.start(), node.end())
    }

    pub fn token_info(&self, token: Token) -> NodeInfo<'_> {
        self.info.token_info(token)
    }

    pub fn item_info(&self, item: Item) -> ItemInfo<'_> {
        self.info.item_info(item)
    }

    pub fn token_at_offset(&self, offset: TextSize) -> Option<Token> {
        self.info.token_at_offset(offset)
    }

    pub fn tokens(&self) -> Tokens<'_> {
        self.info.tokens()
    }

    pub fn items(&self) -> Items<'_> {
        self.info.items()
    }
}

impl Node for FileNode {
    fn start(&self) -> Token {
        self.header
            .as_ref()
            .map(Node::start)
            .or_else(|| self.elements.first().map(Node::start))
            .unwrap_or(self.eof.token)
    }

    fn end(&self) -> Token {
        self.eof.token
    }
}

impl AstNode for FileNode {
    const KIND: NodeKind = NodeKind::File;

    fn cast(node: NodeRef<'_>) -> Option<&Self> {
        match node {
            NodeRef::File(n) => Some(n),
            _ => None,
        }
    }

    fn as_node_ref(&self) -> NodeRef<'_> {
        NodeRef::File(self)
    }

    fn fields(&self) -> Vec<(&'static str, FieldRef<'_>)> {
        let mut out = Vec::new();
        if let Some(header) = &self.header {
            out.push(("header", header.as_field()));
        }
        if !self.elements.is_empty() {
            out.push((
                "elements",
                FieldRef::List(self.elements.iter().map(Child::as_field).collect()),
            ));
        }
        out.push(("eof", self.eof.as_field()));
        out
    }
}

impl Child for FileNode {
    fn as_field(&self) -> FieldRef<'_> {
        FieldRef::Node(NodeRef::File(self))
    }

    fn to_concrete(&self) -> NodeRef<'_> {
        NodeRef::File(self)
    }
}

ast_union! {
    pub enum FileHeader {
        Syntax(SyntaxNode),
        Edition(EditionNode),
    }
}

ast_union! {
    pub enum FileElement {
        Import(ImportNode),
        Package(PackageNode),
        Option(OptionNode),
        Message(MessageNode),
        Enum(EnumNode),
        Extend(ExtendNode),
        Service(ServiceNode),
        Empty(EmptyDeclNode),
        Error(ErrorNode),
    }
}

ast_node! {
    /// `syntax = "proto3";`
    pub struct SyntaxNode: Syntax {
        keyword: one KeywordNode,
        equals: opt RuneNode,
        value: opt StringValueNode,
        semicolon: opt RuneNode,
    }
}

impl SyntaxNode {
    pub fn value(&self) -> Option<String> {
        self.value.as_ref().map(StringValueNode::to_string_lossy)
    }
}

ast_node! {
    /// `edition = "2023";`
    pub struct EditionNode: Edition {
        keyword: one KeywordNode,
        equals: opt RuneNode,
        value: opt StringValueNode,
        semicolon: opt RuneNode,
    }
}

impl EditionNode {
    pub fn value(&self) -> Option<String> {
        self.value.as_ref().map(StringValueNode::to_string_lossy)
    }
}

ast_node! {
    pub struct PackageNode: Package {
        keyword: one KeywordNode,
        name: opt IdentValueNode,
        semicolon: opt RuneNode,
    }
}

impl PackageNode {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(IdentValueNode::as_str)
    }
}

ast_node! {
    /// `import public "foo.proto";`
    pub struct ImportNode: Import {
        keyword: one KeywordNode,
        modifier: opt KeywordNode,
        name: opt StringValueNode,
        semicolon: opt RuneNode,
    }
}

impl ImportNode {
    pub fn path(&self) -> Option<String> {
        self.name.as_ref().map(StringValueNode::to_string_lossy)
    }

    pub fn is_public(&self) -> bool {
        self.modifier.as_ref().is_some_and(|m| m.is("public"))
    }

    pub fn is_weak(&self) -> bool {
        self.modifier.as_ref().is_some_and(|m| m.is("weak"))
    }
}

ast_node! {
    /// A lone `;`.
    pub struct EmptyDeclNode: EmptyDecl {
        semicolon: one RuneNode,
    }
}
