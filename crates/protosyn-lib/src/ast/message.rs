//! Messages and everything that may appear in their bodies.

use super::{
    CompactOptionsNode, EmptyDeclNode, EnumNode, ErrorNode, IdentNode, IdentValueNode,
    IntValueNode, KeywordNode, OptionNode, RuneNode, StringValueNode, UintLiteralNode,
};

ast_node! {
    pub struct MessageNode: Message {
        keyword: one KeywordNode,
        name: opt IdentNode,
        open: opt RuneNode,
        elements: list MessageElement,
        close: opt RuneNode,
    }
}

impl MessageNode {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.value.as_str())
    }

    /// Normal fields declared directly in this message, oneof members
    /// included.
    pub fn fields(&self) -> impl Iterator<Item = &FieldNode> {
        self.elements.iter().flat_map(|e| {
            let (direct, oneof) = match e {
                MessageElement::Field(f) => (Some(f), None),
                MessageElement::Oneof(o) => (None, Some(o)),
                _ => (None, None),
            };
            let members = oneof
                .into_iter()
                .flat_map(|o| o.elements.iter())
                .filter_map(|e| match e {
                    OneofElement::Field(f) => Some(f),
                    _ => None,
                });
            direct.into_iter().chain(members)
        })
    }

    pub fn messages(&self) -> impl Iterator<Item = &MessageNode> {
        self.elements.iter().filter_map(|e| match e {
            MessageElement::Message(m) => Some(m),
            _ => None,
        })
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionNode> {
        self.elements.iter().filter_map(|e| match e {
            MessageElement::Option(o) => Some(o),
            _ => None,
        })
    }
}

ast_union! {
    pub enum MessageElement {
        Option(OptionNode),
        Field(FieldNode),
        MapField(MapFieldNode),
        Group(GroupNode),
        Oneof(OneofNode),
        Message(MessageNode),
        Enum(EnumNode),
        Extend(ExtendNode),
        ExtensionRange(ExtensionRangeNode),
        Reserved(ReservedNode),
        Empty(EmptyDeclNode),
        Error(ErrorNode),
    }
}

/// Cardinality keyword in front of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLabel {
    Optional,
    Required,
    Repeated,
}

impl FieldLabel {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "optional" => Some(FieldLabel::Optional),
            "required" => Some(FieldLabel::Required),
            "repeated" => Some(FieldLabel::Repeated),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldLabel::Optional => "optional",
            FieldLabel::Required => "required",
            FieldLabel::Repeated => "repeated",
        }
    }
}

ast_node! {
    /// `optional int32 foo = 1 [default = 3];`
    pub struct FieldNode: Field {
        label: opt KeywordNode,
        field_type: one IdentValueNode,
        name: opt IdentNode,
        equals: opt RuneNode,
        tag: opt UintLiteralNode,
        options: opt CompactOptionsNode,
        semicolon: opt RuneNode,
    }
}

impl FieldNode {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.value.as_str())
    }

    pub fn type_name(&self) -> &str {
        self.field_type.as_str()
    }

    pub fn tag_value(&self) -> Option<u64> {
        self.tag.as_ref().map(|t| t.value)
    }

    pub fn label_keyword(&self) -> Option<&KeywordNode> {
        self.label.as_ref()
    }

    pub fn label(&self) -> Option<FieldLabel> {
        self.label.as_ref().and_then(|k| FieldLabel::from_keyword(&k.value))
    }
}

ast_node! {
    /// `repeated group Result = 1 { ... }` (proto2 only).
    pub struct GroupNode: Group {
        label: opt KeywordNode,
        keyword: one KeywordNode,
        name: opt IdentNode,
        equals: opt RuneNode,
        tag: opt UintLiteralNode,
        options: opt CompactOptionsNode,
        open: opt RuneNode,
        elements: list MessageElement,
        close: opt RuneNode,
    }
}

impl GroupNode {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.value.as_str())
    }

    pub fn label(&self) -> Option<FieldLabel> {
        self.label.as_ref().and_then(|k| FieldLabel::from_keyword(&k.value))
    }
}

ast_node! {
    pub struct OneofNode: Oneof {
        keyword: one KeywordNode,
        name: opt IdentNode,
        open: opt RuneNode,
        elements: list OneofElement,
        close: opt RuneNode,
    }
}

ast_union! {
    pub enum OneofElement {
        Option(OptionNode),
        Field(FieldNode),
        Group(GroupNode),
        Empty(EmptyDeclNode),
        Error(ErrorNode),
    }
}

ast_node! {
    /// `map<string, Foo> entries = 3;`
    pub struct MapFieldNode: MapField {
        map_type: one MapTypeNode,
        name: opt IdentNode,
        equals: opt RuneNode,
        tag: opt UintLiteralNode,
        options: opt CompactOptionsNode,
        semicolon: opt RuneNode,
    }
}

impl MapFieldNode {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.value.as_str())
    }
}

ast_node! {
    pub struct MapTypeNode: MapType {
        keyword: one KeywordNode,
        open: opt RuneNode,
        key_type: opt IdentValueNode,
        comma: opt RuneNode,
        value_type: opt IdentValueNode,
        close: opt RuneNode,
    }
}

ast_node! {
    /// `extensions 100 to 199, 500 [verification = UNVERIFIED];`
    pub struct ExtensionRangeNode: ExtensionRange {
        keyword: one KeywordNode,
        ranges: list RangeNode,
        commas: list RuneNode,
        options: opt CompactOptionsNode,
        semicolon: opt RuneNode,
    }
}

ast_node! {
    /// `5`, `5 to 10` or `5 to max`.
    pub struct RangeNode: Range {
        from: one IntValueNode,
        to_keyword: opt KeywordNode,
        to: opt RangeEnd,
    }
}

impl RangeNode {
    pub fn start_value(&self) -> i128 {
        self.from.as_i128()
    }

    /// `None` for `max`, or when the upper bound is missing after `to`.
    pub fn end_value(&self) -> Option<i128> {
        match (&self.to_keyword, &self.to) {
            (None, _) => Some(self.start_value()),
            (Some(_), Some(RangeEnd::Int(n))) => Some(n.as_i128()),
            (Some(_), _) => None,
        }
    }
}

ast_union! {
    pub enum RangeEnd {
        Int(IntValueNode),
        Max(KeywordNode),
    }
}

ast_node! {
    /// `reserved 2, 15, 9 to 11;` or `reserved "foo", "bar";`
    pub struct ReservedNode: Reserved {
        keyword: one KeywordNode,
        elements: list ReservedElement,
        commas: list RuneNode,
        semicolon: opt RuneNode,
    }
}

ast_union! {
    pub enum ReservedElement {
        Range(RangeNode),
        Name(StringValueNode),
        /// Editions spell reserved names as bare identifiers.
        Ident(IdentNode),
    }
}

ast_node! {
    pub struct ExtendNode: Extend {
        keyword: one KeywordNode,
        extendee: opt IdentValueNode,
        open: opt RuneNode,
        elements: list ExtendElement,
        close: opt RuneNode,
    }
}

ast_union! {
    pub enum ExtendElement {
        Field(FieldNode),
        Group(GroupNode),
        Empty(EmptyDeclNode),
        Error(ErrorNode),
    }
}
