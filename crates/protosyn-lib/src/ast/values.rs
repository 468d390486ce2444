//! Option values: scalars, arrays and text-format message literals.

use super::{
    ConstructionError, ErrorNode, FieldReferenceNode, FloatLiteralNode, IdentNode, KeywordNode,
    CompoundIdentNode, RuneNode, StringLiteralNode, UintLiteralNode, check_separators,
};

ast_union! {
    /// Anything on the right-hand side of `option x = ...`.
    pub enum ValueNode {
        Ident(IdentValueNode),
        String(StringValueNode),
        Int(IntValueNode),
        Float(FloatValueNode),
        Array(ArrayLiteralNode),
        Message(MessageLiteralNode),
        Error(ErrorNode),
    }
}

ast_union! {
    pub enum IdentValueNode {
        Ident(IdentNode),
        Compound(CompoundIdentNode),
    }
}

impl IdentValueNode {
    pub fn as_str(&self) -> &str {
        match self {
            IdentValueNode::Ident(n) => &n.value,
            IdentValueNode::Compound(n) => &n.value,
        }
    }
}

ast_union! {
    pub enum StringValueNode {
        Single(StringLiteralNode),
        Compound(CompoundStringLiteralNode),
    }
}

impl StringValueNode {
    /// Decoded bytes, adjacent literals concatenated.
    pub fn value(&self) -> Vec<u8> {
        match self {
            StringValueNode::Single(n) => n.value.clone(),
            StringValueNode::Compound(n) => n.value(),
        }
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.value()).into_owned()
    }
}

ast_union! {
    pub enum IntValueNode {
        Uint(UintLiteralNode),
        Negative(NegativeIntLiteralNode),
    }
}

impl IntValueNode {
    pub fn as_i128(&self) -> i128 {
        match self {
            IntValueNode::Uint(n) => i128::from(n.value),
            IntValueNode::Negative(n) => n.value(),
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            IntValueNode::Uint(n) => Some(n.value),
            IntValueNode::Negative(_) => None,
        }
    }
}

ast_union! {
    pub enum FloatValueNode {
        Float(FloatLiteralNode),
        Special(SpecialFloatLiteralNode),
        Signed(SignedFloatLiteralNode),
    }
}

impl FloatValueNode {
    pub fn value(&self) -> f64 {
        match self {
            FloatValueNode::Float(n) => n.value,
            FloatValueNode::Special(n) => n.value(),
            FloatValueNode::Signed(n) => n.value(),
        }
    }
}

ast_node! {
    /// Adjacent string literals, `"a" "b"`.
    pub struct CompoundStringLiteralNode: CompoundStringLiteral {
        parts: list StringLiteralNode,
    }
}

impl CompoundStringLiteralNode {
    pub fn new(parts: Vec<StringLiteralNode>) -> Result<Self, ConstructionError> {
        if parts.len() < 2 {
            return Err(ConstructionError::TooFewStringParts(parts.len()));
        }
        Ok(Self { parts })
    }

    pub fn value(&self) -> Vec<u8> {
        self.parts.iter().flat_map(|p| p.value.iter().copied()).collect()
    }
}

ast_node! {
    pub struct NegativeIntLiteralNode: NegativeIntLiteral {
        minus: one RuneNode,
        uint: one UintLiteralNode,
    }
}

impl NegativeIntLiteralNode {
    pub fn value(&self) -> i128 {
        -i128::from(self.uint.value)
    }
}

ast_node! {
    /// `inf` or `nan` after a sign.
    pub struct SpecialFloatLiteralNode: SpecialFloatLiteral {
        keyword: one KeywordNode,
    }
}

impl SpecialFloatLiteralNode {
    pub fn value(&self) -> f64 {
        if self.keyword.value.eq_ignore_ascii_case("nan") {
            f64::NAN
        } else {
            f64::INFINITY
        }
    }
}

ast_node! {
    pub struct SignedFloatLiteralNode: SignedFloatLiteral {
        sign: one RuneNode,
        float: one Box<FloatValueNode>,
    }
}

impl SignedFloatLiteralNode {
    pub fn value(&self) -> f64 {
        let value = self.float.value();
        if self.sign.rune == '-' { -value } else { value }
    }
}

ast_node! {
    /// `[a, b, c]`
    pub struct ArrayLiteralNode: ArrayLiteral {
        open: one RuneNode,
        elements: list ValueNode,
        commas: list RuneNode,
        close: opt RuneNode,
    }
}

impl ArrayLiteralNode {
    pub fn new(
        open: RuneNode,
        elements: Vec<ValueNode>,
        commas: Vec<RuneNode>,
        close: Option<RuneNode>,
    ) -> Result<Self, ConstructionError> {
        expect_rune(&open, '[', "`[`")?;
        if let Some(close) = &close {
            expect_rune(close, ']', "`]`")?;
        }
        check_separators("array literal", elements.len(), commas.len(), true)?;
        Ok(Self {
            open,
            elements,
            commas,
            close,
        })
    }
}

ast_node! {
    /// `{ a: 1 b { c: 2 } }` or the `<...>` form.
    pub struct MessageLiteralNode: MessageLiteral {
        open: one RuneNode,
        fields: list MessageFieldNode,
        close: opt RuneNode,
    }
}

impl MessageLiteralNode {
    pub fn new(
        open: RuneNode,
        fields: Vec<MessageFieldNode>,
        close: Option<RuneNode>,
    ) -> Result<Self, ConstructionError> {
        let expected = match open.rune {
            '{' => '}',
            '<' => '>',
            found => {
                return Err(ConstructionError::UnexpectedRune {
                    expected: "`{` or `<`",
                    found,
                });
            }
        };
        if let Some(close) = &close
            && close.rune != expected
        {
            return Err(ConstructionError::MismatchedDelimiters {
                open: open.rune,
                close: close.rune,
            });
        }
        Ok(Self {
            open,
            fields,
            close,
        })
    }

    pub fn find(&self, name: &str) -> Option<&MessageFieldNode> {
        self.fields.iter().find(|f| f.name.name() == name)
    }
}

ast_node! {
    /// One `name: value` entry of a message literal with its optional
    /// trailing `,` or `;`.
    pub struct MessageFieldNode: MessageField {
        name: one FieldReferenceNode,
        colon: opt RuneNode,
        value: opt ValueNode,
        separator: opt RuneNode,
    }
}

fn expect_rune(
    node: &RuneNode,
    rune: char,
    expected: &'static str,
) -> Result<(), ConstructionError> {
    if node.rune == rune {
        return Ok(());
    }
    Err(ConstructionError::UnexpectedRune {
        expected,
        found: node.rune,
    })
}
