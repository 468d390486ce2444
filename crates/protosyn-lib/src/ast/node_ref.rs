//! Borrowed, type-erased views over nodes and unions.

use protosyn_core::Token;

use super::*;

macro_rules! define_refs {
    (
        nodes { $( $kind:ident => $node:ident, )* }
        unions { $( $union:ident, )* }
    ) => {
        /// Discriminant of every concrete node type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum NodeKind {
            $( $kind, )*
        }

        impl NodeKind {
            pub fn name(self) -> &'static str {
                match self {
                    $( NodeKind::$kind => stringify!($node), )*
                }
            }
        }

        /// A borrowed concrete node.
        #[derive(Debug, Clone, Copy)]
        pub enum NodeRef<'a> {
            $( $kind(&'a $node), )*
        }

        impl<'a> NodeRef<'a> {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $( NodeRef::$kind(_) => NodeKind::$kind, )*
                }
            }

            pub fn fields(&self) -> Vec<(&'static str, FieldRef<'a>)> {
                match *self {
                    $( NodeRef::$kind(n) => AstNode::fields(n), )*
                }
            }

            fn addr(&self) -> *const () {
                match *self {
                    $( NodeRef::$kind(n) => n as *const $node as *const (), )*
                }
            }
        }

        impl Node for NodeRef<'_> {
            fn start(&self) -> Token {
                match self {
                    $( NodeRef::$kind(n) => Node::start(*n), )*
                }
            }

            fn end(&self) -> Token {
                match self {
                    $( NodeRef::$kind(n) => Node::end(*n), )*
                }
            }
        }

        /// A borrowed union.
        #[derive(Debug, Clone, Copy)]
        pub enum UnionRef<'a> {
            $( $union(&'a $union), )*
        }

        impl<'a> UnionRef<'a> {
            /// Name of the union type, e.g. `"ValueNode"`.
            pub fn name(&self) -> &'static str {
                match self {
                    $( UnionRef::$union(_) => stringify!($union), )*
                }
            }

            pub fn unwrap(&self) -> FieldRef<'a> {
                match *self {
                    $( UnionRef::$union(u) => AstUnion::unwrap(u), )*
                }
            }

            pub fn concrete(&self) -> NodeRef<'a> {
                match *self {
                    $( UnionRef::$union(u) => AstUnion::concrete(u), )*
                }
            }

            pub fn variant_name(&self) -> &'static str {
                match *self {
                    $( UnionRef::$union(u) => AstUnion::variant_name(u), )*
                }
            }
        }

        impl Node for UnionRef<'_> {
            fn start(&self) -> Token {
                match self {
                    $( UnionRef::$union(u) => Node::start(*u), )*
                }
            }

            fn end(&self) -> Token {
                match self {
                    $( UnionRef::$union(u) => Node::end(*u), )*
                }
            }
        }
    };
}

define_refs! {
    nodes {
        Rune => RuneNode,
        Keyword => KeywordNode,
        Ident => IdentNode,
        CompoundIdent => CompoundIdentNode,
        StringLiteral => StringLiteralNode,
        UintLiteral => UintLiteralNode,
        FloatLiteral => FloatLiteralNode,
        Error => ErrorNode,
        File => FileNode,
        Syntax => SyntaxNode,
        Edition => EditionNode,
        Package => PackageNode,
        Import => ImportNode,
        Option => OptionNode,
        OptionName => OptionNameNode,
        FieldReference => FieldReferenceNode,
        CompactOptions => CompactOptionsNode,
        Message => MessageNode,
        Field => FieldNode,
        Group => GroupNode,
        Oneof => OneofNode,
        MapField => MapFieldNode,
        MapType => MapTypeNode,
        ExtensionRange => ExtensionRangeNode,
        Range => RangeNode,
        Reserved => ReservedNode,
        Enum => EnumNode,
        EnumValue => EnumValueNode,
        Extend => ExtendNode,
        Service => ServiceNode,
        Rpc => RpcNode,
        RpcType => RpcTypeNode,
        EmptyDecl => EmptyDeclNode,
        CompoundStringLiteral => CompoundStringLiteralNode,
        NegativeIntLiteral => NegativeIntLiteralNode,
        SpecialFloatLiteral => SpecialFloatLiteralNode,
        SignedFloatLiteral => SignedFloatLiteralNode,
        ArrayLiteral => ArrayLiteralNode,
        MessageLiteral => MessageLiteralNode,
        MessageField => MessageFieldNode,
    }
    unions {
        FileHeader,
        FileElement,
        MessageElement,
        OneofElement,
        EnumElement,
        ServiceElement,
        RpcElement,
        ExtendElement,
        ValueNode,
        IdentValueNode,
        StringValueNode,
        IntValueNode,
        FloatValueNode,
        RangeEnd,
        ReservedElement,
    }
}

impl<'a> NodeRef<'a> {
    pub fn cast<T: AstNode>(self) -> Option<&'a T> {
        T::cast(self)
    }

    pub fn is<T: AstNode>(&self) -> bool {
        self.kind() == T::KIND
    }

    /// Leaves cover tokens directly and have no children.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind(),
            NodeKind::Rune
                | NodeKind::Keyword
                | NodeKind::Ident
                | NodeKind::CompoundIdent
                | NodeKind::StringLiteral
                | NodeKind::UintLiteral
                | NodeKind::FloatLiteral
                | NodeKind::Error
        )
    }

    /// Identity comparison: the same node in the same tree.
    pub fn ptr_eq(&self, other: &NodeRef<'_>) -> bool {
        self.kind() == other.kind() && std::ptr::eq(self.addr(), other.addr())
    }
}
