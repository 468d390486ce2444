//! Declarative helpers that stamp out the trait impls for node structs and
//! union enums.

/// Defines a composite node struct.
///
/// Each field has a mode: `one` (required), `opt` (`Option<T>`) or `list`
/// (`Vec<T>`). The extent is the minimum start and maximum end over the
/// present children, so interleaved lists (elements and their separators)
/// need no special handling.
macro_rules! ast_node {
    (@ty one $ty:ty) => { $ty };
    (@ty opt $ty:ty) => { Option<$ty> };
    (@ty list $ty:ty) => { Vec<$ty> };

    (@start one $e:expr) => { Some($crate::ast::Node::start(&$e)) };
    (@start opt $e:expr) => { $e.as_ref().map($crate::ast::Node::start) };
    (@start list $e:expr) => { $e.first().map($crate::ast::Node::start) };

    (@end one $e:expr) => { Some($crate::ast::Node::end(&$e)) };
    (@end opt $e:expr) => { $e.as_ref().map($crate::ast::Node::end) };
    (@end list $e:expr) => { $e.last().map($crate::ast::Node::end) };

    (@field $out:ident, $name:expr, one, $e:expr) => {
        $out.push(($name, $crate::ast::Child::as_field(&$e)));
    };
    (@field $out:ident, $name:expr, opt, $e:expr) => {
        if let Some(child) = &$e {
            $out.push(($name, $crate::ast::Child::as_field(child)));
        }
    };
    (@field $out:ident, $name:expr, list, $e:expr) => {
        if !$e.is_empty() {
            $out.push((
                $name,
                $crate::ast::FieldRef::List($e.iter().map($crate::ast::Child::as_field).collect()),
            ));
        }
    };

    (
        $(#[$meta:meta])*
        pub struct $name:ident : $kind:ident {
            $( $(#[$fmeta:meta])* $field:ident : $mode:ident $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: ast_node!(@ty $mode $ty), )*
        }

        impl $crate::ast::Node for $name {
            fn start(&self) -> protosyn_core::Token {
                [$( ast_node!(@start $mode self.$field) ),*]
                    .into_iter()
                    .flatten()
                    .min()
                    .unwrap_or_else(|| {
                        $crate::ast::invariants::childless($crate::ast::NodeKind::$kind)
                    })
            }

            fn end(&self) -> protosyn_core::Token {
                [$( ast_node!(@end $mode self.$field) ),*]
                    .into_iter()
                    .flatten()
                    .max()
                    .unwrap_or_else(|| {
                        $crate::ast::invariants::childless($crate::ast::NodeKind::$kind)
                    })
            }
        }

        impl $crate::ast::AstNode for $name {
            const KIND: $crate::ast::NodeKind = $crate::ast::NodeKind::$kind;

            fn cast(node: $crate::ast::NodeRef<'_>) -> Option<&Self> {
                match node {
                    $crate::ast::NodeRef::$kind(n) => Some(n),
                    _ => None,
                }
            }

            fn as_node_ref(&self) -> $crate::ast::NodeRef<'_> {
                $crate::ast::NodeRef::$kind(self)
            }

            fn fields(&self) -> Vec<(&'static str, $crate::ast::FieldRef<'_>)> {
                let mut out = Vec::new();
                $( ast_node!(@field out, stringify!($field), $mode, self.$field); )*
                out
            }
        }

        impl $crate::ast::Child for $name {
            fn as_field(&self) -> $crate::ast::FieldRef<'_> {
                $crate::ast::FieldRef::Node($crate::ast::NodeRef::$kind(self))
            }

            fn to_concrete(&self) -> $crate::ast::NodeRef<'_> {
                $crate::ast::NodeRef::$kind(self)
            }
        }
    };
}

/// Defines a terminal node: one that covers tokens but has no children.
/// The struct is written by hand; this supplies the trait impls given how
/// to read its first and last token.
macro_rules! terminal_node {
    ($name:ident : $kind:ident, |$n:ident| ($first:expr, $last:expr)) => {
        impl $crate::ast::Node for $name {
            fn start(&self) -> protosyn_core::Token {
                let $n = self;
                $first
            }

            fn end(&self) -> protosyn_core::Token {
                let $n = self;
                $last
            }
        }

        impl $crate::ast::AstNode for $name {
            const KIND: $crate::ast::NodeKind = $crate::ast::NodeKind::$kind;

            fn cast(node: $crate::ast::NodeRef<'_>) -> Option<&Self> {
                match node {
                    $crate::ast::NodeRef::$kind(n) => Some(n),
                    _ => None,
                }
            }

            fn as_node_ref(&self) -> $crate::ast::NodeRef<'_> {
                $crate::ast::NodeRef::$kind(self)
            }

            fn fields(&self) -> Vec<(&'static str, $crate::ast::FieldRef<'_>)> {
                Vec::new()
            }
        }

        impl $crate::ast::Child for $name {
            fn as_field(&self) -> $crate::ast::FieldRef<'_> {
                $crate::ast::FieldRef::Node($crate::ast::NodeRef::$kind(self))
            }

            fn to_concrete(&self) -> $crate::ast::NodeRef<'_> {
                $crate::ast::NodeRef::$kind(self)
            }
        }
    };
}

/// Defines a union enum whose variants each wrap one child type.
macro_rules! ast_union {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident($ty:ty) ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant($ty), )*
        }

        impl $crate::ast::Node for $name {
            fn start(&self) -> protosyn_core::Token {
                match self {
                    $( $name::$variant(n) => $crate::ast::Node::start(n), )*
                }
            }

            fn end(&self) -> protosyn_core::Token {
                match self {
                    $( $name::$variant(n) => $crate::ast::Node::end(n), )*
                }
            }
        }

        impl $crate::ast::AstUnion for $name {
            fn unwrap(&self) -> $crate::ast::FieldRef<'_> {
                match self {
                    $( $name::$variant(n) => $crate::ast::Child::as_field(n), )*
                }
            }

            fn concrete(&self) -> $crate::ast::NodeRef<'_> {
                match self {
                    $( $name::$variant(n) => $crate::ast::Child::to_concrete(n), )*
                }
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    $( $name::$variant(_) => stringify!($variant), )*
                }
            }

            fn as_union_ref(&self) -> $crate::ast::UnionRef<'_> {
                $crate::ast::UnionRef::$name(self)
            }
        }

        impl $crate::ast::Child for $name {
            fn as_field(&self) -> $crate::ast::FieldRef<'_> {
                $crate::ast::FieldRef::Union($crate::ast::UnionRef::$name(self))
            }

            fn to_concrete(&self) -> $crate::ast::NodeRef<'_> {
                $crate::ast::AstUnion::concrete(self)
            }
        }

        $(
            impl From<$ty> for $name {
                fn from(node: $ty) -> Self {
                    $name::$variant(node)
                }
            }
        )*
    };
}
