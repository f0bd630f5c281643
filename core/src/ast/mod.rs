//! Go syntax tree.
//!
//! Nodes are plain structs allocated in a `bumpalo` arena and linked by
//! shared references, so a whole tree is `Copy`-cheap to hand around and is
//! never mutated after parsing. Interfaces of `go/ast` (`Expr`, `Stmt`,
//! `Decl`, `Spec`) become small enums of references; [`Node`] is the single
//! handle the walker uses for all of them.

mod node;
mod nodes;
pub mod syntax;

pub use node::{Node, NodeKey, NodeKind, UNIT_SUFFIX};
pub use nodes::*;
pub use syntax::{
    AssignOp, BinaryOp, BranchKind, ChanDir, DeclKind, IncDecOp, LitKind, Span, UnaryOp,
};

/// Declares a sum type over node references, plus conversions into it and
/// into [`Node`].
macro_rules! sum_type {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub enum $name<'a> {
            $($variant(&'a $variant<'a>),)*
        }

        $(
            impl<'a> From<&'a $variant<'a>> for $name<'a> {
                fn from(node: &'a $variant<'a>) -> Self {
                    $name::$variant(node)
                }
            }
        )*

        impl<'a> From<$name<'a>> for Node<'a> {
            fn from(value: $name<'a>) -> Self {
                match value {
                    $($name::$variant(node) => Node::$variant(node),)*
                }
            }
        }

        impl<'a> $name<'a> {
            pub fn kind(self) -> NodeKind {
                Node::from(self).kind()
            }

            pub fn text(self) -> &'a str {
                Node::from(self).text()
            }
        }
    };
}

sum_type!(
    /// Expressions and types.
    Expr {
        Ident,
        BasicLit,
        Ellipsis,
        FuncLit,
        CompositeLit,
        ParenExpr,
        SelectorExpr,
        IndexExpr,
        SliceExpr,
        TypeAssertExpr,
        CallExpr,
        StarExpr,
        UnaryExpr,
        BinaryExpr,
        KeyValueExpr,
        ArrayType,
        StructType,
        FuncType,
        InterfaceType,
        MapType,
        ChanType,
    }
);

sum_type!(
    /// Statements, including the clauses that only appear in switch and
    /// select bodies.
    Stmt {
        DeclStmt,
        EmptyStmt,
        LabeledStmt,
        ExprStmt,
        SendStmt,
        IncDecStmt,
        AssignStmt,
        GoStmt,
        DeferStmt,
        ReturnStmt,
        BranchStmt,
        BlockStmt,
        IfStmt,
        CaseClause,
        SwitchStmt,
        TypeSwitchStmt,
        CommClause,
        SelectStmt,
        ForStmt,
        RangeStmt,
    }
);

sum_type!(
    /// Top-level declarations.
    Decl { GenDecl, FuncDecl }
);

sum_type!(
    /// Entries of a `GenDecl`.
    Spec {
        ImportSpec,
        ValueSpec,
        TypeSpec,
    }
);

static_assertions::assert_eq_size!(Expr<'static>, [usize; 2]);
static_assertions::assert_eq_size!(Node<'static>, [usize; 2]);
