use core::fmt;

use ecow::EcoString;

use super::nodes::*;

/// Suffix of a source file's own path label.
pub const UNIT_SUFFIX: &str = ".go";

macro_rules! node_kinds {
    ($($kind:ident),* $(,)?) => {
        /// Borrowed handle to any node of the tree.
        #[derive(Debug, Clone, Copy)]
        pub enum Node<'a> {
            $($kind(&'a $kind<'a>),)*
        }

        /// The closed set of node variants.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        pub enum NodeKind {
            $($kind,)*
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind),)*
                }
            }
        }

        impl<'a> Node<'a> {
            pub fn kind(self) -> NodeKind {
                match self {
                    $(Node::$kind(_) => NodeKind::$kind,)*
                }
            }

            fn addr(self) -> usize {
                match self {
                    $(Node::$kind(node) => node as *const $kind<'a> as usize,)*
                }
            }
        }

        $(
            impl<'a> From<&'a $kind<'a>> for Node<'a> {
                fn from(node: &'a $kind<'a>) -> Self {
                    Node::$kind(node)
                }
            }
        )*
    };
}

node_kinds!(
    Comment,
    CommentGroup,
    Field,
    FieldList,
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
    ImportSpec,
    ValueSpec,
    TypeSpec,
    GenDecl,
    FuncDecl,
    File,
    Package,
);

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a node: its variant and arena address.
///
/// Two structurally identical subtrees parsed from different places have
/// different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    kind: NodeKind,
    addr: usize,
}

impl<'a> Node<'a> {
    pub fn key(self) -> NodeKey {
        NodeKey {
            kind: self.kind(),
            addr: self.addr(),
        }
    }

    /// True if both handles point at the same node.
    pub fn same(self, other: Node<'_>) -> bool {
        self.key() == other.key()
    }

    /// Label the node contributes to its own path, on top of the slot label
    /// its parent pushed. Only source files have one.
    pub fn own_label(self) -> Option<EcoString> {
        match self {
            Node::File(file) => {
                let mut label = EcoString::from(file.name);
                label.push_str(UNIT_SUFFIX);
                Some(label)
            }
            _ => None,
        }
    }

    /// Source text the node was parsed from.
    pub fn text(self) -> &'a str {
        match self {
            Node::Comment(n) => n.text,
            Node::CommentGroup(n) => n.text,
            Node::Field(n) => n.text,
            Node::FieldList(n) => n.text,
            Node::Ident(n) => n.name,
            Node::BasicLit(n) => n.value,
            Node::Ellipsis(n) => n.text,
            Node::FuncLit(n) => n.text,
            Node::CompositeLit(n) => n.text,
            Node::ParenExpr(n) => n.text,
            Node::SelectorExpr(n) => n.text,
            Node::IndexExpr(n) => n.text,
            Node::SliceExpr(n) => n.text,
            Node::TypeAssertExpr(n) => n.text,
            Node::CallExpr(n) => n.text,
            Node::StarExpr(n) => n.text,
            Node::UnaryExpr(n) => n.text,
            Node::BinaryExpr(n) => n.text,
            Node::KeyValueExpr(n) => n.text,
            Node::ArrayType(n) => n.text,
            Node::StructType(n) => n.text,
            Node::FuncType(n) => n.text,
            Node::InterfaceType(n) => n.text,
            Node::MapType(n) => n.text,
            Node::ChanType(n) => n.text,
            Node::DeclStmt(n) => n.text,
            Node::EmptyStmt(n) => n.text,
            Node::LabeledStmt(n) => n.text,
            Node::ExprStmt(n) => n.text,
            Node::SendStmt(n) => n.text,
            Node::IncDecStmt(n) => n.text,
            Node::AssignStmt(n) => n.text,
            Node::GoStmt(n) => n.text,
            Node::DeferStmt(n) => n.text,
            Node::ReturnStmt(n) => n.text,
            Node::BranchStmt(n) => n.text,
            Node::BlockStmt(n) => n.text,
            Node::IfStmt(n) => n.text,
            Node::CaseClause(n) => n.text,
            Node::SwitchStmt(n) => n.text,
            Node::TypeSwitchStmt(n) => n.text,
            Node::CommClause(n) => n.text,
            Node::SelectStmt(n) => n.text,
            Node::ForStmt(n) => n.text,
            Node::RangeStmt(n) => n.text,
            Node::ImportSpec(n) => n.text,
            Node::ValueSpec(n) => n.text,
            Node::TypeSpec(n) => n.text,
            Node::GenDecl(n) => n.text,
            Node::FuncDecl(n) => n.text,
            Node::File(n) => n.text,
            Node::Package(_) => "",
        }
    }
}
