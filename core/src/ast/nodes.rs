// Node types of the Go syntax tree. Field order is the order in which the
// walker visits children; do not reorder without updating the walker.

use super::syntax::{AssignOp, BinaryOp, BranchKind, ChanDir, DeclKind, IncDecOp, LitKind, UnaryOp};
use super::{Decl, Expr, Spec, Stmt};

// === Comments and fields ===

/// A single `//` or `/* */` comment.
#[derive(Debug)]
pub struct Comment<'a> {
    pub text: &'a str,
}

/// Consecutive comments with no blank line or code between them.
#[derive(Debug)]
pub struct CommentGroup<'a> {
    pub list: &'a [&'a Comment<'a>],
    pub text: &'a str,
}

/// A parameter, result, struct field, or interface method.
#[derive(Debug)]
pub struct Field<'a> {
    pub doc: Option<&'a CommentGroup<'a>>,
    pub names: &'a [&'a Ident<'a>],
    pub ty: Expr<'a>,
    pub tag: Option<&'a BasicLit<'a>>,
    pub comment: Option<&'a CommentGroup<'a>>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct FieldList<'a> {
    pub list: &'a [&'a Field<'a>],
    pub text: &'a str,
}

// === Expressions ===

#[derive(Debug)]
pub struct Ident<'a> {
    pub name: &'a str,
}

#[derive(Debug)]
pub struct BasicLit<'a> {
    pub kind: LitKind,
    pub value: &'a str,
}

/// `...T` in a parameter list, or `...` as an array length.
#[derive(Debug)]
pub struct Ellipsis<'a> {
    pub elt: Option<Expr<'a>>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct FuncLit<'a> {
    pub ty: &'a FuncType<'a>,
    pub body: &'a BlockStmt<'a>,
    pub text: &'a str,
}

/// `T{...}`; `ty` is `None` for elided element types inside another literal.
#[derive(Debug)]
pub struct CompositeLit<'a> {
    pub ty: Option<Expr<'a>>,
    pub elts: &'a [Expr<'a>],
    pub text: &'a str,
}

#[derive(Debug)]
pub struct ParenExpr<'a> {
    pub x: Expr<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct SelectorExpr<'a> {
    pub x: Expr<'a>,
    pub sel: &'a Ident<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct IndexExpr<'a> {
    pub x: Expr<'a>,
    pub index: Expr<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct SliceExpr<'a> {
    pub x: Expr<'a>,
    pub low: Option<Expr<'a>>,
    pub high: Option<Expr<'a>>,
    pub max: Option<Expr<'a>>,
    pub slice3: bool,
    pub text: &'a str,
}

/// `x.(T)`; `ty` is `None` for the `x.(type)` guard of a type switch.
#[derive(Debug)]
pub struct TypeAssertExpr<'a> {
    pub x: Expr<'a>,
    pub ty: Option<Expr<'a>>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct CallExpr<'a> {
    pub fun: Expr<'a>,
    pub args: &'a [Expr<'a>],
    pub has_ellipsis: bool,
    pub text: &'a str,
}

/// `*x`: dereference, or pointer type in type position.
#[derive(Debug)]
pub struct StarExpr<'a> {
    pub x: Expr<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct UnaryExpr<'a> {
    pub op: UnaryOp,
    pub x: Expr<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct BinaryExpr<'a> {
    pub x: Expr<'a>,
    pub op: BinaryOp,
    pub y: Expr<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct KeyValueExpr<'a> {
    pub key: Expr<'a>,
    pub value: Expr<'a>,
    pub text: &'a str,
}

// === Types ===

/// `[N]T`, `[...]T`, or the slice type `[]T` (no `len`).
#[derive(Debug)]
pub struct ArrayType<'a> {
    pub len: Option<Expr<'a>>,
    pub elt: Expr<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct StructType<'a> {
    pub fields: &'a FieldList<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct FuncType<'a> {
    pub params: &'a FieldList<'a>,
    pub results: Option<&'a FieldList<'a>>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct InterfaceType<'a> {
    pub methods: &'a FieldList<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct MapType<'a> {
    pub key: Expr<'a>,
    pub value: Expr<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct ChanType<'a> {
    pub dir: ChanDir,
    pub value: Expr<'a>,
    pub text: &'a str,
}

// === Statements ===

#[derive(Debug)]
pub struct DeclStmt<'a> {
    pub decl: &'a GenDecl<'a>,
    pub text: &'a str,
}

/// An explicit `;`, or the implicit empty statement after a trailing label
/// (empty `text`).
#[derive(Debug)]
pub struct EmptyStmt<'a> {
    pub text: &'a str,
}

#[derive(Debug)]
pub struct LabeledStmt<'a> {
    pub label: &'a Ident<'a>,
    pub stmt: Stmt<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct ExprStmt<'a> {
    pub x: Expr<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct SendStmt<'a> {
    pub chan: Expr<'a>,
    pub value: Expr<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct IncDecStmt<'a> {
    pub x: Expr<'a>,
    pub op: IncDecOp,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct AssignStmt<'a> {
    pub lhs: &'a [Expr<'a>],
    pub op: AssignOp,
    pub rhs: &'a [Expr<'a>],
    pub text: &'a str,
}

#[derive(Debug)]
pub struct GoStmt<'a> {
    pub call: &'a CallExpr<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct DeferStmt<'a> {
    pub call: &'a CallExpr<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct ReturnStmt<'a> {
    pub results: &'a [Expr<'a>],
    pub text: &'a str,
}

/// `break`, `continue`, `goto`, `fallthrough`.
#[derive(Debug)]
pub struct BranchStmt<'a> {
    pub kind: BranchKind,
    pub label: Option<&'a Ident<'a>>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct BlockStmt<'a> {
    pub list: &'a [Stmt<'a>],
    pub text: &'a str,
}

#[derive(Debug)]
pub struct IfStmt<'a> {
    pub init: Option<Stmt<'a>>,
    pub cond: Expr<'a>,
    pub body: &'a BlockStmt<'a>,
    pub else_branch: Option<Stmt<'a>>,
    pub text: &'a str,
}

/// A `case` of an expression or type switch; an empty `list` is `default`.
#[derive(Debug)]
pub struct CaseClause<'a> {
    pub list: &'a [Expr<'a>],
    pub body: &'a [Stmt<'a>],
    pub text: &'a str,
}

#[derive(Debug)]
pub struct SwitchStmt<'a> {
    pub init: Option<Stmt<'a>>,
    pub tag: Option<Expr<'a>>,
    pub body: &'a BlockStmt<'a>,
    pub text: &'a str,
}

/// `assign` is `x := y.(type)` or `y.(type)`.
#[derive(Debug)]
pub struct TypeSwitchStmt<'a> {
    pub init: Option<Stmt<'a>>,
    pub assign: Stmt<'a>,
    pub body: &'a BlockStmt<'a>,
    pub text: &'a str,
}

/// A `case` of a select statement; `comm` is `None` for `default`.
#[derive(Debug)]
pub struct CommClause<'a> {
    pub comm: Option<Stmt<'a>>,
    pub body: &'a [Stmt<'a>],
    pub text: &'a str,
}

#[derive(Debug)]
pub struct SelectStmt<'a> {
    pub body: &'a BlockStmt<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct ForStmt<'a> {
    pub init: Option<Stmt<'a>>,
    pub cond: Option<Expr<'a>>,
    pub post: Option<Stmt<'a>>,
    pub body: &'a BlockStmt<'a>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct RangeStmt<'a> {
    pub key: Option<Expr<'a>>,
    pub value: Option<Expr<'a>>,
    /// `=` or `:=`; `None` for `for range x`.
    pub tok: Option<AssignOp>,
    pub x: Expr<'a>,
    pub body: &'a BlockStmt<'a>,
    pub text: &'a str,
}

// === Specs and declarations ===

#[derive(Debug)]
pub struct ImportSpec<'a> {
    pub doc: Option<&'a CommentGroup<'a>>,
    pub name: Option<&'a Ident<'a>>,
    pub path: &'a BasicLit<'a>,
    pub comment: Option<&'a CommentGroup<'a>>,
    pub text: &'a str,
}

/// One line of a `const` or `var` declaration.
#[derive(Debug)]
pub struct ValueSpec<'a> {
    pub doc: Option<&'a CommentGroup<'a>>,
    pub names: &'a [&'a Ident<'a>],
    pub ty: Option<Expr<'a>>,
    pub values: &'a [Expr<'a>],
    pub comment: Option<&'a CommentGroup<'a>>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct TypeSpec<'a> {
    pub doc: Option<&'a CommentGroup<'a>>,
    pub name: &'a Ident<'a>,
    /// `type A = B`
    pub assign: bool,
    pub ty: Expr<'a>,
    pub comment: Option<&'a CommentGroup<'a>>,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct GenDecl<'a> {
    pub doc: Option<&'a CommentGroup<'a>>,
    pub tok: DeclKind,
    pub specs: &'a [Spec<'a>],
    /// Specs were grouped in parentheses.
    pub lparen: bool,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct FuncDecl<'a> {
    pub doc: Option<&'a CommentGroup<'a>>,
    pub recv: Option<&'a FieldList<'a>>,
    pub name: &'a Ident<'a>,
    pub ty: &'a FuncType<'a>,
    pub body: Option<&'a BlockStmt<'a>>,
    pub text: &'a str,
}

// === Units ===

/// One source file. `name` is the unit name without the `.go` suffix.
#[derive(Debug)]
pub struct File<'a> {
    pub name: &'a str,
    pub doc: Option<&'a CommentGroup<'a>>,
    pub package: &'a Ident<'a>,
    pub decls: &'a [Decl<'a>],
    pub imports: &'a [&'a ImportSpec<'a>],
    /// Every comment group in the file, in source order. Not walked.
    pub comments: &'a [&'a CommentGroup<'a>],
    pub text: &'a str,
}

/// Files of one package, sorted by unit name.
#[derive(Debug)]
pub struct Package<'a> {
    pub name: &'a str,
    pub files: &'a [(&'a str, &'a File<'a>)],
}

impl<'a> Package<'a> {
    pub fn file(&self, name: &str) -> Option<&'a File<'a>> {
        self.files
            .binary_search_by_key(&name, |(key, _)| *key)
            .ok()
            .map(|idx| self.files[idx].1)
    }
}
