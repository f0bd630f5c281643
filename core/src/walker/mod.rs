//! Depth-first traversal that assigns every node its structural path.
//!
//! For each node the walker:
//!
//! 1. pushes the node's own label, if it has one (source files only),
//! 2. calls `visit(Some(node), path)`,
//! 3. if the visitor returned a continuation, walks every child slot in the
//!    node's declared field order, pushing the slot name (and, for list
//!    slots, the zero-based index; for package files, the file key) around
//!    each child,
//! 4. calls `visit(None, path)` to signal that the subtree is finished,
//! 5. pops the own label.
//!
//! The root of a traversal is seeded with its own label, or its kind name
//! when it has none: walking `1 + 2 + 3` yields `BinaryExpr`,
//! `BinaryExpr/X`, `BinaryExpr/X/X`, ... All pushes go through
//! [`Path::scoped`], so the path is balanced on every exit.

use ecow::EcoString;

use crate::ast::Node;
use crate::format;
use crate::path::{Label, Path};

/// Receives every node of a traversal.
///
/// `visit(Some(node), path)` is called before the node's children;
/// returning `None` prunes them, returning `Some(v)` walks them with `v`
/// (usually `self`). `visit(None, path)` follows once the subtree is done,
/// on the visitor that was returned for the node, or on the pruning visitor
/// itself if there was none.
pub trait Visitor<'a> {
    fn visit(&mut self, node: Option<Node<'a>>, path: &Path) -> Option<&mut dyn Visitor<'a>>;
}

/// Walks the tree rooted at `root`.
pub fn walk<'a>(visitor: &mut dyn Visitor<'a>, root: impl Into<Node<'a>>) {
    let root = root.into();
    let mut path = Path::new();
    let seed = root
        .own_label()
        .unwrap_or_else(|| EcoString::from(root.kind().name()));
    path.push(seed);
    visit_node(visitor, root, &mut path);
    path.pop();
    debug_assert!(path.is_empty(), "unbalanced path after walk: {path}");
}

/// Walks the tree rooted at `root`, calling `f` for every node and once more
/// with `None` after each subtree. Returning `false` prunes the node's
/// children.
pub fn inspect<'a, F>(root: impl Into<Node<'a>>, f: F)
where
    F: FnMut(Option<Node<'a>>, &Path) -> bool,
{
    walk(&mut Inspector(f), root);
}

struct Inspector<F>(F);

impl<'a, F> Visitor<'a> for Inspector<F>
where
    F: FnMut(Option<Node<'a>>, &Path) -> bool,
{
    fn visit(&mut self, node: Option<Node<'a>>, path: &Path) -> Option<&mut dyn Visitor<'a>> {
        if (self.0)(node, path) { Some(self) } else { None }
    }
}

/// Visits `node` at `path` (which already carries the node's own label when
/// it is the root) and recurses into its children.
fn visit_node<'a>(visitor: &mut dyn Visitor<'a>, node: Node<'a>, path: &mut Path) {
    tracing::trace!(kind = node.kind().name(), %path, "visit");
    match visitor.visit(Some(node), path) {
        Some(children) => {
            walk_children(children, node, path);
            children.visit(None, path);
        }
        None => {
            visitor.visit(None, path);
        }
    }
}

/// Walks a child reached through a slot of its parent.
fn walk_node<'a>(visitor: &mut dyn Visitor<'a>, node: Node<'a>, path: &mut Path) {
    match node.own_label() {
        Some(label) => visit_node(visitor, node, &mut path.scoped(label)),
        None => visit_node(visitor, node, path),
    }
}

fn walk_one<'a>(
    visitor: &mut dyn Visitor<'a>,
    path: &mut Path,
    slot: &'static str,
    child: impl Into<Node<'a>>,
) {
    walk_node(visitor, child.into(), &mut path.scoped(slot));
}

fn walk_opt<'a, T: Into<Node<'a>>>(
    visitor: &mut dyn Visitor<'a>,
    path: &mut Path,
    slot: &'static str,
    child: Option<T>,
) {
    if let Some(child) = child {
        walk_one(visitor, path, slot, child);
    }
}

/// Walks every element of a list slot under `slot/<index>`.
fn walk_list<'a, T: Copy + Into<Node<'a>>>(
    visitor: &mut dyn Visitor<'a>,
    path: &mut Path,
    slot: &'static str,
    items: &[T],
) {
    if items.is_empty() {
        return;
    }
    let mut list = path.scoped(slot);
    for (index, &item) in items.iter().enumerate() {
        walk_node(visitor, item.into(), &mut list.scoped(index_label(index)));
    }
}

fn index_label(index: usize) -> Label {
    Label::from(format!("{index}").as_str())
}

/// Walks the children of `node` in declared field order.
fn walk_children<'a>(v: &mut dyn Visitor<'a>, node: Node<'a>, path: &mut Path) {
    match node {
        Node::Comment(_) => {}
        Node::CommentGroup(n) => walk_list(v, path, "List", n.list),
        Node::Field(n) => {
            walk_opt(v, path, "Doc", n.doc);
            walk_list(v, path, "Names", n.names);
            walk_one(v, path, "Type", n.ty);
            walk_opt(v, path, "Tag", n.tag);
            walk_opt(v, path, "Comment", n.comment);
        }
        Node::FieldList(n) => walk_list(v, path, "List", n.list),

        // Expressions
        Node::Ident(_) | Node::BasicLit(_) => {}
        Node::Ellipsis(n) => walk_opt(v, path, "Elt", n.elt),
        Node::FuncLit(n) => {
            walk_one(v, path, "Type", n.ty);
            walk_one(v, path, "Body", n.body);
        }
        Node::CompositeLit(n) => {
            walk_opt(v, path, "Type", n.ty);
            walk_list(v, path, "Elts", n.elts);
        }
        Node::ParenExpr(n) => walk_one(v, path, "X", n.x),
        Node::SelectorExpr(n) => {
            walk_one(v, path, "X", n.x);
            walk_one(v, path, "Sel", n.sel);
        }
        Node::IndexExpr(n) => {
            walk_one(v, path, "X", n.x);
            walk_one(v, path, "Index", n.index);
        }
        Node::SliceExpr(n) => {
            walk_one(v, path, "X", n.x);
            walk_opt(v, path, "Low", n.low);
            walk_opt(v, path, "High", n.high);
            walk_opt(v, path, "Max", n.max);
        }
        Node::TypeAssertExpr(n) => {
            walk_one(v, path, "X", n.x);
            walk_opt(v, path, "Type", n.ty);
        }
        Node::CallExpr(n) => {
            walk_one(v, path, "Fun", n.fun);
            walk_list(v, path, "Args", n.args);
        }
        Node::StarExpr(n) => walk_one(v, path, "X", n.x),
        Node::UnaryExpr(n) => walk_one(v, path, "X", n.x),
        Node::BinaryExpr(n) => {
            walk_one(v, path, "X", n.x);
            walk_one(v, path, "Y", n.y);
        }
        Node::KeyValueExpr(n) => {
            walk_one(v, path, "Key", n.key);
            walk_one(v, path, "Value", n.value);
        }

        // Types
        Node::ArrayType(n) => {
            walk_opt(v, path, "Len", n.len);
            walk_one(v, path, "Elt", n.elt);
        }
        Node::StructType(n) => walk_one(v, path, "Fields", n.fields),
        Node::FuncType(n) => {
            walk_one(v, path, "Params", n.params);
            walk_opt(v, path, "Results", n.results);
        }
        Node::InterfaceType(n) => walk_one(v, path, "Methods", n.methods),
        Node::MapType(n) => {
            walk_one(v, path, "Key", n.key);
            walk_one(v, path, "Value", n.value);
        }
        Node::ChanType(n) => walk_one(v, path, "Value", n.value),

        // Statements
        Node::DeclStmt(n) => walk_one(v, path, "Decl", n.decl),
        Node::EmptyStmt(_) => {}
        Node::LabeledStmt(n) => {
            walk_one(v, path, "Label", n.label);
            walk_one(v, path, "Stmt", n.stmt);
        }
        Node::ExprStmt(n) => walk_one(v, path, "X", n.x),
        Node::SendStmt(n) => {
            walk_one(v, path, "Chan", n.chan);
            walk_one(v, path, "Value", n.value);
        }
        Node::IncDecStmt(n) => walk_one(v, path, "X", n.x),
        Node::AssignStmt(n) => {
            walk_list(v, path, "Lhs", n.lhs);
            walk_list(v, path, "Rhs", n.rhs);
        }
        Node::GoStmt(n) => walk_one(v, path, "Call", n.call),
        Node::DeferStmt(n) => walk_one(v, path, "Call", n.call),
        Node::ReturnStmt(n) => walk_list(v, path, "Results", n.results),
        Node::BranchStmt(n) => walk_opt(v, path, "Label", n.label),
        Node::BlockStmt(n) => walk_list(v, path, "List", n.list),
        Node::IfStmt(n) => {
            walk_opt(v, path, "Init", n.init);
            walk_one(v, path, "Cond", n.cond);
            walk_one(v, path, "Body", n.body);
            walk_opt(v, path, "Else", n.else_branch);
        }
        Node::CaseClause(n) => {
            walk_list(v, path, "List", n.list);
            walk_list(v, path, "Body", n.body);
        }
        Node::SwitchStmt(n) => {
            walk_opt(v, path, "Init", n.init);
            walk_opt(v, path, "Tag", n.tag);
            walk_one(v, path, "Body", n.body);
        }
        Node::TypeSwitchStmt(n) => {
            walk_opt(v, path, "Init", n.init);
            walk_one(v, path, "Assign", n.assign);
            walk_one(v, path, "Body", n.body);
        }
        Node::CommClause(n) => {
            walk_opt(v, path, "Comm", n.comm);
            walk_list(v, path, "Body", n.body);
        }
        Node::SelectStmt(n) => walk_one(v, path, "Body", n.body),
        Node::ForStmt(n) => {
            walk_opt(v, path, "Init", n.init);
            walk_opt(v, path, "Cond", n.cond);
            walk_opt(v, path, "Post", n.post);
            walk_one(v, path, "Body", n.body);
        }
        Node::RangeStmt(n) => {
            walk_opt(v, path, "Key", n.key);
            walk_opt(v, path, "Value", n.value);
            walk_one(v, path, "X", n.x);
            walk_one(v, path, "Body", n.body);
        }

        // Declarations
        Node::ImportSpec(n) => {
            walk_opt(v, path, "Doc", n.doc);
            walk_opt(v, path, "Name", n.name);
            walk_one(v, path, "Path", n.path);
            walk_opt(v, path, "Comment", n.comment);
        }
        Node::ValueSpec(n) => {
            walk_opt(v, path, "Doc", n.doc);
            walk_list(v, path, "Names", n.names);
            walk_opt(v, path, "Type", n.ty);
            walk_list(v, path, "Values", n.values);
            walk_opt(v, path, "Comment", n.comment);
        }
        Node::TypeSpec(n) => {
            walk_opt(v, path, "Doc", n.doc);
            walk_one(v, path, "Name", n.name);
            walk_one(v, path, "Type", n.ty);
            walk_opt(v, path, "Comment", n.comment);
        }
        Node::GenDecl(n) => {
            walk_opt(v, path, "Doc", n.doc);
            walk_list(v, path, "Specs", n.specs);
        }
        Node::FuncDecl(n) => {
            walk_opt(v, path, "Doc", n.doc);
            walk_opt(v, path, "Recv", n.recv);
            walk_one(v, path, "Name", n.name);
            walk_one(v, path, "Type", n.ty);
            walk_opt(v, path, "Body", n.body);
        }

        // Units
        Node::File(n) => {
            walk_opt(v, path, "Doc", n.doc);
            walk_one(v, path, "Name", n.package);
            walk_list(v, path, "Decls", n.decls);
        }
        Node::Package(n) => {
            let mut files = path.scoped("Files");
            for &(key, file) in n.files {
                walk_node(v, Node::File(file), &mut files.scoped(key));
            }
        }
    }
}

#[cfg(test)]
mod tests;
