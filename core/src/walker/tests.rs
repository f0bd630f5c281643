use bumpalo::Bump;
use pretty_assertions::assert_eq;

use super::*;
use crate::ast::NodeKind;
use crate::parser::{parse_expr, parse_file, parse_package};
use crate::test_utils::init_test_logging;
use crate::{String, ToString, Vec, vec};

/// Records every call; prunes the node whose path equals `prune_at`.
#[derive(Default)]
struct Recorder {
    events: Vec<(Option<NodeKind>, String)>,
    prune_at: Option<&'static str>,
}

impl<'a> Visitor<'a> for Recorder {
    fn visit(&mut self, node: Option<Node<'a>>, path: &Path) -> Option<&mut dyn Visitor<'a>> {
        let id = path.to_string();
        let prune = node.is_some() && self.prune_at == Some(id.as_str());
        self.events.push((node.map(Node::kind), id));
        if prune { None } else { Some(self) }
    }
}

fn ids(events: &[(Option<NodeKind>, String)]) -> Vec<&str> {
    events
        .iter()
        .filter(|(kind, _)| kind.is_some())
        .map(|(_, id)| id.as_str())
        .collect()
}

#[test]
fn test_binary_expr_is_left_associative() {
    init_test_logging();
    let arena = Bump::new();
    let expr = parse_expr(&arena, "1 + 2 + 3").unwrap();

    let mut recorder = Recorder::default();
    walk(&mut recorder, expr);

    assert_eq!(
        ids(&recorder.events),
        vec![
            "BinaryExpr",
            "BinaryExpr/X",
            "BinaryExpr/X/X",
            "BinaryExpr/X/Y",
            "BinaryExpr/Y",
        ]
    );
}

#[test]
fn test_sentinel_follows_each_subtree() {
    let arena = Bump::new();
    let expr = parse_expr(&arena, "f(x)").unwrap();

    let mut recorder = Recorder::default();
    walk(&mut recorder, expr);

    let expected = vec![
        (Some(NodeKind::CallExpr), "CallExpr"),
        (Some(NodeKind::Ident), "CallExpr/Fun"),
        (None, "CallExpr/Fun"),
        (Some(NodeKind::Ident), "CallExpr/Args/0"),
        (None, "CallExpr/Args/0"),
        (None, "CallExpr"),
    ];
    let actual: Vec<_> = recorder
        .events
        .iter()
        .map(|(kind, id)| (*kind, id.as_str()))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_list_slot_children_are_indexed_in_order() {
    let arena = Bump::new();
    let source = "package p\n\nfunc f() {\n    switch x {\n    case 1:\n        a(); b(); c()\n    }\n}\n";
    let file = parse_file(&arena, "p", source).unwrap();

    let clause = "p.go/Decls/0/Body/List/0/Body/List/0";
    let mut recorder = Recorder::default();
    walk(&mut recorder, file);
    let all = ids(&recorder.events);

    let position = |id: &str| all.iter().position(|x| *x == id);
    let body: Vec<_> = (0..3)
        .map(|i| position(&format!("{clause}/Body/{i}")).unwrap())
        .collect();
    assert!(position(clause).unwrap() < body[0]);
    assert!(body[0] < body[1] && body[1] < body[2]);
    assert_eq!(position(&format!("{clause}/Body/3")), None);
    assert!(position(&format!("{clause}/List/0")).is_some());
}

#[test]
fn test_index_labels_are_decimal() {
    let arena = Bump::new();
    let args: Vec<String> = (0..12).map(|i| i.to_string()).collect();
    let source = arena.alloc_str(&format!("f({})", args.join(", ")));
    let expr = parse_expr(&arena, source).unwrap();

    let mut recorder = Recorder::default();
    walk(&mut recorder, expr);
    let all = ids(&recorder.events);
    assert!(all.contains(&"CallExpr/Args/9"));
    assert!(all.contains(&"CallExpr/Args/10"));
    assert_eq!(all.last(), Some(&"CallExpr/Args/11"));
}

#[test]
fn test_pruned_node_still_gets_sentinel() {
    let arena = Bump::new();
    let expr = parse_expr(&arena, "f(g(1), 2)").unwrap();

    let mut recorder = Recorder {
        prune_at: Some("CallExpr/Args/0"),
        ..Recorder::default()
    };
    walk(&mut recorder, expr);

    let actual: Vec<_> = recorder
        .events
        .iter()
        .map(|(kind, id)| (*kind, id.as_str()))
        .collect();
    assert_eq!(
        actual,
        vec![
            (Some(NodeKind::CallExpr), "CallExpr"),
            (Some(NodeKind::Ident), "CallExpr/Fun"),
            (None, "CallExpr/Fun"),
            (Some(NodeKind::CallExpr), "CallExpr/Args/0"),
            (None, "CallExpr/Args/0"),
            (Some(NodeKind::BasicLit), "CallExpr/Args/1"),
            (None, "CallExpr/Args/1"),
            (None, "CallExpr"),
        ]
    );
}

#[test]
fn test_pruning_the_root() {
    let arena = Bump::new();
    let expr = parse_expr(&arena, "a + b").unwrap();

    let mut calls = Vec::new();
    inspect(expr, |node, path| {
        calls.push((node.map(Node::kind), path.to_string()));
        false
    });

    assert_eq!(
        calls,
        vec![
            (Some(NodeKind::BinaryExpr), "BinaryExpr".to_string()),
            (None, "BinaryExpr".to_string()),
        ]
    );
}

#[test]
fn test_sentinels_nest_like_a_stack() {
    let arena = Bump::new();
    let source = include_str!("../../tests/testdata/kinds.go");
    let file = parse_file(&arena, "kinds", source).unwrap();

    let mut open: Vec<String> = Vec::new();
    let mut visited = 0;
    inspect(file, |node, path| {
        match node {
            Some(_) => {
                visited += 1;
                if let Some(parent) = open.last() {
                    assert!(path.to_string().starts_with(parent.as_str()));
                }
                open.push(path.to_string());
            }
            None => assert_eq!(open.pop(), Some(path.to_string())),
        }
        true
    });
    assert!(open.is_empty());
    assert!(visited > 100);
}

struct Counter {
    seen: usize,
}

impl<'a> Visitor<'a> for Counter {
    fn visit(&mut self, node: Option<Node<'a>>, _path: &Path) -> Option<&mut dyn Visitor<'a>> {
        if node.is_some() {
            self.seen += 1;
        }
        Some(self)
    }
}

/// Hands function literal bodies to a separate visitor.
struct Outer {
    kinds: Vec<NodeKind>,
    inner: Counter,
}

impl<'a> Visitor<'a> for Outer {
    fn visit(&mut self, node: Option<Node<'a>>, _path: &Path) -> Option<&mut dyn Visitor<'a>> {
        match node {
            Some(Node::FuncLit(_)) => Some(&mut self.inner),
            Some(node) => {
                self.kinds.push(node.kind());
                Some(self)
            }
            None => None,
        }
    }
}

#[test]
fn test_returned_visitor_walks_children() {
    let arena = Bump::new();
    let expr = parse_expr(&arena, "f(func() { a(); b() }, c)").unwrap();

    let mut outer = Outer {
        kinds: Vec::new(),
        inner: Counter { seen: 0 },
    };
    walk(&mut outer, expr);

    assert_eq!(
        outer.kinds,
        vec![NodeKind::CallExpr, NodeKind::Ident, NodeKind::Ident]
    );
    // FuncType, Params, BlockStmt, then ExprStmt/CallExpr/Ident twice.
    assert_eq!(outer.inner.seen, 9);
}

/// Stops the whole traversal once `limit` nodes were seen.
struct Abort {
    limit: usize,
    seen: Vec<String>,
    calls_after_abort: usize,
}

impl<'a> Visitor<'a> for Abort {
    fn visit(&mut self, node: Option<Node<'a>>, path: &Path) -> Option<&mut dyn Visitor<'a>> {
        if self.seen.len() >= self.limit {
            self.calls_after_abort += 1;
            return None;
        }
        if node.is_some() {
            self.seen.push(path.to_string());
        }
        Some(self)
    }
}

#[test]
fn test_abort_flag_turns_remaining_calls_into_no_ops() {
    let arena = Bump::new();
    let expr = parse_expr(&arena, "a*b + c*d").unwrap();

    let mut abort = Abort {
        limit: 3,
        seen: Vec::new(),
        calls_after_abort: 0,
    };
    walk(&mut abort, expr);

    assert_eq!(
        abort.seen,
        vec!["BinaryExpr", "BinaryExpr/X", "BinaryExpr/X/X"]
    );
    assert!(abort.calls_after_abort > 0);
}

#[test]
fn test_file_root_uses_own_label() {
    let arena = Bump::new();
    let file = parse_file(&arena, "foo", "package foo\n").unwrap();

    let mut recorder = Recorder::default();
    walk(&mut recorder, file);
    assert_eq!(ids(&recorder.events), vec!["foo.go", "foo.go/Name"]);
}

#[test]
fn test_package_files_are_keyed_by_name() {
    let arena = Bump::new();
    let package = parse_package(
        &arena,
        &[("foo", "package p\n"), ("bar", "package p\nvar x int\n")],
    )
    .unwrap();

    let mut recorder = Recorder::default();
    walk(&mut recorder, package);
    let ids = ids(&recorder.events);

    assert_eq!(ids[0], "Package");
    assert_eq!(ids[1], "Package/Files/bar/bar.go");
    assert!(ids.contains(&"Package/Files/bar/bar.go/Decls/0/Specs/0/Type"));
    assert_eq!(ids.last(), Some(&"Package/Files/foo/foo.go/Name"));
    assert!(ids.iter().filter(|id| id.ends_with("foo.go")).count() == 1);
}
