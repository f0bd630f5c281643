use bumpalo::Bump;
use pretty_assertions::assert_eq;

use super::*;
use crate::ast::{Expr, NodeKind};
use crate::parser::{parse_expr, parse_file};
use crate::vec;

#[test]
fn test_map_of_nested_binary_expr() {
    let arena = Bump::new();
    let expr = parse_expr(&arena, "1 + 2 + 3").unwrap();
    let Expr::BinaryExpr(root) = expr else {
        panic!("expected a binary expression, got {expr:?}");
    };
    let Expr::BinaryExpr(left) = root.x else {
        panic!("expected a left-nested binary expression");
    };

    let map = build_map(expr);
    assert_eq!(map.len(), 5);
    assert_eq!(map.get(expr).unwrap().to_string(), "BinaryExpr");
    assert_eq!(map.get(root.x).unwrap().to_string(), "BinaryExpr/X");
    assert_eq!(map.get(left.x).unwrap().to_string(), "BinaryExpr/X/X");
    assert_eq!(map.get(left.y).unwrap().to_string(), "BinaryExpr/X/Y");
    assert_eq!(map.get(root.y).unwrap().to_string(), "BinaryExpr/Y");
    assert_eq!(root.y.text(), "3");
}

#[test]
fn test_map_is_keyed_by_identity() {
    let arena = Bump::new();
    let expr = parse_expr(&arena, "x + x").unwrap();
    let Expr::BinaryExpr(sum) = expr else {
        panic!("expected a binary expression");
    };

    let map = build_map(expr);
    assert_eq!(map.get(sum.x).unwrap().to_string(), "BinaryExpr/X");
    assert_eq!(map.get(sum.y).unwrap().to_string(), "BinaryExpr/Y");

    let other = parse_expr(&arena, "x").unwrap();
    assert!(!map.contains(other));
}

#[test]
fn test_map_is_stable_across_builds() {
    let arena = Bump::new();
    let source = include_str!("../tests/testdata/kinds.go");
    let file = parse_file(&arena, "kinds", source).unwrap();

    let first = build_map(file);
    let second = build_map(file);

    assert_eq!(first.get(file), second.get(file));
    assert_eq!(first.len(), second.len());
    for (node, id) in first.iter() {
        assert_eq!(Some(id), second.get(node), "{:?} moved", node.kind());
    }
    let order = |map: &NodeMap<'_>| map.iter().map(|(_, id)| id.to_string()).collect::<Vec<_>>();
    assert_eq!(order(&first), order(&second));
}

#[test]
fn test_collect_matches_map() {
    let arena = Bump::new();
    let source = include_str!("../tests/testdata/small.go");
    let file = parse_file(&arena, "small", source).unwrap();

    let nodes = collect_all(file);
    let map = build_map(file);
    assert_eq!(nodes.len(), map.len());
    for entry in &nodes {
        assert_eq!(map.get(entry.node), Some(&entry.id));
    }
    assert_eq!(nodes[0].node.kind(), NodeKind::File);
    assert_eq!(nodes[0].id_string(), "small.go");
}

#[test]
fn test_identifiers_are_unique() {
    let arena = Bump::new();
    let source = include_str!("../tests/testdata/kinds.go");
    let file = parse_file(&arena, "kinds", source).unwrap();

    let nodes = collect_all(file);
    let duplicates = duplicate_ids(&nodes);
    assert!(duplicates.is_empty(), "duplicate identifiers: {duplicates:?}");
}

#[test]
fn test_duplicate_ids_reports_every_position() {
    let arena = Bump::new();
    let expr = parse_expr(&arena, "a + b").unwrap();
    let mut nodes = collect_all(expr);
    assert_eq!(nodes.len(), 3);

    // Simulate two list elements that received the same index label.
    nodes[2].id = nodes[1].id.clone();
    nodes.push(nodes[1].clone());

    assert_eq!(
        duplicate_ids(&nodes),
        vec![Duplicate {
            id: "BinaryExpr/X".into(),
            positions: vec![1, 2, 3],
        }]
    );
}
