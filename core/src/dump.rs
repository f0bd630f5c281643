//! Deterministic text rendering of a collected node sequence.
//!
//! One line per node: kind, the first 31 characters of its source text
//! (newlines escaped), and its identifier. Golden files in the test suite
//! are written in this format.

use core::fmt::Write;

use serde::Serialize;

use crate::collect::NodeWithId;
use crate::{String, ToString, Vec};

/// Placeholder for nodes without source text.
pub const NO_TEXT: &str = "(n/a)";

/// One rendered line of the dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpEntry {
    pub kind: &'static str,
    pub text: String,
    pub id: String,
}

impl DumpEntry {
    pub fn new(entry: &NodeWithId<'_>) -> Self {
        Self {
            kind: entry.node.kind().name(),
            text: short_text(entry.node.text()),
            id: entry.id.to_string(),
        }
    }
}

/// Escapes newlines so every node stays on one line.
pub fn short_text(text: &str) -> String {
    if text.is_empty() {
        NO_TEXT.to_string()
    } else {
        text.replace('\n', "\\n")
    }
}

pub fn dump_entries(nodes: &[NodeWithId<'_>]) -> Vec<DumpEntry> {
    nodes.iter().map(DumpEntry::new).collect()
}

/// Renders `nodes` one per line.
pub fn dump(nodes: &[NodeWithId<'_>]) -> String {
    let mut out = String::new();
    for entry in dump_entries(nodes) {
        // Writing to a String cannot fail.
        let _ = writeln!(out, " {:<15} | {:<31.31} | {}", entry.kind, entry.text, entry.id);
    }
    out
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::collect::collect_all;
    use crate::parser::{parse_expr, parse_file};

    #[test]
    fn test_dump_expression() {
        let arena = Bump::new();
        let expr = parse_expr(&arena, "a.b(1)").unwrap();
        let expected = concat!(
            " CallExpr        | a.b(1)                          | CallExpr\n",
            " SelectorExpr    | a.b                             | CallExpr/Fun\n",
            " Ident           | a                               | CallExpr/Fun/X\n",
            " Ident           | b                               | CallExpr/Fun/Sel\n",
            " BasicLit        | 1                               | CallExpr/Args/0\n",
        );
        assert_eq!(dump(&collect_all(expr)), expected);
    }

    #[test]
    fn test_long_text_is_truncated_and_escaped() {
        assert_eq!(short_text("a\nb"), "a\\nb");
        assert_eq!(short_text(""), NO_TEXT);

        let arena = Bump::new();
        let file = parse_file(
            &arena,
            "long",
            "package long\n\nvar averyveryverylongname = 1234567890\n",
        )
        .unwrap();
        let dumped = dump(&collect_all(file));
        let first = dumped.lines().next().unwrap();
        assert_eq!(
            first,
            " File            | package long\\n\\nvar averyveryve | long.go"
        );
    }
}
