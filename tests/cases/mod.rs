use idast::{Node, collect_all};

/// Renders every node of a walk as `<kind> <identifier>`, in visit order.
pub fn identified<'a>(root: impl Into<Node<'a>>) -> Vec<String> {
    collect_all(root)
        .iter()
        .map(|entry| format!("{} {}", entry.node.kind(), entry.id))
        .collect()
}

/// Declares a test that parses `input` (an expression, or a file named
/// `t`) and compares the identified nodes.
#[macro_export]
macro_rules! test_case {
    (name: $name:ident, expr: $input:expr, nodes: [$($node:expr),* $(,)?] $(,)?) => {
        #[test]
        fn $name() {
            let arena = bumpalo::Bump::new();
            let root = idast::parse_expr(&arena, $input)
                .unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", $input, e));
            let expected: Vec<&str> = vec![$($node),*];
            pretty_assertions::assert_eq!($crate::cases::identified(root), expected);
        }
    };
    (name: $name:ident, file: $input:expr, nodes: [$($node:expr),* $(,)?] $(,)?) => {
        #[test]
        fn $name() {
            let arena = bumpalo::Bump::new();
            let root = idast::parse_file(&arena, "t", $input)
                .unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", $input, e));
            let expected: Vec<&str> = vec![$($node),*];
            pretty_assertions::assert_eq!($crate::cases::identified(root), expected);
        }
    };
}
