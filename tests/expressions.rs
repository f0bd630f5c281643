mod cases;

test_case! {
    name: call_with_selector,
    expr: "a.b(1, c)",
    nodes: [
        "CallExpr CallExpr",
        "SelectorExpr CallExpr/Fun",
        "Ident CallExpr/Fun/X",
        "Ident CallExpr/Fun/Sel",
        "BasicLit CallExpr/Args/0",
        "Ident CallExpr/Args/1",
    ],
}

test_case! {
    name: composite_literal_with_keys,
    expr: "T{A: 1, 2}",
    nodes: [
        "CompositeLit CompositeLit",
        "Ident CompositeLit/Type",
        "KeyValueExpr CompositeLit/Elts/0",
        "Ident CompositeLit/Elts/0/Key",
        "BasicLit CompositeLit/Elts/0/Value",
        "BasicLit CompositeLit/Elts/1",
    ],
}

test_case! {
    name: map_literal_type,
    expr: "map[string][]int{}",
    nodes: [
        "CompositeLit CompositeLit",
        "MapType CompositeLit/Type",
        "Ident CompositeLit/Type/Key",
        "ArrayType CompositeLit/Type/Value",
        "Ident CompositeLit/Type/Value/Elt",
    ],
}

test_case! {
    name: slice_skips_missing_bounds,
    expr: "s[1:]",
    nodes: [
        "SliceExpr SliceExpr",
        "Ident SliceExpr/X",
        "BasicLit SliceExpr/Low",
    ],
}

test_case! {
    name: type_assertion_to_pointer,
    expr: "x.(*T)",
    nodes: [
        "TypeAssertExpr TypeAssertExpr",
        "Ident TypeAssertExpr/X",
        "StarExpr TypeAssertExpr/Type",
        "Ident TypeAssertExpr/Type/X",
    ],
}

test_case! {
    name: parens_and_receive,
    expr: "(<-ch)",
    nodes: [
        "ParenExpr ParenExpr",
        "UnaryExpr ParenExpr/X",
        "Ident ParenExpr/X/X",
    ],
}

test_case! {
    name: function_literal,
    expr: "func(x int) int { return x }",
    nodes: [
        "FuncLit FuncLit",
        "FuncType FuncLit/Type",
        "FieldList FuncLit/Type/Params",
        "Field FuncLit/Type/Params/List/0",
        "Ident FuncLit/Type/Params/List/0/Names/0",
        "Ident FuncLit/Type/Params/List/0/Type",
        "FieldList FuncLit/Type/Results",
        "Field FuncLit/Type/Results/List/0",
        "Ident FuncLit/Type/Results/List/0/Type",
        "BlockStmt FuncLit/Body",
        "ReturnStmt FuncLit/Body/List/0",
        "Ident FuncLit/Body/List/0/Results/0",
    ],
}
