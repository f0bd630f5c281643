// Tests with valid input for each rule in the grammar.
//
// Inputs stay on one line: they are parsed without the scanner, so any
// semicolons have to be written out.

use crate::parser::grammar::{GoParser, Rule};
use pest::Parser;
use pest::iterators::Pair;

fn contains_rule(pair: Pair<Rule>, target: Rule) -> bool {
    if pair.as_rule() == target {
        return true;
    }
    for inner in pair.into_inner() {
        if contains_rule(inner, target) {
            return true;
        }
    }
    false
}

macro_rules! rule_examples {
    ( $start:ident, $template:literal; $($rule:ident => [$($input:expr),* $(,)?]),* $(,)? ) => {
        $(
            #[test]
            fn $rule() {
                let inputs = vec![$($input),*];
                for input in inputs {
                    let source = format!($template, input);
                    let result = GoParser::parse(Rule::$start, &source)
                        .unwrap_or_else(|e| panic!("Failed to parse '{}': {}", input, e));
                    let root = result.into_iter().next().unwrap();
                    assert!(
                        contains_rule(root.clone(), Rule::$rule),
                        "Expected to find rule {:?} in parse tree for input '{}'",
                        Rule::$rule,
                        input
                    );
                }
            }
        )*
    };
}

mod expressions {
    use super::*;

    rule_examples! {
        expression_source, "{}";
        int_lit => ["42", "0x1F", "0b1010", "0o17", "1_000", "0755"],
        float_lit => ["3.14", "1.", ".5", "6.022e23", "1E-9"],
        imaginary_lit => ["2i", "1.5i"],
        rune_lit => ["'a'", "'\\n'", "'\\''", "'\\x41'"],
        interpreted_string => ["\"hello\"", "\"tab\\t\"", "\"quote\\\"\""],
        raw_string => ["`raw`", "`with \"quotes\"`"],
        ident => ["foo", "_bar1", "héllo", "format", "gopher"],
        selector_op => ["a.b", "a.b.c", "f().x"],
        index_op => ["m[k]", "a[1][2]"],
        slice_op => ["s[1:]", "s[:2]", "s[1:2:3]", "s[:]"],
        slice_max => ["s[1:2:3]", "s[:2:3]"],
        call_op => ["f()", "f(1, 2)", "f(a,)", "pkg.F(x)"],
        call_ellipsis => ["append(a, b...)", "f(xs...,)"],
        type_assert_op => ["x.(int)", "x.(*T)", "x.(pkg.T)"],
        literal_value => ["T{}", "T{1, 2}", "pkg.T{A: 1}", "T{\n}"],
        keyed_element => ["T{A: 1}", "map[string]int{\"a\": 1}"],
        typed_composite => ["[]int{1, 2}", "[...]string{\"x\"}", "map[string][]int{\"a\": {1}}", "struct{}{}"],
        func_lit => ["func() {}", "func(x int) int { return x }"],
        paren_expr => ["(a)", "(a + b) * c"],
        u_neg => ["-x", "- 1"],
        u_not => ["!ok"],
        u_xor => ["^mask"],
        u_recv => ["<-ch", "<-<-ch"],
        u_addr => ["&x", "&T{}"],
        u_deref => ["*p", "**pp"],
        lor => ["a || b"],
        land => ["a && b"],
        eql => ["a == b"],
        neq => ["a != b"],
        lss => ["a < b"],
        leq => ["a <= b"],
        gtr => ["a > b"],
        geq => ["a >= b"],
        add => ["a + b", "a+b"],
        sub => ["a - b", "a - -b"],
        or => ["a | b"],
        xor => ["a ^ b"],
        mul => ["a * b"],
        quo => ["a / b"],
        rem => ["a % b"],
        shl => ["a << 2"],
        shr => ["a >> 2"],
        and => ["a & b"],
        and_not => ["a &^ b"],
        chan_type => ["make(chan int)", "make(<-chan int)", "make(chan<- int)"],
        chan_dir => ["make(<-chan int)"],
        map_type => ["make(map[string]int)"],
        array_type => ["make([]int, 3)", "[]byte(s)"],
        func_type => ["f(func(int) bool)"],
        interface_type => ["x.(interface{ M() })", "interface{}(nil)"],
        struct_type => ["struct{ A int }{1}"],
    }
}

mod statements {
    use super::*;

    rule_examples! {
        source_file, "package p; func f() {{ {} }}";
        simple_stmt => ["x := 1", "a, b = b, a", "x += 2", "ch <- v", "i++", "f()", "x := T{}"],
        assign_op => ["x <<= 1", "x &^= y", "x = 1"],
        send_op => ["ch <- v"],
        inc_dec_op => ["i++", "i--"],
        labeled_stmt => ["L: for {}", "L:"],
        go_stmt => ["go f()", "go func() {}()"],
        defer_stmt => ["defer mu.Unlock()"],
        return_stmt => ["return", "return a, b"],
        break_stmt => ["for { break }", "L: for { break L }"],
        continue_stmt => ["for { continue }"],
        goto_stmt => ["goto L"],
        fallthrough_stmt => ["switch { case true: fallthrough; default: }"],
        if_stmt => ["if x {}", "if x := f(); x > 0 {} else if y {} else {}"],
        header_simple_stmt => ["if x := f(); x {}"],
        expr_switch_stmt => ["switch {}", "switch x {}", "switch x := f(); x { case 1, 2: default: }"],
        case_clause => ["switch x { case 1: a() }"],
        type_switch_stmt => ["switch x.(type) {}", "switch v := x.(type) { case int, string: case nil: }"],
        type_switch_guard => ["switch v := x.(type) {}"],
        select_stmt => ["select {}", "select { case v := <-ch: _ = v; case ch <- 1: default: }"],
        comm_clause => ["select { default: }"],
        for_stmt => ["for {}", "for x < 10 {}", "for i := 0; i < 10; i++ {}", "for ;; {}"],
        for_clause => ["for i := 0; i < 10; i++ {}"],
        for_post => ["for ; ; i++ {}"],
        range_clause => ["for k, v := range m {}", "for range ch {}", "for i = range s {}"],
        range_kw => ["for range ch {}"],
        empty_stmt => [";", "x := 1; ;"],
        block => ["{ x := 1; _ = x }"],
        var_decl => ["var x = 1"],
    }
}

mod declarations {
    use super::*;

    rule_examples! {
        source_file, "package p; {}";
        import_decl => ["import \"fmt\""],
        import_group => ["import (\"a\"; b \"b\"; . \"c\")"],
        import_name => ["import f \"fmt\"", "import . \"fmt\""],
        const_decl => ["const A = 1", "const (A = iota; B)", "const X int = 1"],
        const_spec => ["const (A = iota; B)"],
        var_spec => ["var a, b = 1, 2", "var (x int; y = 2)"],
        type_decl => ["type T int", "type (T struct{}; U interface{})"],
        alias_mark => ["type A = B"],
        func_decl => ["func f() {}", "func (t *T) M(a, b int) (int, error) { return 0, nil }", "func g(xs ...int)"],
        receiver => ["func (T) M() {}"],
        parameter_decl => ["func f(a, b int, c string) {}"],
        unnamed_parameter => ["func f(int, string) {}", "func h(...int)"],
        variadic => ["func g(xs ...int)", "func h(...int)"],
        result => ["func f() int { return 0 }", "func f() (x int) { return }"],
        field_decl => ["type P struct { X, Y int `json:\"x\"`; *Base; fmt.Stringer }"],
        embedded_pointer => ["type P struct { *Base }"],
        method_elem => ["type I interface { M(); fmt.Stringer }"],
        pointer_type => ["var p *int"],
        paren_type => ["var x (int)"],
        qualified_ident => ["var w io.Writer"],
        ellipsis_length => ["var a = [...]int{1}"],
    }
}
