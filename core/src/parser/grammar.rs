use lazy_static::lazy_static;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    pub(super) static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::lor, Assoc::Left))           // `||`
        .op(Op::infix(Rule::land, Assoc::Left))          // `&&`
        .op(
            Op::infix(Rule::eql, Assoc::Left) |
            Op::infix(Rule::neq, Assoc::Left) |
            Op::infix(Rule::lss, Assoc::Left) |
            Op::infix(Rule::leq, Assoc::Left) |
            Op::infix(Rule::gtr, Assoc::Left) |
            Op::infix(Rule::geq, Assoc::Left)
        )                                               // comparisons
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left) |
            Op::infix(Rule::or, Assoc::Left) |
            Op::infix(Rule::xor, Assoc::Left)
        )                                               // `+`, `-`, `|`, `^`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::quo, Assoc::Left) |
            Op::infix(Rule::rem, Assoc::Left) |
            Op::infix(Rule::shl, Assoc::Left) |
            Op::infix(Rule::shr, Assoc::Left) |
            Op::infix(Rule::and, Assoc::Left) |
            Op::infix(Rule::and_not, Assoc::Left)
        )                                               // `*`, `/`, `%`, `<<`, `>>`, `&`, `&^`

        // Unary operators bind tighter than any binary operator.
        .op(
            Op::prefix(Rule::u_plus) |
            Op::prefix(Rule::u_neg) |
            Op::prefix(Rule::u_not) |
            Op::prefix(Rule::u_xor) |
            Op::prefix(Rule::u_deref) |
            Op::prefix(Rule::u_addr) |
            Op::prefix(Rule::u_recv)
        )

        // Primary expression suffixes.
        .op(
            Op::postfix(Rule::selector_op) |
            Op::postfix(Rule::type_assert_op) |
            Op::postfix(Rule::index_op) |
            Op::postfix(Rule::slice_op) |
            Op::postfix(Rule::call_op) |
            Op::postfix(Rule::literal_value)
        )
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/go.pest"]
pub struct GoParser;

/// Words that never name an identifier.
pub(super) const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];
