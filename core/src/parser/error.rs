use crate::ast::Span;
use crate::diagnostics::{Diagnostic, Severity};
use crate::parser::grammar::Rule;
use crate::{String, ToString, Vec, format, vec};

/// Parser error with the source it was raised against.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Unit the source came from (`foo.go`), or `<expr>`.
    pub origin: String,
    pub source: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// Unexpected token
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    /// Maximum nesting depth exceeded
    #[error("Nesting depth exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { depth: usize, max_depth: usize },
    /// Syntactically well-formed but not a valid statement
    #[error("{message}")]
    InvalidStatement { message: String },
    /// Files of one package disagree on the package name
    #[error("Package {found} does not match package {expected}")]
    PackageMismatch { expected: String, found: String },
    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    #[error("{message}")]
    Other { message: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, origin: &str, source: &str, span: Span) -> Self {
        Self {
            kind,
            origin: origin.to_string(),
            source: source.to_string(),
            span,
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ParseErrorKind::UnexpectedToken { .. } => ("P001", vec![]),
            ParseErrorKind::MaxDepthExceeded { .. } => (
                "P004",
                vec!["Reduce nesting or simplify the expression".to_string()],
            ),
            ParseErrorKind::InvalidStatement { .. } => ("P005", vec![]),
            ParseErrorKind::PackageMismatch { .. } => (
                "P006",
                vec!["All files of a package must use the same package clause".to_string()],
            ),
            ParseErrorKind::Other { .. } => ("P999", vec![]),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            help,
            code: Some(code.to_string()),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let diagnostic = self.to_diagnostic();
        write!(f, "{}: {}", diagnostic.severity, diagnostic.message)?;

        if let Some(ref code) = diagnostic.code {
            write!(f, " [{}]", code)?;
        }

        for help_msg in &diagnostic.help {
            write!(f, "\nhelp: {}", help_msg)?;
        }

        Ok(())
    }
}

impl core::error::Error for ParseError {}

/// Convert Pest error to human-readable ParseError
pub fn convert_pest_error(err: pest::error::Error<Rule>, origin: &str, source: &str) -> ParseError {
    use pest::error::ErrorVariant;

    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span(pos..pos),
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => {
            let expected = format_expected_rules(&positives);
            let found = match negatives.first() {
                Some(rule) => describe_rule(*rule).to_string(),
                None => describe_input(source, span.start()),
            };
            ParseErrorKind::UnexpectedToken { expected, found }
        }
        ErrorVariant::CustomError { message } => ParseErrorKind::Other { message },
    };

    ParseError::new(kind, origin, source, span)
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    let mut concepts: Vec<&str> = Vec::new();
    for rule in rules {
        let concept = describe_rule(*rule);
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.split_last() {
        None => "something else".to_string(),
        Some((only, [])) => only.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// Groups grammar rules into the concepts a Go programmer would name.
fn describe_rule(rule: Rule) -> &'static str {
    match rule {
        Rule::ident | Rule::qualified_ident | Rule::ident_list | Rule::import_name => "identifier",
        Rule::int_lit
        | Rule::float_lit
        | Rule::imaginary_lit
        | Rule::rune_lit
        | Rule::interpreted_string
        | Rule::raw_string => "literal",
        Rule::lor
        | Rule::land
        | Rule::eql
        | Rule::neq
        | Rule::lss
        | Rule::leq
        | Rule::gtr
        | Rule::geq
        | Rule::add
        | Rule::sub
        | Rule::or
        | Rule::xor
        | Rule::mul
        | Rule::quo
        | Rule::rem
        | Rule::shl
        | Rule::shr
        | Rule::and
        | Rule::and_not => "operator",
        Rule::assign_op | Rule::send_op | Rule::inc_dec_op | Rule::range_assign => "assignment",
        Rule::selector_op
        | Rule::type_assert_op
        | Rule::index_op
        | Rule::slice_op
        | Rule::call_op
        | Rule::literal_value => "operator",
        Rule::pointer_type
        | Rule::array_type
        | Rule::map_type
        | Rule::chan_type
        | Rule::func_type
        | Rule::struct_type
        | Rule::interface_type
        | Rule::paren_type => "type",
        Rule::package_clause => "package clause",
        Rule::import_decl
        | Rule::const_decl
        | Rule::var_decl
        | Rule::type_decl
        | Rule::func_decl => "declaration",
        Rule::labeled_stmt
        | Rule::simple_stmt
        | Rule::goto_stmt
        | Rule::go_stmt
        | Rule::defer_stmt
        | Rule::return_stmt
        | Rule::break_stmt
        | Rule::continue_stmt
        | Rule::fallthrough_stmt
        | Rule::block
        | Rule::if_stmt
        | Rule::type_switch_stmt
        | Rule::expr_switch_stmt
        | Rule::select_stmt
        | Rule::for_stmt
        | Rule::empty_stmt => "statement",
        Rule::case_clause | Rule::comm_clause => "case clause",
        Rule::EOI => "end of input",
        _ => "expression",
    }
}

/// Names the token at `pos` when pest does not say what it found.
fn describe_input(source: &str, pos: usize) -> String {
    let rest = source.get(pos..).unwrap_or_default();
    match rest.chars().next() {
        None => "end of input".to_string(),
        // Automatic semicolons are invisible in the original text.
        Some(';') | Some('\n') => "newline".to_string(),
        Some(_) => {
            let token: String = rest
                .chars()
                .take_while(|c| !c.is_whitespace())
                .take(16)
                .collect();
            format!("'{}'", token)
        }
    }
}
