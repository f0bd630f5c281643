//! Parser for the supported subset of Go.
//!
//! Parsing runs in three steps: [`scan`] makes automatic semicolons
//! explicit and blanks out comments, the pest grammar parses the masked
//! text, and the builder allocates the syntax tree in the caller's arena.
//! Every node borrows its text from the original source.

mod builder;
mod comments;
pub mod error;
mod grammar;
mod scan;

use bumpalo::Bump;
use pest::Parser;

use crate::ast::{Expr, File, Package, Span, UNIT_SUFFIX};
use crate::path::SEPARATOR;
use crate::{Vec, format};
use builder::Builder;
use comments::CommentIndex;
use error::convert_pest_error;
use grammar::{GoParser, Rule};

pub use error::{ParseError, ParseErrorKind};

/// Origin reported for errors in standalone expressions.
pub const EXPR_ORIGIN: &str = "<expr>";

/// Parser configuration.
///
/// # Example
///
/// ```
/// use idast_core::parser::ParseOptions;
///
/// let options = ParseOptions {
///     comments: false,
///     ..ParseOptions::default()
/// };
/// assert_eq!(options.max_depth, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Group comments and attach doc and line comments. When off, comments
    /// are skipped like whitespace.
    pub comments: bool,
    /// Deepest nesting of brackets, expressions, statements, or types
    /// accepted before failing with `MaxDepthExceeded`.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            comments: true,
            max_depth: 500,
        }
    }
}

/// Parses the unit `name` (without the `.go` suffix) with default options.
///
/// The name becomes a path label, so it may not contain `/`.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use idast_core::parser::parse_file;
///
/// let arena = Bump::new();
/// let file = parse_file(&arena, "main", "package main\n\nfunc main() {}\n").unwrap();
/// assert_eq!(file.package.name, "main");
/// assert_eq!(file.decls.len(), 1);
/// ```
pub fn parse_file<'a>(
    arena: &'a Bump,
    name: &'a str,
    source: &'a str,
) -> Result<&'a File<'a>, ParseError> {
    parse_file_with_options(arena, name, source, &ParseOptions::default())
}

pub fn parse_file_with_options<'a>(
    arena: &'a Bump,
    name: &'a str,
    source: &'a str,
    options: &ParseOptions,
) -> Result<&'a File<'a>, ParseError> {
    let origin: &'a str = arena.alloc_str(&format!("{name}{UNIT_SUFFIX}"));
    if name.contains(SEPARATOR) {
        return Err(ParseError::new(
            ParseErrorKind::Other {
                message: format!("unit name {name} contains {SEPARATOR}"),
            },
            origin,
            source,
            Span::new(0, 0),
        ));
    }
    let scanned = scan::scan(origin, source, options.max_depth)?;
    let masked: &'a str = arena.alloc_str(&scanned.masked);

    let pair = GoParser::parse(Rule::source_file, masked)
        .map_err(|err| convert_pest_error(err, origin, source))?
        .next()
        .ok_or_else(|| missing_root(origin, source))?;

    let comments = if options.comments {
        CommentIndex::build(arena, source, masked, &scanned.comments)
    } else {
        CommentIndex::default()
    };
    let builder = Builder::new(arena, origin, source, masked, comments, options.max_depth);
    let file = builder.file(name, pair)?;

    tracing::debug!(
        unit = origin,
        decls = file.decls.len(),
        comments = file.comments.len(),
        "parsed file"
    );
    Ok(file)
}

/// Parses a standalone expression.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use idast_core::parser::parse_expr;
///
/// let arena = Bump::new();
/// let expr = parse_expr(&arena, "1 + 2 * 3").unwrap();
/// assert_eq!(expr.text(), "1 + 2 * 3");
/// ```
pub fn parse_expr<'a>(arena: &'a Bump, source: &'a str) -> Result<Expr<'a>, ParseError> {
    let options = ParseOptions::default();
    let scanned = scan::scan(EXPR_ORIGIN, source, options.max_depth)?;
    let masked: &'a str = arena.alloc_str(&scanned.masked);

    let root = GoParser::parse(Rule::expression_source, masked)
        .map_err(|err| convert_pest_error(err, EXPR_ORIGIN, source))?
        .next()
        .ok_or_else(|| missing_root(EXPR_ORIGIN, source))?;
    let expr = root
        .into_inner()
        .next()
        .ok_or_else(|| missing_root(EXPR_ORIGIN, source))?;

    let builder = Builder::new(
        arena,
        EXPR_ORIGIN,
        source,
        masked,
        CommentIndex::default(),
        options.max_depth,
    );
    let expr = builder.expr(expr)?;
    tracing::trace!(kind = expr.kind().name(), "parsed expression");
    Ok(expr)
}

/// Parses several units of one package. Files are ordered by unit name.
///
/// Every file must declare the same package; the package takes its name
/// from the first file in order.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use idast_core::parser::parse_package;
///
/// let arena = Bump::new();
/// let units = [("b", "package p\n"), ("a", "package p\nvar x int\n")];
/// let package = parse_package(&arena, &units).unwrap();
/// assert_eq!(package.name, "p");
/// assert_eq!(package.files[0].0, "a");
/// ```
pub fn parse_package<'a>(
    arena: &'a Bump,
    units: &[(&'a str, &'a str)],
) -> Result<&'a Package<'a>, ParseError> {
    let mut sorted: Vec<(&'a str, &'a str)> = units.to_vec();
    sorted.sort_by_key(|(name, _)| *name);

    let mut files: Vec<(&'a str, &'a File<'a>)> = Vec::with_capacity(sorted.len());
    for (name, source) in sorted {
        if files.last().is_some_and(|(last, _)| *last == name) {
            return Err(ParseError::new(
                ParseErrorKind::Other {
                    message: format!("duplicate unit {name}{UNIT_SUFFIX}"),
                },
                &format!("{name}{UNIT_SUFFIX}"),
                source,
                Span::new(0, 0),
            ));
        }
        let file = parse_file(arena, name, source)?;
        if let Some((_, first)) = files.first() {
            if first.package.name != file.package.name {
                let at = offset_in(source, file.package.name);
                return Err(ParseError::new(
                    ParseErrorKind::PackageMismatch {
                        expected: first.package.name.into(),
                        found: file.package.name.into(),
                    },
                    &format!("{name}{UNIT_SUFFIX}"),
                    source,
                    Span::new(at, at + file.package.name.len()),
                ));
            }
        }
        files.push((name, file));
    }

    let name = files.first().map_or("", |(_, file)| file.package.name);
    tracing::debug!(package = name, files = files.len(), "parsed package");
    Ok(arena.alloc(Package {
        name,
        files: arena.alloc_slice_copy(&files),
    }))
}

/// Byte offset of `part`, a subslice of `source`.
fn offset_in(source: &str, part: &str) -> usize {
    (part.as_ptr() as usize)
        .checked_sub(source.as_ptr() as usize)
        .filter(|offset| *offset <= source.len())
        .unwrap_or(0)
}

fn missing_root(origin: &str, source: &str) -> ParseError {
    ParseError::new(
        ParseErrorKind::Other {
            message: "missing expected pair in rule".into(),
        },
        origin,
        source,
        Span::new(0, 0),
    )
}



#[cfg(test)]
mod rule_valid_test;
