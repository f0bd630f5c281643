//! Lexical pre-pass over the raw source.
//!
//! Go terminates statements with semicolons that the lexer inserts at the
//! end of a line when the line's last token could end a statement. The
//! scanner makes those explicit, blanks out comments, and records where
//! the comments were, so the main grammar can treat newlines as ordinary
//! whitespace. The masked copy has the same byte length as the source and
//! every code byte stays at its offset, so spans found in one are valid in
//! the other.

use pest::Parser;

use super::error::{ParseError, ParseErrorKind, convert_pest_error};
use super::grammar::{GoParser, KEYWORDS, Rule};
use crate::ast::Span;
use crate::{String, Vec};

pub(super) struct Scanned {
    pub masked: String,
    /// Every comment, in source order.
    pub comments: Vec<Span>,
}

pub(super) fn scan(origin: &str, source: &str, max_depth: usize) -> Result<Scanned, ParseError> {
    let mut pairs = GoParser::parse(Rule::scan, source)
        .map_err(|err| convert_pest_error(err, origin, source))?;
    let tokens = match pairs.next() {
        Some(pair) => pair.into_inner(),
        None => return Ok(Scanned::verbatim(source)),
    };

    let mut masked = String::with_capacity(source.len());
    let mut comments = Vec::new();
    // The last token could end a statement.
    let mut pending = false;
    let mut nesting = 0usize;

    for token in tokens {
        let text = token.as_str();
        match token.as_rule() {
            Rule::newline => {
                masked.push(if pending { ';' } else { '\n' });
                pending = false;
            }
            Rule::line_comment => {
                comments.push(Span::from(token.as_span()));
                blank(&mut masked, text, false);
            }
            Rule::block_comment => {
                comments.push(Span::from(token.as_span()));
                // A comment spanning lines acts like a newline.
                let ends_line = pending && text.contains('\n');
                blank(&mut masked, text, ends_line);
                if ends_line {
                    pending = false;
                }
            }
            Rule::scan_literal | Rule::scan_incdec => {
                pending = true;
                masked.push_str(text);
            }
            Rule::scan_word => {
                pending = !KEYWORDS.contains(&text)
                    || matches!(text, "break" | "continue" | "fallthrough" | "return");
                masked.push_str(text);
            }
            Rule::scan_closer => {
                pending = true;
                nesting = nesting.saturating_sub(1);
                masked.push_str(text);
            }
            Rule::scan_other => {
                if matches!(text, "(" | "[" | "{") {
                    nesting += 1;
                    if nesting > max_depth {
                        return Err(ParseError::new(
                            ParseErrorKind::MaxDepthExceeded {
                                depth: nesting,
                                max_depth,
                            },
                            origin,
                            source,
                            Span::from(token.as_span()),
                        ));
                    }
                }
                if !matches!(text, " " | "\t" | "\r") {
                    pending = false;
                }
                masked.push_str(text);
            }
            Rule::EOI => {}
            rule => unreachable!("unexpected token in scan: {:?}", rule),
        }
    }

    debug_assert_eq!(masked.len(), source.len());
    tracing::trace!(comments = comments.len(), "scanned source");
    Ok(Scanned { masked, comments })
}

impl Scanned {
    fn verbatim(source: &str) -> Self {
        Scanned {
            masked: source.into(),
            comments: Vec::new(),
        }
    }
}

/// Replaces a comment with spaces, keeping its newlines.
fn blank(masked: &mut String, comment: &str, semicolon: bool) {
    for (i, c) in comment.char_indices() {
        match c {
            // Comments start with `/`, so the first char is one byte.
            _ if i == 0 && semicolon => masked.push(';'),
            '\n' => masked.push('\n'),
            _ => masked.extend(core::iter::repeat_n(' ', c.len_utf8())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn masked(source: &str) -> String {
        scan("test.go", source, 500).unwrap().masked
    }

    #[test]
    fn test_semicolons_after_statement_ends() {
        assert_eq!(masked("x := 1\ny++\n"), "x := 1;y++;");
        assert_eq!(masked("f(a)\nreturn\n"), "f(a);return;");
        assert_eq!(masked("s[0]\n}\n"), "s[0];};");
    }

    #[test]
    fn test_no_semicolon_after_operators_and_keywords() {
        assert_eq!(masked("a +\nb\n"), "a +\nb;");
        assert_eq!(masked("if x {\n"), "if x {\n");
        assert_eq!(masked("f(a,\nb)\n"), "f(a,\nb);");
        assert_eq!(masked("func\n"), "func\n");
    }

    #[test]
    fn test_comments_are_blanked() {
        assert_eq!(masked("x // note\n"), "x        ;");
        assert_eq!(masked("// é\ny\n"), "     \ny;");
        let scanned = scan("test.go", "a /* b */ c\n", 500).unwrap();
        assert_eq!(scanned.masked, "a         c;");
        assert_eq!(scanned.comments, vec![Span(2..9)]);
    }

    #[test]
    fn test_multiline_block_comment_ends_line() {
        assert_eq!(masked("x /* a\nb */ y\n"), "x ;   \n     y;");
        assert_eq!(masked("+ /* a\nb */ y\n"), "+     \n     y;");
    }

    #[test]
    fn test_literals_are_opaque() {
        assert_eq!(masked("s := \"// no\"\n"), "s := \"// no\";");
        assert_eq!(masked("r := `a\nb`\n"), "r := `a\nb`;");
    }

    #[test]
    fn test_bracket_nesting_is_bounded() {
        let deep = "(".repeat(20);
        let err = scan("deep.go", &deep, 10).err().unwrap();
        assert_eq!(
            err.kind,
            ParseErrorKind::MaxDepthExceeded {
                depth: 11,
                max_depth: 10
            }
        );
        assert_eq!(err.span, Span(10..11));
    }
}
