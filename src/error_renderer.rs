//! Error rendering using ariadne
//!
//! Parse errors are shown with the offending source line and an annotated
//! span; the other errors are a single line.

use crate::{Diagnostic, Error, ParseError, Severity};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

/// Render an error to stderr
///
/// # Example
/// ```no_run
/// use bumpalo::Bump;
/// use idast::{load_file, render_error};
/// use std::path::Path;
///
/// let arena = Bump::new();
/// if let Err(e) = load_file(&arena, Path::new("main.go")) {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Parse(err) => render_parse_error(err, writer, use_color),
        Error::Io { path, source } => {
            writeln!(writer, "Cannot read {}: {}", path.display(), source)
        }
        Error::EmptyPackage { .. } => writeln!(writer, "{}", error),
    }
}

fn render_parse_error(
    err: &ParseError,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let diag: Diagnostic = err.to_diagnostic();
    let origin = err.origin.as_str();
    // Clamp so an error at end of input still points at a character.
    let start = diag.span.start().min(err.source.len());
    let span = start..diag.span.end().clamp(start, err.source.len());

    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    };

    let mut report = Report::build(kind, (origin, span.clone()))
        .with_message(&diag.message)
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    report = report.with_label(
        Label::new((origin, span))
            .with_message(&diag.message)
            .with_color(colors.next()),
    );

    for help_msg in &diag.help {
        report = report.with_help(help_msg);
    }

    report
        .finish()
        .write((origin, Source::from(err.source.as_str())), &mut *writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_file, parse_package};
    use bumpalo::Bump;

    #[test]
    fn test_render_parse_error() {
        let arena = Bump::new();
        let err = parse_file(&arena, "bad", "package p\n\nvar = 1\n").unwrap_err();
        let output = render_error_to_string_no_color(&Error::Parse(err));

        assert!(output.contains("Error"));
        assert!(output.contains("bad.go"));
        assert!(output.contains("var = 1"));
        assert!(output.contains("P001"));
    }

    #[test]
    fn test_render_includes_help() {
        let arena = Bump::new();
        let err = parse_package(&arena, &[("a", "package p\n"), ("b", "package q\n")]).unwrap_err();
        let output = render_error_to_string_no_color(&Error::Parse(err));

        assert!(output.contains("Package q does not match package p"));
        assert!(output.contains("same package clause"));
        assert!(output.lines().count() > 1);
    }

    #[test]
    fn test_render_plain_errors() {
        let err = Error::EmptyPackage {
            dir: "pkg".into(),
        };
        assert_eq!(render_error_to_string_no_color(&err), "No .go files in pkg\n");
    }
}
