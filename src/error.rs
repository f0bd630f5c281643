use std::path::PathBuf;

use idast_core::ParseError;
use miette::Diagnostic;
use thiserror::Error;

/// Errors from loading and parsing sources.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Cannot read {}", path.display())]
    #[diagnostic(code(idast::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(idast::parse))]
    Parse(#[from] ParseError),

    #[error("No .go files in {}", dir.display())]
    #[diagnostic(
        code(idast::empty_package),
        help("A package directory must contain at least one .go file")
    )]
    EmptyPackage { dir: PathBuf },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
