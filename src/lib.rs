//! idast - Structural identifiers for Go syntax trees
//!
//! # Overview
//!
//! Every node of a parsed Go file gets an identifier built from the route
//! that reaches it from the root: field names, list indices, and, for
//! source files, the file name. The identifier does not depend on node
//! addresses or source offsets, so the same tree parsed twice yields the
//! same identifiers, and an edit elsewhere in a file leaves unrelated
//! identifiers untouched.
//!
//! # Quick Start
//!
//! ```
//! use bumpalo::Bump;
//! use idast::{collect_all, parse_file};
//!
//! let arena = Bump::new();
//! let file = parse_file(&arena, "main", "package main\n\nvar x = 1 + 2\n").unwrap();
//!
//! let ids: Vec<String> = collect_all(file).iter().map(|n| n.id_string()).collect();
//! assert_eq!(ids[0], "main.go");
//! assert!(ids.contains(&"main.go/Decls/0/Specs/0/Values/0/X".to_string()));
//! ```
//!
//! # Reading from disk
//!
//! [`load_file`] and [`load_package`] read sources into the arena and parse
//! them; a package is every `*.go` file of one directory, in name order.

mod error;
pub mod error_renderer;
mod load;

pub use error::Error;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
pub use load::{load_file, load_package, parse_dir};

// Re-export the public API of idast-core
pub use idast_core::ast::{self, File, Node, NodeKey, NodeKind, Package};
pub use idast_core::parser::{
    self, ParseError, ParseErrorKind, ParseOptions, parse_expr, parse_file,
    parse_file_with_options, parse_package,
};
pub use idast_core::{
    Diagnostic, DumpEntry, Duplicate, NodeMap, NodeWithId, Path, Severity, Visitor, build_map,
    collect_all, dump, dump_entries, duplicate_ids, inspect, walk,
};
