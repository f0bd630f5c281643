#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod ast;
pub mod collect;
pub mod diagnostics;
pub mod dump;
pub mod parser;
pub mod path;
pub mod walker;

pub use ast::{Node, NodeKey, NodeKind};
pub use collect::{Duplicate, NodeMap, NodeWithId, build_map, collect_all, duplicate_ids};
pub use diagnostics::{Diagnostic, Severity};
pub use dump::{DumpEntry, dump, dump_entries};
pub use parser::{
    ParseError, ParseErrorKind, ParseOptions, parse_expr, parse_file, parse_file_with_options,
    parse_package,
};
pub use path::Path;
pub use walker::{Visitor, inspect, walk};
