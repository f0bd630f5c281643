use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use bumpalo::Bump;
use clap::Parser;
use idast::{
    Error, Node, NodeWithId, collect_all, dump, dump_entries, duplicate_ids, load_file,
    load_package, parse_expr, parse_file, render_error,
};
use miette::{IntoDiagnostic, Result};

/// idast - Print the structural identifier of every node of a Go syntax tree
#[derive(Parser, Debug)]
#[command(name = "idast")]
#[command(about = "Assign structural identifiers to Go syntax nodes", long_about = None)]
struct Args {
    /// Identify the nodes of a single expression instead of files
    #[arg(short, long, conflicts_with_all = ["package", "paths"])]
    expr: Option<String>,

    /// Treat each path as a package directory
    #[arg(short, long)]
    package: bool,

    /// Print JSON instead of the aligned text dump
    #[arg(long)]
    json: bool,

    /// Fail if two nodes share an identifier
    #[arg(long)]
    check_unique: bool,

    /// Go files (or package directories with --package); reads a file from
    /// stdin if none are given
    paths: Vec<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG to control log level; default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let arena = Bump::new();
    let roots = match load_roots(&arena, &args) {
        Ok(roots) => roots,
        Err(e) => {
            render_error(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut clean = true;
    for root in roots {
        let nodes = collect_all(root);
        tracing::info!(root = root.kind().name(), nodes = nodes.len(), "collected");
        print_nodes(&nodes, args.json)?;

        if args.check_unique {
            for duplicate in duplicate_ids(&nodes) {
                clean = false;
                eprintln!(
                    "duplicate identifier {} at positions {:?}",
                    duplicate.id, duplicate.positions
                );
            }
        }
    }

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_roots<'a>(arena: &'a Bump, args: &Args) -> Result<Vec<Node<'a>>, Error> {
    if let Some(expr) = &args.expr {
        let source = arena.alloc_str(expr);
        return Ok(vec![parse_expr(arena, source)?.into()]);
    }

    if args.paths.is_empty() {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| Error::Io {
                path: "<stdin>".into(),
                source: e,
            })?;
        let source = arena.alloc_str(&source);
        return Ok(vec![parse_file(arena, "stdin", source)?.into()]);
    }

    args.paths
        .iter()
        .map(|path| -> Result<Node<'a>, Error> {
            Ok(if args.package {
                load_package(arena, path)?.into()
            } else {
                load_file(arena, path)?.into()
            })
        })
        .collect()
}

fn print_nodes(nodes: &[NodeWithId<'_>], json: bool) -> Result<()> {
    if json {
        let json = serde_json::to_string_pretty(&dump_entries(nodes)).into_diagnostic()?;
        println!("{json}");
    } else {
        print!("{}", dump(nodes));
    }
    Ok(())
}
