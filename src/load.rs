//! Reading Go sources from disk into an arena.

use std::fs;
use std::path::{Path, PathBuf};

use bumpalo::Bump;
use idast_core::ast::{File, Package, UNIT_SUFFIX};
use idast_core::parser::{parse_file, parse_package};

use crate::Error;

/// Reads and parses one `.go` file. The unit name is the file stem.
pub fn load_file<'a>(arena: &'a Bump, path: &Path) -> Result<&'a File<'a>, Error> {
    let (name, source) = read_unit(arena, path)?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "loaded file");
    Ok(parse_file(arena, name, source)?)
}

/// Reads and parses every `.go` file in `dir` as one package.
pub fn load_package<'a>(arena: &'a Bump, dir: &Path) -> Result<&'a Package<'a>, Error> {
    let paths = parse_dir(dir)?;
    if paths.is_empty() {
        return Err(Error::EmptyPackage {
            dir: dir.to_path_buf(),
        });
    }
    let units = paths
        .iter()
        .map(|path| read_unit(arena, path))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(dir = %dir.display(), files = units.len(), "loaded package");
    Ok(parse_package(arena, &units)?)
}

/// The `.go` files directly inside `dir`, sorted by path.
pub fn parse_dir(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "go") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn read_unit<'a>(arena: &'a Bump, path: &Path) -> Result<(&'a str, &'a str), Error> {
    let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let name = file_name.strip_suffix(UNIT_SUFFIX).unwrap_or(&file_name);
    Ok((arena.alloc_str(name), arena.alloc_str(&source)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("idast-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_package_sorts_and_filters() {
        let dir = scratch_dir("sorted");
        fs::write(dir.join("b.go"), "package p\n").unwrap();
        fs::write(dir.join("a.go"), "package p\n\nvar x int\n").unwrap();
        fs::write(dir.join("notes.txt"), "not go").unwrap();

        let arena = Bump::new();
        let package = load_package(&arena, &dir).unwrap();
        let names: Vec<&str> = package.files.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(package.name, "p");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_package_is_an_error() {
        let dir = scratch_dir("empty");
        let arena = Bump::new();
        let err = load_package(&arena, &dir).unwrap_err();
        assert!(matches!(err, Error::EmptyPackage { .. }));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let arena = Bump::new();
        let err = load_file(&arena, Path::new("/nonexistent/idast/x.go")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_unit_name_is_file_stem() {
        let dir = scratch_dir("stem");
        let path = dir.join("main.go");
        fs::write(&path, "package main\n").unwrap();
        let arena = Bump::new();
        let file = load_file(&arena, &path).unwrap();
        assert_eq!(file.name, "main");
        fs::remove_dir_all(&dir).unwrap();
    }
}
