//! Golden dumps of the files under `tests/testdata`.
//!
//! Each `<name>.go` with a `<name>.go.expected` sibling is parsed, collected
//! and dumped; the dump must match the expected file byte for byte. Run with
//! `IDAST_BLESS=1` to rewrite the expected files after an intended change.

use std::fs;
use std::path::{Path, PathBuf};

use bumpalo::Bump;
use idast_core::{collect_all, dump, parse_file};
use pretty_assertions::assert_eq;

fn testdata() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/testdata")
}

fn check_golden(name: &str) {
    let dir = testdata();
    let source = fs::read_to_string(dir.join(format!("{name}.go")))
        .unwrap_or_else(|e| panic!("reading {name}.go: {e}"));
    let expected_path = dir.join(format!("{name}.go.expected"));

    let arena = Bump::new();
    let file = parse_file(&arena, name, &source).unwrap_or_else(|e| panic!("{e}"));
    let actual = dump(&collect_all(file));

    if std::env::var_os("IDAST_BLESS").is_some() {
        fs::write(&expected_path, &actual).unwrap();
        return;
    }
    let expected = fs::read_to_string(&expected_path)
        .unwrap_or_else(|e| panic!("reading {}: {e}", expected_path.display()));
    assert_eq!(actual, expected);
}

#[test]
fn golden_small() {
    check_golden("small");
}

#[test]
fn every_expected_file_has_a_source() {
    for entry in fs::read_dir(testdata()).unwrap() {
        let path = entry.unwrap().path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(source) = name.strip_suffix(".expected") {
            assert!(testdata().join(source).exists(), "{name} has no source");
        }
    }
}
