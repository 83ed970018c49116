//! Tests for local file pattern expansion.

use super::files::expand_patterns;
use std::path::Path;

fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"").unwrap();
}

fn pattern(dir: &Path, tail: &str) -> String {
    format!("{}/{tail}", dir.display())
}

#[test]
fn expands_wildcards_sorted() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "b.dat");
    touch(dir.path(), "a.dat");
    touch(dir.path(), "notes.txt");

    let paths = expand_patterns(&[pattern(dir.path(), "*.dat")]);

    assert_eq!(paths, vec![dir.path().join("a.dat"), dir.path().join("b.dat")]);
}

#[test]
fn removes_duplicates_across_patterns() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.dat");

    let paths = expand_patterns(&[
        pattern(dir.path(), "*.dat"),
        pattern(dir.path(), "a.dat"),
        pattern(dir.path(), "?.dat"),
    ]);

    assert_eq!(paths.len(), 1);
}

#[test]
fn literal_path_is_kept_when_it_exists() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "list.dat");

    let paths = expand_patterns(&[pattern(dir.path(), "list.dat")]);

    assert_eq!(paths, vec![dir.path().join("list.dat")]);
}

#[test]
fn missing_and_invalid_patterns_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.dat");

    let paths = expand_patterns(&[
        pattern(dir.path(), "missing.dat"),
        pattern(dir.path(), "[.dat"),
        pattern(dir.path(), "a.dat"),
    ]);

    assert_eq!(paths, vec![dir.path().join("a.dat")]);
}

#[test]
fn directories_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub.dat")).unwrap();
    touch(dir.path(), "a.dat");

    let paths = expand_patterns(&[pattern(dir.path(), "*.dat")]);

    assert_eq!(paths, vec![dir.path().join("a.dat")]);
}

#[test]
fn empty_input_yields_nothing() {
    let none: [&str; 0] = [];
    assert!(expand_patterns(&none).is_empty());
}
