use std::fs;

use course_engine::{ensure_dir, write_atomic, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_directories() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("Course").join("1. Intro");
    assert!(!nested.exists());
    ensure_dir(&nested).unwrap();
    assert!(nested.is_dir());
    ensure_dir(&nested).unwrap();
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out").join("Welcome.md");

    write_atomic(&target, "hello").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello");

    write_atomic(&target, "world").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "world");
    // No temp files left next to the target.
    assert_eq!(fs::read_dir(target.parent().unwrap()).unwrap().count(), 1);
}

#[test]
fn no_file_when_parent_is_not_a_directory() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = write_atomic(&blocker.join("doc.md"), "data");
    assert!(matches!(result, Err(PersistError::NotADirectory(_))));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
