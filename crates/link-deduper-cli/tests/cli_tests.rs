use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn dedup(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dedup"))
        .args(args)
        .output()
        .expect("failed to run dedup")
}

fn write(dir: &Path, name: &str, contents: &[u8]) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_help_exits_successfully() {
    let output = Command::new(env!("CARGO_BIN_EXE_dedup"))
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SOURCE_PATH"));
    assert!(stdout.contains("DESTINATION_PATH"));
}

#[test]
fn test_wrong_argument_count_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_dedup")).output().unwrap();
    assert!(!output.status.success());

    let output = Command::new(env!("CARGO_BIN_EXE_dedup"))
        .args(["only-one"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let output = Command::new(env!("CARGO_BIN_EXE_dedup"))
        .args(["a", "b", "c"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_missing_destination_fails_without_changes() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source");
    write(&source, "a.txt", b"aaaa");
    let missing = dir.path().join("missing");

    let output = dedup(&[&source, &missing]);

    assert!(!output.status.success());
    assert!(!missing.exists());
    assert_eq!(fs::read(source.join("a.txt")).unwrap(), b"aaaa");
}

#[cfg(unix)]
#[test]
fn test_replaces_matching_file() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source");
    let destination = dir.path().join("destination");
    write(&source, "a.txt", b"aaaa");
    write(&source, "b.txt", b"bbbbbbbbbb");
    write(&destination, "a.txt", b"AAAA");
    write(&destination, "b.txt", b"BBBBBBB");

    let output = dedup(&[&source, &destination]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 2 files in source path"));
    assert!(stdout.contains("Found 2 files in destination path"));
    assert!(stdout.contains("Found 1 duplicates"));
    assert!(stdout.contains("Replaced "));

    let linked = fs::symlink_metadata(destination.join("a.txt")).unwrap();
    assert!(linked.file_type().is_symlink());
    assert_eq!(
        fs::read_link(destination.join("a.txt")).unwrap(),
        fs::canonicalize(source.join("a.txt")).unwrap()
    );
    assert_eq!(fs::read(destination.join("b.txt")).unwrap(), b"BBBBBBB");
}

#[test]
fn test_dry_run_flag() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source");
    let destination = dir.path().join("destination");
    write(&source, "a.txt", b"aaaa");
    write(&destination, "a.txt", b"AAAA");

    let output = Command::new(env!("CARGO_BIN_EXE_dedup"))
        .arg("--dry-run")
        .arg(&source)
        .arg(&destination)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Would replace"));
    assert!(fs::symlink_metadata(destination.join("a.txt"))
        .unwrap()
        .file_type()
        .is_file());
}

#[test]
fn test_failed_replacements_only_fail_with_strict() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    write(&root, "a.txt", b"aaaa");

    // Every pair is the same file and is refused
    let output = dedup(&[&root, &root]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Error replacing with symlink"));

    let output = Command::new(env!("CARGO_BIN_EXE_dedup"))
        .arg("--strict")
        .arg(&root)
        .arg(&root)
        .output()
        .unwrap();
    assert!(!output.status.success());

    assert_eq!(fs::read(root.join("a.txt")).unwrap(), b"aaaa");
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source");
    let destination = dir.path().join("destination");
    write(&source, "a.txt", b"aaaa");
    write(&destination, "a.txt", b"AAAA");
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{ "temp_suffix": "" }"#).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_dedup"))
        .arg("--config")
        .arg(&config)
        .arg(&source)
        .arg(&destination)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(fs::read(destination.join("a.txt")).unwrap(), b"AAAA");
}
