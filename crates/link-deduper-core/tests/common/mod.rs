#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Create a file with the given contents, creating parent directories
pub fn create_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let file_path = dir.join(name);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut file = File::create(&file_path).unwrap();
    file.write_all(contents).unwrap();
    file_path
}

/// Source and destination roots shared by the pipeline tests:
/// `a.txt` matches by size, `b.txt` does not.
pub fn setup_source_and_destination(base: &Path) -> (PathBuf, PathBuf) {
    let source = base.join("source");
    let destination = base.join("destination");

    create_file(&source, "a.txt", b"aaaa");
    create_file(&source, "b.txt", b"bbbbbbbbbb");
    create_file(&destination, "a.txt", b"AAAA");
    create_file(&destination, "b.txt", b"BBBBBBB");

    (source, destination)
}

pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

pub fn is_regular_file(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_file())
        .unwrap_or(false)
}
