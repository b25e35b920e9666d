use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{self, HashMap};
use std::path::{Path, PathBuf};

/// A regular file discovered under a scanned root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Key used to match this file against the other root
    pub identifier: PathBuf,

    /// File size in bytes, captured when the catalog was built
    pub size: u64,

    /// Full path to the file, used only for I/O
    pub path: PathBuf,
}

impl FileRecord {
    /// Whether two records are considered the same file.
    ///
    /// Only the size is compared: identifiers already match when this is
    /// called, and the path is a location, not a property of the content.
    pub fn equals(&self, other: &FileRecord) -> bool {
        self.size == other.size
    }
}

/// Name-indexed metadata of every regular file under one root
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    root: PathBuf,
    entries: HashMap<PathBuf, FileRecord>,
    skipped: usize,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
            skipped: 0,
        }
    }

    /// Insert a record, replacing any earlier record with the same identifier
    pub fn insert(&mut self, record: FileRecord) -> Option<FileRecord> {
        let previous = self.entries.insert(record.identifier.clone(), record);
        if let Some(prev) = &previous {
            debug!(
                "Identifier {} collided, replaced {}",
                prev.identifier.display(),
                prev.path.display()
            );
        }
        previous
    }

    pub fn get(&self, identifier: &Path) -> Option<&FileRecord> {
        self.entries.get(identifier)
    }

    pub fn contains(&self, identifier: &Path) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Values<'_, PathBuf, FileRecord> {
        self.entries.values()
    }

    /// Root the catalog was built from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of entries dropped because their metadata or directory was unreadable
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub(crate) fn record_skip(&mut self) {
        self.skipped += 1;
    }
}

/// A source/destination pair judged equivalent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatePair {
    /// File that is kept
    pub source: PathBuf,

    /// File that is replaced by a link to `source`
    pub destination: PathBuf,

    /// Shared size in bytes
    pub size: u64,
}

/// Types of actions that can be performed on a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    /// Replace with symbolic link to source
    Symlink,

    /// Checks only, no changes made
    DryRun,
}

/// Result of a replacement action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    /// Type of action performed
    pub action_type: ActionType,

    /// Path of the destination file
    pub destination: PathBuf,

    /// Path of the source file the link points at
    pub source: PathBuf,

    /// Bytes freed (or that would be freed) by the action
    pub size: u64,

    /// Whether the action was successful
    pub success: bool,

    /// Optional error message if action failed
    pub error: Option<String>,
}

/// Summary of a full run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub source_files: usize,
    pub destination_files: usize,
    pub duplicates: usize,
    pub results: Vec<ActionResult>,
}

impl RunReport {
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    /// Bytes reclaimed by successful replacements
    pub fn bytes_reclaimed(&self) -> u64 {
        self.results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.size)
            .sum()
    }
}
