//! Checks run immediately before a destination is replaced.
//!
//! Catalogs are a snapshot; by the time a pair is replaced either endpoint may
//! have been deleted or changed by another process. Every pair is re-validated
//! here, and nothing is touched unless all checks pass.

use std::fs::{self, Metadata};
use std::path::Path;

use crate::error::ReplaceError;
use crate::types::DuplicatePair;

/// Re-validate both endpoints of a pair.
///
/// Fails when the source is gone or no longer a regular file, when the
/// destination is gone, or when both paths name the same file on disk.
pub fn verify_pair(pair: &DuplicatePair) -> Result<(), ReplaceError> {
    let source_meta = fs::metadata(&pair.source).map_err(|source| ReplaceError::SourceMissing {
        path: pair.source.clone(),
        source,
    })?;
    if !source_meta.is_file() {
        return Err(ReplaceError::SourceNotFile(pair.source.clone()));
    }

    let destination_meta =
        fs::symlink_metadata(&pair.destination).map_err(|source| {
            ReplaceError::DestinationMissing {
                path: pair.destination.clone(),
                source,
            }
        })?;

    if is_same_file(&pair.source, &source_meta, &pair.destination, &destination_meta) {
        return Err(ReplaceError::SameFile {
            target: pair.source.clone(),
            link: pair.destination.clone(),
        });
    }

    Ok(())
}

/// Same device and inode. Hard links count as the same file: they already share storage.
#[cfg(unix)]
fn is_same_file(_a: &Path, a_meta: &Metadata, _b: &Path, b_meta: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    a_meta.dev() == b_meta.dev() && a_meta.ino() == b_meta.ino()
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, _a_meta: &Metadata, b: &Path, _b_meta: &Metadata) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
