use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::IdentifierPolicy;
use crate::error::{Error, Result};
use crate::types::{Catalog, FileRecord};

impl IdentifierPolicy {
    /// Identifier of `path`, a file found under `root`
    pub fn identifier(&self, root: &Path, path: &Path) -> Option<PathBuf> {
        match self {
            IdentifierPolicy::RelativePath => path
                .strip_prefix(root)
                .ok()
                .filter(|rel| !rel.as_os_str().is_empty())
                .map(Path::to_path_buf),
            IdentifierPolicy::BaseName => path.file_name().map(PathBuf::from),
        }
    }
}

/// Build the catalog of every regular file under `root`.
///
/// `root` may be a single file or a directory. A root that cannot be stat'ed
/// or listed is an error; anything unreadable below it is logged and skipped.
pub fn build_catalog<P: AsRef<Path>>(root: P, policy: IdentifierPolicy) -> Result<Catalog> {
    let root = root.as_ref();

    let metadata = fs::metadata(root).map_err(|source| Error::Access {
        path: root.to_path_buf(),
        source,
    })?;

    if metadata.is_file() {
        return single_file_catalog(root, metadata.len());
    }

    let resolved = fs::canonicalize(root).map_err(|source| Error::Access {
        path: root.to_path_buf(),
        source,
    })?;

    let mut catalog = Catalog::new(&resolved);
    if !metadata.is_dir() {
        debug!("Skipping {}: not a regular file or directory", root.display());
        return Ok(catalog);
    }

    for entry in WalkDir::new(&resolved)
        .follow_links(false)
        .sort_by_file_name()
        .min_depth(1)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(Error::Enumeration {
                    path: root.to_path_buf(),
                    source: io::Error::from(err),
                });
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                warn!("Could not get files for {}: {}", path, err);
                catalog.record_skip();
                continue;
            }
        };

        // Directories are descended by the walker; symlinks and special files are dropped
        if !entry.file_type().is_file() {
            continue;
        }

        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                warn!("Could not get info for {}: {}", entry.path().display(), err);
                catalog.record_skip();
                continue;
            }
        };

        let Some(identifier) = policy.identifier(&resolved, entry.path()) else {
            debug!("No identifier for {}", entry.path().display());
            continue;
        };

        catalog.insert(FileRecord {
            identifier,
            size,
            path: entry.into_path(),
        });
    }

    debug!(
        "Catalog of {} holds {} files ({} skipped)",
        resolved.display(),
        catalog.len(),
        catalog.skipped()
    );

    Ok(catalog)
}

/// A root that is itself a regular file is keyed by its base name under either policy.
///
/// Only the parent directory is resolved. If the root is a symlink the record
/// names the link, never the file it points to.
fn single_file_catalog(root: &Path, size: u64) -> Result<Catalog> {
    let access_error = |source| Error::Access {
        path: root.to_path_buf(),
        source,
    };

    let (parent, name) = match root.file_name() {
        Some(name) => {
            let parent = match root.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            (fs::canonicalize(parent).map_err(access_error)?, name.to_os_string())
        }
        None => {
            let resolved = fs::canonicalize(root).map_err(access_error)?;
            let name = resolved.file_name().unwrap_or_default().to_os_string();
            let parent = resolved.parent().map(Path::to_path_buf).unwrap_or_default();
            (parent, name)
        }
    };

    let mut catalog = Catalog::new(&parent);
    if !name.is_empty() {
        catalog.insert(FileRecord {
            identifier: PathBuf::from(&name),
            size,
            path: parent.join(&name),
        });
    }

    Ok(catalog)
}

// -- Tests --
