//! Replacing destination files with symbolic links to their source.
//!
//! Two strategies exist:
//! - `AtomicRename` creates the link beside the destination and renames it
//!   over the destination, so the destination path always names either the
//!   original file or the finished link.
//! - `RemoveThenLink` removes the destination and then creates the link. If
//!   the link cannot be created the destination is left missing.
//!
//! Source files are never modified by either strategy.

use log::{debug, error};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{Config, ReplaceStrategy};
use crate::error::ReplaceError;
use crate::logging::{log_file_error, log_fs_modification};
use crate::safety::verify_pair;
use crate::types::{ActionResult, ActionType, DuplicatePair};

/// Replace `pair.destination` with a symbolic link to `pair.source`.
///
/// Both endpoints are re-validated first; see `safety::verify_pair`.
pub fn replace_with_symlink(
    pair: &DuplicatePair,
    strategy: ReplaceStrategy,
    temp_suffix: &str,
) -> Result<(), ReplaceError> {
    verify_pair(pair)?;

    match strategy {
        ReplaceStrategy::AtomicRename => rename_over(pair, temp_suffix),
        ReplaceStrategy::RemoveThenLink => remove_then_link(pair),
    }
}

/// Run the configured action for one pair and describe the outcome
pub fn execute(pair: &DuplicatePair, config: &Config) -> ActionResult {
    let (action_type, outcome) = if config.dry_run {
        (ActionType::DryRun, verify_pair(pair))
    } else {
        (
            ActionType::Symlink,
            replace_with_symlink(pair, config.replace_strategy, &config.temp_suffix),
        )
    };

    match outcome {
        Ok(()) => {
            if action_type == ActionType::Symlink {
                let details = format!("symlink to {}", pair.source.display());
                log_fs_modification("replace_with_symlink", &pair.destination, Some(&details));
            } else {
                debug!(
                    "Dry run: would replace {} with symlink to {}",
                    pair.destination.display(),
                    pair.source.display()
                );
            }

            ActionResult {
                action_type,
                destination: pair.destination.clone(),
                source: pair.source.clone(),
                size: pair.size,
                success: true,
                error: None,
            }
        }
        Err(e) => {
            log_file_error(e.path(), "replace_with_symlink", &e);

            ActionResult {
                action_type,
                destination: pair.destination.clone(),
                source: pair.source.clone(),
                size: pair.size,
                success: false,
                error: Some(e.to_string()),
            }
        }
    }
}

fn remove_then_link(pair: &DuplicatePair) -> Result<(), ReplaceError> {
    fs::remove_file(&pair.destination).map_err(|source| ReplaceError::RemoveFailed {
        path: pair.destination.clone(),
        source,
    })?;

    create_symlink(&pair.source, &pair.destination).map_err(|source| {
        error!(
            "{} was removed but no link to {} could be created",
            pair.destination.display(),
            pair.source.display()
        );
        ReplaceError::LinkFailed {
            link: pair.destination.clone(),
            target: pair.source.clone(),
            source,
        }
    })
}

fn rename_over(pair: &DuplicatePair, temp_suffix: &str) -> Result<(), ReplaceError> {
    let temp = temp_link_path(&pair.destination, temp_suffix);

    // A link left behind by an interrupted run is ours to replace
    if let Ok(meta) = fs::symlink_metadata(&temp) {
        if meta.file_type().is_symlink() {
            debug!("Removing stale temporary link {}", temp.display());
            if let Err(e) = fs::remove_file(&temp) {
                log_file_error(&temp, "remove_stale_temporary_link", &e);
            }
        }
    }

    create_symlink(&pair.source, &temp).map_err(|source| ReplaceError::LinkFailed {
        link: temp.clone(),
        target: pair.source.clone(),
        source,
    })?;

    if let Err(source) = fs::rename(&temp, &pair.destination) {
        if let Err(e) = fs::remove_file(&temp) {
            log_file_error(&temp, "remove_temporary_link", &e);
        }
        return Err(ReplaceError::RenameFailed {
            temp,
            destination: pair.destination.clone(),
            source,
        });
    }

    Ok(())
}

/// Hidden sibling of `destination` used as the staging name for the new link
pub fn temp_link_path(destination: &Path, temp_suffix: &str) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(destination.file_name().unwrap_or_default());
    name.push(temp_suffix);
    name.push(format!("-{}", std::process::id()));
    destination.with_file_name(name)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}
