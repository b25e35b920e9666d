use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Which of the two roots an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Destination => write!(f, "destination"),
        }
    }
}

/// Custom error types for the link-deduper library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A root path could not be stat'ed
    #[error("error accessing path {path}: {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A root directory could not be listed
    #[error("error reading directory {path}: {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Building the catalog of one side failed
    #[error("error processing {side} path: {source}")]
    Catalog {
        side: Side,
        #[source]
        source: Box<Error>,
    },

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl Error {
    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Access { path, .. } | Self::Enumeration { path, .. } => Some(path.as_path()),
            Self::Catalog { source, .. } => source.path(),
            _ => None,
        }
    }
}

/// Failure of a single replace-with-symlink operation.
///
/// These never abort a run; they are reported per pair.
#[derive(Error, Debug)]
pub enum ReplaceError {
    #[error("source file {path} does not exist: {source}")]
    SourceMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source {0} is no longer a regular file")]
    SourceNotFile(PathBuf),

    #[error("destination file {path} does not exist: {source}")]
    DestinationMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("destination {link} is the same file as source {target}")]
    SameFile { target: PathBuf, link: PathBuf },

    #[error("failed to remove destination file {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create symlink from {link} to {target}: {source}")]
    LinkFailed {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to move symlink {temp} over {destination}: {source}")]
    RenameFailed {
        temp: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReplaceError {
    /// Get the path that triggered the failure
    pub fn path(&self) -> &Path {
        match self {
            Self::SourceMissing { path, .. }
            | Self::DestinationMissing { path, .. }
            | Self::RemoveFailed { path, .. } => path,
            Self::SourceNotFile(path) => path,
            Self::SameFile { link, .. } => link,
            Self::LinkFailed { link, .. } => link,
            Self::RenameFailed { destination, .. } => destination,
        }
    }
}
