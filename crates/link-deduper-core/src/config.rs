use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// How a file is keyed when the two catalogs are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierPolicy {
    /// Path relative to the scanned root (collision free)
    RelativePath,

    /// File name only; same-named files in different subdirectories collide
    BaseName,
}

/// How the destination file is swapped for a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplaceStrategy {
    /// Create the link beside the destination, then rename it over the destination
    AtomicRename,

    /// Remove the destination, then create the link in its place
    RemoveThenLink,
}

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Configuration for a link deduplication run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether to run without making changes
    pub dry_run: bool,

    /// How files are matched across the two roots
    pub identifier_policy: IdentifierPolicy,

    /// Whether size-matched pairs must also have identical BLAKE3 digests
    pub verify_content: bool,

    /// How the destination is replaced by a link
    pub replace_strategy: ReplaceStrategy,

    /// Number of worker threads for replacements (0 = auto)
    pub threads: usize,

    /// Whether a failed replacement should fail the whole run
    pub fail_on_replace_error: bool,

    /// Suffix of the temporary link created by the atomic strategy
    pub temp_suffix: String,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: false,
            identifier_policy: IdentifierPolicy::RelativePath,
            verify_content: false,
            replace_strategy: ReplaceStrategy::AtomicRename,
            threads: 0, // Auto
            fail_on_replace_error: false,
            temp_suffix: String::from(".dedup-tmp"),
            log_level: LogLevel::Warn,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.temp_suffix.is_empty() {
            return Err(Error::Configuration(
                "Temporary link suffix must not be empty".to_string(),
            ));
        }

        // The temporary link must stay in the destination's directory
        if self.temp_suffix.contains('/') || self.temp_suffix.contains(std::path::MAIN_SEPARATOR) {
            return Err(Error::Configuration(format!(
                "Temporary link suffix '{}' must not contain a path separator",
                self.temp_suffix
            )));
        }

        Ok(())
    }

    /// Number of worker threads to use for the replacement pool
    pub fn worker_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.identifier_policy, IdentifierPolicy::RelativePath);
        assert_eq!(config.replace_strategy, ReplaceStrategy::AtomicRename);
        assert!(!config.verify_content);
    }

    #[test]
    fn test_validate_rejects_bad_suffix() {
        let config = Config {
            temp_suffix: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let config = Config {
            temp_suffix: "../escape".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_worker_threads_auto() {
        let config = Config::default();
        assert!(config.worker_threads() >= 1);

        let config = Config {
            threads: 3,
            ..Default::default()
        };
        assert_eq!(config.worker_threads(), 3);
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dedup.json");

        let config = Config {
            dry_run: true,
            identifier_policy: IdentifierPolicy::BaseName,
            replace_strategy: ReplaceStrategy::RemoveThenLink,
            threads: 2,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert!(loaded.dry_run);
        assert_eq!(loaded.identifier_policy, IdentifierPolicy::BaseName);
        assert_eq!(loaded.replace_strategy, ReplaceStrategy::RemoveThenLink);
        assert_eq!(loaded.threads, 2);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "verify_content": true }"#).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert!(loaded.verify_content);
        assert_eq!(loaded.temp_suffix, ".dedup-tmp");
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::from_file(Path::new("/path/that/does/not/exist.json"));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
