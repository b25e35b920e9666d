//! Core functionality for collapsing duplicate files into symbolic links.
//!
//! This library provides the components of a link deduplication run:
//! - Catalog building for a source and a destination root
//! - Duplicate matching by identifier and size, with an optional digest check
//! - Safe replacement of destination files with links to their source
//! - Concurrent orchestration of the above

// -- External Dependencies --
use log::{error, info, warn};
use rayon::prelude::*;

// -- Standard Library --
use std::any::Any;
use std::path::Path;

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::*;
pub use error::{Error, ReplaceError, Result, Side};
pub use reporter::{ReplaceReporter, SilentReporter};
pub use types::*;

// -- Public Modules --
pub mod action;
pub mod catalog;
pub mod config;
pub mod deduplication;
pub mod digest;
pub mod logging;
pub mod reporter;
pub mod safety;
pub mod types;

/// Main entry point for a link deduplication run
pub struct LinkDeduper {
    config: Config,
}

impl LinkDeduper {
    /// Create a new LinkDeduper with the provided configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the source and destination catalogs on two threads.
    ///
    /// Both builds always run to completion; the run fails if either failed.
    pub fn build_catalogs(&self, source: &Path, destination: &Path) -> Result<(Catalog, Catalog)> {
        let policy = self.config.identifier_policy;

        let (source_result, destination_result) = crossbeam::scope(|s| {
            let source_handle = s.spawn(move |_| catalog::build_catalog(source, policy));
            let destination_handle =
                s.spawn(move |_| catalog::build_catalog(destination, policy));

            (
                flatten_join(source_handle.join()),
                flatten_join(destination_handle.join()),
            )
        })
        .map_err(|panic| Error::Unknown(extract_panic_info(panic)))?;

        match (source_result, destination_result) {
            (Ok(source_catalog), Ok(destination_catalog)) => {
                Ok((source_catalog, destination_catalog))
            }
            (Err(source_err), destination_result) => {
                if let Err(destination_err) = destination_result {
                    error!("Error processing destination path: {}", destination_err);
                }
                Err(Error::Catalog {
                    side: Side::Source,
                    source: Box::new(source_err),
                })
            }
            (Ok(_), Err(destination_err)) => Err(Error::Catalog {
                side: Side::Destination,
                source: Box::new(destination_err),
            }),
        }
    }

    /// Find the pairs to replace, applying the digest check if configured
    pub fn find_duplicates(
        &self,
        source: &Catalog,
        destination: &Catalog,
    ) -> Result<Vec<DuplicatePair>> {
        let pairs = deduplication::find_duplicates(source, destination);
        if !self.config.verify_content || pairs.is_empty() {
            return Ok(pairs);
        }

        let candidates = pairs.len();
        let pool = self.thread_pool()?;
        let confirmed = pool.install(|| deduplication::filter_by_content(pairs));
        info!(
            "{} of {} size matches confirmed by content",
            confirmed.len(),
            candidates
        );

        Ok(confirmed)
    }

    /// Replace every pair on the worker pool.
    ///
    /// A failing pair never stops the others; every outcome is returned.
    pub fn replace_all(
        &self,
        pairs: &[DuplicatePair],
        reporter: &dyn ReplaceReporter,
    ) -> Result<Vec<ActionResult>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let pool = self.thread_pool()?;
        let results: Vec<ActionResult> = pool.install(|| {
            pairs
                .par_iter()
                .map(|pair| {
                    let result = action::execute(pair, &self.config);
                    reporter.on_replace_result(&result);
                    result
                })
                .collect()
        });

        Ok(results)
    }

    /// Run the full pipeline: catalogs, matching, replacement
    pub fn run(
        &self,
        source: &Path,
        destination: &Path,
        reporter: &dyn ReplaceReporter,
    ) -> Result<RunReport> {
        self.config.validate()?;

        info!(
            "Cataloging {} and {}",
            source.display(),
            destination.display()
        );
        let (source_catalog, destination_catalog) = self.build_catalogs(source, destination)?;
        if std::fs::canonicalize(source).ok() == std::fs::canonicalize(destination).ok() {
            warn!("Source and destination are the same location; nothing can be replaced");
        }
        reporter.on_catalogs_built(&source_catalog, &destination_catalog);

        let pairs = self.find_duplicates(&source_catalog, &destination_catalog)?;
        info!("Found {} duplicates", pairs.len());
        reporter.on_duplicates_found(pairs.len());

        let results = self.replace_all(&pairs, reporter)?;

        let report = RunReport {
            source_files: source_catalog.len(),
            destination_files: destination_catalog.len(),
            duplicates: pairs.len(),
            results,
        };

        if !report.all_succeeded() {
            warn!(
                "{} of {} replacements failed",
                report.failure_count(),
                report.results.len()
            );
        }

        Ok(report)
    }

    fn thread_pool(&self) -> Result<rayon::ThreadPool> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_threads())
            .thread_name(|i| format!("dedup-worker-{}", i))
            .build()?;
        Ok(pool)
    }
}

fn flatten_join(joined: std::thread::Result<Result<Catalog>>) -> Result<Catalog> {
    joined.unwrap_or_else(|panic| {
        Err(Error::Unknown(format!(
            "catalog worker panicked: {}",
            extract_panic_info(panic)
        )))
    })
}

/// Extract panic info from panic value
fn extract_panic_info(panic_err: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_err.downcast_ref::<&str>() {
        format!("Panic with message: {}", s)
    } else if let Some(s) = panic_err.downcast_ref::<String>() {
        format!("Panic with message: {}", s)
    } else {
        "Unknown panic occurred".to_string()
    }
}
