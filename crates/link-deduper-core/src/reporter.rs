use crate::types::{ActionResult, Catalog};

/// Receives run events as they happen.
///
/// `on_replace_result` is called from worker threads, in completion order.
/// All methods have default no-op implementations.
pub trait ReplaceReporter: Send + Sync {
    fn on_catalogs_built(&self, _source: &Catalog, _destination: &Catalog) {}
    fn on_duplicates_found(&self, _count: usize) {}
    fn on_replace_result(&self, _result: &ActionResult) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl ReplaceReporter for SilentReporter {}
