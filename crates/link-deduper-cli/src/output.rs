use link_deduper_core::{ActionResult, ActionType, Catalog, ReplaceReporter, RunReport};

/// Prints one line per event to stdout
pub struct ConsoleReporter;

impl ReplaceReporter for ConsoleReporter {
    fn on_catalogs_built(&self, source: &Catalog, destination: &Catalog) {
        println!("Found {} files in source path", source.len());
        println!("Found {} files in destination path", destination.len());

        let skipped = source.skipped() + destination.skipped();
        if skipped > 0 {
            println!("Skipped {} unreadable entries (see warnings)", skipped);
        }
    }

    fn on_duplicates_found(&self, count: usize) {
        println!("Found {} duplicates", count);
    }

    fn on_replace_result(&self, result: &ActionResult) {
        match (result.success, result.action_type) {
            (true, ActionType::Symlink) => println!(
                "Replaced {} with symlink to {}",
                result.destination.display(),
                result.source.display()
            ),
            (true, ActionType::DryRun) => println!(
                "Would replace {} with symlink to {}",
                result.destination.display(),
                result.source.display()
            ),
            (false, _) => println!(
                "Error replacing with symlink: {}",
                result.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

pub fn print_summary(report: &RunReport) {
    if report.results.is_empty() {
        return;
    }

    let dry_run = report
        .results
        .iter()
        .any(|r| r.action_type == ActionType::DryRun);

    println!(
        "{} of {} duplicates handled, {} failed, {} bytes {}",
        report.success_count(),
        report.duplicates,
        report.failure_count(),
        report.bytes_reclaimed(),
        if dry_run { "reclaimable" } else { "reclaimed" }
    );
}
