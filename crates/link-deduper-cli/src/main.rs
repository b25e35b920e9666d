mod output;

use anyhow::Context;
use clap::Parser;
use link_deduper_core::logging::{init_logger, LOG_ENV_VAR};
use link_deduper_core::{Config, IdentifierPolicy, LinkDeduper, LogLevel, ReplaceStrategy};
use log::info;
use output::ConsoleReporter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dedup")]
#[command(about = "Replace duplicate files in a destination with symbolic links to a source")]
#[command(
    long_about = "Compares two paths and replaces every destination file that matches a \
                  source file by name and size with a symbolic link to the source file. \
                  Source files are never modified."
)]
#[command(version)]
struct Cli {
    /// Path to the source directory or file
    source_path: PathBuf,

    /// Path to the destination directory or file
    destination_path: PathBuf,

    /// Check every pair but make no changes
    #[arg(long)]
    dry_run: bool,

    /// Match files by base name instead of path relative to the root
    #[arg(long)]
    base_name: bool,

    /// Only replace files whose contents have the same BLAKE3 digest
    #[arg(long)]
    verify_content: bool,

    /// Remove the destination before linking instead of renaming a new link over it
    #[arg(long)]
    remove_first: bool,

    /// Number of worker threads (0 = one per CPU)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Exit with an error if any replacement fails
    #[arg(long)]
    strict: bool,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write a rotating log file into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };
    apply_overrides(&mut config, &cli);
    config.validate()?;

    init_logging(&cli, &config)?;

    println!("Source path: {}", cli.source_path.display());
    println!("Destination path: {}", cli.destination_path.display());
    if config.dry_run {
        println!("Dry run: no files will be changed");
    }

    let fail_on_replace_error = config.fail_on_replace_error;
    let deduper = LinkDeduper::new(config);
    let report = deduper
        .run(&cli.source_path, &cli.destination_path, &ConsoleReporter)
        .context("Deduplication failed")?;

    output::print_summary(&report);
    info!("Deduplication complete");

    if fail_on_replace_error && !report.all_succeeded() {
        anyhow::bail!(
            "{} of {} replacements failed",
            report.failure_count(),
            report.results.len()
        );
    }

    Ok(())
}

/// Command line flags override the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.dry_run {
        config.dry_run = true;
    }
    if cli.base_name {
        config.identifier_policy = IdentifierPolicy::BaseName;
    }
    if cli.verify_content {
        config.verify_content = true;
    }
    if cli.remove_first {
        config.replace_strategy = ReplaceStrategy::RemoveThenLink;
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if cli.strict {
        config.fail_on_replace_error = true;
    }

    // Set log level based on verbosity
    config.log_level = match cli.verbose {
        0 => config.log_level,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };
}

fn init_logging(cli: &Cli, config: &Config) -> Result<(), anyhow::Error> {
    let level = config.log_level.to_level_filter();

    if let Some(log_dir) = &cli.log_dir {
        init_logger(log_dir, level).context("Failed to initialize logging")?;
    } else {
        env_logger::Builder::new()
            .filter_level(level)
            .parse_env(env_logger::Env::new().filter(LOG_ENV_VAR))
            .init();
    }

    Ok(())
}
