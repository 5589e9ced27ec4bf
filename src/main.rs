//! cppref-indexer main entry point
//!
//! This is the command-line interface for the cppreference symbol indexer.

use clap::Parser;
use cppref_indexer::config::{self, load_config_with_hash, Config, IndexMode};
use cppref_indexer::output::{print_statistics, write_with_fallback, ScriptWriter, WriteOutcome};
use cppref_indexer::run_index;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// cppref-indexer: a polite documentation symbol indexer
///
/// Crawls the cppreference symbol index one page at a time, follows
/// namespace and container pages, and writes a table mapping qualified
/// names to their documentation links for the editor's lookup feature.
#[derive(Parser, Debug)]
#[command(name = "cppref-indexer")]
#[command(version)]
#[command(about = "A polite cppreference symbol indexer", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Page the traversal starts from
    #[arg(long, value_name = "URL")]
    root_url: Option<String>,

    /// Namespace label for the root page's symbols
    #[arg(long)]
    namespace: Option<String>,

    /// Treat the root page as a container page instead of a symbol index
    #[arg(long)]
    container: bool,

    /// Path of the generated data script
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Path of the append-only run log
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Validate config and show what would be indexed without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (cfg, hash) = load_config_with_hash(path)?;
            (cfg, Some(hash))
        }
        None => (Config::default(), None),
    };
    apply_overrides(&mut config, &cli);

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet, Path::new(&config.output.log_path))?;

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::info!("Using built-in configuration"),
    }

    if let Err(e) = config::validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_index(&config).await
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(root_url) = &cli.root_url {
        config.index.root_url = root_url.clone();
    }
    if let Some(namespace) = &cli.namespace {
        config.index.namespace = namespace.clone();
    }
    if cli.container {
        config.index.mode = IndexMode::Container;
    }
    if let Some(output) = &cli.output {
        config.output.data_path = output.display().to_string();
    }
    if let Some(log_file) = &cli.log_file {
        config.output.log_path = log_file.display().to_string();
    }
}

/// Sets up the console and log file subscribers based on verbosity level
///
/// The log file is opened in append mode so consecutive runs accumulate in
/// one file.
fn setup_logging(verbose: u8, quiet: bool, log_path: &Path) -> std::io::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("cppref_indexer=info,warn"),
            1 => EnvFilter::new("cppref_indexer=debug,info"),
            2 => EnvFilter::new("cppref_indexer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== cppref-indexer Dry Run ===\n");

    println!("Site:");
    println!("  Root: {}", config.site.root);
    println!("  Link prefix: {}", config.site.link_prefix);

    println!("\nIndex:");
    println!("  Root URL: {}", config.index.root_url);
    println!("  Namespace: {}", config.index.namespace);
    println!("  Mode: {:?}", config.index.mode);
    println!("  Duplicate policy: {:?}", config.index.duplicate_policy);
    println!("  On unreachable: {:?}", config.index.on_unreachable);

    println!("\nFetcher:");
    println!(
        "  Minimum request interval: {}ms",
        config.fetcher.min_request_interval
    );
    println!("  Max attempts: {}", config.fetcher.max_attempts);
    println!("  Timeout: {}s", config.fetcher.timeout);
    println!("  User agent: {}", config.fetcher.user_agent);

    println!("\nOutput:");
    println!("  Data script: {}", config.output.data_path);
    println!("  Log file: {}", config.output.log_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the normal indexing mode
async fn handle_index(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let run = match run_index(config).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!("Indexing failed: {}", e);
            return Err(e.into());
        }
    };

    let writer = ScriptWriter::new(
        &config.output.data_path,
        &config.index.namespace,
        &config.site.link_prefix,
    );
    let outcome = write_with_fallback(&writer, &run.table, &mut std::io::stdout().lock())?;
    if outcome == WriteOutcome::Persisted {
        tracing::info!(
            "Wrote {} entries to {}",
            run.table.len(),
            writer.path().display()
        );
    }

    print_statistics(&run.statistics, &run.timing);
    Ok(())
}
