//! icd-harvest main entry point
//!
//! Command-line interface for harvesting the ICD-10 classification
//! hierarchy into CSV tables.

use anyhow::Context;
use clap::Parser;
use icd_harvest::config::load_config_with_hash;
use icd_harvest::harvest::run_harvest;
use icd_harvest::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// icd-harvest: scrape the ICD-10 classification hierarchy
///
/// Harvests chapters, blocks and categories from the public ICD-10 browser
/// and writes them as CSV tables plus a markdown run summary.
#[derive(Parser, Debug)]
#[command(name = "icd-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Scrape the ICD-10 classification hierarchy into CSV tables", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let summary = run_harvest(&config, &config_hash)
        .await
        .context("harvest failed")?;
    print_summary(&summary);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("icd_harvest=info,warn"),
            1 => EnvFilter::new("icd_harvest=debug,info"),
            2 => EnvFilter::new("icd_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &icd_harvest::config::Config) {
    println!("=== icd-harvest Dry Run ===\n");

    println!("Harvest:");
    println!("  Release: {}", config.harvest.version);
    println!("  Base URL: {}", config.harvest.endpoint_base());
    println!("  Max workers: {}", config.harvest.max_workers);
    println!("  Fetch timeout: {}s", config.harvest.fetch_timeout_secs);
    match config.harvest.run_deadline_secs {
        Some(deadline) => println!("  Run deadline: {}s", deadline),
        None => println!("  Run deadline: none"),
    }
    println!("  Fail fast: {}", config.harvest.fail_fast);

    println!("\nBrowser:");
    match &config.browser.chrome_path {
        Some(path) => println!("  Executable: {}", path.display()),
        None => println!("  Executable: auto-detect"),
    }
    println!("  Headless: {}", config.browser.headless);
    println!(
        "  Navigation timeout: {}s",
        config.browser.navigation_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Chapters: {}", config.output.chapters_path);
    println!("  Blocks: {}", config.output.blocks_path);
    println!("  Categories: {}", config.output.categories_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
}
