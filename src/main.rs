//! Perimeter main entry point
//!
//! Command-line interface for the Perimeter domain-scoped crawler.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Perimeter: a domain-scoped web crawler
///
/// Perimeter walks every link reachable from a seed URL, classifies each
/// discovered URL by its relationship to the target domain, and writes
/// de-duplicated link inventories plus aggregate statistics.
#[derive(Parser, Debug)]
#[command(name = "perimeter")]
#[command(version = "1.0.0")]
#[command(about = "A domain-scoped web crawler", long_about = None)]
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

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the report database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = perimeter::config::load_config_with_hash(&cli.config)?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("perimeter=info,warn"),
            1 => EnvFilter::new("perimeter=debug,info"),
            2 => EnvFilter::new("perimeter=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &perimeter::config::Config) {
    println!("=== Perimeter Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed: {}", config.crawl.seed);
    println!("  Target domain: {}", config.crawl.target_domain);
    println!("  Page limit: {}", config.crawl.page_limit);
    println!("  Crawl subdomains: {}", config.crawl.crawl_subdomains);
    println!("  Workers: {}", config.crawl.workers);
    println!(
        "  Timeouts: {}s connect / {}s total",
        config.crawl.connect_timeout_secs, config.crawl.total_timeout_secs
    );
    if let Some(secs) = config.crawl.max_runtime_secs {
        println!("  Max runtime: {}s", secs);
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Stats directory: {}", config.output.stats_dir);
    if let Some(db) = &config.output.database_path {
        println!("  Database: {}", db);
    }
    if let Some(pages) = &config.output.pages_dir {
        println!("  Page archive: {}", pages);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the report database
fn handle_stats(config: &perimeter::config::Config) -> anyhow::Result<()> {
    use perimeter::report::{load_statistics, print_statistics};
    use std::path::Path;

    let db_path = config
        .output
        .database_path
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no database-path configured; nothing to report"))?;

    println!("Database: {}\n", db_path);

    match load_statistics(Path::new(db_path))? {
        Some(stats) => print_statistics(&stats),
        None => println!("No crawl runs recorded yet"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: perimeter::config::Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl of {} (seed: {}, page limit: {})",
        config.crawl.target_domain,
        config.crawl.seed,
        config.crawl.page_limit
    );

    let mut coordinator = perimeter::crawler::Coordinator::new(config, Some(config_hash))?;
    let snapshot = coordinator.run().await?;

    println!("Crawl of {} finished", snapshot.target_domain);
    println!("  Pages visited: {}", snapshot.visited.len());
    println!("  Links encountered: {}", snapshot.total_links_found);
    println!("  Subdomains: {}", snapshot.subdomains.len());
    println!("  External domains: {}", snapshot.external_domains.len());
    println!("  Documents: {}", snapshot.document_files.len());
    println!("  Dead links: {}", snapshot.bad_urls.len());
    println!("  Unresponsive: {}", snapshot.unresponsive.len());

    Ok(())
}
