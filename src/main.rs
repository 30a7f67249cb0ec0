//! Site-Crawler main entry point
//!
//! This is the command-line shell around the crawl engine. It collects the
//! seed and options, prints progress lines as they arrive, and prints the
//! summary once the crawl ends.

use clap::Parser;
use site_crawler::config::{load_config_with_hash, Config};
use site_crawler::crawler::{Coordinator, StopSignal};
use site_crawler::CrawlerError;
use site_crawler::output::{print_report, write_markdown_report, CrawlObserver};
use site_crawler::url::with_default_scheme;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Site-Crawler: a same-domain web crawler
///
/// Crawls every page reachable from URL without leaving its host,
/// optionally saving each page as HTML.
#[derive(Parser, Debug)]
#[command(name = "site-crawler")]
#[command(version)]
#[command(about = "Crawl a website without leaving its domain", long_about = None)]
struct Cli {
    /// Seed URL; https:// is assumed when no scheme is given
    #[arg(value_name = "URL")]
    url: String,

    /// Save the content of every crawled page
    #[arg(short, long)]
    save: bool,

    /// Maximum number of pages to crawl
    #[arg(short = 'n', long, value_name = "N")]
    max_pages: Option<usize>,

    /// Number of pages fetched at the same time
    #[arg(short, long, value_name = "N")]
    concurrency: Option<usize>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory saved pages are written to
    #[arg(long, value_name = "DIR")]
    pages_dir: Option<String>,

    /// Write a markdown summary to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Prints each progress line on its own line of stdout
struct ConsoleObserver;

impl CrawlObserver for ConsoleObserver {
    fn on_log(&self, line: &str) {
        println!("{}", line);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let seed = with_default_scheme(&cli.url);
    let observer: Arc<dyn CrawlObserver> = Arc::new(ConsoleObserver);
    let summary_path = config.output.summary_path();

    let coordinator = match Coordinator::new(config, &seed, observer) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            tracing::error!("Cannot crawl {}: {}", seed, e);
            return Err(e.into());
        }
    };

    let stop = StopSignal::new();
    spawn_ctrl_c_handler(stop.clone());

    println!("Starting crawl for: {}", seed);
    let report = coordinator.with_stop_signal(stop).run().await;

    println!();
    print_report(&report);

    if let Some(path) = summary_path {
        match write_markdown_report(&report, &path) {
            Ok(()) => tracing::info!("Summary written to {}", path.display()),
            Err(e) => tracing::error!("Failed to write summary {}: {}", path.display(), e),
        }
    }

    Ok(())
}

/// Loads the configuration file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> Result<Config, CrawlerError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if cli.save {
        config.crawler.save_content = true;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(pages_dir) = &cli.pages_dir {
        config.output.pages_dir = pages_dir.clone();
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = summary.clone();
    }

    // Overrides must satisfy the same rules as the file
    site_crawler::config::validate(&config)?;

    Ok(config)
}

/// Raises the stop signal on the first Ctrl-C
fn spawn_ctrl_c_handler(stop: StopSignal) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            stop.raise();
        }
    });
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_crawler=info,warn"),
            1 => EnvFilter::new("site_crawler=debug,info"),
            2 => EnvFilter::new("site_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
