//! doc-mirror main entry point
//!
//! This is the command-line interface for the documentation mirror.

use anyhow::{bail, Context};
use clap::Parser;
use doc_mirror::config::{default_config, load_config, render_config, Config};
use doc_mirror::crawler::crawl;
use doc_mirror::output::{load_statistics, print_statistics, run_compile};
use doc_mirror::storage::open_store;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// doc-mirror: mirror a documentation site into Markdown
///
/// doc-mirror crawls one documentation site from a fixed set of seed pages,
/// stores every page as Markdown with its navigation metadata, and compiles
/// the stored pages into a single reference document.
#[derive(Parser, Debug)]
#[command(name = "doc-mirror")]
#[command(version)]
#[command(about = "Mirror a documentation site into Markdown", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present = "defaults")]
    config: Option<PathBuf>,

    /// Use the built-in configuration instead of a file
    #[arg(long, conflicts_with = "config")]
    defaults: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl the site without compiling
    #[arg(long, conflicts_with_all = ["compile_only", "stats", "dry_run"])]
    crawl_only: bool,

    /// Compile the existing store without crawling
    #[arg(long, conflicts_with_all = ["crawl_only", "stats", "dry_run"])]
    compile_only: bool,

    /// Show statistics from the page store and exit
    #[arg(long, conflicts_with_all = ["crawl_only", "compile_only", "dry_run"])]
    stats: bool,

    /// Validate config and print it without crawling
    #[arg(long, conflicts_with_all = ["crawl_only", "compile_only", "stats"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.compile_only {
        handle_compile(&config)?;
    } else {
        handle_crawl(&config).await?;
        if !cli.crawl_only {
            handle_compile(&config)?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_mirror=info,warn"),
            1 => EnvFilter::new("doc_mirror=debug,info"),
            2 => EnvFilter::new("doc_mirror=trace,debug"),
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

/// Loads the configuration file, or the built-in one with `--defaults`
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
        None if cli.defaults => {
            tracing::info!("Using built-in configuration");
            default_config().context("Built-in configuration is invalid")
        }
        None => bail!("No configuration file given (pass --defaults to use the built-in one)"),
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== doc-mirror Dry Run ===\n");

    println!("Site:");
    println!("  Root: {}", config.site.root);
    println!("  Content selector: {}", config.site.content_selector);
    println!("  Hidden selector: {}", config.site.hidden_selector);

    println!("\nSeeds ({}):", config.site.seeds.len());
    for seed in &config.site.seeds {
        println!("  - {}", seed);
    }

    println!("\nSkipped ({}):", config.site.skip.len());
    for pathname in &config.site.skip {
        println!("  - {}", pathname);
    }

    println!("\nStore: {}", config.store.root);
    println!("Output: {}", config.compile.output_path);

    println!("\nResolved configuration:\n");
    println!("{}", render_config(config)?);

    println!("✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics from the page store
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Store: {}\n", config.store.root);

    let store = open_store(Path::new(&config.store.root));
    let stats = load_statistics(&store)
        .with_context(|| format!("Failed to read store at {}", config.store.root))?;

    print_statistics(&stats);

    Ok(())
}

/// Handles the crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Mirroring {} from {} seeds into {}",
        config.site.root,
        config.site.seeds.len(),
        config.store.root
    );

    let report = crawl(config).await.context("Crawl failed")?;

    tracing::info!(
        "Crawl completed: {} visited ({} fetched, {} from store), {} not found in {:.1}s",
        report.visited.len(),
        report.fetched,
        report.cached,
        report.not_found.len(),
        report.elapsed.as_secs_f64()
    );

    Ok(())
}

/// Handles the compile operation
fn handle_compile(config: &Config) -> anyhow::Result<()> {
    let document = run_compile(config).context("Compilation failed")?;

    if !document.missing.is_empty() {
        tracing::warn!(
            "{} linked pages were not in the store",
            document.missing.len()
        );
    }

    println!(
        "✓ Compiled {} pages into {}",
        document.sections.len(),
        config.compile.output_path
    );

    Ok(())
}
