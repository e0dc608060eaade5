//! headernav - Preview dynamic header submenus from the terminal

mod cache;
mod cli;
mod fetch;

use anyhow::{Context, Result};
use cache::FileCache;
use clap::{Parser, Subcommand};
use cli::{ActiveReport, OutputFormat, PreviewReport};
use fetch::ReqwestFetcher;
use headernav_core::submenu::{resolve_source, SubmenuCache};
use headernav_core::{NavConfig, SubmenuBuilder, SubmenuSpec};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(
    name = "headernav",
    version,
    about = "Preview dynamic header submenus and active-link matching",
    long_about = "Runs the headernav submenu builder outside the browser.\n\
                  \n\
                  Fetches a source page, extracts item anchors and titles with the same\n\
                  selectors, limits and fallback rules as the widget, and prints the\n\
                  result or the exact <li> markup the widget would inject.\n\
                  \n\
                  Examples:\n\
                    headernav preview products.html --page https://example.com/\n\
                    headernav preview guides.html --max-items 3 --format markup\n\
                    headernav preview docs/index.html --item-selector 'section[id]'\n\
                    headernav active --page /shop/about.html index.html about.html\n\
                    headernav config                 # Print the effective config\n\
                    headernav clear-cache            # Delete cached submenus\n\
                  \n\
                  Environment Variables:\n\
                    HEADERNAV_CONFIG                 # Path to a TOML config file\n\
                    HEADERNAV_CACHE_DIR              # Override the cache directory\n\
                    HEADERNAV_LOG                    # Log filter (e.g. headernav=debug)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML config file (default: built-in defaults)
    #[arg(long, global = true, env = "HEADERNAV_CONFIG")]
    config: Option<PathBuf>,

    /// Cache directory (default: platform cache dir)
    #[arg(long, global = true, env = "HEADERNAV_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build one dynamic submenu and print it
    Preview {
        /// Source page, resolved against --page
        source: String,

        /// URL of the page hosting the header (default: current directory)
        #[arg(long)]
        page: Option<String>,

        /// Selector for candidate items
        #[arg(long)]
        item_selector: Option<String>,

        /// Selector for the title inside each item
        #[arg(long)]
        title_selector: Option<String>,

        /// Number of items to keep (clamped to 1..=9)
        #[arg(long)]
        max_items: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Skip the submenu cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Show which hrefs would be marked active on a page
    Active {
        /// Page path or URL (e.g. /shop/about.html)
        #[arg(long)]
        page: String,

        /// Candidate link hrefs
        #[arg(required = true)]
        hrefs: Vec<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as JSON
    Config,

    /// Delete the submenu cache
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => NavConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => NavConfig::default(),
    };

    match cli.command {
        Command::Preview {
            source,
            page,
            item_selector,
            title_selector,
            max_items,
            format,
            no_cache,
        } => {
            let mut spec = SubmenuSpec::new(source, &config.submenu);
            if let Some(selector) = item_selector {
                spec = spec.with_item_selector(selector);
            }
            if let Some(selector) = title_selector {
                spec = spec.with_title_selector(selector);
            }
            if let Some(max) = max_items {
                spec = spec.with_max_items(max);
            }
            let cache_dir = if no_cache {
                None
            } else {
                Some(resolve_cache_dir(cli.cache_dir)?)
            };
            run_preview(&config, spec, page.as_deref(), cache_dir.as_deref(), format).await
        }
        Command::Active { page, hrefs, json } => {
            let path = match Url::parse(&page) {
                Ok(url) => url.path().to_string(),
                Err(_) => page,
            };
            let report = ActiveReport::new(&path, &config.home_page, &hrefs);
            println!("{}", cli::format_active(&report, json));
            Ok(())
        }
        Command::Config => {
            let json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize config")?;
            println!("{}", json);
            Ok(())
        }
        Command::ClearCache => run_clear_cache(cli.cache_dir),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "headernav=debug,headernav_core=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("HEADERNAV_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_cache_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(cache::default_cache_dir)
        .context("Could not determine cache directory")
}

/// URL of the page hosting the header
///
/// Accepts absolute URLs or filesystem paths; defaults to the current
/// directory so relative sources resolve to local files.
fn page_url(page: Option<&str>) -> Result<Url> {
    if let Some(page) = page {
        if let Ok(url) = Url::parse(page) {
            return Ok(url);
        }
        let path = std::fs::canonicalize(page)
            .with_context(|| format!("Page is neither a URL nor an existing path: {page}"))?;
        return file_url(&path, path.is_dir());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    file_url(&cwd, true)
}

fn file_url(path: &Path, is_dir: bool) -> Result<Url> {
    let url = if is_dir {
        Url::from_directory_path(path)
    } else {
        Url::from_file_path(path)
    };
    url.map_err(|_| anyhow::anyhow!("Not an absolute path: {}", path.display()))
}

async fn run_preview(
    config: &NavConfig,
    spec: SubmenuSpec,
    page: Option<&str>,
    cache_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let base = page_url(page)?;
    let resolved = resolve_source(&base, &spec.source)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| spec.source.clone());
    debug!(base = %base, source = %spec.source, "previewing submenu");

    let fetcher = ReqwestFetcher::new()?;
    let store = cache_dir.map(FileCache::open).transpose()?;

    let mut builder = SubmenuBuilder::new(&fetcher, &base, config);
    if let Some(store) = &store {
        let pruned = SubmenuCache::new(store, &config.cache).prune_stale();
        if pruned > 0 {
            debug!(pruned, "removed stale cache entries");
        }
        builder = builder.with_cache(store);
    }

    let built = builder.build(&spec).await;
    let report = PreviewReport::new(&spec, resolved, built);
    println!("{}", cli::format_preview(&report, format));
    Ok(())
}

fn run_clear_cache(cache_dir: Option<PathBuf>) -> Result<()> {
    let dir = resolve_cache_dir(cache_dir)?;
    match FileCache::remove_file(&dir)? {
        Some(size) => println!(
            "✓ Submenu cache cleared ({:.1} KB removed)",
            size as f64 / 1024.0
        ),
        None => println!("No cache found at {}", dir.display()),
    }
    Ok(())
}
