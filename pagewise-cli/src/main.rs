//! pagewise CLI
//!
//! Pages through a generated in-memory source behind the TTL cache and
//! reports cache hit/miss counters.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagewise_cache::{CacheConfig, CachedProvider, CounterMetrics, MetricsSnapshot};
use pagewise_core::{Page, Paginator};
use pagewise_source::SliceProvider;

type CliPaginator = Paginator<u64, CachedProvider<u64, SliceProvider<u64>>>;

/// pagewise - cached pagination over countable sources
#[derive(Parser)]
#[command(name = "pagewise")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Number of items in the generated source (1..=N)
    #[arg(long, default_value = "101", env = "PAGEWISE_ITEMS", global = true)]
    items: u64,

    /// Items per page
    #[arg(long, default_value = "10", env = "PAGEWISE_PAGE_SIZE", global = true)]
    page_size: u64,

    /// Count cache TTL in milliseconds (0 disables)
    #[arg(long, default_value = "30000", env = "PAGEWISE_COUNT_TTL_MS", global = true)]
    count_ttl_ms: u64,

    /// Query cache TTL in milliseconds (0 disables)
    #[arg(long, default_value = "30000", env = "PAGEWISE_QUERY_TTL_MS", global = true)]
    query_ttl_ms: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one page
    Page {
        /// 1-based page number
        #[arg(allow_negative_numbers = true)]
        number: i64,
        /// Fetch the page this many times
        #[arg(short, long, default_value = "1")]
        repeat: u32,
    },

    /// Fetch every page in order
    Walk,
}

#[derive(Serialize)]
struct Report<'a> {
    pages: &'a [Page<u64>],
    metrics: MetricsSnapshot,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "pagewise=debug,info"
    } else {
        "pagewise=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let metrics = Arc::new(CounterMetrics::new());
    let paginator = build_paginator(&cli.source, metrics.clone())?;

    let pages = match cli.command {
        Commands::Page { number, repeat } => cmd_page(&paginator, number, repeat).await?,
        Commands::Walk => cmd_walk(&paginator).await?,
    };

    let snapshot = metrics.snapshot();
    if cli.json {
        let report = Report {
            pages: &pages,
            metrics: snapshot,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for page in &pages {
            print_page(page);
        }
        print_metrics(&snapshot);
    }

    Ok(())
}

fn build_paginator(args: &SourceArgs, metrics: Arc<CounterMetrics>) -> Result<CliPaginator> {
    let source: SliceProvider<u64> = (1..=args.items).collect();
    let config = CacheConfig {
        count_ttl_ms: args.count_ttl_ms,
        query_ttl_ms: args.query_ttl_ms,
    };

    info!(
        items = args.items,
        page_size = args.page_size,
        count_ttl_ms = config.count_ttl_ms,
        query_ttl_ms = config.query_ttl_ms,
        "Building paginator"
    );

    let provider = CachedProvider::with_config(source, config).with_metrics(metrics);
    Paginator::new(provider, args.page_size).context("Invalid --page-size")
}

/// Fetch one page `repeat` times
async fn cmd_page(paginator: &CliPaginator, number: i64, repeat: u32) -> Result<Vec<Page<u64>>> {
    let mut pages = Vec::with_capacity(repeat as usize);
    for _ in 0..repeat.max(1) {
        let page = paginator
            .page(number)
            .await
            .with_context(|| format!("Failed to fetch page {}", number))?;
        pages.push(page);
    }
    Ok(pages)
}

/// Fetch pages 1..=total_pages
async fn cmd_walk(paginator: &CliPaginator) -> Result<Vec<Page<u64>>> {
    let mut pages = Vec::new();
    let mut number = 1;

    loop {
        let page = paginator
            .page(number)
            .await
            .with_context(|| format!("Failed to fetch page {}", number))?;
        let has_next = page.has_next();
        let next = page.next();
        pages.push(page);

        if !has_next {
            break;
        }
        number = next as i64;
    }

    Ok(pages)
}

fn print_page(page: &Page<u64>) {
    if page.total_pages == 0 {
        println!("{}", "Source is empty.".yellow());
        return;
    }

    println!(
        "{} {}/{}",
        "Page".cyan().bold(),
        page.page_number,
        page.total_pages
    );
    println!(
        "   {} {}..={}",
        "Items:".dimmed(),
        page.bottom_index,
        page.top_index
    );
    let items: Vec<String> = page.items.iter().map(u64::to_string).collect();
    println!("   {}", items.join(", "));
}

fn print_metrics(snapshot: &MetricsSnapshot) {
    println!("\n{}", "Cache:".yellow().bold());
    println!(
        "   {} {}/{} hits ({:.0}%)",
        "Count:".dimmed(),
        snapshot.count_hits,
        snapshot.count_total,
        snapshot.count_hit_ratio() * 100.0
    );
    println!(
        "   {} {}/{} hits ({:.0}%)",
        "Query:".dimmed(),
        snapshot.query_hits,
        snapshot.query_total,
        snapshot.query_hit_ratio() * 100.0
    );
}
