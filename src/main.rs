// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - crawl settings
mod crawl;         // src/crawl/ - the concurrent crawl engine
mod error;         // src/error.rs - error types
mod logging;       // src/logging.rs - tracing setup
mod output;        // src/output.rs - printing results
mod page;          // src/page/ - fetching links and titles
mod server;        // src/server.rs - HTTP front end

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands, CrawlArgs};
use config::CrawlConfig;
use crawl::Crawler;
use page::HttpPageSource;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = crawl finished / server shut down cleanly
//   Ok(2) = the crawl was rejected (bad seed or depth, deadline expired)
//   Err   = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Crawl {
            seed_url,
            depth,
            json,
            tuning,
        } => handle_crawl(&seed_url, depth, json, &tuning).await,
        Commands::Serve { bind, port, tuning } => {
            handle_serve(SocketAddr::new(bind, port), &tuning).await
        }
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(seed_url: &str, depth: i64, json: bool, tuning: &CrawlArgs) -> Result<i32> {
    let config = CrawlConfig::from_args(tuning)?;
    let crawler = build_crawler(&config)?;

    match crawler
        .crawl_with_deadline(seed_url, depth, config.deadline)
        .await
    {
        Ok(tree) => {
            output::print_tree(&tree, json)?;
            Ok(0)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(2)
        }
    }
}

// Handles the 'serve' subcommand
async fn handle_serve(addr: SocketAddr, tuning: &CrawlArgs) -> Result<i32> {
    let config = CrawlConfig::from_args(tuning)?;
    let crawler = build_crawler(&config)?;

    server::serve(addr, server::AppState::new(crawler, config.deadline)).await?;
    Ok(0)
}

// Wires the HTTP page source into a crawler. The same source answers both
// link and title lookups so they share one connection pool.
fn build_crawler(config: &CrawlConfig) -> Result<Crawler> {
    let source = Arc::new(HttpPageSource::new(config).context("failed to create HTTP client")?);

    Ok(Crawler::new(source.clone(), source).with_max_concurrency(config.max_concurrency))
}
