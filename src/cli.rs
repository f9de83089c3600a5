// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl: crawl one site and print the tree
// - serve: run an HTTP server answering GET /crawl?url=...&depth=...
//
// Crawl tuning flags are shared by both through the flattened `CrawlArgs`
// struct. Each of them can also come from a SITE_TREE_* environment variable.
// =============================================================================

use std::net::IpAddr;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_USER_AGENT;

/// Depth used when the caller doesn't pass one
pub const DEFAULT_DEPTH: i64 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "site-tree",
    version,
    about = "Crawl a website and print its pages as a titled tree",
    long_about = "site-tree starts from a seed URL, follows links concurrently up to a depth limit, \
                  and returns every page it discovered as a tree annotated with page titles."
)]
pub struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and print the page tree
    ///
    /// Example: site-tree crawl https://example.com --depth 3
    Crawl {
        /// Seed URL to start from (absolute http/https URL)
        seed_url: String,

        /// Maximum depth. Pages at this depth are listed but not fetched;
        /// 0 returns only the seed page.
        #[arg(short, long, default_value_t = DEFAULT_DEPTH, allow_negative_numbers = true)]
        depth: i64,

        /// Output the tree as JSON instead of an indented list
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        tuning: CrawlArgs,
    },

    /// Serve crawls over HTTP at GET /crawl?url=<seed>&depth=<n>
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0", env = "SITE_TREE_BIND")]
        bind: IpAddr,

        /// Port to listen on
        #[arg(long, default_value_t = 8000, env = "SITE_TREE_PORT")]
        port: u16,

        #[command(flatten)]
        tuning: CrawlArgs,
    },
}

/// Flags that tune how a crawl talks to the network
#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    /// Timeout for each page request, in seconds
    #[arg(long, default_value_t = 15, env = "SITE_TREE_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Maximum number of page requests (link fetches and title lookups)
    /// in progress at once (unlimited if unset)
    #[arg(long, env = "SITE_TREE_MAX_CONCURRENCY")]
    pub max_concurrency: Option<usize>,

    /// Give up on a whole crawl after this many seconds
    #[arg(long, env = "SITE_TREE_DEADLINE_SECS")]
    pub deadline_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT, env = "SITE_TREE_USER_AGENT")]
    pub user_agent: String,
}
