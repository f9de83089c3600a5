// src/config.rs
// =============================================================================
// Runtime settings for a crawl.
//
// The values come from command-line flags (see cli.rs). Every flag can also be
// set through a SITE_TREE_* environment variable, which clap reads for us, so
// the `serve` command can be configured entirely from the environment.
// =============================================================================

use std::time::Duration;

use anyhow::{bail, Result};

use crate::cli::CrawlArgs;

/// Sent with every request so site owners can tell who is crawling them
pub const DEFAULT_USER_AGENT: &str = concat!("site-tree/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout for page and title fetches
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Upper bound on a single page or title request
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Cap on concurrently running workers (None = unbounded)
    pub max_concurrency: Option<usize>,
    /// Overall deadline for one crawl (None = wait for completion)
    pub deadline: Option<Duration>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrency: None,
            deadline: None,
        }
    }
}

impl CrawlConfig {
    /// Builds the config from parsed CLI flags, rejecting zero-valued limits
    pub fn from_args(args: &CrawlArgs) -> Result<Self> {
        if args.timeout_secs == 0 {
            bail!("--timeout-secs must be greater than zero");
        }
        if args.max_concurrency == Some(0) {
            bail!("--max-concurrency must be greater than zero");
        }
        if args.deadline_secs == Some(0) {
            bail!("--deadline-secs must be greater than zero");
        }

        Ok(Self {
            request_timeout: Duration::from_secs(args.timeout_secs),
            user_agent: args.user_agent.clone(),
            max_concurrency: args.max_concurrency,
            deadline: args.deadline_secs.map(Duration::from_secs),
        })
    }
}
