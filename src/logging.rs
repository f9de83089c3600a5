// src/logging.rs
// Sets up tracing. Logs go to stderr so `--json` output on stdout stays clean.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over the CLI flags.
pub fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let default_filter = if verbose {
        "info,site_tree=debug"
    } else if quiet {
        "error"
    } else {
        "warn,site_tree=info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
