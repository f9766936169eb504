//! Logging setup
//!
//! Diagnostics go to stderr through tracing. `COPYCONTENT_LOG` takes an
//! `EnvFilter` directive and wins over the verbosity flags.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive
pub const LOG_ENV: &str = "COPYCONTENT_LOG";

/// Default level for the given verbosity flags
pub fn default_level(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool, quiet: bool, color: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color && std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
