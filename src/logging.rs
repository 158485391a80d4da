//! Logging setup
//!
//! Everything goes to stderr; stdout is reserved for the summary line.

use std::io::IsTerminal;

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Initialize tracing. `RUST_LOG` wins over the `-v` count when set.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(config.verbose >= 2)
        .with_line_number(config.verbose >= 3)
        .init();

    debug!("stationstats started with verbosity level: {}", config.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
