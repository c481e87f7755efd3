//! Logging setup on top of `tracing`.
//!
//! Diagnostics and progress go to stderr so stdout stays free for the JSON
//! model. `RUST_LOG` overrides the default level unless a flag is given.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Call once, before any logging.
///
/// `verbose` wins over `quiet`.
pub fn init_logger(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("hdrscan=debug")
    } else if quiet {
        EnvFilter::new("hdrscan=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hdrscan=info"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
