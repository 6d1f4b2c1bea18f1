//! Logging setup for the command-line tools.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a stderr subscriber. `RUST_LOG` overrides the default `info` filter.
///
/// `verbose` raises this crate to `debug` so each classification is logged.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,analog_meter_reader=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
