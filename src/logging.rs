//! Process-wide logger setup.
//!
//! Call sites use the `log` macros; the binary installs `env_logger` once.
//! `RUST_LOG` always wins over the defaults chosen here.

use env_logger::Env;

/// Install the global logger, writing to stderr.
///
/// The default filter is `warn`, or `debug` for this crate when `verbose` is
/// set. Calling this more than once is a no-op.
pub fn initialize(verbose: bool) {
    let default_filter = if verbose {
        "warn,usersearch=debug"
    } else {
        "warn"
    };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();
}
