//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Maps `-q` and `-v` counts to a default filter directive.
pub(crate) const fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "off";
    }
    match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    }
}

/// Installs a stderr `fmt` subscriber. `RUST_LOG` overrides the verbosity flags.
///
/// A failure to install is reported on stderr and the run continues without logs.
pub(crate) fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    if let Err(err) = install(filter) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn install(filter: EnvFilter) -> Result<(), TryInitError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init()
}
