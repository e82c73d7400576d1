//! Logger bootstrap shared by the binary and tests.
//!
//! Only this crate's records are raised by `--verbose`; everything else
//! stays at `warn` unless `RUST_LOG` says otherwise.
use env_logger::{Builder, Env};

/// Filter used when `RUST_LOG` is unset.
#[must_use]
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{}={level},warn", env!("CARGO_CRATE_NAME"))
}

/// Installs `env_logger` with millisecond timestamps.
///
/// Animator fade traces appear with `verbose`. Calling this again after a
/// logger is installed leaves the first one in place.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();
    if let Err(err) = builder.try_init() {
        log::trace!("keeping existing logger: {err}");
    }
}
