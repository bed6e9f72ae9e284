//! Logging and tracing configuration.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set.
#[must_use]
pub const fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "htool_test=debug,htool_test_core=debug,warn"
    } else {
        "htool_test=info,htool_test_core=info,warn"
    }
}

/// Initialize tracing for the CLI (stderr logging).
///
/// Logs are controlled by the `RUST_LOG` environment variable. Stdout is
/// reserved for test results. Escape codes are only written when `color` is set.
pub fn init_logging(verbose: bool, color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(color)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
