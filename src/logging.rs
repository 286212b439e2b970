// src/logging.rs

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install a global subscriber. `RUST_LOG` wins over `log_level` when set.
///
/// `log_format` is `"json"` for structured output, anything else for the
/// human-readable formatter. Calling this more than once is a no-op.
pub fn init_logging(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        let _ = subscriber.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(true);
        let _ = subscriber.with(fmt_layer).try_init();
    }

    tracing::debug!(log_level, log_format, "logging initialized");
}
