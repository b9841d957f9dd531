//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the cohesion tracing/logging system.
///
/// Reads the `COHESION_LOG` environment variable for per-target log levels.
/// Format: `COHESION_LOG=cohesion_analysis=debug,cohesion_cli=info`
///
/// Falls back to `cohesion=info` if `COHESION_LOG` is not set or is invalid.
/// Output goes to stderr so reports on stdout stay machine-readable.
///
/// Idempotent.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("COHESION_LOG")
            .unwrap_or_else(|_| EnvFilter::new("cohesion=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
