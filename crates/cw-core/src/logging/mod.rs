//! Logging initialization for the chanwatch CLI.
//!
//! Human format writes compact lines to stderr; JSONL writes one JSON
//! object per line to stderr for collectors. Stdout stays reserved for
//! command output. `RUST_LOG` overrides the computed filter when set.

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, LogContext, Stage};

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, registry, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Call once at startup; later calls would panic inside tracing.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                registry().with(filter).with(fmt_layer).init();
            } else {
                registry().with(filter).with(fmt_layer.without_time()).init();
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false);
            registry().with(filter).with(json_layer).init();
        }
    }
}

/// Initialize with defaults; for tools embedding the crate.
pub fn init_default_logging() {
    init_logging(&LogConfig::default());
}

/// Generate a short run identifier for log correlation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("run-{}", &uuid.to_string()[..12])
}
