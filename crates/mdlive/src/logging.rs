//! Structured logging
//!
//! The terminal belongs to the UI, so events go only to
//! `~/.config/mdlive/logs/mdlive.log.YYYY-MM-DD` (daily rotation).
//! `RUST_LOG` filters what is written, default `info`:
//! - `RUST_LOG=debug` - re-projection timings and drag commits
//! - `RUST_LOG=mdlive_core=trace` - store dispatches

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Without a writable logs directory nothing is recorded.
pub fn init() {
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "mdlive.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(filter()),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry().with(file_layer).init();
}
