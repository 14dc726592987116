//! Logging bootstrap

use std::fs::OpenOptions;
use std::sync::Mutex;

use herdbook_core::Config;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// Writes to `config.log_file` when set, otherwise to stderr. `RUST_LOG`
/// wins over the configured level when present. Failures to open the log
/// file fall back to stderr.
pub fn init(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(filter_directive(&config.log_level))
    });

    let log_file = config.log_file.as_ref().and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", path, e);
                None
            }
        }
    });

    // Ignore the error if a subscriber is already installed
    let _ = match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    debug!("Logging initialized at level {}", config.log_level);
}

fn filter_directive(level: &str) -> String {
    format!("herdbook_core={level},herdbook_cli={level}", level = level)
}
