//! Logging Initialization
//!
//! Builds the tracing subscriber from the settings store: an env-filter
//! (overridable via `RUST_LOG`) plus an optional non-blocking rolling file
//! appender when a log directory is configured.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingSettings;

/// Keeps the non-blocking file writer alive. Dropping it flushes and stops
/// the background writer thread.
pub type LogGuard = tracing_appender::non_blocking::WorkerGuard;

/// Initialize global logging. Safe to call more than once; later calls are
/// no-ops (the first subscriber wins).
pub fn init(settings: &LoggingSettings) -> Option<LogGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("mousebind={}", settings.level)));

    match &settings.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "mousebind.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_reentrant() {
        let settings = LoggingSettings::default();
        init(&settings);
        // Second init must not panic or error out.
        init(&settings);
    }
}
