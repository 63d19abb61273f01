//! Logging initialization.
//!
//! Sets up the tracing subscriber from [`LoggingConfig`]: stdout, stderr or
//! file output behind a non-blocking writer, with pretty, compact or JSON
//! formatting. `RUST_LOG` takes precedence over the configured level.

use crate::config::{LogFormat, LoggingConfig};
use std::fs::OpenOptions;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Default filter directives for a configured level.
///
/// The serving stack is clamped to warn so per-connection noise does not
/// drown the crate's own events; `RUST_LOG` overrides this entirely.
fn default_directives(level: &str) -> String {
    let level = match level.to_lowercase().as_str() {
        l @ ("trace" | "debug" | "info" | "warn" | "error") => l.to_string(),
        _ => "info".to_string(),
    };
    format!("{level},pingora_core=warn,pingora_proxy=warn")
}

/// Initializes the logging system based on configuration.
///
/// Returns a guard that must be kept alive for the duration of the program
/// to ensure all logs are flushed.
///
/// # Example
///
/// ```ignore
/// let config = LoggingConfig::default();
/// let _guard = init_logging(&config)?;
/// tracing::info!("Logging initialized");
/// ```
pub fn init_logging(config: &LoggingConfig) -> io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let (writer, guard) = match config.output.to_lowercase().as_str() {
        "stdout" => tracing_appender::non_blocking(io::stdout()),
        "stderr" => tracing_appender::non_blocking(io::stderr()),
        path => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_appender::non_blocking(file)
        }
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(config.include_target);

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json().with_span_events(FmtSpan::CLOSE))
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.compact())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.pretty())
                .init();
        }
    }

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert!(default_directives("debug").starts_with("debug,"));
        assert!(default_directives("WARN").starts_with("warn,"));
        assert!(default_directives("bogus").starts_with("info,"));
        assert!(default_directives("trace").contains("pingora_core=warn"));
    }
}
