//! Tracing subscriber setup for the `helixdesk` binary.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingSection;

/// Pick the filter directive: `RUST_LOG` first, then `--verbose`, then the file.
pub fn filter_directive(level: &str, verbose: bool, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directive) => directive.to_string(),
        None if verbose => "debug".to_string(),
        None => level.to_string(),
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr, as JSON lines when `logging.json` is set. With
/// `logging.dir` a daily-rolling file gets a copy; keep the returned guard
/// alive for as long as the file should be flushed.
pub fn init_tracing(logging: &LoggingSection, verbose: bool) -> Result<Option<WorkerGuard>> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(&logging.level, verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("Invalid log filter '{}'", directive))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    if logging.json {
        layers.push(fmt::layer().json().with_writer(std::io::stderr).boxed());
    } else {
        layers.push(fmt::layer().with_writer(std::io::stderr).boxed());
    }

    let mut guard = None;
    if let Some(dir) = &logging.dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let appender = tracing_appender::rolling::daily(dir, "helixdesk.log");
        let (writer, worker) = tracing_appender::non_blocking(appender);
        guard = Some(worker);
        let file_layer = fmt::layer().with_ansi(false).with_writer(writer);
        if logging.json {
            layers.push(file_layer.json().boxed());
        } else {
            layers.push(file_layer.boxed());
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_wins() {
        assert_eq!(filter_directive("info", true, Some("warn")), "warn");
    }

    #[test]
    fn test_verbose_overrides_config() {
        assert_eq!(filter_directive("warn", true, None), "debug");
    }

    #[test]
    fn test_config_level_default() {
        assert_eq!(filter_directive("helixdesk=trace", false, None), "helixdesk=trace");
    }

    #[test]
    fn test_blank_rust_log_ignored() {
        assert_eq!(filter_directive("info", false, Some("  ")), "info");
    }
}
