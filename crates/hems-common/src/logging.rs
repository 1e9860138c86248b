//! ---
//! hems_section: "01-core-functionality"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Shared primitives and utilities for the monitoring runtime."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
//! Process-wide tracing setup for the HEMS binaries.
//!
//! Console output always goes to stderr so command output on stdout stays
//! machine-readable. The optional file sink is a daily rolling JSON log.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::daily;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

/// Filter override read before `RUST_LOG`.
pub const LOG_ENV: &str = "HEMS_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Console log formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    StructuredJson,
    #[default]
    Pretty,
}

/// Install the global subscriber for `service_name`.
///
/// The filter comes from `HEMS_LOG`, then `RUST_LOG`, then `info`. Calling this
/// again after a subscriber is installed is a no-op.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<()> {
    let directive = resolve_directive(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
    );
    let file = file_layer(service_name, config)?;

    let installed = tracing_subscriber::registry()
        .with(build_filter(&directive))
        .with(console_layer(config.format))
        .with(file)
        .try_init()
        .is_ok();

    if installed {
        debug!(
            service = %service_name,
            filter = %directive,
            format = ?config.format,
            file_log = config.write_file,
            "tracing initialised"
        );
    }
    Ok(())
}

/// First non-blank directive, or [`DEFAULT_DIRECTIVE`].
fn resolve_directive(hems_log: Option<String>, rust_log: Option<String>) -> String {
    [hems_log, rust_log]
        .into_iter()
        .flatten()
        .find(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_owned())
}

fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|err| {
        eprintln!("invalid log directive {directive:?} ({err}); using {DEFAULT_DIRECTIVE}");
        EnvFilter::new(DEFAULT_DIRECTIVE)
    })
}

fn console_layer<S>(format: LogFormat) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339());
    match format {
        LogFormat::StructuredJson => layer.with_target(false).json().boxed(),
        LogFormat::Pretty => layer.with_target(true).boxed(),
    }
}

fn file_layer<S>(service_name: &str, config: &LoggingConfig) -> Result<Option<BoxedLayer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    if !config.write_file {
        return Ok(None);
    }
    std::fs::create_dir_all(&config.directory).with_context(|| {
        format!("unable to create log directory {}", config.directory.display())
    })?;
    let prefix = config.file_prefix.as_deref().unwrap_or(service_name);
    let (writer, guard) = tracing_appender::non_blocking(daily(
        &config.directory,
        format!("{prefix}.log"),
    ));
    // Only the first installed subscriber keeps its writer alive.
    let _ = FILE_GUARD.set(guard);

    Ok(Some(
        fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(writer)
            .boxed(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_prefers_hems_log_then_rust_log() {
        let some = |s: &str| Some(s.to_owned());
        assert_eq!(resolve_directive(some("debug"), some("warn")), "debug");
        assert_eq!(resolve_directive(None, some("warn")), "warn");
        assert_eq!(resolve_directive(some("  "), some("warn")), "warn");
        assert_eq!(resolve_directive(None, None), DEFAULT_DIRECTIVE);
    }

    #[test]
    fn file_sink_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            directory: dir.path().join("logs"),
            write_file: false,
            ..LoggingConfig::default()
        };
        let layer = file_layer::<tracing_subscriber::Registry>("hems-test", &config).unwrap();
        assert!(layer.is_none());
        assert!(!config.directory.exists());
    }

    #[test]
    fn init_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            directory: dir.path().join("logs"),
            format: LogFormat::StructuredJson,
            file_prefix: Some("test".into()),
            write_file: true,
        };
        init_tracing("hems-test", &config).unwrap();
        assert!(config.directory.is_dir());
    }
}
