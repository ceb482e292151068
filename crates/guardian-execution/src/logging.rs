//! Tracing setup.
//!
//! Terminal filter precedence: `--debug` > `--verbose` > `RUST_LOG` > configured
//! level. HTTP and runtime crates are held at WARN under `--debug`. An optional
//! daily-rolling file layer writes without ANSI colors.

use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEBUG_DIRECTIVE: &str = "debug,hyper=warn,h2=warn,reqwest=warn,rustls=warn,tokio=warn";
const LOG_FILE_PREFIX: &str = "guardian.log";

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub verbose: bool,
    pub debug: bool,
    /// Fallback directive when neither flag nor `RUST_LOG` is set.
    pub level: String,
    /// Directory for the rolling log file; `None` disables file logging.
    pub file_dir: Option<PathBuf>,
}

/// Directive for the terminal layer, or `None` to defer to `RUST_LOG`.
pub fn terminal_directive(options: &LogOptions) -> Option<&str> {
    if options.debug {
        Some(DEBUG_DIRECTIVE)
    } else if options.verbose {
        Some("info")
    } else {
        None
    }
}

fn fallback_level(options: &LogOptions) -> &str {
    if options.level.trim().is_empty() {
        "warn"
    } else {
        options.level.as_str()
    }
}

/// Installs the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the file writer.
pub fn init_logging(options: &LogOptions) -> Result<Option<WorkerGuard>> {
    let terminal_filter = match terminal_directive(options) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(fallback_level(options))),
    };
    let terminal_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(terminal_filter);

    let Some(dir) = &options.file_dir else {
        tracing_subscriber::registry().with(terminal_layer).try_init()?;
        return Ok(None);
    };

    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_filter = EnvFilter::new(terminal_directive(options).unwrap_or("info"));
    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(terminal_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(path = %dir.display(), "File logging enabled");
    Ok(Some(guard))
}
