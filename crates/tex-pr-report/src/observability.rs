//! Logging setup: a compact stderr layer plus an optional JSONL file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_PATH_ENV: &str = "TEX_PR_REPORT_LOG_PATH";
const LOG_DIR_ENV: &str = "TEX_PR_REPORT_LOG_DIR";
const LOG_FILE_NAME: &str = "tex-pr-report.jsonl";

/// Where log records go besides stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// JSONL log file; `None` disables file logging.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, falling back to `log_dir`.
    ///
    /// `TEX_PR_REPORT_LOG_PATH` wins over `TEX_PR_REPORT_LOG_DIR`, which wins
    /// over the configured directory.
    pub fn from_env_with_overrides(log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            log_dir,
        )
    }

    fn resolve(
        log_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        let log_file = log_path.or_else(|| env_dir.or(config_dir).map(|d| d.join(LOG_FILE_NAME)));
        Self { log_file }
    }
}

/// Keeps the background log writer alive; drop it last.
#[derive(Debug)]
pub struct ObservabilityGuard {
    _file: Option<WorkerGuard>,
}

/// Build the level filter. `RUST_LOG` wins, then `-q`/`-v`, then `default_level`.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some()
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::new(level_directive(quiet, verbose, default_level))
}

fn level_directive(quiet: bool, verbose: u8, default_level: &str) -> &str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => default_level,
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Install the global subscriber.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, file_guard) = match config.log_file.as_deref() {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(ObservabilityGuard { _file: file_guard })
}

fn open_log_file(path: &Path) -> anyhow::Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
