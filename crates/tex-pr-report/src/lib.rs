//! Library interface for the `tex-pr-report` CLI.
//!
//! The actual entry point is in `main.rs`; this crate exposes the argument
//! parser, the GitHub client and the orchestrator so they can be tested.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`github`] - GitHub REST client
//! - [`review`] - Per-document comment composition and posting
//! - [`observability`] - Logging setup

pub mod github;
pub mod observability;
pub mod review;

use camino::Utf8PathBuf;
use clap::Parser;
use std::path::PathBuf;
use tex_pr_report_core::{LogLevel, PullRequestArg, RepoSlug};

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                   Log filter (e.g., debug, tex_pr_report=trace)
    TEX_PR_REPORT_LOG_PATH     Explicit log file path
    TEX_PR_REPORT_LOG_DIR      Log directory
    TEX_PR_REPORT_WRAPPER      Wrapper script that runs texcount
    TEX_PR_REPORT_<SETTING>    Any other configuration setting
";

/// Command-line interface definition for tex-pr-report.
#[derive(Parser, Debug)]
#[command(name = "tex-pr-report")]
#[command(about = "Post texcount statistics and grammar findings as a pull request comment", long_about = None)]
#[command(version)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// GitHub access token.
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Repository slug (owner/repo).
    #[arg(value_name = "REPO")]
    pub repo: RepoSlug,

    /// Pull request number, or "false" when this is not a pull request build.
    #[arg(value_name = "PULL_REQUEST")]
    pub pull_request: PullRequestArg,

    /// Documents to analyze; one comment is posted per file.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<Utf8PathBuf>,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long)]
    pub chdir: Option<PathBuf>,

    /// Wrapper script that runs texcount (overrides configuration)
    #[arg(long, value_name = "FILE")]
    pub wrapper: Option<Utf8PathBuf>,

    /// Print the comments instead of posting them
    #[arg(long)]
    pub dry_run: bool,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log level when neither RUST_LOG nor -q/-v is given (overrides configuration)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Colorize output
    #[arg(long, value_enum, default_value_t)]
    pub color: ColorChoice,
}
