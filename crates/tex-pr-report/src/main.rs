//! tex-pr-report CLI
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::{Context, anyhow};
use camino::Utf8PathBuf;
use clap::Parser;
use tracing::debug;

use tex_pr_report::github::GitHubClient;
use tex_pr_report::observability;
use tex_pr_report::review::{self, Outcome, ReviewSettings};
use tex_pr_report::Cli;
use tex_pr_report_core::config::{ConfigLoader, DEFAULT_WRAPPER_NAME};
use tex_pr_report_core::grammar::SourceGrammarChecker;
use tex_pr_report_core::texcount::TexCount;
use tex_pr_report_core::PullRequestArg;

const NOT_A_PULL_REQUEST_NOTICE: &str = "This is not a Pull Request build. Skipping document analysis!";

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    cli.color.apply();

    let PullRequestArg::Number(pull_request) = cli.pull_request else {
        println!("{NOT_A_PULL_REQUEST_NOTICE}");
        return Ok(ExitCode::FAILURE);
    };

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| {
        anyhow!(
            "current directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(ref config_path) = cli.config {
        let config_path = Utf8PathBuf::try_from(config_path.clone()).map_err(|e| {
            anyhow!(
                "config path is not valid UTF-8: {}",
                e.into_path_buf().display()
            )
        })?;
        loader = loader.with_file(&config_path);
    }
    let (config, config_sources) = loader.load().context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::from_env_with_overrides(
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.as_std_path().to_path_buf()),
    );
    let level = cli.log_level.unwrap_or(config.log_level);
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, level.as_str());
    let _guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging/tracing")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        dry_run = cli.dry_run,
        color = ?cli.color,
        chdir = ?cli.chdir,
        config_file = ?config_sources.primary_file(),
        "CLI initialized"
    );

    let result = execute(&cli, pull_request, &config, cwd);
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}

fn execute(
    cli: &Cli,
    pull_request: u64,
    config: &tex_pr_report_core::Config,
    cwd: Utf8PathBuf,
) -> anyhow::Result<ExitCode> {
    let wrapper = match cli.wrapper.clone().or_else(|| config.wrapper.clone()) {
        Some(path) => path,
        None => default_wrapper()?,
    };
    debug!(wrapper = %wrapper, "using texcount wrapper");

    let counter = TexCount::from_config(wrapper, config);
    let grammar =
        SourceGrammarChecker::from_config(config).context("invalid grammar_sources pattern")?;
    let client = GitHubClient::new(&cli.token, &config.github_api_url)?;

    let settings = ReviewSettings {
        repo: cli.repo.clone(),
        pull_request,
        files: cli.files.clone(),
        cwd,
        word_frequency: config.word_frequency,
        dry_run: cli.dry_run,
        progress: !cli.quiet,
    };

    let mut stdout = std::io::stdout().lock();
    match review::run(&settings, &client, &grammar, &counter, &mut stdout)? {
        Outcome::PullRequestNotFound => Ok(ExitCode::FAILURE),
        Outcome::Posted(count) => {
            debug!(count, "comments posted");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::DryRun => Ok(ExitCode::SUCCESS),
    }
}

/// `dockercmd.sh` in the directory holding the executable.
fn default_wrapper() -> anyhow::Result<Utf8PathBuf> {
    let exe = std::env::current_exe().context("failed to locate the running executable")?;
    let dir = exe
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe.display()))?;
    let dir = Utf8PathBuf::try_from(dir.to_path_buf()).map_err(|e| {
        anyhow!(
            "executable directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;
    Ok(dir.join(DEFAULT_WRAPPER_NAME))
}
