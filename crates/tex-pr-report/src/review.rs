//! Per-document comment composition and posting.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Stream};
use tracing::{debug, info, instrument};

use tex_pr_report_core::error::ToolResult;
use tex_pr_report_core::grammar::GrammarCheck;
use tex_pr_report_core::texcount::{TexCount, render_statistics};
use tex_pr_report_core::{DocumentTarget, RepoSlug, compose_comment};

/// A pull request that exists on the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Repository the pull request belongs to.
    pub repo: RepoSlug,
    /// Pull request number.
    pub number: u64,
    /// Title, for logging.
    pub title: String,
    /// Web URL, for logging.
    pub html_url: String,
}

/// Looks up pull requests and posts comments on them.
pub trait PullRequestClient {
    /// Resolve `number` in `repo`; `Ok(None)` when either does not exist.
    fn find_pull_request(&self, repo: &RepoSlug, number: u64) -> anyhow::Result<Option<PullRequest>>;

    /// Post `body` as a new conversation comment.
    fn create_comment(&self, pull_request: &PullRequest, body: &str) -> anyhow::Result<()>;
}

/// Produces the raw word-count report for one document.
pub trait CountTool {
    /// Count `filename` inside `directory`.
    fn count(&self, directory: &Utf8Path, filename: &str) -> ToolResult<String>;
}

impl CountTool for TexCount {
    fn count(&self, directory: &Utf8Path, filename: &str) -> ToolResult<String> {
        self.run(directory, filename)
    }
}

/// Inputs for one review run.
#[derive(Debug, Clone)]
pub struct ReviewSettings {
    /// Target repository.
    pub repo: RepoSlug,
    /// Pull request number.
    pub pull_request: u64,
    /// Documents, one comment each, in this order.
    pub files: Vec<Utf8PathBuf>,
    /// Directory relative file paths resolve against.
    pub cwd: Utf8PathBuf,
    /// Append the top-words table to the statistics.
    pub word_frequency: bool,
    /// Print comments instead of posting them.
    pub dry_run: bool,
    /// Show a spinner while texcount runs.
    pub progress: bool,
}

/// How a review run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// This many comments were posted.
    Posted(usize),
    /// The repository or pull request does not exist.
    PullRequestNotFound,
    /// Comments were printed, nothing was posted.
    DryRun,
}

/// Compose and post one comment per document.
#[instrument(skip_all, fields(repo = %settings.repo, pr = settings.pull_request))]
pub fn run<C, G, T>(
    settings: &ReviewSettings,
    client: &C,
    grammar: &G,
    counter: &T,
    out: &mut dyn Write,
) -> anyhow::Result<Outcome>
where
    C: PullRequestClient + ?Sized,
    G: GrammarCheck + ?Sized,
    T: CountTool + ?Sized,
{
    print_header(settings, out)?;

    if settings.dry_run {
        for file in &settings.files {
            let comment = compose_document(settings, file, grammar, counter)?;
            writeln!(out, "\n{comment}")?;
        }
        return Ok(Outcome::DryRun);
    }

    let Some(pull_request) = client.find_pull_request(&settings.repo, settings.pull_request)? else {
        writeln!(out, "{}", "Pull request not found!".if_supports_color(Stream::Stdout, |t| t.red()))?;
        return Ok(Outcome::PullRequestNotFound);
    };
    info!(title = %pull_request.title, url = %pull_request.html_url, "pull request found");

    let mut posted = 0;
    for file in &settings.files {
        let comment = compose_document(settings, file, grammar, counter)?;
        writeln!(out, "\nCommenting on GitHub ...")?;
        client
            .create_comment(&pull_request, &comment)
            .with_context(|| format!("failed to post the comment for {file}"))?;
        posted += 1;
    }
    Ok(Outcome::Posted(posted))
}

fn print_header(settings: &ReviewSettings, out: &mut dyn Write) -> std::io::Result<()> {
    let files: Vec<&str> = settings.files.iter().map(|f| f.as_str()).collect();
    let rows = [
        ("Organization:", settings.repo.owner.clone()),
        ("Repository:", settings.repo.repo.clone()),
        ("Pull request:", settings.pull_request.to_string()),
        ("Files:", files.join(", ")),
    ];
    for (label, value) in rows {
        writeln!(out, "{} {value}", label.if_supports_color(Stream::Stdout, |t| t.bold()))?;
    }
    Ok(())
}

/// Build the comment body for one document.
#[instrument(skip(settings, grammar, counter))]
pub fn compose_document<G, T>(
    settings: &ReviewSettings,
    file: &Utf8Path,
    grammar: &G,
    counter: &T,
) -> anyhow::Result<String>
where
    G: GrammarCheck + ?Sized,
    T: CountTool + ?Sized,
{
    let target = DocumentTarget::resolve(file, &settings.cwd)
        .ok_or_else(|| anyhow!("{file} does not name a file"))?;
    debug!(directory = %target.directory, filename = %target.filename, "resolved document");

    let grammar_block = grammar
        .check_directory(&target.directory)
        .with_context(|| format!("grammar check failed for {}", target.directory))?;

    let spinner = settings.progress.then(|| spinner(&target.filename));
    let raw = counter.count(&target.directory, &target.filename);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let raw = raw.with_context(|| format!("texcount failed for {file}"))?;

    let statistics = render_statistics(&raw, settings.word_frequency);
    if statistics.is_empty() {
        debug!(filename = %target.filename, "texcount output not recognized");
    }
    Ok(compose_comment(&target.filename, &grammar_block, &statistics))
}

fn spinner(filename: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Counting words in {filename}"));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tex_pr_report_core::error::{GrammarResult, ToolError};

    use super::*;

    const REPORT: &str = "\
File: main.tex
Encoding: utf8
Words in text: 120
Words in headers: 4
Subcounts:
  text+headers+captions (#headers/#floats/#inlines/#displayed)
  120+4+0 (2/0/1/0) _top_: Top
Word: Freq
---
Sum of subset: 1
---
the: 9
Sum of subset: 9
";

    struct FakeClient {
        exists: bool,
        posted: RefCell<Vec<String>>,
    }

    impl FakeClient {
        fn new(exists: bool) -> Self {
            Self {
                exists,
                posted: RefCell::new(Vec::new()),
            }
        }
    }

    impl PullRequestClient for FakeClient {
        fn find_pull_request(
            &self,
            repo: &RepoSlug,
            number: u64,
        ) -> anyhow::Result<Option<PullRequest>> {
            Ok(self.exists.then(|| PullRequest {
                repo: repo.clone(),
                number,
                title: "Draft".into(),
                html_url: "https://example.invalid/pull/7".into(),
            }))
        }

        fn create_comment(&self, _pull_request: &PullRequest, body: &str) -> anyhow::Result<()> {
            self.posted.borrow_mut().push(body.to_string());
            Ok(())
        }
    }

    struct FakeGrammar;

    impl GrammarCheck for FakeGrammar {
        fn check_directory(&self, directory: &Utf8Path) -> GrammarResult<String> {
            Ok(format!("checked {directory}"))
        }
    }

    struct FakeCount(RefCell<Vec<String>>);

    impl CountTool for FakeCount {
        fn count(&self, directory: &Utf8Path, filename: &str) -> ToolResult<String> {
            self.0.borrow_mut().push(format!("{directory}/{filename}"));
            Ok(REPORT.to_string())
        }
    }

    struct FailingCount;

    impl CountTool for FailingCount {
        fn count(&self, _directory: &Utf8Path, _filename: &str) -> ToolResult<String> {
            Err(ToolError::Spawn {
                command: "dockercmd.sh".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            })
        }
    }

    fn settings(dry_run: bool) -> ReviewSettings {
        ReviewSettings {
            repo: "octo/thesis".parse().unwrap(),
            pull_request: 7,
            files: vec!["paper/main.tex".into(), "notes.tex".into()],
            cwd: "/work".into(),
            word_frequency: false,
            dry_run,
            progress: false,
        }
    }

    #[test]
    fn posts_one_comment_per_file_in_order() {
        owo_colors::set_override(false);
        let client = FakeClient::new(true);
        let counter = FakeCount(RefCell::new(Vec::new()));
        let mut out = Vec::new();

        let outcome = run(&settings(false), &client, &FakeGrammar, &counter, &mut out).unwrap();

        assert_eq!(outcome, Outcome::Posted(2));
        let posted = client.posted.borrow();
        assert!(posted[0].starts_with("# Document analysis (main.tex)\n\n## Grammar check\n\nchecked /work/paper"));
        assert!(posted[1].starts_with("# Document analysis (notes.tex)"));
        assert!(posted[0].contains("| Words in text | 120 |"));
        assert_eq!(
            *counter.0.borrow(),
            vec!["/work/paper/main.tex", "/work/notes.tex"]
        );

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Organization: octo"));
        assert!(printed.contains("Repository: thesis"));
        assert!(printed.contains("Pull request: 7"));
        assert!(printed.contains("Files: paper/main.tex, notes.tex"));
        assert_eq!(printed.matches("Commenting on GitHub ...").count(), 2);
    }

    #[test]
    fn missing_pull_request_posts_nothing() {
        owo_colors::set_override(false);
        let client = FakeClient::new(false);
        let counter = FakeCount(RefCell::new(Vec::new()));
        let mut out = Vec::new();

        let outcome = run(&settings(false), &client, &FakeGrammar, &counter, &mut out).unwrap();

        assert_eq!(outcome, Outcome::PullRequestNotFound);
        assert!(client.posted.borrow().is_empty());
        assert!(counter.0.borrow().is_empty());
        assert!(String::from_utf8(out).unwrap().contains("Pull request not found!"));
    }

    #[test]
    fn dry_run_prints_instead_of_posting() {
        owo_colors::set_override(false);
        let client = FakeClient::new(true);
        let counter = FakeCount(RefCell::new(Vec::new()));
        let mut out = Vec::new();

        let outcome = run(&settings(true), &client, &FakeGrammar, &counter, &mut out).unwrap();

        assert_eq!(outcome, Outcome::DryRun);
        assert!(client.posted.borrow().is_empty());
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("# Document analysis (main.tex)"));
        assert!(printed.contains("### Overall statistics"));
        assert!(!printed.contains("Commenting on GitHub"));
    }

    #[test]
    fn texcount_failure_stops_the_run() {
        let client = FakeClient::new(true);
        let mut out = Vec::new();

        let err = run(&settings(false), &client, &FakeGrammar, &FailingCount, &mut out).unwrap_err();

        assert!(err.to_string().contains("texcount failed for paper/main.tex"));
        assert!(client.posted.borrow().is_empty());
    }

    #[test]
    fn unrecognized_report_leaves_statistics_empty() {
        struct Garbage;
        impl CountTool for Garbage {
            fn count(&self, _: &Utf8Path, _: &str) -> ToolResult<String> {
                Ok("nothing useful".into())
            }
        }
        let body = compose_document(&settings(true), Utf8Path::new("main.tex"), &FakeGrammar, &Garbage)
            .unwrap();
        assert!(body.ends_with("## Statistics\n\n"));
    }
}
