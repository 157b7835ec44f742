//! Grammar checking of the document sources next to the analyzed file.
//!
//! The comment composer only needs "a directory in, a Markdown block out",
//! expressed by the [`GrammarCheck`] trait. [`SourceGrammarChecker`] is the
//! built-in implementation: it reads the LaTeX and Markdown sources in the
//! directory, reduces them to prose ([`prose`]), runs the rule-based
//! [`checker`], and renders one table per file.

pub mod checker;
pub mod prose;

use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, instrument, warn};

pub use checker::{GrammarIssue, GrammarIssueType, Severity, check_grammar};

use crate::config::Config;
use crate::error::{GrammarError, GrammarResult};

/// Longest sentence excerpt shown in a report row.
const EXCERPT_CHARS: usize = 80;

/// Produces the Markdown body of the "Grammar check" section.
pub trait GrammarCheck {
    /// Check the documents in `directory` and describe the findings as Markdown.
    fn check_directory(&self, directory: &Utf8Path) -> GrammarResult<String>;
}

/// An issue together with the sentence it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// The detected issue.
    pub issue: GrammarIssue,
    /// The sentence the issue refers to.
    pub sentence: String,
}

/// Which markup a source file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// LaTeX (`.tex`, `.ltx`, and anything unrecognized).
    Latex,
    /// Markdown (`.md`, `.markdown`).
    Markdown,
}

impl SourceKind {
    /// Guess the markup from a file extension.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some("md" | "markdown") => Self::Markdown,
            _ => Self::Latex,
        }
    }
}

/// Check one document and return every finding, in sentence order.
#[instrument(skip(source), fields(source_len = source.len()))]
pub fn check_source(source: &str, kind: SourceKind) -> Vec<Finding> {
    let paragraphs = match kind {
        SourceKind::Latex => prose::latex_to_prose(source),
        SourceKind::Markdown => prose::markdown_to_prose(source),
    };
    let sentences: Vec<String> = paragraphs
        .iter()
        .flat_map(|p| prose::split_sentences(p))
        .collect();

    check_grammar(&sentences)
        .into_iter()
        .map(|issue| Finding {
            sentence: sentences[issue.sentence_num - 1].clone(),
            issue,
        })
        .collect()
}

/// Grammar checker over the source files of a document directory.
#[derive(Debug, Clone)]
pub struct SourceGrammarChecker {
    sources: GlobSet,
    max_input_bytes: Option<usize>,
}

impl SourceGrammarChecker {
    /// Build a checker reading files whose names match any of `patterns`.
    pub fn new<S: AsRef<str>>(
        patterns: &[S],
        max_input_bytes: Option<usize>,
    ) -> GrammarResult<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|source| GrammarError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }
        let sources = builder.build().map_err(|source| GrammarError::Pattern {
            pattern: patterns
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(","),
            source,
        })?;
        Ok(Self {
            sources,
            max_input_bytes,
        })
    }

    /// Build a checker from the `grammar_sources` and input limit settings.
    pub fn from_config(config: &Config) -> GrammarResult<Self> {
        Self::new(&config.grammar_sources, config.input_limit())
    }

    /// Source files directly inside `directory`, sorted by name.
    pub fn source_files(&self, directory: &Utf8Path) -> GrammarResult<Vec<Utf8PathBuf>> {
        let entries = directory
            .read_dir_utf8()
            .map_err(|source| GrammarError::ReadDir {
                path: directory.to_path_buf(),
                source,
            })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| GrammarError::ReadDir {
                path: directory.to_path_buf(),
                source,
            })?;
            if entry.file_type().is_ok_and(|t| t.is_file()) && self.sources.is_match(entry.file_name())
            {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn render_file(&self, path: &Utf8Path, out: &mut String) -> GrammarResult<()> {
        let name = path.file_name().unwrap_or(path.as_str());
        out.push_str(&format!("### {name}\n\n"));

        let read_err = |source| GrammarError::ReadFile {
            path: path.to_path_buf(),
            source,
        };
        let size = std::fs::metadata(path).map_err(read_err)?.len();
        if let Some(max) = self.max_input_bytes
            && size > max as u64
        {
            warn!(%path, size, max, "skipping oversized source");
            out.push_str(&format!("Skipped: {size} bytes exceeds the {max} byte limit.\n\n"));
            return Ok(());
        }

        let source = std::fs::read_to_string(path).map_err(read_err)?;
        let findings = check_source(&source, SourceKind::from_path(path));
        debug!(%path, findings = findings.len(), "checked source");
        out.push_str(&render_findings(&findings));
        Ok(())
    }
}

impl GrammarCheck for SourceGrammarChecker {
    #[instrument(skip(self))]
    fn check_directory(&self, directory: &Utf8Path) -> GrammarResult<String> {
        let files = self.source_files(directory)?;
        if files.is_empty() {
            return Ok("No source files found for grammar checking.\n".to_string());
        }

        let mut out = String::new();
        for file in &files {
            self.render_file(file, &mut out)?;
        }
        Ok(out)
    }
}

/// Render findings as a Markdown table, or a one-line all-clear.
pub fn render_findings(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "No grammar issues found.\n\n".to_string();
    }

    let mut out = String::from("| Severity | Issue | Sentence |\n| - | - | - |\n");
    for finding in findings {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            finding.issue.severity.as_str(),
            escape_cell(&finding.issue.message),
            escape_cell(&excerpt(&finding.sentence)),
        ));
    }
    out.push('\n');
    out
}

fn excerpt(sentence: &str) -> String {
    if sentence.chars().count() <= EXCERPT_CHARS {
        return sentence.to_string();
    }
    let mut short: String = sentence.chars().take(EXCERPT_CHARS - 1).collect();
    short.push('…');
    short
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
