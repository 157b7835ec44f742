//! Rule-based grammar issue detection.
//!
//! Checks each sentence for subject-verb disagreement, double negatives,
//! run-on sentences, comma splices, repeated words, double spaces, and
//! missing terminal punctuation.

use std::sync::LazyLock;

use regex::Regex;

/// A detected grammar issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarIssue {
    /// The type of grammar issue.
    pub issue_type: GrammarIssueType,
    /// Human-readable description of the issue.
    pub message: String,
    /// The sentence number (1-indexed) where the issue was found.
    pub sentence_num: usize,
    /// Severity of the issue.
    pub severity: Severity,
}

/// Types of grammar issues that can be detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarIssueType {
    /// Singular subject with plural verb or vice versa.
    SubjectVerbAgreement,
    /// Two negatives in the same clause.
    DoubleNegative,
    /// Overly long sentence with multiple independent clauses.
    RunOnSentence,
    /// Two independent clauses joined only by a comma.
    CommaSplice,
    /// The same word twice in a row ("the the").
    RepeatedWord,
    /// Multiple consecutive spaces.
    DoubleSpace,
    /// Sentence missing terminal punctuation.
    MissingPunctuation,
}

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Style suggestion, not necessarily wrong.
    Low,
    /// Likely issue worth addressing.
    Medium,
    /// Clear grammar error.
    High,
}

impl Severity {
    /// Label used in report tables.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Subject-verb agreement patterns and their descriptions.
static SUBJECT_VERB_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"\b(he|she|it)\s+(are|were|have)\b").expect("valid regex"),
            "Singular subject with plural verb",
        ),
        (
            Regex::new(r"\b(they|we|you)\s+(is|was|has)\b").expect("valid regex"),
            "Plural subject with singular verb",
        ),
        (
            Regex::new(r"\b(this|that)\s+(are|were)\b").expect("valid regex"),
            "Singular demonstrative with plural verb",
        ),
        (
            Regex::new(r"\b(these|those)\s+(is|was)\b").expect("valid regex"),
            "Plural demonstrative with singular verb",
        ),
    ]
});

static DOUBLE_NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(don't|doesn't|didn't|won't|can't|couldn't|shouldn't|wouldn't|isn't|aren't)\s+\w+\s+(no|nothing|nobody|never|nowhere|neither)\b",
    )
    .expect("valid regex")
});

/// Repeated coordinating conjunctions separated by commas.
static RUN_ON_INDICATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r",\s+(and|but|or|so)\s+\w+\s+\w+.*,\s+(and|but|or|so)\s").expect("valid regex")
});

static DOUBLE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S  +\S").expect("valid regex"));

/// Pronouns and determiners that usually open a clause.
const SUBJECT_WORDS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "the", "this", "that", "these", "those",
];

/// Common finite verbs; enough to spot a clause, not a full lexicon.
const VERB_WORDS: &[&str] = &[
    "is", "are", "was", "were", "has", "have", "had", "do", "does", "did", "will", "would",
    "can", "could", "should", "may", "might", "must", "shows", "showed", "uses", "used",
    "gives", "gave", "finds", "found", "makes", "made", "takes", "took", "yields", "yielded",
    "holds", "held", "follows", "followed", "depends", "depended", "requires", "required",
];

/// Check a list of sentences for grammar issues.
#[tracing::instrument(skip_all, fields(sentence_count = sentences.len()))]
pub fn check_grammar(sentences: &[String]) -> Vec<GrammarIssue> {
    let mut issues = Vec::new();

    for (idx, sentence) in sentences.iter().enumerate() {
        let sentence_num = idx + 1;
        let lower = sentence.to_lowercase();
        let mut push = |issue_type, severity, message: String| {
            issues.push(GrammarIssue {
                issue_type,
                message,
                sentence_num,
                severity,
            });
        };

        if DOUBLE_SPACE.is_match(sentence) {
            push(
                GrammarIssueType::DoubleSpace,
                Severity::Low,
                "Multiple consecutive spaces found".to_string(),
            );
        }

        let trimmed = sentence.trim_end_matches(['"', '\'', ')']).trim();
        if !trimmed.is_empty() && !trimmed.ends_with(['.', '!', '?', ':']) {
            push(
                GrammarIssueType::MissingPunctuation,
                Severity::Medium,
                "Sentence missing terminal punctuation".to_string(),
            );
        }

        for (pattern, desc) in SUBJECT_VERB_PATTERNS.iter() {
            if pattern.is_match(&lower) {
                push(
                    GrammarIssueType::SubjectVerbAgreement,
                    Severity::High,
                    (*desc).to_string(),
                );
            }
        }

        if DOUBLE_NEGATIVE.is_match(&lower) {
            push(
                GrammarIssueType::DoubleNegative,
                Severity::High,
                "Double negative detected".to_string(),
            );
        }

        if let Some(word) = repeated_word(&lower) {
            push(
                GrammarIssueType::RepeatedWord,
                Severity::Medium,
                format!("Repeated word \"{word}\""),
            );
        }

        if RUN_ON_INDICATORS.is_match(&lower) {
            push(
                GrammarIssueType::RunOnSentence,
                Severity::Medium,
                "Possible run-on sentence (multiple conjunction clauses)".to_string(),
            );
        }

        if is_comma_splice(&lower) {
            push(
                GrammarIssueType::CommaSplice,
                Severity::Medium,
                "Possible comma splice (two independent clauses joined by a comma)".to_string(),
            );
        }
    }

    issues
}

/// First word that appears twice in a row, ignoring punctuation between them.
fn repeated_word(lower: &str) -> Option<String> {
    let words: Vec<&str> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .collect();
    words
        .windows(2)
        .find(|pair| {
            !pair[0].is_empty()
                && pair[0] == pair[1]
                && pair[0].chars().all(char::is_alphabetic)
        })
        .map(|pair| pair[0].to_string())
}

/// Two or more comma-separated parts that each look like a full clause.
fn is_comma_splice(lower: &str) -> bool {
    let parts: Vec<&str> = lower.split(',').collect();
    if parts.len() < 2 {
        return false;
    }
    parts.iter().filter(|part| looks_like_clause(part)).count() >= 2
}

fn looks_like_clause(text: &str) -> bool {
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .collect();
    if words.len() < 3 {
        return false;
    }
    // A subordinating opener makes the part dependent.
    if matches!(
        words[0],
        "which" | "who" | "although" | "because" | "while" | "when" | "if" | "and" | "but" | "or"
    ) {
        return false;
    }
    SUBJECT_WORDS.contains(&words[0]) && words[1..].iter().any(|w| VERB_WORDS.contains(w))
}
