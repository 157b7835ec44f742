//! Reducing document sources to checkable prose.
//!
//! LaTeX is stripped with regexes: math, floats, verbatim blocks, headings and
//! reference commands go away, formatting commands keep their argument text.
//! Markdown goes through pulldown-cmark. Both keep paragraph breaks so that
//! sentence splitting never joins text across paragraphs.

use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

/// Environments whose body is not prose.
const SKIPPED_ENVIRONMENTS: &str = "equation|align|alignat|gather|multline|eqnarray|displaymath|math|\
    figure|table|tabular|tabularx|verbatim|lstlisting|minted|tikzpicture|thebibliography";

/// Commands dropped together with their argument.
const DROPPED_COMMANDS: &str = "cite|citep|citet|ref|eqref|cref|Cref|autoref|pageref|label|url|\
    includegraphics|input|include|bibliography|bibliographystyle|usepackage|documentclass|\
    part|chapter|section|subsection|subsubsection|paragraph|caption|footnote|vspace|hspace|\
    begin|end|newcommand|renewcommand|title|author|date";

/// Commands replaced by their argument.
const KEPT_COMMANDS: &str = "emph|textbf|textit|texttt|textsc|textrm|textsf|underline|mbox|enquote";

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(^|[^\\])%.*$").expect("valid regex"));

static ENVIRONMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?s)\\begin\{{(?:{SKIPPED_ENVIRONMENTS})\*?\}}.*?\\end\{{(?:{SKIPPED_ENVIRONMENTS})\*?\}}"
    ))
    .expect("valid regex")
});

static DISPLAY_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\\[.*?\\\]|\$\$.*?\$\$").expect("valid regex"));

static INLINE_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[^$]*\$|\\\(.*?\\\)").expect("valid regex"));

static DROPPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\\(?:{DROPPED_COMMANDS})\b\*?(?:\[[^\]]*\])*(?:\{{[^{{}}]*\}})*"
    ))
    .expect("valid regex")
});

static KEPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\\(?:{KEPT_COMMANDS})\{{([^{{}}]*)\}}")).expect("valid regex")
});

static OTHER_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[A-Za-z]+\*?(?:\[[^\]]*\])?|\\.").expect("valid regex"));

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*").expect("valid regex"));

/// Abbreviations that end in a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "etc", "cf", "vs", "al", "fig", "figs", "eq", "eqs", "sec", "ch", "tab",
    "dr", "mr", "mrs", "ms", "prof", "approx", "resp", "ref", "refs",
];

/// Reduce a LaTeX source to paragraphs of prose.
///
/// Only the document body is kept when a `document` environment is present.
#[tracing::instrument(skip_all, fields(input_len = source.len()))]
pub fn latex_to_prose(source: &str) -> Vec<String> {
    let body = document_body(source);
    let text = COMMENT.replace_all(body, "$1");
    let text = ENVIRONMENT.replace_all(&text, "");
    let text = DISPLAY_MATH.replace_all(&text, "");
    let text = INLINE_MATH.replace_all(&text, "");
    let text = text.replace("\\\\", " ");
    let text = DROPPED.replace_all(&text, "");
    // Twice, for one level of nesting such as \emph{\textbf{x}}.
    let text = KEPT.replace_all(&text, "$1");
    let text = KEPT.replace_all(&text, "$1");
    let text = OTHER_COMMAND.replace_all(&text, "");
    let text = text.replace(['{', '}'], "").replace('~', " ");
    paragraphs(&PARAGRAPH_BREAK.replace_all(&text, "\n\n"))
}

/// Reduce Markdown to paragraphs of prose.
///
/// Code, headings, tables and HTML are dropped; link and emphasis text stays.
#[tracing::instrument(skip_all, fields(input_len = source.len()))]
pub fn markdown_to_prose(source: &str) -> Vec<String> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let mut text = String::with_capacity(source.len() / 2);
    let mut skip_depth: usize = 0;

    for event in Parser::new_ext(source, options) {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::Heading { .. } | Tag::Table(_)) => {
                skip_depth += 1;
            }
            Event::End(TagEnd::CodeBlock | TagEnd::Heading(_) | TagEnd::Table) => {
                skip_depth = skip_depth.saturating_sub(1);
            }
            Event::Text(t) if skip_depth == 0 => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if skip_depth == 0 => text.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Item) if skip_depth == 0 => {
                text.push_str("\n\n");
            }
            _ => {}
        }
    }

    paragraphs(&text)
}

/// Split a paragraph into sentences.
///
/// A `.`, `!` or `?` ends a sentence when followed by whitespace and an
/// uppercase letter (or the end of the text), unless it closes a known
/// abbreviation or a single-letter initial. Fragments shorter than three
/// characters are dropped.
pub fn split_sentences(paragraph: &str) -> Vec<String> {
    const MIN_LENGTH: usize = 3;

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = paragraph.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        // Keep closing quotes and brackets with the sentence.
        while let Some(&next) = chars.peek() {
            if matches!(next, '"' | '\'' | ')' | ']') {
                current.push(next);
                chars.next();
            } else {
                break;
            }
        }

        let rest = chars.clone().find(|c| !c.is_whitespace());
        let followed_by_space = chars.peek().is_none_or(|c| c.is_whitespace());
        let boundary = followed_by_space
            && rest.is_none_or(|c| c.is_uppercase() || !c.is_alphabetic())
            && !(ch == '.' && ends_with_abbreviation(&current));

        if boundary {
            let sentence = current.trim();
            if sentence.len() >= MIN_LENGTH {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let sentence = current.trim();
    if sentence.len() >= MIN_LENGTH {
        sentences.push(sentence.to_string());
    }
    sentences
}

fn ends_with_abbreviation(current: &str) -> bool {
    let word = current
        .trim_end_matches(['"', '\'', ')', ']'])
        .trim_end_matches('.')
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    if word.chars().count() == 1 && word.chars().all(char::is_uppercase) {
        return true;
    }
    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

fn document_body(source: &str) -> &str {
    let start = source
        .find("\\begin{document}")
        .map_or(0, |i| i + "\\begin{document}".len());
    let body = &source[start..];
    body.find("\\end{document}").map_or(body, |end| &body[..end])
}

fn paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| !p.is_empty())
        .collect()
}
