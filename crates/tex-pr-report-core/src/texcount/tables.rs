//! Markdown tables for the sections of a texcount report.
//!
//! Each formatter returns a level-3 heading, the table, and two trailing
//! newlines so sections can be concatenated directly.

use std::sync::LazyLock;

use regex::Regex;

/// One level of indentation in the heading table.
pub const INDENT_UNIT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// Number of rows kept in the word-frequency table.
pub const TOP_WORDS: usize = 10;

/// Number of leading preamble lines that carry file metadata.
const PREAMBLE_SKIP: usize = 2;

/// `  <text>+<headers>+<captions> (<#headers>/<#floats>/<#inlines>/<#displayed>) <Kind>: <title>`
static HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^  (\d+)(?:\+\d+){2,} \(\d+/(\d+)/(\d+)/(\d+)\) (\w+): (.*)$").expect("valid regex")
});

/// Structural level of a heading as texcount names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    /// `\chapter`
    Chapter,
    /// `\section`
    Section,
    /// `\subsection`
    Subsection,
    /// Anything else, including `Subsubsection` and unnamed blocks.
    Other,
}

impl HeadingKind {
    /// Classify texcount's heading keyword.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "Chapter" => Self::Chapter,
            "Section" => Self::Section,
            "Subsection" => Self::Subsection,
            _ => Self::Other,
        }
    }

    /// How many [`INDENT_UNIT`]s prefix the title.
    pub const fn depth(self) -> usize {
        match self {
            Self::Chapter => 1,
            Self::Section => 2,
            Self::Subsection => 3,
            Self::Other => 0,
        }
    }

    /// The indentation prefix for this kind.
    pub fn indent(self) -> String {
        INDENT_UNIT.repeat(self.depth())
    }
}

/// Per-heading counts parsed from one line of the `Subcounts:` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRow<'a> {
    /// Heading level.
    pub kind: HeadingKind,
    /// Heading title as printed by texcount.
    pub title: &'a str,
    /// Words in the text under the heading.
    pub words: &'a str,
    /// Number of floats.
    pub floats: &'a str,
    /// Number of inline formulas.
    pub inline_math: &'a str,
    /// Number of displayed formulas.
    pub displayed_math: &'a str,
}

impl<'a> HeadingRow<'a> {
    /// Parse a subcount line; `None` if it does not have the expected shape.
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = HEADING_LINE.captures(line)?;
        let group = |i| caps.get(i).map_or("", |m| m.as_str());
        Some(Self {
            words: group(1),
            floats: group(2),
            inline_math: group(3),
            displayed_math: group(4),
            kind: HeadingKind::from_keyword(group(5)),
            title: group(6),
        })
    }
}

/// Overall counts as a `label | count` table.
///
/// The first two lines (file name and encoding) are left out. Lines without a
/// `": "` separator are skipped.
pub fn overall_statistics(preamble: &str) -> String {
    let mut out = String::from("### Overall statistics\n|   | Count |\n| - | ----- |\n");
    for (label, count) in preamble
        .lines()
        .skip(PREAMBLE_SKIP)
        .filter_map(|line| line.split_once(": "))
    {
        out.push_str(&format!("| {label} | {count} |\n"));
    }
    out.push_str("\n\n");
    out
}

/// Per-heading counts, indented by heading level.
///
/// Lines that do not look like a subcount line are skipped.
pub fn heading_statistics(headers: &str) -> String {
    let mut out = String::from(
        "### Statistics grouped by header\n\
         | Header | Word count | Floats | Math (inline) | Math (displayed) |\n\
         | - | - | - | - | - |\n",
    );
    for row in headers.lines().filter_map(HeadingRow::parse) {
        out.push_str(&format!(
            "| {}{} | {} | {} | {} | {} |\n",
            row.kind.indent(),
            row.title,
            row.words,
            row.floats,
            row.inline_math,
            row.displayed_math,
        ));
    }
    out.push_str("\n\n");
    out
}

/// The ten most frequent words as a `word | count` table.
pub fn word_frequency(frequencies: &str) -> String {
    let mut out = String::from("### Top 10 words\n|   | Count |\n| - | ----- |\n");
    for (word, count) in frequencies
        .lines()
        .take(TOP_WORDS)
        .filter_map(|line| line.split_once(": "))
    {
        out.push_str(&format!("| {word} | {count} |\n"));
    }
    out.push_str("\n\n");
    out
}
