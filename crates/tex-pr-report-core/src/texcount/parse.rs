//! Splitting a texcount report into its sections.
//!
//! A `-freq -merge -stat` report has a fixed shape: overall counts, a
//! `Subcounts:` block with one line per heading, and a word-frequency block
//! fenced by `---` lines that ends at `Sum of subset:`. Anything that does not
//! have that shape is not parsed at all.

use std::sync::LazyLock;

use regex::Regex;

use super::tables;

/// Anchors on the `Subcounts:` legend and the `Word: Freq` fence.
static REPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)^(.*)Subcounts:\n",
        r"  text\+headers\+captions \(#headers/#floats/#inlines/#displayed\)\n",
        r"(.*)\nWord: Freq\n---\n(.*)\n---\n(.*)\nSum of subset:",
    ))
    .expect("valid regex")
});

/// The four sections of a texcount report, borrowed from the raw output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections<'a> {
    /// Overall counts (file name, encoding, totals).
    pub preamble: &'a str,
    /// One line per heading with its subcounts.
    pub headers: &'a str,
    /// Word statistics between the two `---` fences.
    pub word_stats: &'a str,
    /// `word: count` lines, most frequent first.
    pub word_frequency: &'a str,
}

/// Split raw texcount output into its sections.
///
/// Returns `None` when the output lacks the expected anchors.
pub fn split_sections(output: &str) -> Option<Sections<'_>> {
    let caps = REPORT_PATTERN.captures(output)?;
    let group = |i| caps.get(i).map_or("", |m| m.as_str());
    Some(Sections {
        preamble: group(1),
        headers: group(2),
        word_stats: group(3),
        word_frequency: group(4),
    })
}

/// Render the statistics section of a comment from raw texcount output.
///
/// Output that does not match the report shape renders as an empty string;
/// use [`split_sections`] to tell that apart from an empty report.
#[tracing::instrument(skip(output), fields(output_len = output.len()))]
pub fn render_statistics(output: &str, include_word_frequency: bool) -> String {
    let Some(sections) = split_sections(output) else {
        return String::new();
    };

    let mut markdown = tables::overall_statistics(sections.preamble);
    markdown.push_str(&tables::heading_statistics(sections.headers));
    if include_word_frequency {
        markdown.push_str(&tables::word_frequency(sections.word_frequency));
    }
    markdown
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "A: 1\nB: 2\nSubcounts:\n  text+headers+captions (#headers/#floats/#inlines/#displayed)\n  10+1+2+0 (1/2/3/4) Chapter: Intro\nWord: Freq\n---\nfoo: 5\n---\nbar\nSum of subset:";

    const REPORT: &str = "\
File(s) total: main.tex
Encoding: utf8
Sum count: 1520
Words in text: 1402
Words in headers: 18
Subcounts:
  text+headers+captions (#headers/#floats/#inlines/#displayed)
  1200+10+4 (3/2/7/1) Chapter: Introduction
  150+4+0 (1/0/0/0) Section: Motivation
  52+4+0 (1/0/3/0) Subsection: Prior work
Word: Freq
---
Different words: 412
---
the: 98
of: 51
Sum of subset: 1520
";

    #[test]
    fn split_extracts_sections_in_order() {
        let sections = split_sections(SAMPLE).unwrap();
        assert_eq!(sections.preamble, "A: 1\nB: 2\n");
        assert_eq!(
            sections.headers,
            "  10+1+2+0 (1/2/3/4) Chapter: Intro"
        );
        assert_eq!(sections.word_stats, "foo: 5");
        assert_eq!(sections.word_frequency, "bar");
    }

    #[test]
    fn missing_anchors_render_empty() {
        assert_eq!(render_statistics("Words in text: 12\nnothing else", false), "");
        assert!(split_sections("Words in text: 12").is_none());
        assert_eq!(render_statistics("", true), "");
    }

    #[test]
    fn subcounts_without_word_fence_is_not_parsed() {
        let text = "x\ny\nSubcounts:\n  text+headers+captions (#headers/#floats/#inlines/#displayed)\n  1+0+0 (0/0/0/0) Chapter: A\n";
        assert_eq!(render_statistics(text, false), "");
    }

    #[test]
    fn sample_output_renders_heading_row() {
        let md = render_statistics(SAMPLE, false);
        assert!(md.starts_with("### Overall statistics\n"));
        // both preamble lines fall within the skipped header lines
        assert!(!md.contains("| A | 1 |"));
        assert!(md.contains("| &nbsp;&nbsp;&nbsp;&nbsp;Intro | 10 | 2 | 3 | 4 |\n"));
    }

    #[test]
    fn full_report_renders_overall_and_headings() {
        let md = render_statistics(REPORT, false);
        assert!(md.contains("| Sum count | 1520 |\n"));
        assert!(md.contains("| Words in text | 1402 |\n"));
        assert!(md.contains("| Words in headers | 18 |\n"));
        assert!(!md.contains("Encoding"));
        assert!(md.contains("| &nbsp;&nbsp;&nbsp;&nbsp;Introduction | 1200 | 2 | 7 | 1 |\n"));
        assert!(md.contains(
            "| &nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;Motivation | 150 | 0 | 0 | 0 |\n"
        ));
        let overall = md.find("### Overall statistics").unwrap();
        let headings = md.find("### Statistics grouped by header").unwrap();
        assert!(overall < headings);
    }

    #[test]
    fn word_frequency_table_is_opt_in() {
        let without = render_statistics(REPORT, false);
        assert!(!without.contains("Top 10 words"));

        let with = render_statistics(REPORT, true);
        assert!(with.contains("### Top 10 words\n"));
        assert!(with.contains("| the | 98 |\n"));
        assert!(with.ends_with("| of | 51 |\n\n\n"));
    }
}
