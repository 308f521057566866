//! Text-level passes applied to the rendered Markdown.
//!
//! The normalizer leaves render-safe markers in the HTML (panel markers,
//! `pre`-wrapped pipe tables); once the external renderer has produced
//! Markdown, these passes rewrite the markers into the target wiki's syntax
//! and tidy the surrounding whitespace.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{INFO_MARKER, NOTE_MARKER, WARNING_MARKER};

/// Run the full post-render pipeline.
pub fn run(text: &str) -> String {
    let text = replace_panel_markers(text);
    let text = remove_blank_lines(&text);
    let text = pad_quote_blocks(&text);
    unwrap_table_blocks(&text)
}

/// Replace the render-safe panel markers with the target system's tags.
pub fn replace_panel_markers(text: &str) -> String {
    text.replace(NOTE_MARKER, "[!note]")
        .replace(WARNING_MARKER, "[!warning]")
        .replace(INFO_MARKER, "[!info]")
}

/// Drop whitespace-only lines; quote padding below reintroduces the blank
/// lines Markdown needs around blockquotes.
pub fn remove_blank_lines(text: &str) -> String {
    let mut out: String = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if text.ends_with('\n') && !out.is_empty() {
        out.push('\n');
    }
    out
}

static QUOTE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(^>.*$)\n([^>\n])").expect("valid regex"));

/// Insert a blank line after each blockquote run so the following paragraph
/// does not get pulled into the quote.
pub fn pad_quote_blocks(text: &str) -> String {
    QUOTE_END_RE.replace_all(text, "$1\n\n$2").into_owned()
}

static TABLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)`{3}\s+table((?:.|\n|\r)*?)`{3}").expect("valid regex"));

/// Unwrap the fenced blocks the renderer makes of `pre class="table"`
/// elements, leaving the literal pipe table in place.
pub fn unwrap_table_blocks(text: &str) -> String {
    TABLE_BLOCK_RE.replace_all(text, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_become_bracketed_tags() {
        let input = "> ==!note==\n> body\n\n> ==!warning==\n\n> ==!info==\n";
        let output = replace_panel_markers(input);
        assert!(output.contains("[!note]"));
        assert!(output.contains("[!warning]"));
        assert!(output.contains("[!info]"));
        assert!(!output.contains("==!"));
    }

    #[test]
    fn marker_replacement_is_idempotent() {
        let once = replace_panel_markers("> ==!info== hint\n");
        assert_eq!(replace_panel_markers(&once), once);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let input = "a\n\n   \nb\n";
        assert_eq!(remove_blank_lines(input), "a\nb\n");
    }

    #[test]
    fn quote_blocks_get_trailing_blank_line() {
        let input = "> quoted\n> more\nplain text\n";
        let output = pad_quote_blocks(input);
        assert_eq!(output, "> quoted\n> more\n\nplain text\n");
    }

    #[test]
    fn table_fences_are_unwrapped() {
        let input = "before\n\n``` table\n| a | b |\n| ---- | ---- |\n| 1 | 2 |\n```\n\nafter\n";
        let output = unwrap_table_blocks(input);
        assert!(!output.contains("```"));
        assert!(output.contains("| a | b |"));
        assert!(output.contains("| ---- | ---- |"));
    }

    #[test]
    fn ordinary_code_fences_survive() {
        let input = "``` php\necho \"x\";\n```\n";
        assert_eq!(unwrap_table_blocks(input), input);
    }

    #[test]
    fn full_pipeline_scenario() {
        // The info-panel end-to-end scenario after rendering: blockquote with
        // marker, blank noise, and a table fence.
        let input = "> ==!info==\n> notice text\n\n\nnext paragraph\n\n``` table\n| a |\n| ---- |\n```\n";
        let output = run(input);
        assert!(output.contains("[!info]"));
        assert!(output.contains("> notice text\n\nnext paragraph"));
        assert!(!output.contains("``` table"));
    }
}
