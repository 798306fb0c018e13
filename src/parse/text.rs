//! Line-level text surgery: pure string-to-string edits that know nothing about
//! boards. None of these fail; odd input just produces best-effort output.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::item::Item;

/// Fills ranges marked for deletion until [`execute_deletion`] removes them.
pub const DELETION_SENTINEL: char = '\0';

/// Stands in for a line break when text must live on a single line.
pub const LINE_BREAK_PLACEHOLDER: &str = "<br>";

static SENTINEL_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *\x00+ *").expect("literal pattern"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\n").expect("literal pattern"));
static INDENTED_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r\n|\n)(?: {4}|\t)").expect("literal pattern"));
static TRAILING_BLOCK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\^([a-zA-Z0-9-]+)$").expect("literal pattern"));

/// Overwrite `range` (in chars) with sentinels, widened over adjacent spaces.
///
/// The output has the same char length as the input, so several ranges computed
/// against the original offsets can be marked before one [`execute_deletion`].
pub fn mark_range_for_deletion(text: &str, range: Range<usize>) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut start = range.start.min(len);
    let mut end = range.end.clamp(start, len);
    while start > 0 && chars[start - 1] == ' ' {
        start -= 1;
    }
    while end < len && chars[end] == ' ' {
        end += 1;
    }

    let mut out = String::with_capacity(text.len());
    out.extend(&chars[..start]);
    out.extend(std::iter::repeat_n(DELETION_SENTINEL, end - start));
    out.extend(&chars[end..]);
    out
}

/// Remove every sentinel run (and the spaces around it), leaving a single space.
pub fn execute_deletion(text: &str) -> String {
    SENTINEL_RUN.replace_all(text, " ").trim().to_string()
}

/// Encode line breaks as [`LINE_BREAK_PLACEHOLDER`].
pub fn replace_new_lines(text: &str) -> String {
    LINE_BREAK
        .replace_all(text.trim(), LINE_BREAK_PLACEHOLDER)
        .into_owned()
}

/// Decode [`LINE_BREAK_PLACEHOLDER`] back into line breaks.
pub fn replace_brs(text: &str) -> String {
    text.replace(LINE_BREAK_PLACEHOLDER, "\n").trim().to_string()
}

/// Prefix every line after the first with four spaces.
pub fn indent_new_lines(text: &str) -> String {
    LINE_BREAK.replace_all(text.trim(), "\n    ").into_owned()
}

/// Strip one four-space or tab continuation prefix from every line after the first.
pub fn dedent_new_lines(text: &str) -> String {
    INDENTED_LINE_BREAK
        .replace_all(text.trim(), "\n")
        .into_owned()
}

/// Append ` ^<block id>` to the first line when the item carries one.
pub fn add_block_id(text: &str, item: &Item) -> String {
    let Some(block_id) = item.block_id.as_deref().filter(|id| !id.is_empty()) else {
        return text.to_string();
    };
    map_first_line(text, |first| format!("{} ^{}", first, block_id))
}

/// Strip a trailing `^<block id>` from the first line only.
pub fn remove_block_id(text: &str) -> String {
    map_first_line(text, |first| {
        TRAILING_BLOCK_ID.replace(first, "").into_owned()
    })
}

/// The trailing `^<block id>` of the first line, if present.
pub fn extract_block_id(text: &str) -> Option<String> {
    let first = LINE_BREAK.split(text).next().unwrap_or("");
    TRAILING_BLOCK_ID
        .captures(first)
        .map(|caps| caps[1].to_string())
}

fn map_first_line(text: &str, f: impl FnOnce(&str) -> String) -> String {
    let mut lines: Vec<String> = LINE_BREAK.split(text).map(str::to_string).collect();
    if let Some(first) = lines.first_mut() {
        *first = f(first);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_block_id(id: &str) -> Item {
        Item::new("", ' ', Some(id.to_string()))
    }

    #[test]
    fn test_mark_range_keeps_length() {
        let marked = mark_range_for_deletion("Buy milk #shop today", 9..14);
        assert_eq!(marked.chars().count(), "Buy milk #shop today".chars().count());
        assert_eq!(marked, "Buy milk\0\0\0\0\0\0\0today");
    }

    #[test]
    fn test_mark_range_counts_chars_not_bytes() {
        let marked = mark_range_for_deletion("🚧 wip done", 2..5);
        assert_eq!(marked, "🚧\0\0\0\0\0done");
        assert_eq!(execute_deletion(&marked), "🚧 done");
    }

    #[test]
    fn test_mark_range_clamps_out_of_bounds() {
        assert_eq!(mark_range_for_deletion("abc", 5..9), "abc");
        assert_eq!(mark_range_for_deletion("abc", 2..1), "abc");
        assert_eq!(mark_range_for_deletion("abc", 1..10), "a\0\0");
    }

    #[test]
    fn test_execute_deletion_collapses_runs() {
        let text = "Buy milk #shop today 2024-06-01";
        let marked = mark_range_for_deletion(text, 9..14);
        let marked = mark_range_for_deletion(&marked, 21..31);
        assert_eq!(execute_deletion(&marked), "Buy milk today");
    }

    #[test]
    fn test_execute_deletion_is_idempotent() {
        let marked = mark_range_for_deletion("  a b  c ", 3..4);
        let once = execute_deletion(&marked);
        assert_eq!(execute_deletion(&once), once);
    }

    #[test]
    fn test_execute_deletion_without_sentinels_only_trims() {
        assert_eq!(execute_deletion("  plain  text "), "plain  text");
    }

    #[test]
    fn test_new_line_round_trip() {
        let text = "  first\nsecond\r\nthird \n";
        assert_eq!(replace_new_lines(text), "first<br>second<br>third");
        assert_eq!(replace_brs(&replace_new_lines("a\nb\n\nc")), "a\nb\n\nc");
    }

    #[test]
    fn test_indent_dedent_inverse() {
        let text = "Title\nnote one\n\tkept tab";
        let indented = indent_new_lines(text);
        assert_eq!(indented, "Title\n    note one\n    \tkept tab");
        assert_eq!(dedent_new_lines(&indented), text);
    }

    #[test]
    fn test_dedent_accepts_tab_prefix_only_once() {
        assert_eq!(dedent_new_lines("a\n\tb\n  c"), "a\nb\n  c");
    }

    #[test]
    fn test_block_id_round_trip() {
        let item = with_block_id("abc123");
        let with_id = add_block_id("Buy milk", &item);
        assert_eq!(with_id, "Buy milk ^abc123");
        assert_eq!(remove_block_id(&with_id), "Buy milk");
    }

    #[test]
    fn test_add_block_id_first_line_only() {
        let item = with_block_id("x-1");
        assert_eq!(add_block_id("a\nb", &item), "a ^x-1\nb");
        assert_eq!(add_block_id("a\nb", &Item::new("", ' ', None)), "a\nb");
    }

    #[test]
    fn test_remove_block_id_leaves_mid_line_tokens() {
        assert_eq!(remove_block_id("see ^abc later"), "see ^abc later");
        assert_eq!(remove_block_id("bad ^a_b"), "bad ^a_b");
        assert_eq!(remove_block_id("a\nb ^abc"), "a\nb ^abc");
    }

    #[test]
    fn test_extract_block_id() {
        assert_eq!(extract_block_id("Buy milk ^abc-1\nmore").as_deref(), Some("abc-1"));
        assert_eq!(extract_block_id("Buy milk"), None);
    }
}
