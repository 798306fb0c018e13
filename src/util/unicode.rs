use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Truncate to fit within `max_cells` terminal cells, appending `…` if cut.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 1 {
        return "\u{2026}".to_string();
    }

    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for grapheme in s.graphemes(true) {
        let gw = grapheme_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(grapheme);
    }
    out.push('\u{2026}');
    out
}

/// Right-pad with spaces to `cells` terminal cells.
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let width = display_width(s);
    let mut out = s.to_string();
    out.extend(std::iter::repeat_n(' ', cells.saturating_sub(width)));
    out
}

/// The first line of a card, for one-line listings.
pub fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" {
        return 4;
    }
    UnicodeWidthStr::width(g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_width_ascii_and_wide() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("Buy milk 🚧"), 11);
    }

    #[test]
    fn display_width_combining() {
        assert_eq!(display_width("cafe\u{0301}"), 4);
    }

    #[test]
    fn display_width_tab() {
        assert_eq!(display_width("a\tb"), 6);
    }

    #[test]
    fn truncate_fits() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("exact", 5), "exact");
    }

    #[test]
    fn truncate_cuts_with_ellipsis() {
        assert_eq!(truncate_to_width("Write the report", 8), "Write t…");
        assert_eq!(truncate_to_width("anything", 1), "…");
        assert_eq!(truncate_to_width("anything", 0), "");
    }

    #[test]
    fn truncate_does_not_split_wide_chars() {
        // 🚧 is two cells; only one cell remains before the ellipsis
        assert_eq!(truncate_to_width("ab🚧cd", 4), "ab…");
        assert_eq!(truncate_to_width("你好世界", 5), "你好…");
    }

    #[test]
    fn pad_counts_cells() {
        assert_eq!(pad_to_width("你", 4), "你  ");
        assert_eq!(pad_to_width("toolong", 3), "toolong");
    }

    #[test]
    fn first_line_of_multiline_card() {
        assert_eq!(first_line("Call Bob\nabout the invoice"), "Call Bob");
        assert_eq!(first_line(""), "");
    }
}
