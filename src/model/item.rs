use serde::{Deserialize, Serialize};

use crate::parse::text::remove_block_id;

/// A card on a board: one task line plus its checkbox and structural markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Card text with structural markers (block id) still in place
    pub title_raw: String,
    /// Display-shaped text (block id removed)
    pub title: String,
    /// Lowercased title with line breaks folded to spaces, for search
    pub title_search: String,
    /// Whether the checkbox holds anything other than a blank
    pub checked: bool,
    /// The literal character inside `[ ]`
    pub check_char: char,
    /// Trailing `^id` anchor on the first line, if any
    pub block_id: Option<String>,

    // --- Source tracking ---
    /// The original source lines for this card (for verbatim emission)
    #[serde(skip)]
    pub source_text: Option<Vec<String>>,
    /// Whether this card has been modified since parsing
    #[serde(skip)]
    pub dirty: bool,
}

impl Item {
    /// Create a new card from raw text and a checkbox character, marked dirty (no source)
    pub fn new(title_raw: &str, check_char: char, block_id: Option<String>) -> Self {
        let mut item = Item {
            title_raw: String::new(),
            title: String::new(),
            title_search: String::new(),
            checked: check_char != ' ',
            check_char,
            block_id,
            source_text: None,
            dirty: true,
        };
        item.set_title_raw(title_raw);
        item
    }

    /// Replace the raw text and re-derive the display and search forms.
    pub fn set_title_raw(&mut self, title_raw: &str) {
        self.title_raw = title_raw.to_string();
        self.title = remove_block_id(title_raw);
        self.title_search = search_text(&self.title);
    }

    /// Mark this card as dirty (will be serialized in canonical format)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Checked with exactly the given "done" character.
    pub fn is_done(&self, done_char: char) -> bool {
        self.checked && self.check_char == done_char
    }
}

fn search_text(title: &str) -> String {
    title
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.title_raw == other.title_raw
            && self.checked == other.checked
            && self.check_char == other.check_char
            && self.block_id == other.block_id
    }
}

impl Eq for Item {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_derives_display_fields() {
        let item = Item::new("Buy Milk ^abc123", ' ', Some("abc123".into()));
        assert_eq!(item.title_raw, "Buy Milk ^abc123");
        assert_eq!(item.title, "Buy Milk");
        assert_eq!(item.title_search, "buy milk");
        assert!(!item.checked);
        assert!(item.dirty);
    }

    #[test]
    fn test_search_text_folds_lines() {
        let item = Item::new("Call Bob\n  About the Invoice", 'x', None);
        assert_eq!(item.title_search, "call bob about the invoice");
        assert!(item.checked);
    }

    #[test]
    fn test_is_done_requires_done_char() {
        let done = Item::new("a", 'x', None);
        let other = Item::new("a", '/', None);
        assert!(done.is_done('x'));
        assert!(other.checked);
        assert!(!other.is_done('x'));
    }

    #[test]
    fn test_equality_ignores_source_tracking() {
        let mut a = Item::new("a", ' ', None);
        let b = Item::new("a", ' ', None);
        a.dirty = false;
        a.source_text = Some(vec!["- [ ] a".into()]);
        assert_eq!(a, b);
    }
}
