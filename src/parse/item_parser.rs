use crate::model::item::Item;
use crate::parse::text::extract_block_id;

/// Builds a card from its markdown text and checkbox character.
///
/// Reconciliation goes through this rather than parsing lines itself, so lines
/// produced by an external task toggler get the same treatment as parsed ones.
pub trait ItemFactory {
    fn new_item(&self, content: &str, check_char: char) -> Item;
}

/// The factory used for board files: block id from the first line, display and
/// search text derived from the content.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineItemFactory;

impl ItemFactory for LineItemFactory {
    fn new_item(&self, content: &str, check_char: char) -> Item {
        let (check_char, content) = match split_card_line(content) {
            // Toggled lines may come back with their list marker attached
            Some((ch, rest)) => (ch, rest),
            None => (check_char, content),
        };
        let content = content.trim();
        Item::new(content, check_char, extract_block_id(content))
    }
}

/// Split `- [c] text` into its checkbox character and text.
pub fn split_card_line(line: &str) -> Option<(char, &str)> {
    let rest = line.strip_prefix("- [")?;
    let mut chars = rest.chars();
    let check_char = chars.next()?;
    let after = chars.as_str().strip_prefix(']')?;
    if after.is_empty() {
        return Some((check_char, after));
    }
    let text = after.strip_prefix(' ')?;
    Some((check_char, text))
}
