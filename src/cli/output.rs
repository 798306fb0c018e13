use serde::Serialize;

use crate::model::board::{CompletionRegime, Lane};
use crate::model::item::Item;
use crate::model::settings::StatusEmoji;
use crate::util::unicode::{first_line, pad_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardInfoJson {
    pub id: String,
    pub name: String,
    pub file: String,
    pub loaded: bool,
    pub lanes: usize,
    pub cards: usize,
}

#[derive(Serialize)]
pub struct LaneJson {
    pub index: usize,
    pub title: String,
    pub max_items: usize,
    pub regime: CompletionRegime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorted: Option<String>,
    pub cards: usize,
    pub over_capacity: bool,
}

#[derive(Serialize)]
pub struct CardJson {
    pub lane: usize,
    pub index: usize,
    pub title: String,
    pub checked: bool,
    pub check_char: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
}

#[derive(Serialize)]
pub struct LaneCardsJson {
    #[serde(flatten)]
    pub lane: LaneJson,
    pub items: Vec<CardJson>,
}

#[derive(Serialize)]
pub struct MoveJson {
    pub card: CardJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sibling: Option<CardJson>,
}

pub fn lane_to_json(index: usize, lane: &Lane) -> LaneJson {
    LaneJson {
        index,
        title: lane.data.title.clone(),
        max_items: lane.data.max_items,
        regime: lane.data.regime.clone(),
        sorted: lane.data.sorted.clone(),
        cards: lane.items.len(),
        over_capacity: lane.is_over_capacity(),
    }
}

pub fn card_to_json(lane: usize, index: usize, item: &Item) -> CardJson {
    CardJson {
        lane,
        index,
        title: item.title.clone(),
        checked: item.checked,
        check_char: item.check_char.to_string(),
        block_id: item.block_id.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `none`, `completion`, or `status:<id> <emoji>` (`?` when the id is unknown)
pub fn format_regime(regime: &CompletionRegime, statuses: &[StatusEmoji]) -> String {
    match regime {
        CompletionRegime::None => "none".to_string(),
        CompletionRegime::StandardCompletion => "completion".to_string(),
        CompletionRegime::NamedStatus(id) => match regime.status(statuses) {
            Some(status) if status.is_completion => format!("status:{} {} (done)", id, status.emoji),
            Some(status) => format!("status:{} {}", id, status.emoji),
            None => format!("status:{} ?", id),
        },
    }
}

/// One row of `lm lanes`
pub fn format_lane_line(index: usize, lane: &Lane, statuses: &[StatusEmoji]) -> String {
    let count = if lane.data.max_items > 0 {
        format!("{}/{}", lane.items.len(), lane.data.max_items)
    } else {
        lane.items.len().to_string()
    };
    let over = if lane.is_over_capacity() { " !" } else { "" };
    format!(
        "  {:>2}  {}  {:>5}{}  [{}]",
        index,
        pad_to_width(&lane.data.title, 20),
        count,
        over,
        format_regime(&lane.data.regime, statuses)
    )
}

/// A lane heading for `lm list`
pub fn format_lane_header(index: usize, lane: &Lane) -> String {
    format!("== {} ({}) ==", lane.data.title, index)
}

/// One card row, first line only, truncated to `width` cells
pub fn format_card_line(index: usize, item: &Item, width: usize) -> String {
    let more = if item.title.contains('\n') { " +" } else { "" };
    format!(
        "  [{}] {:>2}  {}{}",
        item.check_char,
        index,
        truncate_to_width(first_line(&item.title), width),
        more
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::board::LaneData;

    fn statuses() -> Vec<StatusEmoji> {
        vec![StatusEmoji {
            id: "wip".into(),
            emoji: "🚧".into(),
            name: "In Progress".into(),
            is_completion: false,
        }]
    }

    #[test]
    fn test_format_regime() {
        let statuses = statuses();
        assert_eq!(format_regime(&CompletionRegime::None, &statuses), "none");
        assert_eq!(
            format_regime(&CompletionRegime::StandardCompletion, &statuses),
            "completion"
        );
        assert_eq!(
            format_regime(&CompletionRegime::NamedStatus("wip".into()), &statuses),
            "status:wip 🚧"
        );
        assert_eq!(
            format_regime(&CompletionRegime::NamedStatus("gone".into()), &statuses),
            "status:gone ?"
        );
    }

    #[test]
    fn test_format_lane_line_shows_capacity() {
        let mut lane = Lane::new(LaneData {
            title: "Doing".into(),
            max_items: 1,
            ..Default::default()
        });
        lane.items.push(Item::new("a", ' ', None));
        lane.items.push(Item::new("b", ' ', None));
        let line = format_lane_line(1, &lane, &[]);
        assert!(line.contains("2/1 !"));
        assert!(line.ends_with("[none]"));
    }

    #[test]
    fn test_format_card_line() {
        let item = Item::new("Call Bob about the invoice\nand the receipts", 'x', None);
        assert_eq!(format_card_line(3, &item, 10), "  [x]  3  Call Bob … +");
    }

    #[test]
    fn test_card_json_shape() {
        let item = Item::new("Buy milk ^abc", ' ', Some("abc".into()));
        let json = serde_json::to_value(card_to_json(0, 2, &item)).unwrap();
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["check_char"], " ");
        assert_eq!(json["block_id"], "abc");
    }
}
