use crate::model::board::{Board, BoardNode, Lane};
use crate::model::item::Item;
use crate::parse::lane_title::format_lane_title;
use crate::parse::text::indent_new_lines;

/// Serialize a board back to markdown.
/// Literal nodes are emitted verbatim; lanes and cards are emitted verbatim
/// unless marked dirty.
pub fn serialize_board(board: &Board) -> String {
    let mut lines = Vec::new();

    for node in &board.nodes {
        match node {
            BoardNode::Literal(literal_lines) => {
                lines.extend(literal_lines.iter().cloned());
            }
            BoardNode::Lane(lane) => serialize_lane(lane, &mut lines),
        }
    }

    let mut out = lines.join("\n");
    if board.trailing_newline {
        out.push('\n');
    }
    out
}

fn serialize_lane(lane: &Lane, lines: &mut Vec<String>) {
    if lane.dirty || lane.header_lines.is_empty() {
        lines.push(format!("## {}", format_lane_title(&lane.data.to_title_settings())));
        lines.extend(lane.header_lines.iter().skip(1).cloned());
    } else {
        lines.extend(lane.header_lines.iter().cloned());
    }

    for item in &lane.items {
        lines.extend(serialize_item(item));
    }

    lines.extend(lane.trailing_lines.iter().cloned());
}

/// Serialize a single card. If clean (not dirty), emit verbatim source.
pub fn serialize_item(item: &Item) -> Vec<String> {
    if !item.dirty
        && let Some(source) = &item.source_text
    {
        return source.clone();
    }

    let text = format!("- [{}] {}", item.check_char, indent_new_lines(&item.title_raw));
    text.lines().map(|l| l.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::board::{CompletionRegime, LaneData};
    use crate::parse::board_parser::parse_board;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_simple_board() {
        let source = "\
---

kanban-plugin: basic

---

## Backlog (5)

- [ ] Buy milk ^abc123
- [ ] Call Bob
    about the invoice

## Done % status:completion %

- [x] Taxes
";
        let board = parse_board(source);
        assert_eq!(serialize_board(&board), source);
    }

    #[test]
    fn test_round_trip_without_trailing_newline() {
        let source = "## Todo\n- [ ] one\n\n- [/] two";
        assert_eq!(serialize_board(&parse_board(source)), source);
    }

    #[test]
    fn test_dirty_item_written_canonically() {
        let mut board = parse_board("## Todo\n- [ ]   spaced   ^id1\n");
        let item = &mut board.lane_mut(0).unwrap().items[0];
        item.set_title_raw("Call Bob\nabout the invoice ^id1");
        item.check_char = 'x';
        item.mark_dirty();
        assert_eq!(
            serialize_board(&board),
            "## Todo\n- [x] Call Bob\n    about the invoice ^id1\n"
        );
    }

    #[test]
    fn test_dirty_lane_heading_regenerated() {
        let mut board = parse_board("## Review\n\n- [ ] a\n");
        let lane = board.lane_mut(0).unwrap();
        lane.data.regime = CompletionRegime::NamedStatus("wip".into());
        lane.data.max_items = 2;
        lane.mark_dirty();
        assert_eq!(
            serialize_board(&board),
            "## Review (2) % status:wip %\n\n- [ ] a\n"
        );
    }

    #[test]
    fn test_new_lane_serialized() {
        let mut board = parse_board("## Todo\n- [ ] a\n");
        board.push_lane(Lane::new(LaneData {
            title: "Done".into(),
            regime: CompletionRegime::StandardCompletion,
            ..Default::default()
        }));
        assert_eq!(
            serialize_board(&board),
            "## Todo\n- [ ] a\n## Done % status:completion %\n\n"
        );
    }
}
