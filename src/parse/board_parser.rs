use crate::model::board::{Board, BoardNode, Lane, LaneData};
use crate::model::item::Item;
use crate::parse::item_parser::{ItemFactory, LineItemFactory, split_card_line};
use crate::parse::lane_title::parse_lane_title;
use crate::parse::text::dedent_new_lines;

/// Parse a board file from its source text
pub fn parse_board(source: &str) -> Board {
    parse_board_with(source, &LineItemFactory)
}

/// Parse a board file, building cards with the given factory
pub fn parse_board_with(source: &str, factory: &dyn ItemFactory) -> Board {
    let lines: Vec<String> = source.lines().map(|l| l.to_string()).collect();
    let mut nodes: Vec<BoardNode> = Vec::new();
    let mut literal_buf: Vec<String> = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        let line = &lines[idx];

        // Lane heading: `## Title (N) % status:id %`
        if let Some(heading) = line.strip_prefix("## ") {
            flush_literal(&mut literal_buf, &mut nodes);

            let data = LaneData::from_title_settings(parse_lane_title(heading));
            let mut header_lines = vec![line.clone()];
            idx += 1;

            // Collect blank lines between heading and first card
            while idx < lines.len() && lines[idx].trim().is_empty() {
                header_lines.push(lines[idx].clone());
                idx += 1;
            }

            let (items, next_idx) = parse_items(&lines, idx, factory);
            idx = next_idx;

            let mut trailing_lines = Vec::new();
            while idx < lines.len() && lines[idx].trim().is_empty() {
                trailing_lines.push(lines[idx].clone());
                idx += 1;
            }

            nodes.push(BoardNode::Lane(Lane {
                data,
                header_lines,
                items,
                trailing_lines,
                dirty: false,
            }));
            continue;
        }

        // Everything else is literal text
        literal_buf.push(line.clone());
        idx += 1;
    }

    flush_literal(&mut literal_buf, &mut nodes);

    Board {
        nodes,
        trailing_newline: source.ends_with('\n'),
    }
}

/// Parse consecutive cards starting at `start_idx`.
/// Returns the cards and the line index where parsing stopped.
fn parse_items(lines: &[String], start_idx: usize, factory: &dyn ItemFactory) -> (Vec<Item>, usize) {
    let mut items = Vec::new();
    let mut idx = start_idx;

    while idx < lines.len() {
        let Some((check_char, text)) = split_card_line(&lines[idx]) else {
            break;
        };
        let start = idx;
        let mut content = text.to_string();
        idx += 1;

        while idx < lines.len() && is_continuation(&lines[idx]) {
            content.push('\n');
            content.push_str(&lines[idx]);
            idx += 1;
        }

        // Blank lines between cards stay with the card above them
        let mut peek = idx;
        while peek < lines.len() && lines[peek].trim().is_empty() {
            peek += 1;
        }
        if peek > idx && peek < lines.len() && split_card_line(&lines[peek]).is_some() {
            idx = peek;
        }

        let mut item = factory.new_item(&dedent_new_lines(&content), check_char);
        item.source_text = Some(lines[start..idx].to_vec());
        item.dirty = false;
        items.push(item);
    }

    (items, idx)
}

/// Card continuation lines are indented by four spaces or a tab
fn is_continuation(line: &str) -> bool {
    line.starts_with("    ") || line.starts_with('\t')
}

fn flush_literal(buf: &mut Vec<String>, nodes: &mut Vec<BoardNode>) {
    if !buf.is_empty() {
        nodes.push(BoardNode::Literal(std::mem::take(buf)));
    }
}
