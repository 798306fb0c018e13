use serde::Serialize;

use crate::model::board::Board;

/// A card whose search text matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardHit {
    pub lane: usize,
    pub index: usize,
}

/// Lanes and cards matching a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// Lanes holding at least one matching card
    pub lanes: Vec<usize>,
    pub cards: Vec<CardHit>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty() && self.cards.is_empty()
    }
}

/// Case-insensitive substring search over card search text.
/// A blank query matches nothing.
pub fn search_board(board: &Board, query: &str) -> SearchResults {
    let needle = query.trim().to_lowercase();
    let mut results = SearchResults::default();
    if needle.is_empty() {
        return results;
    }

    for (lane_idx, lane) in board.lanes().enumerate() {
        let mut lane_matched = false;
        for (card_idx, item) in lane.items.iter().enumerate() {
            if item.title_search.contains(&needle) {
                lane_matched = true;
                results.cards.push(CardHit {
                    lane: lane_idx,
                    index: card_idx,
                });
            }
        }
        if lane_matched {
            results.lanes.push(lane_idx);
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_board;

    const BOARD: &str = "\
## Inbox
- [ ] Call Bob
    about the INVOICE
- [ ] Pay invoice ^inv1
## Invoices % status:completion %
- [x] Sent March
";

    #[test]
    fn test_search_cards_and_lanes() {
        let board = parse_board(BOARD);
        let results = search_board(&board, "  Invoice ");
        assert_eq!(results.lanes, vec![0]);
        assert_eq!(
            results.cards,
            vec![CardHit { lane: 0, index: 0 }, CardHit { lane: 0, index: 1 }]
        );
    }

    #[test]
    fn test_lane_title_alone_does_not_match() {
        let board = parse_board("## Inbox\n- [ ] Pay invoice\n## Invoices\n- [x] Sent March\n");
        let results = search_board(&board, "invoice");
        assert_eq!(results.lanes, vec![0]);
        assert_eq!(results.cards, vec![CardHit { lane: 0, index: 0 }]);

        let results = search_board(&board, "march");
        assert_eq!(results.lanes, vec![1]);
    }

    #[test]
    fn test_lane_listed_once_for_many_hits() {
        let board = parse_board("## A\n- [ ] x1\n- [ ] x2\n## B\n- [ ] y\n## C\n- [ ] x3\n");
        let results = search_board(&board, "x");
        assert_eq!(results.lanes, vec![0, 2]);
        assert_eq!(results.cards.len(), 3);
    }

    #[test]
    fn test_search_spans_continuation_lines() {
        let board = parse_board(BOARD);
        let results = search_board(&board, "bob about");
        assert_eq!(results.cards, vec![CardHit { lane: 0, index: 0 }]);
    }

    #[test]
    fn test_block_id_not_searchable() {
        let board = parse_board(BOARD);
        assert!(search_board(&board, "inv1").is_empty());
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        let board = parse_board(BOARD);
        assert!(search_board(&board, "   ").is_empty());
    }
}
