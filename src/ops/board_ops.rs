use chrono::NaiveDate;
use serde::Serialize;

use crate::model::board::{Board, CompletionRegime, Lane};
use crate::model::item::Item;
use crate::ops::reconcile::{Reconciler, SiblingPosition};

/// Error type for board edits
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    #[error("lane not found: {0}")]
    LaneNotFound(String),
    #[error("lane {lane} has no card at index {index}")]
    CardNotFound { lane: String, index: usize },
}

/// Where a moved card ended up.
#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub lane: usize,
    pub index: usize,
    pub item: Item,
    /// Index of the sibling the task toggler split off, if any
    pub sibling_index: Option<usize>,
}

/// Move a card between lanes (or within one) and reconcile it with its new lane.
///
/// `to_index` is clamped to the destination length; `None` appends.
pub fn move_card(
    board: &mut Board,
    from_lane: usize,
    from_index: usize,
    to_lane: usize,
    to_index: Option<usize>,
    reconciler: &Reconciler,
    today: NaiveDate,
) -> Result<MoveOutcome, MoveError> {
    let source_data = board
        .lane(from_lane)
        .ok_or_else(|| MoveError::LaneNotFound(from_lane.to_string()))?
        .data
        .clone();
    let dest_data = board
        .lane(to_lane)
        .ok_or_else(|| MoveError::LaneNotFound(to_lane.to_string()))?
        .data
        .clone();

    let source = board
        .lane_mut(from_lane)
        .ok_or_else(|| MoveError::LaneNotFound(from_lane.to_string()))?;
    if from_index >= source.items.len() {
        return Err(MoveError::CardNotFound {
            lane: source_data.title,
            index: from_index,
        });
    }
    let mut item = source.items.remove(from_index);
    // A relocated card is written canonically; its source lines carry the old spacing
    item.mark_dirty();

    let result = reconciler.reconcile_move(&source_data, &dest_data, &item, today);

    let dest = board
        .lane_mut(to_lane)
        .ok_or_else(|| MoveError::LaneNotFound(to_lane.to_string()))?;
    let mut index = to_index.unwrap_or(dest.items.len()).min(dest.items.len());
    dest.items.insert(index, result.next.clone());

    let sibling_index = result.replacement.map(|sibling| match sibling.position {
        SiblingPosition::Before => {
            dest.items.insert(index, sibling.item);
            index += 1;
            index - 1
        }
        SiblingPosition::After => {
            dest.items.insert(index + 1, sibling.item);
            index + 1
        }
    });

    tracing::info!(
        from = %source_data.title,
        to = %dest_data.title,
        index,
        "moved card"
    );

    Ok(MoveOutcome {
        lane: to_lane,
        index,
        item: result.next,
        sibling_index,
    })
}

/// Apply the lane settings choice `none`, `completion` or a status id.
/// Returns whether the lane changed.
pub fn apply_status_selection(lane: &mut Lane, selection: &str) -> bool {
    let regime = CompletionRegime::from_selection(selection.trim());
    if lane.data.regime == regime {
        return false;
    }
    lane.data.regime = regime;
    lane.mark_dirty();
    true
}
