use std::collections::HashMap;

use serde::Serialize;

use crate::model::board::{Board, CompletionRegime};
use crate::model::project::Project;
use crate::model::settings::{StatusEmoji, find_status};

/// Structured result from `lm check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A validation error (something that should be fixed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckError {
    /// Two status emojis share an id, so lanes referencing it are ambiguous
    DuplicateStatusId { status_id: String, count: usize },
}

/// A validation warning (non-critical issue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckWarning {
    /// Lane holds more cards than its `(N)` cap
    OverCapacity {
        board_id: String,
        lane: String,
        count: usize,
        max_items: usize,
    },
    /// Lane heading names a status id that isn't configured
    UnknownStatus {
        board_id: String,
        lane: String,
        status_id: String,
    },
    /// Several lanes share a title, so addressing by title picks the first
    DuplicateLaneTitle { board_id: String, title: String },
    /// The same `^id` anchor appears on several cards
    DuplicateBlockId {
        board_id: String,
        block_id: String,
        lanes: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate the settings and every loaded board. Read-only.
pub fn check_project(project: &Project) -> CheckResult {
    let mut result = CheckResult::default();
    check_statuses(&project.config.status_emojis, &mut result);

    for (board_id, board) in &project.boards {
        check_board_into(board_id, board, &project.config.status_emojis, &mut result);
    }

    result.valid = result.errors.is_empty();
    result
}

/// Validate a single board against the configured statuses.
pub fn check_board(board_id: &str, board: &Board, statuses: &[StatusEmoji]) -> CheckResult {
    let mut result = CheckResult::default();
    check_statuses(statuses, &mut result);
    check_board_into(board_id, board, statuses, &mut result);
    result.valid = result.errors.is_empty();
    result
}

// ---------------------------------------------------------------------------
// Individual checks
// ---------------------------------------------------------------------------

fn check_statuses(statuses: &[StatusEmoji], result: &mut CheckResult) {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for status in statuses {
        match counts.iter_mut().find(|entry| entry.0 == status.id) {
            Some((_, n)) => *n += 1,
            None => counts.push((status.id.as_str(), 1)),
        }
    }
    for (id, count) in counts.into_iter().filter(|(_, n)| *n > 1) {
        result.errors.push(CheckError::DuplicateStatusId {
            status_id: id.to_string(),
            count,
        });
    }
}

fn check_board_into(board_id: &str, board: &Board, statuses: &[StatusEmoji], result: &mut CheckResult) {
    let mut seen_titles: HashMap<String, usize> = HashMap::new();
    let mut block_ids: Vec<(String, Vec<String>)> = Vec::new();

    for lane in board.lanes() {
        let title = lane.data.title.clone();

        if lane.is_over_capacity() {
            result.warnings.push(CheckWarning::OverCapacity {
                board_id: board_id.to_string(),
                lane: title.clone(),
                count: lane.items.len(),
                max_items: lane.data.max_items,
            });
        }

        if let CompletionRegime::NamedStatus(id) = &lane.data.regime
            && find_status(statuses, id).is_none()
        {
            result.warnings.push(CheckWarning::UnknownStatus {
                board_id: board_id.to_string(),
                lane: title.clone(),
                status_id: id.clone(),
            });
        }

        let seen = seen_titles.entry(title.to_lowercase()).or_insert(0);
        *seen += 1;
        if *seen == 2 {
            result.warnings.push(CheckWarning::DuplicateLaneTitle {
                board_id: board_id.to_string(),
                title: title.clone(),
            });
        }

        for block_id in lane.items.iter().filter_map(|i| i.block_id.as_ref()) {
            match block_ids.iter_mut().find(|entry| entry.0 == *block_id) {
                Some((_, lanes)) => lanes.push(title.clone()),
                None => block_ids.push((block_id.clone(), vec![title.clone()])),
            }
        }
    }

    for (block_id, lanes) in block_ids.into_iter().filter(|(_, l)| l.len() > 1) {
        result.warnings.push(CheckWarning::DuplicateBlockId {
            board_id: board_id.to_string(),
            block_id,
            lanes,
        });
    }
}
