pub mod board_ops;
pub mod check;
pub mod colors;
pub mod reconcile;
pub mod search;

pub use board_ops::{MoveError, MoveOutcome, apply_status_selection, move_card};
pub use colors::{DateColorResolver, TagColorResolver};
pub use reconcile::{
    MovePlan, MoveResult, NoToggle, Reconciler, Replacement, SiblingPosition, TaskToggler,
    ToggleOutcome, reconcile_move,
};
pub use search::search_board;
