pub mod board_parser;
pub mod board_serializer;
pub mod item_parser;
pub mod lane_title;
pub mod text;

pub use board_parser::{parse_board, parse_board_with};
pub use board_serializer::{serialize_board, serialize_item};
pub use item_parser::{ItemFactory, LineItemFactory};
pub use lane_title::{LaneTitleSettings, format_lane_title, parse_lane_title};
pub use text::{
    add_block_id, dedent_new_lines, execute_deletion, indent_new_lines,
    mark_range_for_deletion, remove_block_id, replace_brs, replace_new_lines,
};
