use std::path::PathBuf;

use super::board::Board;
use super::config::ProjectConfig;

/// A fully loaded lanemark project
#[derive(Debug)]
pub struct Project {
    /// Directory holding `lanemark.toml`
    pub root: PathBuf,
    /// Parsed lanemark.toml
    pub config: ProjectConfig,
    /// Loaded boards, indexed by board ID
    pub boards: Vec<(String, Board)>,
}

impl Project {
    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.boards
            .iter()
            .find(|(id, _)| id == board_id)
            .map(|(_, board)| board)
    }

    pub fn board_mut(&mut self, board_id: &str) -> Option<&mut Board> {
        self.boards
            .iter_mut()
            .find(|(id, _)| id == board_id)
            .map(|(_, board)| board)
    }

    /// The board file path relative to the project root.
    pub fn board_file(&self, board_id: &str) -> Option<&str> {
        self.config
            .boards
            .iter()
            .find(|bc| bc.id == board_id)
            .map(|bc| bc.file.as_str())
    }
}
