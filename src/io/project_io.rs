use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::board::Board;
use crate::model::config::ProjectConfig;
use crate::model::project::Project;
use crate::parse::{parse_board, serialize_board};

/// Project config file name, at the project root
pub const CONFIG_FILE: &str = "lanemark.toml";

/// Error type for project I/O operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("not a lanemark project: no lanemark.toml found")]
    NotAProject,
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse lanemark.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit lanemark.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("board not found: {0}")]
    UnknownBoard(String),
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

/// Discover the project root by walking up from the given directory,
/// looking for `lanemark.toml`.
pub fn discover_project(start: &Path) -> Result<PathBuf, ProjectError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ProjectError::NotAProject);
        }
    }
}

/// Load the config and every configured board. Boards whose file is missing
/// are skipped with a warning.
pub fn load_project(root: &Path) -> Result<Project, ProjectError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Err(ProjectError::NotAProject);
    }
    let config_text = read_text(&config_path)?;
    let config: ProjectConfig = toml::from_str(&config_text)?;

    let mut boards = Vec::new();
    for board_config in &config.boards {
        let path = root.join(&board_config.file);
        if !path.exists() {
            tracing::warn!(board = %board_config.id, path = %path.display(), "board file missing");
            continue;
        }
        let board = load_board(&path)?;
        tracing::debug!(board = %board_config.id, lanes = board.lane_count(), "loaded board");
        boards.push((board_config.id.clone(), board));
    }

    Ok(Project {
        root: root.to_path_buf(),
        config,
        boards,
    })
}

/// Read and parse one board file. CRLF line endings are normalized.
pub fn load_board(path: &Path) -> Result<Board, ProjectError> {
    let text = read_text(path)?;
    Ok(parse_board(&text.replace("\r\n", "\n")))
}

/// Write a board back to `root/file_path` atomically.
pub fn save_board(root: &Path, file_path: &str, board: &Board) -> Result<(), ProjectError> {
    let full_path = root.join(file_path);
    let content = serialize_board(board);
    atomic_write(&full_path, content.as_bytes()).map_err(|e| ProjectError::WriteError {
        path: full_path.clone(),
        source: e,
    })?;
    tracing::info!(path = %full_path.display(), "saved board");
    Ok(())
}

/// Save one of the project's boards by id.
pub fn save_project_board(project: &Project, board_id: &str) -> Result<(), ProjectError> {
    let file = project
        .board_file(board_id)
        .ok_or_else(|| ProjectError::UnknownBoard(board_id.to_string()))?;
    let board = project
        .board(board_id)
        .ok_or_else(|| ProjectError::UnknownBoard(board_id.to_string()))?;
    save_board(&project.root, file, board)
}

/// Write through a temp file in the same directory, then rename over the target.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn read_text(path: &Path) -> Result<String, ProjectError> {
    fs::read_to_string(path).map_err(|e| ProjectError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}
