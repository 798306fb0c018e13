use serde::{Deserialize, Serialize};

use super::settings::{DateColor, StatusEmoji, TagColor};

/// Configuration from lanemark.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project: ProjectInfo,
    #[serde(default)]
    pub boards: Vec<BoardConfig>,
    #[serde(default)]
    pub tasks: TaskConfig,
    #[serde(default)]
    pub status_emojis: Vec<StatusEmoji>,
    #[serde(default)]
    pub tag_colors: Vec<TagColor>,
    #[serde(default)]
    pub date_colors: Vec<DateColor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub id: String,
    pub name: String,
    pub file: String,
}

/// Checkbox characters shared with whatever toggles tasks outside the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Default: see src/cli/handlers/init.rs
    #[serde(default = "default_done_char")]
    pub done_char: char,
    /// The state that toggles into done. Default: see src/cli/handlers/init.rs
    #[serde(default = "default_pre_done_char")]
    pub pre_done_char: char,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig {
            done_char: default_done_char(),
            pre_done_char: default_pre_done_char(),
        }
    }
}

fn default_done_char() -> char {
    'x'
}

fn default_pre_done_char() -> char {
    ' '
}
