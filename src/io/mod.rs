pub mod config_io;
pub mod lock;
pub mod project_io;

pub use lock::{FileLock, LockError};
pub use project_io::{
    CONFIG_FILE, ProjectError, discover_project, load_board, load_project, save_board,
    save_project_board,
};
