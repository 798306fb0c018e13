pub mod board;
pub mod config;
pub mod item;
pub mod project;
pub mod settings;

pub use board::*;
pub use config::*;
pub use item::*;
pub use project::*;
pub use settings::*;
