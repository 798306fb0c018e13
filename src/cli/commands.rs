use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lm", about = concat!("lanemark v", env!("CARGO_PKG_VERSION"), " - markdown kanban boards that keep their cards straight"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,

    /// Log reconciliation decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new project in the current directory
    Init(InitArgs),
    /// List configured boards
    Boards,
    /// List the lanes of a board
    Lanes(LanesArgs),
    /// List cards, for the whole board or one lane
    List(ListArgs),
    /// Show the settings embedded in a lane heading
    Title(TitleArgs),
    /// Move a card to another lane (or position) and reconcile it
    Mv(MvArgs),
    /// Set a lane's completion regime: none, completion, or a status id
    LaneStatus(LaneStatusArgs),
    /// Search lane titles and cards
    Search(SearchArgs),
    /// Manage status emojis
    Status(StatusCmd),
    /// Resolve the tag or date color rule that applies
    Color(ColorArgs),
    /// Validate boards against the settings
    Check,
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Project name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Overwrite an existing lanemark.toml
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LanesArgs {
    /// Board id
    pub board: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Board id
    pub board: String,
    /// Lane index or title (default: all lanes)
    pub lane: Option<String>,
    /// Truncate card titles to this many terminal cells
    #[arg(long, default_value_t = 72)]
    pub width: usize,
}

#[derive(Args)]
pub struct TitleArgs {
    /// Lane heading text, e.g. "Doing (3) % status:wip %"
    pub text: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Board id
    pub board: String,
    /// Case-insensitive text to look for
    pub query: String,
}

#[derive(Args)]
pub struct ColorArgs {
    /// Tag to look up, e.g. "#bug"
    #[arg(long, conflicts_with = "date", required_unless_present = "date")]
    pub tag: Option<String>,
    /// Date to classify: YYYY-MM-DD or YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub date: Option<String>,
    /// Reference time for date rules (default: now)
    #[arg(long, requires = "date")]
    pub now: Option<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct MvArgs {
    /// Board id
    pub board: String,
    /// Source lane index or title
    pub from: String,
    /// 0-based card index in the source lane
    pub index: usize,
    /// Destination lane index or title
    pub to: String,
    /// Position in the destination lane (default: end)
    #[arg(long)]
    pub at: Option<usize>,
    /// Date used for status stamps (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct LaneStatusArgs {
    /// Board id
    pub board: String,
    /// Lane index or title
    pub lane: String,
    /// none, completion, or a status id
    pub selection: String,
}

#[derive(Args)]
pub struct StatusCmd {
    #[command(subcommand)]
    pub action: StatusAction,
}

#[derive(Subcommand)]
pub enum StatusAction {
    /// List configured status emojis
    List,
    /// Add a status emoji
    Add(StatusAddArgs),
    /// Remove a status emoji by id
    Rm(StatusRmArgs),
}

#[derive(Args)]
pub struct StatusAddArgs {
    /// Emoji stamped onto cards, e.g. 🚧
    pub emoji: String,
    /// Display name
    pub name: String,
    /// Treat lanes with this status as done
    #[arg(long)]
    pub completion: bool,
    /// Explicit id (default: random)
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args)]
pub struct StatusRmArgs {
    /// Status id
    pub id: String,
}
