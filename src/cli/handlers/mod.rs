mod init;
pub use init::cmd_init;

use std::path::PathBuf;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::io::project_io::{self, ProjectError};
use crate::model::board::{Board, CompletionRegime};
use crate::model::project::Project;
use crate::model::settings::{StatusEmoji, find_status, generate_instance_id};
use crate::ops::check::{self, CheckError, CheckWarning};
use crate::ops::colors::{DateColorResolver, TagColorResolver};
use crate::ops::reconcile::Reconciler;
use crate::ops::{apply_status_selection, move_card, search_board};
use crate::parse::lane_title::{format_lane_title, parse_lane_title};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Flags shared by every command
struct Context {
    json: bool,
    project_dir: Option<PathBuf>,
}

impl Context {
    fn root(&self) -> Result<PathBuf, ProjectError> {
        let start = match &self.project_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        project_io::discover_project(&start)
    }

    fn load_project(&self) -> Result<Project, ProjectError> {
        project_io::load_project(&self.root()?)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let project_dir = match &cli.project_dir {
        Some(dir) => Some(
            std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        ),
        None => None,
    };
    let ctx = Context {
        json: cli.json,
        project_dir,
    };

    match cli.command {
        Commands::Init(args) => cmd_init(&args, ctx.project_dir.as_deref()),

        // Read commands
        Commands::Boards => cmd_boards(&ctx),
        Commands::Lanes(args) => cmd_lanes(&ctx, args),
        Commands::List(args) => cmd_list(&ctx, args),
        Commands::Title(args) => cmd_title(&ctx, args),
        Commands::Search(args) => cmd_search(&ctx, args),
        Commands::Color(args) => cmd_color(&ctx, args),
        Commands::Check => cmd_check(&ctx),

        // Write commands
        Commands::Mv(args) => cmd_mv(&ctx, args),
        Commands::LaneStatus(args) => cmd_lane_status(&ctx, args),
        Commands::Status(cmd) => match cmd.action {
            StatusAction::List => cmd_status_list(&ctx),
            StatusAction::Add(args) => cmd_status_add(&ctx, args),
            StatusAction::Rm(args) => cmd_status_rm(&ctx, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn find_board<'a>(project: &'a Project, board_id: &str) -> Result<&'a Board, String> {
    project
        .board(board_id)
        .ok_or_else(|| format!("board not found: {}", board_id))
}

fn lane_index(board: &Board, key: &str) -> Result<usize, String> {
    board
        .find_lane(key)
        .ok_or_else(|| format!("lane not found: {}", key))
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}': expected YYYY-MM-DD", s))
}

/// `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD HH:MM`
fn parse_moment(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    parse_day(s)
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| format!("invalid date '{}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM", s))
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_boards(ctx: &Context) -> CmdResult {
    let project = ctx.load_project()?;

    let infos: Vec<BoardInfoJson> = project
        .config
        .boards
        .iter()
        .map(|bc| {
            let board = project.board(&bc.id);
            BoardInfoJson {
                id: bc.id.clone(),
                name: bc.name.clone(),
                file: bc.file.clone(),
                loaded: board.is_some(),
                lanes: board.map(Board::lane_count).unwrap_or(0),
                cards: board
                    .map(|b| b.lanes().map(|l| l.items.len()).sum::<usize>())
                    .unwrap_or(0),
            }
        })
        .collect();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else if infos.is_empty() {
        println!("no boards configured");
    } else {
        for info in &infos {
            if info.loaded {
                println!(
                    "  {} ({})  {} lanes, {} cards  {}",
                    info.name, info.id, info.lanes, info.cards, info.file
                );
            } else {
                println!("  {} ({})  missing  {}", info.name, info.id, info.file);
            }
        }
    }
    Ok(())
}

fn cmd_lanes(ctx: &Context, args: LanesArgs) -> CmdResult {
    let project = ctx.load_project()?;
    let board = find_board(&project, &args.board)?;

    if ctx.json {
        let lanes: Vec<LaneJson> = board
            .lanes()
            .enumerate()
            .map(|(i, lane)| lane_to_json(i, lane))
            .collect();
        println!("{}", serde_json::to_string_pretty(&lanes)?);
    } else {
        for (i, lane) in board.lanes().enumerate() {
            println!(
                "{}",
                format_lane_line(i, lane, &project.config.status_emojis)
            );
        }
    }
    Ok(())
}

fn cmd_list(ctx: &Context, args: ListArgs) -> CmdResult {
    let project = ctx.load_project()?;
    let board = find_board(&project, &args.board)?;

    let selected: Vec<usize> = match &args.lane {
        Some(key) => vec![lane_index(board, key)?],
        None => (0..board.lane_count()).collect(),
    };

    if ctx.json {
        let lanes: Vec<LaneCardsJson> = selected
            .iter()
            .filter_map(|&i| board.lane(i).map(|lane| (i, lane)))
            .map(|(i, lane)| LaneCardsJson {
                lane: lane_to_json(i, lane),
                items: lane
                    .items
                    .iter()
                    .enumerate()
                    .map(|(j, item)| card_to_json(i, j, item))
                    .collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&lanes)?);
        return Ok(());
    }

    for (n, &i) in selected.iter().enumerate() {
        let Some(lane) = board.lane(i) else { continue };
        if n > 0 {
            println!();
        }
        println!("{}", format_lane_header(i, lane));
        for (j, item) in lane.items.iter().enumerate() {
            println!("{}", format_card_line(j, item, args.width));
        }
    }
    Ok(())
}

fn cmd_title(ctx: &Context, args: TitleArgs) -> CmdResult {
    let settings = parse_lane_title(&args.text);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    println!("title: {}", settings.title);
    println!("max_items: {}", settings.max_items);
    if let Some(complete) = settings.complete {
        println!("complete: {}", complete);
    }
    if let Some(status) = &settings.apply_status {
        println!("apply_status: {}", status);
    }
    if let Some(sorted) = &settings.sorted {
        println!("sorted: {}", sorted);
    }
    println!("heading: {}", format_lane_title(&settings));
    Ok(())
}

fn cmd_search(ctx: &Context, args: SearchArgs) -> CmdResult {
    let project = ctx.load_project()?;
    let board = find_board(&project, &args.board)?;
    let results = search_board(board, &args.query);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("no matches");
        return Ok(());
    }
    for &i in &results.lanes {
        if let Some(lane) = board.lane(i) {
            println!("lane {}: {}", i, lane.data.title);
        }
    }
    for hit in &results.cards {
        if let Some(item) = board.lane(hit.lane).and_then(|l| l.items.get(hit.index)) {
            let lane_title = board.lane(hit.lane).map(|l| l.data.title.as_str()).unwrap_or("");
            println!("{} [{}]  {}", lane_title, hit.index, item.title.replace('\n', " "));
        }
    }
    Ok(())
}

fn cmd_color(ctx: &Context, args: ColorArgs) -> CmdResult {
    let project = ctx.load_project()?;

    if let Some(tag) = &args.tag {
        let resolver = TagColorResolver::new(&project.config.tag_colors);
        let rule = resolver.resolve(tag);
        if ctx.json {
            println!("{}", serde_json::to_string_pretty(&rule)?);
        } else {
            match rule {
                Some(rule) => println!(
                    "{}: color={} background={}",
                    tag, rule.color, rule.background_color
                ),
                None => println!("{}: no matching rule", tag),
            }
        }
        return Ok(());
    }

    let Some(date) = &args.date else {
        return Err("either --tag or --date is required".into());
    };
    let date = parse_moment(date)?;
    let now = match &args.now {
        Some(now) => parse_moment(now)?,
        None => Local::now().naive_local(),
    };
    let resolver = DateColorResolver::new(&project.config.date_colors, now);
    let rule = resolver.resolve(date);
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&rule)?);
    } else {
        match rule {
            Some(rule) => println!(
                "{}: color={} background={}",
                date.format("%Y-%m-%d %H:%M"),
                rule.color,
                rule.background_color
            ),
            None => println!("{}: no matching rule", date.format("%Y-%m-%d %H:%M")),
        }
    }
    Ok(())
}

fn cmd_check(ctx: &Context) -> CmdResult {
    let project = ctx.load_project()?;
    let result = check::check_project(&project);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if !result.errors.is_empty() {
        println!("Errors:");
        for err in &result.errors {
            match err {
                CheckError::DuplicateStatusId { status_id, count } => {
                    println!("  status id {} is defined {} times", status_id, count);
                }
            }
        }
    }
    if !result.warnings.is_empty() {
        if !result.errors.is_empty() {
            println!();
        }
        println!("Warnings:");
        for warn in &result.warnings {
            match warn {
                CheckWarning::OverCapacity {
                    board_id,
                    lane,
                    count,
                    max_items,
                } => {
                    println!("  [{}] {} holds {} cards (max {})", board_id, lane, count, max_items);
                }
                CheckWarning::UnknownStatus {
                    board_id,
                    lane,
                    status_id,
                } => {
                    println!("  [{}] {} uses unknown status {}", board_id, lane, status_id);
                }
                CheckWarning::DuplicateLaneTitle { board_id, title } => {
                    println!("  [{}] more than one lane is titled {}", board_id, title);
                }
                CheckWarning::DuplicateBlockId {
                    board_id,
                    block_id,
                    lanes,
                } => {
                    println!(
                        "  [{}] ^{} appears on several cards (lanes: {})",
                        board_id,
                        block_id,
                        lanes.join(", ")
                    );
                }
            }
        }
    }
    if result.valid {
        println!("✓ project is valid");
    } else {
        println!("✗ project has errors");
    }
    Ok(())
}

fn cmd_status_list(ctx: &Context) -> CmdResult {
    let project = ctx.load_project()?;
    let statuses = &project.config.status_emojis;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(statuses)?);
    } else if statuses.is_empty() {
        println!("no status emojis configured");
    } else {
        for status in statuses {
            let done = if status.is_completion { "  (done)" } else { "" };
            println!("  {} {}  {}{}", status.emoji, status.name, status.id, done);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_mv(ctx: &Context, args: MvArgs) -> CmdResult {
    let root = ctx.root()?;
    let _lock = FileLock::acquire_default(&root)?;
    let mut project = project_io::load_project(&root)?;

    let today = match &args.date {
        Some(d) => parse_day(d)?,
        None => Local::now().date_naive(),
    };
    let statuses = project.config.status_emojis.clone();
    let tasks = project.config.tasks.clone();
    let file = project.root.join(
        project
            .board_file(&args.board)
            .ok_or_else(|| format!("board not found: {}", args.board))?,
    );

    let board = project
        .board_mut(&args.board)
        .ok_or_else(|| format!("board not found: {}", args.board))?;
    let from = lane_index(board, &args.from)?;
    let to = lane_index(board, &args.to)?;

    let reconciler = Reconciler::new(&statuses)
        .with_task_chars(&tasks)
        .with_file(&file);
    let outcome = move_card(board, from, args.index, to, args.at, &reconciler, today)?;

    let lane_title = board.lane(to).map(|l| l.data.title.clone()).unwrap_or_default();
    let sibling = outcome.sibling_index.and_then(|i| {
        board
            .lane(to)
            .and_then(|l| l.items.get(i))
            .map(|item| card_to_json(to, i, item))
    });

    project_io::save_project_board(&project, &args.board)?;

    let card = card_to_json(outcome.lane, outcome.index, &outcome.item);
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&MoveJson { card, sibling })?);
    } else {
        println!("moved to {} [{}]: [{}] {}", lane_title, card.index, card.check_char, card.title);
        if let Some(sibling) = sibling {
            println!("  + [{}] {} [{}]", sibling.check_char, sibling.title, sibling.index);
        }
    }
    Ok(())
}

fn cmd_lane_status(ctx: &Context, args: LaneStatusArgs) -> CmdResult {
    let root = ctx.root()?;
    let _lock = FileLock::acquire_default(&root)?;
    let mut project = project_io::load_project(&root)?;
    let statuses = project.config.status_emojis.clone();

    // Unknown ids are rejected here rather than left for reconciliation to ignore
    let selection = args.selection.trim();
    if let CompletionRegime::NamedStatus(id) = CompletionRegime::from_selection(selection)
        && find_status(&statuses, &id).is_none()
    {
        return Err(format!("unknown status id: {} (see `lm status list`)", id).into());
    }

    let board = project
        .board_mut(&args.board)
        .ok_or_else(|| format!("board not found: {}", args.board))?;
    let idx = lane_index(board, &args.lane)?;
    let lane = board
        .lane_mut(idx)
        .ok_or_else(|| format!("lane not found: {}", args.lane))?;

    let changed = apply_status_selection(lane, selection);
    let json = lane_to_json(idx, lane);
    let label = format_regime(&lane.data.regime, &statuses);
    let title = lane.data.title.clone();

    if changed {
        project_io::save_project_board(&project, &args.board)?;
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else if changed {
        println!("{}: {}", title, label);
    } else {
        println!("{}: {} (unchanged)", title, label);
    }
    Ok(())
}

fn cmd_status_add(ctx: &Context, args: StatusAddArgs) -> CmdResult {
    let root = ctx.root()?;
    let _lock = FileLock::acquire_default(&root)?;
    let (config, mut doc) = config_io::read_config(&root)?;

    let id = args.id.unwrap_or_else(|| generate_instance_id(9));
    if id.is_empty() || id.chars().any(|c| c == ',' || c == '%' || c.is_whitespace()) {
        return Err(format!("invalid status id '{}': no whitespace, commas or %", id).into());
    }
    if id == "completion" || id == "none" {
        return Err(format!("'{}' is reserved", id).into());
    }
    if find_status(&config.status_emojis, &id).is_some() {
        return Err(format!("status id already exists: {}", id).into());
    }
    let emoji = args.emoji.trim();
    if emoji.is_empty() {
        return Err("status emoji cannot be empty".into());
    }

    let status = StatusEmoji {
        id,
        emoji: emoji.to_string(),
        name: args.name.trim().to_string(),
        is_completion: args.completion,
    };
    config_io::add_status_emoji(&mut doc, &status);
    config_io::write_config(&root, &doc)?;
    tracing::info!(id = %status.id, "added status emoji");

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", status.id);
    }
    Ok(())
}

fn cmd_status_rm(ctx: &Context, args: StatusRmArgs) -> CmdResult {
    let root = ctx.root()?;
    let _lock = FileLock::acquire_default(&root)?;
    let (_config, mut doc) = config_io::read_config(&root)?;

    if !config_io::remove_status_emoji(&mut doc, &args.id) {
        return Err(format!("status not found: {}", args.id).into());
    }
    config_io::write_config(&root, &doc)?;
    tracing::info!(id = %args.id, "removed status emoji");

    // Lanes still pointing at the id now behave as if they had no status
    let project = project_io::load_project(&root)?;
    for (board_id, board) in &project.boards {
        for lane in board.lanes() {
            if lane.data.should_apply_status() == Some(args.id.as_str()) {
                eprintln!("note: [{}] {} still references {}", board_id, lane.data.title, args.id);
            }
        }
    }

    if !ctx.json {
        println!("removed {}", args.id);
    }
    Ok(())
}
