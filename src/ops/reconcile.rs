//! Card state reconciliation after a move between lanes.
//!
//! A move can cross completion regimes (none / standard completion / named
//! status). The checkbox and the trailing `emoji date` stamps in the card text
//! are rewritten to fit the destination lane. Checkbox changes are first offered
//! to an external [`TaskToggler`], which may rewrite the card into several lines.
//!
//! The work is split in two so a caller that has to wait for the toggler can do
//! so between [`Reconciler::plan`] and [`MovePlan::finish`].

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::board::LaneData;
use crate::model::config::TaskConfig;
use crate::model::item::Item;
use crate::model::settings::StatusEmoji;
use crate::parse::item_parser::{ItemFactory, LineItemFactory};
use crate::parse::text::{add_block_id, remove_block_id};

/// ` <token> YYYY-MM-DD`: a status stamp, matched by shape rather than by emoji.
/// The token never spans a line break, so continuation lines stay separate.
static ANNOTATION_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [^\s]+ [0-9]{4}-[0-9]{2}-[0-9]{2}").expect("literal pattern"));
static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("literal pattern"));

/// What the external task toggler did with a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The card was rewritten into `lines`; `lines[index]` is the card itself and
    /// any other line is a new sibling.
    Delegated {
        lines: Vec<String>,
        check_chars: Vec<char>,
        index: usize,
    },
    NotApplicable,
}

/// The task-toggling subsystem living outside the board (recurrence, done dates).
pub trait TaskToggler {
    /// Toggle `item`, whose `check_char` has been seeded with the state it is
    /// leaving. `file` is the board the card now lives in.
    fn toggle(&self, item: &Item, file: Option<&Path>) -> ToggleOutcome;
}

/// A toggler that never takes over.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToggle;

impl TaskToggler for NoToggle {
    fn toggle(&self, _item: &Item, _file: Option<&Path>) -> ToggleOutcome {
        ToggleOutcome::NotApplicable
    }
}

/// Where a sibling produced by the toggler goes relative to the moved card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingPosition {
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub item: Item,
    pub position: SiblingPosition,
}

/// The reconciled card plus an optional sibling to insert next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub next: Item,
    pub replacement: Option<Replacement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckboxTransition {
    Keep,
    /// Leaving a completion lane while done
    Uncheck,
    /// Entering a completion lane while not done
    Check,
}

/// Board-wide inputs to reconciliation.
pub struct Reconciler<'a> {
    pub status_emojis: &'a [StatusEmoji],
    pub done_char: char,
    pub pre_done_char: char,
    pub toggler: &'a dyn TaskToggler,
    pub factory: &'a dyn ItemFactory,
    pub file: Option<&'a Path>,
}

impl<'a> Reconciler<'a> {
    /// A reconciler with the default checkbox characters, no toggler and the
    /// board line factory.
    pub fn new(status_emojis: &'a [StatusEmoji]) -> Self {
        let tasks = TaskConfig::default();
        Reconciler {
            status_emojis,
            done_char: tasks.done_char,
            pre_done_char: tasks.pre_done_char,
            toggler: &NoToggle,
            factory: &LineItemFactory,
            file: None,
        }
    }

    pub fn with_task_chars(mut self, tasks: &TaskConfig) -> Self {
        self.done_char = tasks.done_char;
        self.pre_done_char = tasks.pre_done_char;
        self
    }

    pub fn with_toggler(mut self, toggler: &'a dyn TaskToggler) -> Self {
        self.toggler = toggler;
        self
    }

    pub fn with_factory(mut self, factory: &'a dyn ItemFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_file(mut self, file: &'a Path) -> Self {
        self.file = Some(file);
        self
    }

    /// Classify the move and decide whether the checkbox has to change.
    pub fn plan(&self, source: &LaneData, destination: &LaneData, item: &Item) -> MovePlan {
        let source_status = source.regime.status(self.status_emojis).cloned();
        let dest_status = destination.regime.status(self.status_emojis).cloned();
        let source_completion = source.regime.is_completion(self.status_emojis);
        let dest_completion = destination.regime.is_completion(self.status_emojis);
        let is_done = item.is_done(self.done_char);

        let transition = if source_completion && !dest_completion && is_done {
            CheckboxTransition::Uncheck
        } else if !source_completion && dest_completion && !is_done {
            CheckboxTransition::Check
        } else {
            CheckboxTransition::Keep
        };

        tracing::debug!(
            from = %source.title,
            to = %destination.title,
            source_completion,
            dest_completion,
            ?transition,
            "classified card move"
        );

        MovePlan {
            original: item.clone(),
            transition,
            source_status,
            dest_status,
            dest_completion,
            all_emojis: self.status_emojis.iter().map(|s| s.emoji.clone()).collect(),
            done_char: self.done_char,
            pre_done_char: self.pre_done_char,
        }
    }

    /// Plan, consult the toggler, and finish in one go.
    pub fn reconcile_move(
        &self,
        source: &LaneData,
        destination: &LaneData,
        item: &Item,
        today: NaiveDate,
    ) -> MoveResult {
        let plan = self.plan(source, destination, item);
        let outcome = match plan.toggle_request() {
            Some(seeded) => self.toggler.toggle(&seeded, self.file),
            None => ToggleOutcome::NotApplicable,
        };
        plan.finish(outcome, self.factory, today)
    }
}

/// Reconcile with default checkbox characters, no toggler and the board line factory.
pub fn reconcile_move(
    source: &LaneData,
    destination: &LaneData,
    status_emojis: &[StatusEmoji],
    item: &Item,
    today: NaiveDate,
) -> MoveResult {
    Reconciler::new(status_emojis).reconcile_move(source, destination, item, today)
}

/// A classified move waiting for the toggler's answer.
#[derive(Debug, Clone)]
pub struct MovePlan {
    original: Item,
    transition: CheckboxTransition,
    source_status: Option<StatusEmoji>,
    dest_status: Option<StatusEmoji>,
    dest_completion: bool,
    all_emojis: Vec<String>,
    done_char: char,
    pre_done_char: char,
}

impl MovePlan {
    /// The card to hand to the toggler, seeded with the state it is leaving.
    /// `None` when the checkbox stays as it is.
    pub fn toggle_request(&self) -> Option<Item> {
        let seed = match self.transition {
            CheckboxTransition::Keep => return None,
            CheckboxTransition::Uncheck => self.done_char,
            CheckboxTransition::Check => self.pre_done_char,
        };
        let mut seeded = self.original.clone();
        seeded.check_char = seed;
        Some(seeded)
    }

    /// Apply the toggler's answer and rewrite the status stamps.
    pub fn finish(self, outcome: ToggleOutcome, factory: &dyn ItemFactory, today: NaiveDate) -> MoveResult {
        let mut current = self.original.clone();
        let mut replacement = None;
        let mut handled = false;

        if self.transition != CheckboxTransition::Keep {
            match outcome {
                ToggleOutcome::Delegated {
                    lines,
                    check_chars,
                    index,
                } if lines.len() == check_chars.len() && index < lines.len() => {
                    for (i, (line, check_char)) in lines.iter().zip(check_chars).enumerate() {
                        let item = factory.new_item(line, check_char);
                        if i == index {
                            current = item;
                        } else {
                            if replacement.is_some() {
                                tracing::debug!(line = %line, "toggler returned several siblings; keeping the last");
                            }
                            let position = if i < index {
                                SiblingPosition::Before
                            } else {
                                SiblingPosition::After
                            };
                            replacement = Some(Replacement { item, position });
                        }
                    }
                    handled = true;
                    tracing::debug!(transition = ?self.transition, "checkbox change delegated to task toggler");
                }
                ToggleOutcome::Delegated {
                    lines,
                    check_chars,
                    index,
                } => {
                    tracing::warn!(
                        lines = lines.len(),
                        check_chars = check_chars.len(),
                        index,
                        "ignoring malformed task toggle result"
                    );
                    self.apply_fallback(&mut current);
                }
                ToggleOutcome::NotApplicable => self.apply_fallback(&mut current),
            }
        }

        let title_raw = current.title_raw.clone();
        let body = remove_block_id(&title_raw);
        let new_body = self.rewrite_annotations(&body, today);
        let final_title = if new_body != body {
            add_block_id(&new_body, &current)
        } else {
            title_raw
        };

        let checkbox_changed = !handled
            && (self.original.checked != current.checked
                || self.original.check_char != current.check_char);
        if final_title != current.title_raw || checkbox_changed {
            current.set_title_raw(&final_title);
            current.mark_dirty();
        }

        MoveResult {
            next: current,
            replacement,
        }
    }

    fn apply_fallback(&self, item: &mut Item) {
        match self.transition {
            CheckboxTransition::Uncheck => {
                tracing::debug!("leaving completion lane: unchecking card");
                item.checked = false;
                item.check_char = ' ';
            }
            CheckboxTransition::Check => {
                tracing::debug!("entering completion lane: checking card");
                item.checked = true;
                item.check_char = self.done_char;
            }
            CheckboxTransition::Keep => {}
        }
    }

    fn rewrite_annotations(&self, body: &str, today: NaiveDate) -> String {
        match &self.dest_status {
            None if !self.dest_completion => {
                tracing::debug!("moving to a lane without status: clearing status stamps");
                strip_status_annotations(body, &self.all_emojis)
            }
            Some(status) if !status.is_completion => {
                if body.contains(status.emoji.as_str()) {
                    tracing::debug!(emoji = %status.emoji, "status stamp already present");
                    body.to_string()
                } else {
                    tracing::debug!(emoji = %status.emoji, "stamping card with lane status");
                    format!("{} {} {}", body, status.emoji, today.format("%Y-%m-%d"))
                }
            }
            _ => {
                if self.source_status.is_some() && self.dest_completion {
                    tracing::debug!("status lane to completion lane: keeping stamps");
                }
                body.to_string()
            }
        }
    }
}

/// Remove every ` token YYYY-MM-DD` span and every configured status emoji,
/// then normalize spacing line by line.
pub fn strip_status_annotations(text: &str, emojis: &[String]) -> String {
    let mut out = ANNOTATION_SPAN.replace_all(text, "").into_owned();

    for emoji in emojis.iter().filter(|e| !e.is_empty()) {
        if !out.contains(emoji.as_str()) {
            continue;
        }
        let pattern = format!(r"[ \t]*{}[ \t]*", regex::escape(emoji));
        if let Ok(re) = Regex::new(&pattern) {
            out = re.replace_all(&out, " ").into_owned();
        }
    }

    normalize_spacing(&out)
}

/// Collapse runs of spaces/tabs inside each line, keeping line breaks and
/// leading indentation.
fn normalize_spacing(text: &str) -> String {
    text.lines()
        .map(|line| {
            let body = line.trim_start();
            let indent = &line[..line.len() - body.len()];
            format!("{}{}", indent, HORIZONTAL_SPACE.replace_all(body.trim_end(), " "))
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
