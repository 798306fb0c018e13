use serde::{Deserialize, Serialize};

use super::item::Item;
use super::settings::{StatusEmoji, find_status};
use crate::parse::lane_title::LaneTitleSettings;

/// How a lane treats the cards placed in it. Exactly one applies per lane.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum CompletionRegime {
    #[default]
    None,
    /// Cards are done by being here (universal done checkbox)
    StandardCompletion,
    /// Cards are stamped with the status of this id
    NamedStatus(String),
}

impl CompletionRegime {
    /// Normalize the two legacy flags. A named status wins over the standard flag.
    pub fn from_flags(mark_complete: bool, apply_status: Option<&str>) -> Self {
        match apply_status {
            Some(id) if !id.is_empty() => CompletionRegime::NamedStatus(id.to_string()),
            _ if mark_complete => CompletionRegime::StandardCompletion,
            _ => CompletionRegime::None,
        }
    }

    /// Map a lane-settings selection (`none`, `completion`, or a status id).
    pub fn from_selection(value: &str) -> Self {
        match value {
            "" | "none" => CompletionRegime::None,
            "completion" => CompletionRegime::StandardCompletion,
            id => CompletionRegime::NamedStatus(id.to_string()),
        }
    }

    /// The inverse of [`CompletionRegime::from_selection`].
    pub fn selection(&self) -> &str {
        match self {
            CompletionRegime::None => "none",
            CompletionRegime::StandardCompletion => "completion",
            CompletionRegime::NamedStatus(id) => id,
        }
    }

    /// Resolve the named status against the configured list.
    pub fn status<'a>(&self, statuses: &'a [StatusEmoji]) -> Option<&'a StatusEmoji> {
        match self {
            CompletionRegime::NamedStatus(id) => find_status(statuses, id),
            _ => None,
        }
    }

    /// Standard completion, or a named status that counts as completion.
    pub fn is_completion(&self, statuses: &[StatusEmoji]) -> bool {
        match self {
            CompletionRegime::StandardCompletion => true,
            other => other.status(statuses).is_some_and(|s| s.is_completion),
        }
    }
}

/// Per-lane configuration, derived from the lane heading.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaneData {
    pub title: String,
    /// Item cap; 0 means unlimited
    pub max_items: usize,
    pub regime: CompletionRegime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorted: Option<String>,
}

impl LaneData {
    /// Fold a parsed heading into lane data.
    pub fn from_title_settings(settings: LaneTitleSettings) -> Self {
        LaneData {
            regime: CompletionRegime::from_flags(
                settings.complete.unwrap_or(false),
                settings.apply_status.as_deref(),
            ),
            title: settings.title,
            max_items: settings.max_items,
            sorted: settings.sorted,
        }
    }

    /// The heading settings this lane data serializes to.
    pub fn to_title_settings(&self) -> LaneTitleSettings {
        let (complete, apply_status) = match &self.regime {
            CompletionRegime::None => (None, None),
            CompletionRegime::StandardCompletion => (Some(true), None),
            CompletionRegime::NamedStatus(id) => (None, Some(id.clone())),
        };
        LaneTitleSettings {
            title: self.title.clone(),
            max_items: self.max_items,
            complete,
            apply_status,
            sorted: self.sorted.clone(),
        }
    }

    pub fn should_mark_items_complete(&self) -> bool {
        self.regime == CompletionRegime::StandardCompletion
    }

    pub fn should_apply_status(&self) -> Option<&str> {
        match &self.regime {
            CompletionRegime::NamedStatus(id) => Some(id),
            _ => None,
        }
    }
}

/// A column of cards.
#[derive(Debug, Clone)]
pub struct Lane {
    pub data: LaneData,
    /// The heading line followed by any blank lines before the first card
    pub header_lines: Vec<String>,
    pub items: Vec<Item>,
    /// Trailing blank lines after the last card
    pub trailing_lines: Vec<String>,
    /// Whether the heading must be regenerated from `data`
    pub dirty: bool,
}

impl Lane {
    pub fn new(data: LaneData) -> Self {
        Lane {
            data,
            header_lines: Vec::new(),
            items: Vec::new(),
            trailing_lines: vec![String::new()],
            dirty: true,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// More cards than the cap allows.
    pub fn is_over_capacity(&self) -> bool {
        self.data.max_items > 0 && self.items.len() > self.data.max_items
    }
}

/// A content node in the board file: a lane or literal text
#[derive(Debug, Clone)]
pub enum BoardNode {
    /// Front matter, settings blocks, stray text
    Literal(Vec<String>),
    Lane(Lane),
}

/// A parsed board file. Lane order is display order.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub nodes: Vec<BoardNode>,
    /// Whether the source ended with a line break
    pub trailing_newline: bool,
}

impl Board {
    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.nodes.iter().filter_map(|n| match n {
            BoardNode::Lane(lane) => Some(lane),
            BoardNode::Literal(_) => None,
        })
    }

    pub fn lanes_mut(&mut self) -> impl Iterator<Item = &mut Lane> {
        self.nodes.iter_mut().filter_map(|n| match n {
            BoardNode::Lane(lane) => Some(lane),
            BoardNode::Literal(_) => None,
        })
    }

    pub fn lane_count(&self) -> usize {
        self.lanes().count()
    }

    pub fn lane(&self, index: usize) -> Option<&Lane> {
        self.lanes().nth(index)
    }

    pub fn lane_mut(&mut self, index: usize) -> Option<&mut Lane> {
        self.lanes_mut().nth(index)
    }

    /// Resolve a lane by 0-based index or case-insensitive title.
    pub fn find_lane(&self, key: &str) -> Option<usize> {
        if let Ok(idx) = key.parse::<usize>()
            && idx < self.lane_count()
        {
            return Some(idx);
        }
        let key = key.trim().to_lowercase();
        self.lanes().position(|l| l.data.title.to_lowercase() == key)
    }

    /// Append a lane after the last existing lane.
    pub fn push_lane(&mut self, lane: Lane) {
        let pos = self
            .nodes
            .iter()
            .rposition(|n| matches!(n, BoardNode::Lane(_)))
            .map(|p| p + 1)
            .unwrap_or(self.nodes.len());
        self.nodes.insert(pos, BoardNode::Lane(lane));
    }
}
