use serde::{Deserialize, Serialize};

/// A named status a lane can stamp onto its cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEmoji {
    pub id: String,
    pub emoji: String,
    pub name: String,
    /// Counts as done for move reconciliation
    #[serde(default)]
    pub is_completion: bool,
}

impl StatusEmoji {
    /// A fresh "In Progress" status with a random 9-character id.
    pub fn new_default() -> Self {
        StatusEmoji {
            id: generate_instance_id(9),
            emoji: "\u{1f6a7}".to_string(),
            name: "In Progress".to_string(),
            is_completion: false,
        }
    }
}

/// Look up a status by id.
pub fn find_status<'a>(statuses: &'a [StatusEmoji], id: &str) -> Option<&'a StatusEmoji> {
    statuses.iter().find(|s| s.id == id)
}

/// Random lowercase alphanumeric id of `len` characters (at most 32).
pub fn generate_instance_id(len: usize) -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(len);
    id
}

/// Styling rule keyed by tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagColor {
    pub tag_key: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub background_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hours,
    #[default]
    Days,
    Weeks,
    Months,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Before,
    #[default]
    After,
}

/// Styling rule keyed by how a date relates to now.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateColor {
    #[serde(default)]
    pub is_today: bool,
    #[serde(default)]
    pub is_before: bool,
    #[serde(default)]
    pub is_after: bool,
    #[serde(default)]
    pub distance: u32,
    #[serde(default)]
    pub unit: TimeUnit,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub background_color: String,
}
