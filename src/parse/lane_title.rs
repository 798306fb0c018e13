use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::parse::text::{replace_brs, replace_new_lines};

static SETTINGS_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*%\s*([^%]+)\s*%\s*$").expect("literal pattern"));
static STATUS_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"status:([^,\s]+)").expect("literal pattern"));
static SORT_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sort:([^,\s]+)").expect("literal pattern"));
static ITEM_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*\((\d+)\)$").expect("literal pattern"));

/// The status value that selects standard completion rather than a named status.
pub const COMPLETION_STATUS: &str = "completion";

/// Settings embedded in a lane heading, e.g. `Review (3) % status:wip %`.
///
/// Fields left as `None` were not present in the heading; callers treat that as
/// "no change" rather than "cleared".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LaneTitleSettings {
    pub title: String,
    /// 0 when the heading carries no `(N)` cap
    pub max_items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorted: Option<String>,
}

/// Parse a lane heading into its title and settings.
pub fn parse_lane_title(raw: &str) -> LaneTitleSettings {
    // Match on the single-line form so line breaks don't hide a trailing cap
    let mut line = replace_new_lines(&replace_brs(raw));
    let mut settings = LaneTitleSettings::default();

    if let Some(caps) = SETTINGS_BLOCK.captures(&line) {
        let block = &caps[1];

        // Only the first status directive counts
        if let Some(status) = STATUS_DIRECTIVE.captures(block) {
            if &status[1] == COMPLETION_STATUS {
                settings.complete = Some(true);
            } else {
                settings.apply_status = Some(status[1].to_string());
            }
        }
        if let Some(sort) = SORT_DIRECTIVE.captures(block) {
            settings.sorted = Some(sort[1].to_string());
        }

        line = SETTINGS_BLOCK.replace(&line, "").into_owned();
    }

    if let Some(caps) = ITEM_CAP.captures(&line)
        && let Ok(max_items) = caps[2].parse::<usize>()
    {
        settings.max_items = max_items;
        line = caps[1].to_string();
    }

    settings.title = replace_brs(&line);
    settings
}

/// Render settings back into heading text; the inverse of [`parse_lane_title`].
pub fn format_lane_title(settings: &LaneTitleSettings) -> String {
    let mut heading = replace_new_lines(&settings.title);

    if settings.max_items > 0 {
        heading.push_str(&format!(" ({})", settings.max_items));
    }

    let mut directives = Vec::new();
    if settings.complete == Some(true) {
        directives.push(format!("status:{}", COMPLETION_STATUS));
    } else if let Some(status) = &settings.apply_status {
        directives.push(format!("status:{}", status));
    }
    if let Some(sort) = &settings.sorted {
        directives.push(format!("sort:{}", sort));
    }
    if !directives.is_empty() {
        heading.push_str(&format!(" % {} %", directives.join(", ")));
    }

    heading
}
