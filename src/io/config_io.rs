use std::fs;
use std::path::Path;

use crate::io::project_io::{CONFIG_FILE, ProjectError, atomic_write};
use crate::model::config::ProjectConfig;
use crate::model::settings::StatusEmoji;

/// Read the project config, returning both the parsed config and the raw
/// toml_edit Document for round-trip-safe editing.
pub fn read_config(root: &Path) -> Result<(ProjectConfig, toml_edit::DocumentMut), ProjectError> {
    let config_path = root.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| ProjectError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: ProjectConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(root: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ProjectError> {
    let config_path = root.join(CONFIG_FILE);
    atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| ProjectError::WriteError {
        path: config_path,
        source: e,
    })?;
    Ok(())
}

/// Append a `[[status_emojis]]` entry.
pub fn add_status_emoji(doc: &mut toml_edit::DocumentMut, status: &StatusEmoji) {
    if !doc.contains_key("status_emojis") {
        doc["status_emojis"] = toml_edit::Item::ArrayOfTables(toml_edit::ArrayOfTables::new());
    }

    if let Some(statuses) = doc["status_emojis"].as_array_of_tables_mut() {
        let mut table = toml_edit::Table::new();
        table["id"] = toml_edit::value(&status.id);
        table["emoji"] = toml_edit::value(&status.emoji);
        table["name"] = toml_edit::value(&status.name);
        if status.is_completion {
            table["is_completion"] = toml_edit::value(true);
        }
        statuses.push(table);
    }
}

/// Remove every `[[status_emojis]]` entry with the given id.
/// Returns whether anything was removed.
pub fn remove_status_emoji(doc: &mut toml_edit::DocumentMut, id: &str) -> bool {
    let Some(statuses) = doc
        .get_mut("status_emojis")
        .and_then(|item| item.as_array_of_tables_mut())
    else {
        return false;
    };

    let mut removed = false;
    loop {
        let found = statuses
            .iter()
            .position(|table| table.get("id").and_then(|v| v.as_str()) == Some(id));
        let Some(idx) = found else {
            break;
        };
        statuses.remove(idx);
        removed = true;
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"# Board settings
[project]
name = "test"

[[boards]]
id = "work"
name = "Work"
file = "work.md"

# Lanes reference these by id
[[status_emojis]]
id = "wip"
emoji = "🚧"
name = "In Progress"
"#
    }

    #[test]
    fn test_round_trip_config() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        fs::write(&config_path, sample_config()).unwrap();

        let (config, doc) = read_config(tmp.path()).unwrap();
        assert_eq!(config.status_emojis.len(), 1);
        write_config(tmp.path(), &doc).unwrap();

        let written = fs::read_to_string(&config_path).unwrap();
        assert_eq!(written, sample_config());
    }

    #[test]
    fn test_add_status_emoji() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        add_status_emoji(
            &mut doc,
            &StatusEmoji {
                id: "shipped".into(),
                emoji: "🚀".into(),
                name: "Shipped".into(),
                is_completion: true,
            },
        );
        let result = doc.to_string();
        assert!(result.starts_with("# Board settings\n"));
        let config: ProjectConfig = toml::from_str(&result).unwrap();
        assert_eq!(config.status_emojis.len(), 2);
        assert_eq!(config.status_emojis[1].id, "shipped");
        assert!(config.status_emojis[1].is_completion);
    }

    #[test]
    fn test_add_first_status_emoji() {
        let mut doc: toml_edit::DocumentMut = "[project]\nname = \"x\"\n".parse().unwrap();
        add_status_emoji(&mut doc, &StatusEmoji::new_default());
        let config: ProjectConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.status_emojis[0].name, "In Progress");
    }

    #[test]
    fn test_remove_status_emoji() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        assert!(!remove_status_emoji(&mut doc, "nope"));
        assert!(remove_status_emoji(&mut doc, "wip"));
        let config: ProjectConfig = toml::from_str(&doc.to_string()).unwrap();
        assert!(config.status_emojis.is_empty());
        assert_eq!(config.boards.len(), 1);
    }

    #[test]
    fn test_remove_status_emoji_duplicates() {
        let source = format!(
            "{}\n[[status_emojis]]\nid = \"review\"\nemoji = \"👀\"\nname = \"Review\"\n\n[[status_emojis]]\nid = \"wip\"\nemoji = \"🔨\"\nname = \"Again\"\n",
            sample_config()
        );
        let mut doc: toml_edit::DocumentMut = source.parse().unwrap();
        assert!(remove_status_emoji(&mut doc, "wip"));
        let config: ProjectConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.status_emojis.len(), 1);
        assert_eq!(config.status_emojis[0].id, "review");
        assert!(!remove_status_emoji(&mut doc, "wip"));
    }

    #[test]
    fn test_unparseable_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[project]\nname = \n").unwrap();
        assert!(read_config(tmp.path()).is_err());
    }
}
