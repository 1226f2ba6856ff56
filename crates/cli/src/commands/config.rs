use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use roster_core::config::AppConfig;
use toml::Value;

use crate::commands::CommandResult;

pub fn run(config: &AppConfig) -> CommandResult {
    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let top = &config.top_executive;
    let director = &config.promotion.director;
    let vice_president = &config.promotion.vice_president;

    let lines = [
        "effective config (source precedence: env > file > default):".to_string(),
        render_line(
            "top_executive.id",
            &top.id.to_string(),
            source("top_executive.id", &["ROSTER_TOP_EXECUTIVE_ID"]),
        ),
        render_line(
            "top_executive.first_name",
            &top.first_name,
            source("top_executive.first_name", &["ROSTER_TOP_EXECUTIVE_FIRST_NAME"]),
        ),
        render_line(
            "top_executive.last_name",
            &top.last_name,
            source("top_executive.last_name", &["ROSTER_TOP_EXECUTIVE_LAST_NAME"]),
        ),
        render_line(
            "top_executive.start_date",
            &top.start_date.to_string(),
            source("top_executive.start_date", &["ROSTER_TOP_EXECUTIVE_START_DATE"]),
        ),
        render_line(
            "promotion.director.min_subordinate_managers",
            &director.min_subordinate_managers.to_string(),
            source(
                "promotion.director.min_subordinate_managers",
                &["ROSTER_PROMOTION_DIRECTOR_MIN_SUBORDINATE_MANAGERS"],
            ),
        ),
        render_line(
            "promotion.director.min_team_members",
            &director.min_team_members.to_string(),
            source(
                "promotion.director.min_team_members",
                &["ROSTER_PROMOTION_DIRECTOR_MIN_TEAM_MEMBERS"],
            ),
        ),
        render_line(
            "promotion.vice_president.min_subordinate_managers",
            &vice_president.min_subordinate_managers.to_string(),
            source(
                "promotion.vice_president.min_subordinate_managers",
                &["ROSTER_PROMOTION_VICE_PRESIDENT_MIN_SUBORDINATE_MANAGERS"],
            ),
        ),
        render_line(
            "promotion.vice_president.min_team_members",
            &vice_president.min_team_members.to_string(),
            source(
                "promotion.vice_president.min_team_members",
                &["ROSTER_PROMOTION_VICE_PRESIDENT_MIN_TEAM_MEMBERS"],
            ),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &["ROSTER_LOGGING_LEVEL", "ROSTER_LOG_LEVEL"]),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format),
            source("logging.format", &["ROSTER_LOGGING_FORMAT", "ROSTER_LOG_FORMAT"]),
        ),
    ];

    CommandResult::text(lines.join("\n"))
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("roster.toml"), PathBuf::from("config/roster.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let set_env = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = set_env {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn nested_keys_are_found_in_the_file_document() {
        let doc: Value = "[promotion.director]\nmin_team_members = 25\n".parse().expect("toml");

        assert!(contains_path(&doc, "promotion.director.min_team_members"));
        assert!(!contains_path(&doc, "promotion.vice_president.min_team_members"));
        assert_eq!(
            field_source(
                "promotion.director.min_team_members",
                &["ROSTER_TEST_UNSET_KEY"],
                Some(&doc),
                None
            ),
            "file (config file)"
        );
    }

    #[test]
    fn unset_keys_fall_back_to_default() {
        assert_eq!(field_source("logging.level", &["ROSTER_TEST_UNSET_KEY"], None, None), "default");
    }
}
