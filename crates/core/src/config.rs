use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::organisation::promotion::{PromotionGate, PromotionPolicy};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub top_executive: TopExecutiveConfig,
    pub promotion: PromotionPolicy,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopExecutiveConfig {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub start_date: NaiveDate,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub top_executive_id: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            top_executive: TopExecutiveConfig {
                id: 100,
                first_name: "Chief".to_string(),
                last_name: "Executive".to_string(),
                start_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN),
            },
            promotion: PromotionPolicy::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("roster.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(top_executive) = patch.top_executive {
            if let Some(id) = top_executive.id {
                self.top_executive.id = id;
            }
            if let Some(first_name) = top_executive.first_name {
                self.top_executive.first_name = first_name;
            }
            if let Some(last_name) = top_executive.last_name {
                self.top_executive.last_name = last_name;
            }
            if let Some(start_date) = top_executive.start_date {
                self.top_executive.start_date = start_date;
            }
        }

        if let Some(promotion) = patch.promotion {
            if let Some(director) = promotion.director {
                apply_gate_patch(&mut self.promotion.director, director);
            }
            if let Some(vice_president) = promotion.vice_president {
                apply_gate_patch(&mut self.promotion.vice_president, vice_president);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ROSTER_TOP_EXECUTIVE_ID") {
            self.top_executive.id = parse_u64("ROSTER_TOP_EXECUTIVE_ID", &value)?;
        }
        if let Some(value) = read_env("ROSTER_TOP_EXECUTIVE_FIRST_NAME") {
            self.top_executive.first_name = value;
        }
        if let Some(value) = read_env("ROSTER_TOP_EXECUTIVE_LAST_NAME") {
            self.top_executive.last_name = value;
        }
        if let Some(value) = read_env("ROSTER_TOP_EXECUTIVE_START_DATE") {
            self.top_executive.start_date = parse_date("ROSTER_TOP_EXECUTIVE_START_DATE", &value)?;
        }

        if let Some(value) = read_env("ROSTER_PROMOTION_DIRECTOR_MIN_SUBORDINATE_MANAGERS") {
            self.promotion.director.min_subordinate_managers =
                parse_usize("ROSTER_PROMOTION_DIRECTOR_MIN_SUBORDINATE_MANAGERS", &value)?;
        }
        if let Some(value) = read_env("ROSTER_PROMOTION_DIRECTOR_MIN_TEAM_MEMBERS") {
            self.promotion.director.min_team_members =
                parse_usize("ROSTER_PROMOTION_DIRECTOR_MIN_TEAM_MEMBERS", &value)?;
        }
        if let Some(value) = read_env("ROSTER_PROMOTION_VICE_PRESIDENT_MIN_SUBORDINATE_MANAGERS") {
            self.promotion.vice_president.min_subordinate_managers =
                parse_usize("ROSTER_PROMOTION_VICE_PRESIDENT_MIN_SUBORDINATE_MANAGERS", &value)?;
        }
        if let Some(value) = read_env("ROSTER_PROMOTION_VICE_PRESIDENT_MIN_TEAM_MEMBERS") {
            self.promotion.vice_president.min_team_members =
                parse_usize("ROSTER_PROMOTION_VICE_PRESIDENT_MIN_TEAM_MEMBERS", &value)?;
        }

        let log_level = read_env("ROSTER_LOGGING_LEVEL").or_else(|| read_env("ROSTER_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("ROSTER_LOGGING_FORMAT").or_else(|| read_env("ROSTER_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(top_executive_id) = overrides.top_executive_id {
            self.top_executive.id = top_executive_id;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_top_executive(&self.top_executive)?;
        validate_promotion(&self.promotion)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn apply_gate_patch(gate: &mut PromotionGate, patch: GatePatch) {
    if let Some(min_subordinate_managers) = patch.min_subordinate_managers {
        gate.min_subordinate_managers = min_subordinate_managers;
    }
    if let Some(min_team_members) = patch.min_team_members {
        gate.min_team_members = min_team_members;
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("roster.toml"), PathBuf::from("config/roster.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_top_executive(top_executive: &TopExecutiveConfig) -> Result<(), ConfigError> {
    if top_executive.first_name.trim().is_empty() || top_executive.last_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "top_executive.first_name and top_executive.last_name are required".to_string(),
        ));
    }

    Ok(())
}

fn validate_promotion(promotion: &PromotionPolicy) -> Result<(), ConfigError> {
    for (name, gate) in
        [("promotion.director", &promotion.director), ("promotion.vice_president", &promotion.vice_president)]
    {
        if gate.min_subordinate_managers == 0 {
            return Err(ConfigError::Validation(format!(
                "{name}.min_subordinate_managers must be greater than zero"
            )));
        }
    }

    if promotion.vice_president.min_subordinate_managers < promotion.director.min_subordinate_managers
        || promotion.vice_president.min_team_members < promotion.director.min_team_members
    {
        return Err(ConfigError::Validation(
            "promotion.vice_president thresholds must not be lower than promotion.director"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    top_executive: Option<TopExecutivePatch>,
    promotion: Option<PromotionPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct TopExecutivePatch {
    id: Option<u64>,
    first_name: Option<String>,
    last_name: Option<String>,
    start_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
struct PromotionPatch {
    director: Option<GatePatch>,
    vice_president: Option<GatePatch>,
}

#[derive(Debug, Default, Deserialize)]
struct GatePatch {
    min_subordinate_managers: Option<usize>,
    min_team_members: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
