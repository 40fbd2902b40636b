use std::path::PathBuf;

use serde::Deserialize;
use shared::RepoSlug;

use crate::messages::CloseMessage;

/// Prefix the Actions runner puts in front of every workflow input.
pub const INPUT_PREFIX: &str = "INPUT_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Env(#[from] envy::Error),
    #[error("input {0} is required")]
    Missing(&'static str),
    #[error("input {name} did not parse to a valid integer: {value:?}")]
    NotAnInteger { name: &'static str, value: String },
    #[error("input {0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("input {name} did not parse to a boolean: {value:?}")]
    NotABoolean { name: &'static str, value: String },
    #[error("unknown action {0:?}, expected `close-sweep` or `activity-reaction`")]
    UnknownAction(String),
    #[error("GITHUB_REPOSITORY must look like owner/repo, got {0:?}")]
    InvalidRepository(String),
    #[error("GITHUB_EVENT_PATH is required to react to comment activity")]
    MissingEventPath,
}

// Inputs arrive as strings, empty when the workflow leaves them unset.
#[derive(Deserialize)]
struct Inputs {
    #[serde(default)]
    action: String,
    #[serde(rename = "repo-token", default)]
    repo_token: String,
    #[serde(rename = "issue-label", default)]
    issue_label: String,
    #[serde(rename = "close-message", default)]
    close_message: String,
    #[serde(rename = "operations-per-run", default)]
    operations_per_run: String,
    #[serde(rename = "days-before-close", default)]
    days_before_close: String,
    #[serde(rename = "dry-run", default)]
    dry_run: String,
}

#[derive(Deserialize)]
struct Runner {
    github_repository: String,
    github_event_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionMode {
    CloseSweep,
    ActivityReaction { event_path: PathBuf },
}

#[derive(Clone)]
pub struct Config {
    pub mode: ActionMode,
    pub repo_token: String,
    pub issue_label: String,
    pub close_message: Option<CloseMessage>,
    pub operations_per_run: u32,
    pub days_before_close: u32,
    pub dry_run: bool,
    pub repository: RepoSlug,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_iter(std::env::vars())
    }

    pub fn from_iter<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars = vars.into_iter().collect::<Vec<_>>();
        let inputs: Inputs = envy::prefixed(INPUT_PREFIX).from_iter(vars.clone())?;
        let runner: Runner = envy::from_iter(vars)?;

        let repository = RepoSlug::parse(&runner.github_repository)
            .ok_or_else(|| ConfigError::InvalidRepository(runner.github_repository.clone()))?;

        let mode = match inputs.action.trim() {
            "close" | "close-sweep" => ActionMode::CloseSweep,
            "" | "activity" | "activity-reaction" => ActionMode::ActivityReaction {
                event_path: runner
                    .github_event_path
                    .filter(|path| !path.as_os_str().is_empty())
                    .ok_or(ConfigError::MissingEventPath)?,
            },
            other => return Err(ConfigError::UnknownAction(other.to_string())),
        };

        Ok(Self {
            mode,
            repo_token: required("repo-token", inputs.repo_token)?,
            issue_label: required("issue-label", inputs.issue_label)?,
            close_message: CloseMessage::new(inputs.close_message),
            operations_per_run: positive_number("operations-per-run", &inputs.operations_per_run)?,
            days_before_close: positive_number("days-before-close", &inputs.days_before_close)?,
            dry_run: boolean("dry-run", &inputs.dry_run)?,
            repository,
        })
    }
}

fn required(name: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Missing(name));
    }
    Ok(trimmed.to_string())
}

fn positive_number(name: &'static str, value: &str) -> Result<u32, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Missing(name));
    }
    let number = value
        .parse::<u32>()
        .map_err(|_| ConfigError::NotAnInteger {
            name,
            value: value.to_string(),
        })?;
    if number == 0 {
        return Err(ConfigError::NotPositive(name));
    }
    Ok(number)
}

fn boolean(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" => Ok(false),
        "true" => Ok(true),
        _ => Err(ConfigError::NotABoolean {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(extra: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut vars = vec![
            ("INPUT_ACTION", "close"),
            ("INPUT_REPO-TOKEN", "ghp_token"),
            ("INPUT_ISSUE-LABEL", "stale"),
            ("INPUT_CLOSE-MESSAGE", ""),
            ("INPUT_OPERATIONS-PER-RUN", "30"),
            ("INPUT_DAYS-BEFORE-CLOSE", "7"),
            ("GITHUB_REPOSITORY", "octo-org/octo-repo"),
            ("GITHUB_EVENT_PATH", "/github/workflow/event.json"),
        ];
        vars.retain(|(key, _)| !extra.iter().any(|(k, _)| k == key));
        vars.extend_from_slice(extra);
        vars.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_close_sweep() {
        let config = Config::from_iter(vars(&[])).unwrap();
        assert_eq!(config.mode, ActionMode::CloseSweep);
        assert_eq!(config.repo_token, "ghp_token");
        assert_eq!(config.issue_label, "stale");
        assert!(config.close_message.is_none());
        assert_eq!(config.operations_per_run, 30);
        assert_eq!(config.days_before_close, 7);
        assert!(!config.dry_run);
        assert_eq!(config.repository, RepoSlug::new("octo-org", "octo-repo"));
    }

    #[test]
    fn parse_activity_reaction() {
        let config = Config::from_iter(vars(&[
            ("INPUT_ACTION", "activity-reaction"),
            ("INPUT_CLOSE-MESSAGE", "Bye"),
            ("INPUT_DRY-RUN", "true"),
        ]))
        .unwrap();
        assert_eq!(
            config.mode,
            ActionMode::ActivityReaction {
                event_path: PathBuf::from("/github/workflow/event.json")
            }
        );
        assert!(config.close_message.is_some());
        assert!(config.dry_run);
    }

    #[test]
    fn reaction_needs_event_path() {
        let mut vars = vars(&[("INPUT_ACTION", "activity")]);
        vars.retain(|(key, _)| key != "GITHUB_EVENT_PATH");
        assert!(matches!(
            Config::from_iter(vars),
            Err(ConfigError::MissingEventPath)
        ));
    }

    #[test]
    fn reject_non_integer_threshold() {
        let result = Config::from_iter(vars(&[("INPUT_DAYS-BEFORE-CLOSE", "a week")]));
        assert!(matches!(
            result,
            Err(ConfigError::NotAnInteger {
                name: "days-before-close",
                ..
            })
        ));
    }

    #[test]
    fn reject_zero_ceiling() {
        let result = Config::from_iter(vars(&[("INPUT_OPERATIONS-PER-RUN", "0")]));
        assert!(matches!(
            result,
            Err(ConfigError::NotPositive("operations-per-run"))
        ));
    }

    #[test]
    fn reject_missing_token() {
        let result = Config::from_iter(vars(&[("INPUT_REPO-TOKEN", "")]));
        assert!(matches!(result, Err(ConfigError::Missing("repo-token"))));
    }

    #[test]
    fn reject_unknown_action() {
        let result = Config::from_iter(vars(&[("INPUT_ACTION", "lock")]));
        assert!(matches!(result, Err(ConfigError::UnknownAction(_))));
    }

    #[test]
    fn reject_bad_repository() {
        let result = Config::from_iter(vars(&[("GITHUB_REPOSITORY", "just-a-name")]));
        assert!(matches!(result, Err(ConfigError::InvalidRepository(_))));
    }
}
