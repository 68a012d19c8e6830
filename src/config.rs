//! Configuration management for reminder-assistant.
//!
//! Loads config from YAML files in standard locations; every section
//! has working defaults so the assistant runs with no config at all.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "reminders.json".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// Capture attempts before an utterance is given up as empty.
    pub retries: u32,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self { retries: 3 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Attempts to hear a repeat cadence before defaulting to "once".
    pub repeat_attempts: u32,
    /// Attempts to hear a clear yes/no when confirming an add.
    pub confirm_attempts: u32,
    /// Consecutive silent date/time prompts before abandoning the add.
    pub silence_limit: u32,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            repeat_attempts: 3,
            confirm_attempts: 3,
            silence_limit: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub listen: ListenConfig,
    pub dialogue: DialogueConfig,
}

impl Config {
    /// Load configuration from YAML file.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./config.yaml
    /// 2. ~/.config/reminder-assistant/config.yaml
    /// 3. /etc/reminder-assistant/config.yaml
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path.map(PathBuf::from).or_else(|| {
            let candidates = [
                std::env::current_dir().ok().map(|d| d.join("config.yaml")),
                dirs::home_dir().map(|h| h.join(".config/reminder-assistant/config.yaml")),
                Some(PathBuf::from("/etc/reminder-assistant/config.yaml")),
            ];
            candidates.into_iter().flatten().find(|p| p.exists())
        });

        let Some(config_path) = resolved else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match serde_yml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", config_path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}, using defaults", config_path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.store.path, PathBuf::from("reminders.json"));
        assert_eq!(config.listen.retries, 3);
        assert_eq!(config.dialogue.repeat_attempts, 3);
        assert_eq!(config.dialogue.confirm_attempts, 3);
        assert_eq!(config.dialogue.silence_limit, 3);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = "store:\n  path: /tmp/mine.json\ndialogue:\n  confirm_attempts: 5\n";
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/tmp/mine.json"));
        assert_eq!(config.dialogue.confirm_attempts, 5);
        assert_eq!(config.dialogue.repeat_attempts, 3);
        assert_eq!(config.listen.retries, 3);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/config.yaml")));
        assert_eq!(config.listen.retries, 3);
    }
}
