//! Configuration: `~/.roadbook/config.json`.
//!
//! Holds the data-source endpoint, the enrichment credentials, the refresh
//! interval, and the two client-local display flags (temperature unit, dark
//! theme). Widgets whose credential is absent report `NotConfigured` and
//! render alone — a missing key never blocks the rest of the dashboard.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::TempUnit;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub weather_api_key: Option<String>,
    #[serde(default)]
    pub flight_api_key: Option<String>,
    #[serde(default)]
    pub photo_api_key: Option<String>,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// Interval-based widget refresh, minutes. 0 disables the poller.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_minutes: u64,
    #[serde(default)]
    pub temp_unit: TempUnit,
    #[serde(default)]
    pub dark_theme: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushConfig {
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub rest_api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_assistant_model")]
    pub model: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: default_assistant_endpoint(),
            api_key: None,
            model: default_assistant_model(),
        }
    }
}

fn default_refresh_interval() -> u64 {
    5
}

fn default_assistant_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_assistant_model() -> String {
    "gpt-4".to_string()
}

/// Get the state directory (~/.roadbook), creating it if needed.
pub fn state_dir() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    let dir = home.join(".roadbook");
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create state dir: {}", e))?;
    }
    Ok(dir)
}

/// Canonical config file path (~/.roadbook/config.json).
pub fn config_path() -> Result<PathBuf, String> {
    Ok(state_dir()?.join("config.json"))
}

/// Load configuration from disk.
pub fn load_config() -> Result<Config, String> {
    let path = config_path()?;
    if !path.exists() {
        return Err(format!(
            "Config file not found at {}. Create it with: {{ \"source\": {{ \"url\": \"https://...\" }} }}",
            path.display()
        ));
    }
    let content =
        fs::read_to_string(&path).map_err(|e| format!("Failed to read config: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Create or update config.json atomically against the in-memory copy.
///
/// If no config exists yet, starts from serde defaults, applies the mutator,
/// then writes and updates in-memory state.
pub fn create_or_update_config(
    state: &crate::state::AppState,
    mutator: impl FnOnce(&mut Config),
) -> Result<Config, String> {
    let mut guard = state.config.write();

    let mut config = guard.clone().unwrap_or_default();
    mutator(&mut config);

    let path = config_path()?;
    let content = serde_json::to_string_pretty(&config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;

    *guard = Some(config.clone());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_survive_an_empty_document() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.refresh_interval_minutes, 5);
        assert_eq!(config.temp_unit, TempUnit::Metric);
        assert!(!config.dark_theme);
        assert!(config.weather_api_key.is_none());
        assert_eq!(config.assistant.model, "gpt-4");
    }

    #[test]
    fn partial_documents_keep_unrelated_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"weatherApiKey":"k","tempUnit":"imperial","refreshIntervalMinutes":10}"#,
        )
        .unwrap();
        assert_eq!(config.weather_api_key.as_deref(), Some("k"));
        assert_eq!(config.temp_unit, TempUnit::Imperial);
        assert_eq!(config.refresh_interval_minutes, 10);
        assert!(config.push.app_id.is_none());
    }
}
