//! Environment configuration and persisted local settings.

use crate::normalize::JsonPolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";
pub const DEFAULT_SETTINGS_PATH: &str = ".medcopy/settings.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiProvider {
    #[default]
    Gemini,
    OpenAi,
}

impl AiProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Gemini => DEFAULT_GEMINI_MODEL,
            AiProvider::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }
}

impl FromStr for AiProvider {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(AiProvider::Gemini),
            "openai" => Ok(AiProvider::OpenAi),
            other => Err(Error::Config(format!(
                "Unknown AI_PROVIDER `{}` (expected gemini or openai)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: AiProvider,
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub request_timeout: Option<Duration>,
    pub json_policy: JsonPolicy,
    pub apps_script_url: Option<String>,
    pub sheets_access_token: Option<String>,
    pub client_id: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub settings_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let provider = match get("AI_PROVIDER") {
            Some(value) => value.parse()?,
            None => AiProvider::default(),
        };

        let api_key = match provider {
            AiProvider::Gemini => get("GEMINI_API_KEY")
                .or_else(|| get("API_KEY"))
                .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))?,
            AiProvider::OpenAi => get("OPENAI_API_KEY")
                .ok_or_else(|| Error::Config("OPENAI_API_KEY not set".to_string()))?,
        };

        let base_url = match provider {
            AiProvider::Gemini => get("GEMINI_BASE_URL"),
            AiProvider::OpenAi => get("OPENAI_BASE_URL"),
        };

        let request_timeout = match get("MEDCOPY_REQUEST_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| {
                    Error::Config(format!(
                        "MEDCOPY_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got `{}`",
                        value
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let json_policy = if get("MEDCOPY_LENIENT_JSON").is_some_and(|value| is_truthy(&value)) {
            JsonPolicy::Lenient
        } else {
            JsonPolicy::Strict
        };

        Ok(Self {
            provider,
            api_key,
            model: get("MEDCOPY_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            base_url,
            request_timeout,
            json_policy,
            apps_script_url: get("GOOGLE_APPS_SCRIPT_URL"),
            sheets_access_token: get("GOOGLE_SHEETS_ACCESS_TOKEN"),
            client_id: get("GOOGLE_CLIENT_ID"),
            spreadsheet_id: get("GOOGLE_SPREADSHEET_ID"),
            settings_path: get("MEDCOPY_SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH)),
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Spreadsheet connection details remembered between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSettings {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub spreadsheet_id: String,
}

impl LocalSettings {
    /// A missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!("Saved local settings to {}", path.display());
        Ok(())
    }

    /// Fill empty values from the environment. Stored values win.
    pub fn with_fallbacks(mut self, config: &Config) -> Self {
        if self.client_id.trim().is_empty() {
            self.client_id = config.client_id.clone().unwrap_or_default();
        }
        if self.spreadsheet_id.trim().is_empty() {
            self.spreadsheet_id = config.spreadsheet_id.clone().unwrap_or_default();
        }
        self
    }

    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.spreadsheet_id.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_to_gemini_with_default_model() {
        let config = config_from(&[("GEMINI_API_KEY", "g-key")]).unwrap();

        assert_eq!(config.provider, AiProvider::Gemini);
        assert_eq!(config.api_key, "g-key");
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.json_policy, JsonPolicy::Strict);
        assert_eq!(config.settings_path, PathBuf::from(DEFAULT_SETTINGS_PATH));
    }

    #[test]
    fn test_gemini_key_falls_back_to_api_key() {
        let config = config_from(&[("API_KEY", "legacy")]).unwrap();
        assert_eq!(config.api_key, "legacy");
    }

    #[test]
    fn test_missing_key_is_a_config_error() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = config_from(&[("AI_PROVIDER", "openai"), ("GEMINI_API_KEY", "g")]).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_openai_provider_and_overrides() {
        let config = config_from(&[
            ("AI_PROVIDER", "OpenAI"),
            ("OPENAI_API_KEY", "o-key"),
            ("OPENAI_BASE_URL", "http://localhost:9000"),
            ("MEDCOPY_REQUEST_TIMEOUT_SECS", "45"),
            ("MEDCOPY_LENIENT_JSON", "true"),
        ])
        .unwrap();

        assert_eq!(config.provider, AiProvider::OpenAi);
        assert_eq!(config.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(45)));
        assert_eq!(config.json_policy, JsonPolicy::Lenient);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = config_from(&[("AI_PROVIDER", "claude"), ("GEMINI_API_KEY", "g")]).unwrap_err();
        assert!(err.to_string().contains("claude"));

        let err = config_from(&[
            ("GEMINI_API_KEY", "g"),
            ("MEDCOPY_REQUEST_TIMEOUT_SECS", "soon"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = config_from(&[("GEMINI_API_KEY", "g"), ("GOOGLE_APPS_SCRIPT_URL", "  ")]).unwrap();
        assert_eq!(config.apps_script_url, None);
    }

    #[test]
    fn test_settings_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        assert_eq!(LocalSettings::load(&path).unwrap(), LocalSettings::default());

        let settings = LocalSettings {
            client_id: "client.apps.googleusercontent.com".to_string(),
            spreadsheet_id: "sheet-123".to_string(),
        };
        settings.save(&path).unwrap();

        let loaded = LocalSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert!(loaded.is_complete());
        assert!(fs::read_to_string(&path).unwrap().contains("spreadsheetId"));
    }

    #[test]
    fn test_stored_settings_take_priority_over_env() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "g"),
            ("GOOGLE_CLIENT_ID", "env-client"),
            ("GOOGLE_SPREADSHEET_ID", "env-sheet"),
        ])
        .unwrap();

        let stored = LocalSettings {
            client_id: String::new(),
            spreadsheet_id: "file-sheet".to_string(),
        }
        .with_fallbacks(&config);

        assert_eq!(stored.client_id, "env-client");
        assert_eq!(stored.spreadsheet_id, "file-sheet");
    }
}
