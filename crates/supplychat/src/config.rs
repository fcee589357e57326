use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::pipeline::GENERIC_ERROR_TEXT;
use crate::render::sidebar::DEFAULT_LABEL_WIDTH;
use crate::session::DEFAULT_HISTORY_CAPACITY;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "SUPPLYCHAT_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub history: HistoryConfig,
    pub display: DisplayConfig,
    pub sample_questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    /// Agent calls time out server-side after 30s.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Sidebar entries longer than this are shortened with "...".
    pub sidebar_label_width: usize,
    pub chart_axis_label: String,
    /// Columns used for the longest bar in text charts.
    pub chart_width: usize,
    pub error_text: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 45,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            sidebar_label_width: DEFAULT_LABEL_WIDTH,
            chart_axis_label: "Total Order Value ($)".to_string(),
            chart_width: 40,
            error_text: GENERIC_ERROR_TEXT.to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            history: HistoryConfig::default(),
            display: DisplayConfig::default(),
            sample_questions: default_sample_questions(),
        }
    }
}

pub fn default_sample_questions() -> Vec<String> {
    [
        "Who are our top 10 customers by total order value?",
        "Based on our Product Quality Assurance standards, which products had the highest number of quality-related returns in the past year?",
        "What criteria do we use to qualify new suppliers based on our Supplier Selection policy?",
        "What are the required steps for handling obsolete inventory write-offs?",
        "What cyber security measures must be implemented to protect supply chain data according to our Data Security policy?",
    ]
    .iter()
    .map(|q| q.to_string())
    .collect()
}

impl DashboardConfig {
    /// Validate config values, returning errors for clearly broken configurations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api.base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must be an http(s) URL, got {}",
                base
            )));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.request_timeout_secs must be > 0".into()));
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid("history.capacity must be > 0".into()));
        }
        if self.display.sidebar_label_width == 0 {
            return Err(ConfigError::Invalid(
                "display.sidebar_label_width must be > 0".into(),
            ));
        }
        if self.display.chart_width == 0 {
            return Err(ConfigError::Invalid("display.chart_width must be > 0".into()));
        }
        Ok(())
    }

    /// Load config from a JSON file, falling back to defaults for missing fields.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config for a run.
    ///
    /// Search order:
    /// 1. `path`, when given (must exist)
    /// 2. `<config_dir>/supplychat/config.json`, when present
    /// 3. built-in defaults
    ///
    /// `SUPPLYCHAT_API_URL` then overrides the base URL.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    tracing::info!("Loading config from {:?}", path);
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            tracing::info!(url = %url, "API base URL from {}", API_URL_ENV);
            config.api.base_url = url;
            config.validate()?;
        }

        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("supplychat").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history.capacity, 10);
        assert_eq!(config.sample_questions.len(), 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            DashboardConfig::from_json(r#"{"api": {"base_url": "https://assist.example"}}"#)
                .unwrap();
        assert_eq!(config.api.base_url, "https://assist.example");
        assert_eq!(config.api.connect_timeout_secs, 10);
        assert_eq!(config.display.sidebar_label_width, 30);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(DashboardConfig::from_json(r#"{"history": {"capacity": 0}}"#).is_err());
        assert!(DashboardConfig::from_json(r#"{"api": {"base_url": "ftp://x"}}"#).is_err());
        assert!(DashboardConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = DashboardConfig::from_file(Path::new("/nonexistent/supplychat.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
