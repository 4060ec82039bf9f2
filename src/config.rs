use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feddit: FedditConfig,
    pub gemini: GeminiConfig,
    pub web: WebConfig,
    pub monitor: MonitorConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FedditConfig {
    pub base_url: String,
    /// How many subfeddits are fetched when resolving a title.
    pub subfeddit_page_size: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
    pub batch_size: usize,
    pub request_timeout_secs: u64,
    // Loaded from env
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    pub comment_limit: u32,
}

impl Default for FedditConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            subfeddit_page_size: 10,
            request_timeout_secs: 10,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            batch_size: 5,
            request_timeout_secs: 30,
            api_key: String::new(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 60,
            comment_limit: 25,
        }
    }
}

impl AppConfig {
    /// Reads `.env`, then the optional `config.toml`, then the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = Path::new("config.toml");
        let config_text = if path.exists() {
            Some(std::fs::read_to_string(path).context("Failed to read config.toml")?)
        } else {
            None
        };

        Self::from_sources(config_text.as_deref(), |key| std::env::var(key).ok())
    }

    pub fn from_sources(config_text: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config: AppConfig = match config_text {
            Some(text) => toml::from_str(text).context("Failed to parse config.toml")?,
            None => AppConfig::default(),
        };

        config.gemini.api_key = env("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("GEMINI_API_KEY not set")?;

        if let Some(model) = env("GEMINI_MODEL") {
            config.gemini.model = model;
        }
        if let Some(url) = env("FEDDIT_API_URL") {
            config.feddit.base_url = url;
        }
        if let Some(port) = env("HTTP_PORT") {
            config.web.port = port.parse().context("HTTP_PORT must be a port number")?;
        }
        if let Some(size) = env("CLASSIFY_BATCH_SIZE") {
            config.gemini.batch_size = size
                .parse()
                .context("CLASSIFY_BATCH_SIZE must be an integer")?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.gemini.batch_size == 0 {
            anyhow::bail!("batch_size must be at least 1");
        }
        if self.feddit.subfeddit_page_size == 0 {
            anyhow::bail!("subfeddit_page_size must be at least 1");
        }
        if !(1..=100).contains(&self.monitor.comment_limit) {
            anyhow::bail!("monitor.comment_limit must be between 1 and 100");
        }
        if self.monitor.enabled && self.monitor.interval_secs == 0 {
            anyhow::bail!("monitor.interval_secs must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_file() {
        let config = AppConfig::from_sources(None, env(&[("GEMINI_API_KEY", "secret")])).unwrap();
        assert_eq!(config.gemini.api_key, "secret");
        assert_eq!(config.web.port, 8000);
        assert_eq!(config.feddit.base_url, "http://localhost:8080");
        assert_eq!(config.gemini.batch_size, 5);
        assert!(!config.monitor.enabled);
    }

    #[test]
    fn api_key_is_required() {
        let err = AppConfig::from_sources(None, env(&[])).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert!(AppConfig::from_sources(None, env(&[("GEMINI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        let text = r#"
            [feddit]
            base_url = "http://feddit:8080"

            [gemini]
            batch_size = 8

            [web]
            port = 9000

            [monitor]
            enabled = true
            interval_secs = 120
        "#;
        let config = AppConfig::from_sources(
            Some(text),
            env(&[("GEMINI_API_KEY", "k"), ("HTTP_PORT", "8081"), ("CLASSIFY_BATCH_SIZE", "3")]),
        )
        .unwrap();

        assert_eq!(config.feddit.base_url, "http://feddit:8080");
        assert_eq!(config.feddit.subfeddit_page_size, 10);
        assert_eq!(config.web.port, 8081);
        assert_eq!(config.gemini.batch_size, 3);
        assert!(config.monitor.enabled);
        assert_eq!(config.monitor.interval_secs, 120);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(AppConfig::from_sources(
            None,
            env(&[("GEMINI_API_KEY", "k"), ("CLASSIFY_BATCH_SIZE", "0")])
        )
        .is_err());
        assert!(AppConfig::from_sources(None, env(&[("GEMINI_API_KEY", "k"), ("HTTP_PORT", "http")])).is_err());
        assert!(AppConfig::from_sources(Some("[monitor]\ncomment_limit = 500"), env(&[("GEMINI_API_KEY", "k")])).is_err());
    }
}
