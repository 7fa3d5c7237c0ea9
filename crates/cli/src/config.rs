//! `AppConfig`: TOML file layered with `RFEED__SECTION__KEY` environment overrides
//!
//! `RFEED__WATCH__FEEDS` and `RFEED__WATCH__TAGS` take comma-separated lists.

use anyhow::{Context, Result, bail};
use rfeed_domain::TagSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub watch: WatchConfig,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// SQLite file holding the digests of delivered items
    pub state_db_path: PathBuf,
    pub log_level: String,
    pub dry_run: bool,
    /// Feeds fetched at the same time
    pub max_concurrent: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            state_db_path: PathBuf::from("./rfeed.sqlite"),
            log_level: "info".to_string(),
            dry_run: true,
            max_concurrent: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub poll_interval_secs: u64,
    pub feeds: Vec<String>,
    /// Wanted tags; an empty list keeps every entry
    pub tags: Vec<String>,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
            feeds: Vec::new(),
            tags: Vec::new(),
            fetch_timeout_secs: 30,
            user_agent: format!("rfeed/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl WatchConfig {
    pub fn tag_set(&self) -> TagSet {
        self.tags.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub enabled: bool,
    pub url: String,
    /// Environment variable holding the bearer token, if any
    pub token_env: String,
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            token_env: "RFEED_WEBHOOK_TOKEN".to_string(),
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load and validate the configuration.
    ///
    /// Without `config_path`, `./config.toml` is used when it exists and the
    /// built-in defaults otherwise. An explicit path that does not exist is an
    /// error.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
        let mut builder = config::Config::builder();

        match (path.exists(), config_path.is_some()) {
            (true, _) => builder = builder.add_source(config::File::from(path)),
            (false, true) => bail!("Config file not found: {}", path.display()),
            (false, false) => {}
        }

        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix("RFEED")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("watch.feeds")
                    .with_list_parse_key("watch.tags")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.general.max_concurrent == 0 {
            bail!("general.max_concurrent must be at least 1");
        }
        if self.watch.poll_interval_secs == 0 {
            bail!("watch.poll_interval_secs must be at least 1");
        }
        if let Some(feed) = self
            .watch
            .feeds
            .iter()
            .find(|f| !(f.starts_with("http://") || f.starts_with("https://")))
        {
            bail!("watch.feeds entry is not an http(s) URL: {}", feed);
        }
        if self.webhook.enabled && self.webhook.url.trim().is_empty() {
            bail!("webhook.enabled is set but webhook.url is empty");
        }
        Ok(())
    }

    /// Commented starting point written by `rfeed config init`
    pub fn example_toml() -> String {
        r#"# rfeed configuration

[general]
state_db_path = "./rfeed.sqlite"
log_level = "info"
# Log matches without delivering or recording them
dry_run = true
max_concurrent = 4

[watch]
poll_interval_secs = 300
feeds = ["https://example.com/feed.xml"]
# Only entries carrying at least one of these categories are delivered.
# Leave empty to deliver every entry.
tags = []
fetch_timeout_secs = 30
# user_agent = "rfeed/0.1.0"

[webhook]
enabled = false
url = "https://hooks.example.com/rfeed"
token_env = "RFEED_WEBHOOK_TOKEN"
timeout_secs = 30
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_example_toml_is_valid() {
        let config: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        config.validate().unwrap();
        assert!(config.general.dry_run);
        assert_eq!(config.watch.feeds, vec!["https://example.com/feed.xml"]);
        assert!(config.watch.tag_set().is_empty());
        assert!(!config.webhook.enabled);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config: AppConfig = toml::from_str("[watch]\ntags = [\"rust\", \"go\"]\n").unwrap();
        assert_eq!(config.general.max_concurrent, 4);
        assert_eq!(config.watch.poll_interval_secs, 300);
        assert_eq!(config.webhook.token_env, "RFEED_WEBHOOK_TOKEN");

        let tags = config.watch.tag_set();
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("rust"));
        assert!(!tags.contains("Rust"));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "[watch]\nfeeds = [\"https://example.com/rss\"]\ntags = [\"Test2\"]\n",
        );

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.watch.feeds, vec!["https://example.com/rss"]);
        assert!(config.watch.tag_set().contains("Test2"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/rfeed/config.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let dir = TempDir::new().unwrap();

        let path = write(&dir, "[watch]\nfeeds = [\"ftp://example.com/rss\"]\n");
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("ftp://example.com/rss"));

        let path = write(&dir, "[general]\nmax_concurrent = 0\n");
        assert!(AppConfig::load(Some(&path)).is_err());

        let path = write(&dir, "[webhook]\nenabled = true\n");
        assert!(AppConfig::load(Some(&path)).is_err());
    }
}
