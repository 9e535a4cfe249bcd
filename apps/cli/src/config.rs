//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/upwatch/cli.toml`
//! - Windows: `%APPDATA%/upwatch/cli.toml`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use upwatch_protocol::ChannelKind;
use upwatch_protocol::constants::DEFAULT_FILE_FIELD;

/// CLI configuration. Every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Location of the upload page.
    #[serde(default = "default_page_url")]
    pub page_url: String,

    /// Form field the files are posted under.
    #[serde(default = "default_file_field")]
    pub file_field: String,

    /// Extra text fields posted with every upload.
    #[serde(default)]
    pub extra_fields: BTreeMap<String, String>,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Push channel transport.
    #[serde(default)]
    pub channel_kind: ChannelKind,

    /// How long to keep listening after the upload request finished.
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
}

fn default_page_url() -> String {
    "http://localhost:8080/".into()
}

fn default_file_field() -> String {
    DEFAULT_FILE_FIELD.into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_drain_timeout_ms() -> u64 {
    2000
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            page_url: default_page_url(),
            file_field: default_file_field(),
            extra_fields: BTreeMap::new(),
            log_level: default_log_level(),
            channel_kind: ChannelKind::default(),
            drain_timeout_ms: default_drain_timeout_ms(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from the default location, creating it with
    /// defaults if missing.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Loads configuration from `path`, creating it with defaults if
    /// missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: CliConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = CliConfig::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("upwatch")
            .join("cli.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("upwatch").join("cli.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/upwatch/cli.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = CliConfig::default();
        assert_eq!(config.page_url, "http://localhost:8080/");
        assert_eq!(config.file_field, "upload");
        assert!(config.extra_fields.is_empty());
        assert_eq!(config.channel_kind, ChannelKind::WebSocket);
        assert_eq!(config.drain_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn config_roundtrip_toml() {
        let mut config = CliConfig {
            page_url: "https://files.example.com/upload/".into(),
            channel_kind: ChannelKind::EventStream,
            ..CliConfig::default()
        };
        config.extra_fields.insert("album".into(), "holiday".into());

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: CliConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.page_url, "https://files.example.com/upload/");
        assert_eq!(parsed.channel_kind, ChannelKind::EventStream);
        assert_eq!(parsed.extra_fields["album"], "holiday");
    }

    #[test]
    fn config_partial_toml() {
        let config: CliConfig = toml::from_str(r#"channel_kind = "web_socket""#).unwrap();
        assert_eq!(config.page_url, "http://localhost:8080/");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cli.toml");

        let config = CliConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.file_field, "upload");

        std::fs::write(&path, "page_url = \"http://other:9000/\"\n").unwrap();
        let reloaded = CliConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.page_url, "http://other:9000/");
    }

    #[test]
    fn config_path_not_empty() {
        let path = config_path().unwrap();
        assert!(path.ends_with("cli.toml"));
    }
}
