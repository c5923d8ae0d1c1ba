//! Application configuration

use crate::core::{CatalogSource, DispatcherConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use userguide_core::DEFAULT_PANEL_ID;
use userguide_types::{ButtonConfig, ContentItem, OverlayMode, Surface};

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    /// Namespace of the panel and its buttons. Change it when running
    /// several copies against one endpoint.
    #[serde(default = "default_panel_id")]
    pub panel_id: String,
    /// Panel launcher appearance
    #[serde(default)]
    pub button: ButtonConfig,
    /// Inline catalog, used when no content server is set
    #[serde(default = "default_content")]
    pub content: Vec<ContentItem>,
    /// URL of a JSON catalog; takes precedence over `content`
    #[serde(default)]
    pub content_server: Option<String>,
    /// Delay before the panel is first published
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,
    /// Let overlays play audio through the room's peripherals
    #[serde(default = "default_true")]
    pub enable_audio_output: bool,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_panel_id() -> String {
    DEFAULT_PANEL_ID.to_string()
}

fn default_startup_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_content() -> Vec<ContentItem> {
    vec![
        ContentItem::new(
            "How to Join a MS Teams Meeting",
            "https://www.youtube.com/embed/TJkz7oxIrOw?start=40&autoplay=1",
        )
        .with_autoclose(40),
        ContentItem::new(
            "How to Join a Webex Meeting",
            "https://www.youtube.com/embed/GyXu1qQ8NsI?start=40&autoplay=1",
        )
        .with_mode(OverlayMode::Fullscreen)
        .with_autoclose(40),
        ContentItem::new(
            "How to Join a Google Meeting",
            "https://www.youtube.com/embed/8JX-_FxsO8g?start=39&autoplay=1",
        )
        .with_autoclose(30),
        ContentItem::new(
            "How to share your Laptop or Phone screen",
            "https://www.youtube.com/embed/TJkz7oxIrOw?start=62&autoplay=1",
        )
        .with_target(Surface::Controller)
        .with_autoclose(30),
        ContentItem::new(
            "How to Share using Airplay",
            "https://www.youtube.com/embed/u4fv9qqL37U?autoplay=1",
        )
        .with_autoclose(40),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            panel_id: default_panel_id(),
            button: ButtonConfig::default(),
            content: default_content(),
            content_server: None,
            startup_delay_ms: default_startup_delay_ms(),
            enable_audio_output: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "userguide", "userguide")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Catalog source this configuration selects
    pub fn catalog_source(&self) -> CatalogSource {
        match self.content_server.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => CatalogSource::Remote(url.to_string()),
            _ => CatalogSource::Static(self.content.clone()),
        }
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            panel_id: self.panel_id.clone(),
            button: self.button.clone(),
            source: self.catalog_source(),
            startup_delay: Duration::from_millis(self.startup_delay_ms),
            enable_audio_output: self.enable_audio_output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gets_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.panel_id, "userguide");
        assert_eq!(config.content.len(), 5);
        assert_eq!(config.content[3].target, Surface::Controller);
    }

    #[test]
    fn test_content_server_wins() {
        let config: AppConfig = serde_json::from_str(
            r#"{"content_server": "https://example.com/basics.json", "panel_id": "guides"}"#,
        )
        .unwrap();
        assert_eq!(
            config.catalog_source(),
            CatalogSource::Remote("https://example.com/basics.json".to_string())
        );

        let blank = AppConfig {
            content_server: Some("  ".to_string()),
            ..AppConfig::default()
        };
        assert!(!blank.catalog_source().is_remote());
    }

    #[test]
    fn test_dispatcher_config() {
        let config = AppConfig {
            startup_delay_ms: 0,
            enable_audio_output: false,
            ..AppConfig::default()
        };
        let dispatcher = config.dispatcher_config();
        assert!(dispatcher.startup_delay.is_zero());
        assert!(!dispatcher.enable_audio_output);
        assert_eq!(dispatcher.panel_id, "userguide");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "userguide-config-{}.json",
            uuid::Uuid::new_v4().simple()
        ));
        let config = AppConfig {
            panel_id: "lobby".to_string(),
            content: vec![ContentItem::new("A", "u1")],
            ..AppConfig::default()
        };
        config.save_to_path(&path).unwrap();
        let loaded = AppConfig::load_from_path(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
