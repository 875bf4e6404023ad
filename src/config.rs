//! Configuration for the page controller and the catalog generator.
//!
//! Both structs deserialize from JSON with every field defaulted, so a partial
//! document only overrides what it names. The generator settings live at
//! `~/.local/share/galaxy-gallery/config.json`; command-line flags win over
//! anything loaded from there.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default generator config file path.
fn default_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("galaxy-gallery")
        .join("config.json")
}

/// Element ids, class names and timings used by the in-page controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Tracking surface that receives pointer events.
    pub overlay_id: String,
    /// Panel toggled with Ctrl + Space.
    pub controls_id: String,
    /// Container whose children are the cards.
    pub games_id: String,
    pub search_id: String,
    pub width_id: String,
    pub spacing_id: String,
    /// Id prefix that marks an element as a card (`game-<key>`).
    pub card_prefix: String,
    /// Class of the tooltip child inside each card.
    pub tooltip_class: String,
    pub hit_class: String,
    pub hover_class: String,
    pub results_class: String,
    pub visible_class: String,
    pub cursor_restore_ms: u64,
    pub fade_in_ms: u64,
    pub search_rerun_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            overlay_id: "overlay".into(),
            controls_id: "controls".into(),
            games_id: "games".into(),
            search_id: "search".into(),
            width_id: "width".into(),
            spacing_id: "spacing".into(),
            card_prefix: "game-".into(),
            tooltip_class: "data".into(),
            hit_class: "hit".into(),
            hover_class: "hover".into(),
            results_class: "search-results".into(),
            visible_class: "visible".into(),
            cursor_restore_ms: 100,
            fade_in_ms: 25,
            search_rerun_ms: 10,
        }
    }
}

impl ControllerConfig {
    /// Parse a (possibly partial) JSON override.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Persisted generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_input")]
    pub input: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_image_list")]
    pub image_list: PathBuf,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    #[serde(default)]
    pub embed: bool,
    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    path: PathBuf,
}

fn default_title() -> String { "GOG Galaxy 2 game library".into() }
fn default_delimiter() -> char { ',' }
fn default_input() -> PathBuf { PathBuf::from("gameDB.csv") }
fn default_output() -> PathBuf { PathBuf::from("index.html") }
fn default_image_list() -> PathBuf { PathBuf::from("imagelist.txt") }
fn default_templates_dir() -> PathBuf { PathBuf::from("templates") }

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            delimiter: default_delimiter(),
            input: default_input(),
            output: default_output(),
            image_list: default_image_list(),
            templates_dir: default_templates_dir(),
            embed: false,
            path: default_path(),
        }
    }
}

impl GalleryConfig {
    /// Load from the default location, falling back to defaults on any error.
    pub fn load() -> Self {
        Self::load_from(default_path())
    }

    /// Load from `path`, falling back to defaults on any error.
    pub fn load_from(path: PathBuf) -> Self {
        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed config {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        config.path = path;
        config
    }

    /// Persist current config to disk.
    pub fn save(&self) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_controller_override() {
        let config = ControllerConfig::from_json(r#"{"card_prefix": "item-", "fade_in_ms": 40}"#)
            .unwrap();
        assert_eq!(config.card_prefix, "item-");
        assert_eq!(config.fade_in_ms, 40);
        assert_eq!(config.cursor_restore_ms, 100);
        assert_eq!(config.games_id, "games");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = GalleryConfig::load_from(dir.path().join("nope.json"));
        assert_eq!(config.title, "GOG Galaxy 2 game library");
        assert_eq!(config.delimiter, ',');
        assert!(!config.embed);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = GalleryConfig::load_from(path.clone());
        config.title = "My games".into();
        config.delimiter = ';';
        config.save().unwrap();

        let reloaded = GalleryConfig::load_from(path);
        assert_eq!(reloaded.title, "My games");
        assert_eq!(reloaded.delimiter, ';');
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = GalleryConfig::load_from(path);
        assert_eq!(config.output, PathBuf::from("index.html"));
    }
}
