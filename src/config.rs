//! User configuration
//!
//! Handles `config.toml` in the platform config directory. Every field has a
//! default, so a partial file only overrides what it names.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{CalendarDate, NonWorkingDays, Project, ZoomLevel};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Written into new documents as `creatorName`
    #[serde(default)]
    pub creator_name: String,

    /// Zoom level a freshly opened chart starts at
    #[serde(default = "default_zoom")]
    pub default_zoom: usize,

    /// Weekday indices (0 = Sunday) that new projects treat as non-working
    #[serde(default = "default_non_working_days")]
    pub non_working_days: Vec<u8>,

    /// Length of the window of a new project, in calendar days
    #[serde(default = "default_project_days")]
    pub default_project_days: i64,

    /// Row height of new projects, in pixels
    #[serde(default = "default_row_height")]
    pub row_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            creator_name: String::new(),
            default_zoom: default_zoom(),
            non_working_days: default_non_working_days(),
            default_project_days: default_project_days(),
            row_height: default_row_height(),
        }
    }
}

fn default_zoom() -> usize {
    3
}

fn default_non_working_days() -> Vec<u8> {
    vec![0, 6]
}

fn default_project_days() -> i64 {
    90
}

fn default_row_height() -> f32 {
    32.0
}

impl AppConfig {
    /// Path of `config.toml`, if the platform has a config directory.
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("com", "hjertis", "rust-gantt-editor")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the user configuration, falling back to defaults.
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path. Missing or unparsable files yield defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match Self::parse(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or(Error::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn zoom(&self) -> ZoomLevel {
        ZoomLevel::new(self.default_zoom)
    }

    pub fn mask(&self) -> NonWorkingDays {
        NonWorkingDays::from_weekdays(self.non_working_days.iter().copied())
    }

    /// A blank project starting today, shaped by this configuration.
    pub fn new_project(&self) -> Project {
        let today = CalendarDate::today();
        let mut project = Project::new(
            "Untitled Project",
            today,
            today.add_days(self.default_project_days.max(0)),
        );
        project.creator_name = self.creator_name.clone();
        project.settings.non_working_days = self.mask();
        project.settings.row_height = self.row_height;
        project
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::parse("creator_name = \"Ana\"\ndefault_zoom = 5\n").unwrap();
        assert_eq!(config.creator_name, "Ana");
        assert_eq!(config.zoom().level(), 5);
        assert_eq!(config.mask(), NonWorkingDays::WEEKENDS);
        assert_eq!(config.default_project_days, 90);
    }

    #[test]
    fn new_project_uses_config() {
        let config = AppConfig {
            non_working_days: vec![5],
            default_project_days: 10,
            ..AppConfig::default()
        };
        let project = config.new_project();
        assert_eq!(project.mask(), NonWorkingDays::from_weekdays([5]));
        assert_eq!(project.project_end.days_since(project.project_start), 10);
    }
}
