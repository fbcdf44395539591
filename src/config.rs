// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::storage::LocalStorage;
use crate::views::{ViewDeck, ViewType};
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

fn default_true() -> bool {
    true
}

fn default_indicator_interval() -> u32 {
    60
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    /// Calendar preselected for event creation when a view has no opinion.
    #[serde(default)]
    pub default_calendar: Option<String>,
    #[serde(default)]
    pub default_view: ViewType,

    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub workdays_only: bool,
    #[serde(default)]
    pub tasks_in_view: bool,
    #[serde(default)]
    pub show_completed_in_view: bool,

    /// Ask occurrence-vs-series before deleting a single occurrence.
    #[serde(default = "default_true")]
    pub confirm_occurrence_delete: bool,

    #[serde(default = "default_true")]
    pub midnight_refresh: bool,
    /// Seconds between now-line repositions in the day and week views.
    #[serde(default = "default_indicator_interval")]
    pub time_indicator_interval_secs: u32,

    #[serde(default)]
    pub category_colors: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_calendar: None,
            default_view: ViewType::default(),
            rotated: false,
            workdays_only: false,
            tasks_in_view: false,
            show_completed_in_view: false,
            // Match the serde defaults
            confirm_occurrence_delete: true,
            midnight_refresh: true,
            time_indicator_interval_secs: 60,
            category_colors: HashMap::new(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers (first run) can behave
        // accordingly.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Helper to detect whether an anyhow::Error indicates that the config
    /// file was missing, robust to wrapping.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    /// Seeds a fresh deck with the configured view flags and opens the
    /// configured default view.
    pub fn apply_to_deck(&self, deck: &mut ViewDeck) {
        use strum::IntoEnumIterator;
        for view_type in ViewType::iter() {
            let view = deck.view_mut(view_type);
            view.rotated = self.rotated;
            view.workdays_only = self.workdays_only;
            view.tasks_in_view = self.tasks_in_view;
            view.show_completed = self.show_completed_in_view;
        }
        deck.switch_to(self.default_view);
    }
}
