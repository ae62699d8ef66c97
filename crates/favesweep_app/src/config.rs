//! Optional RON configuration for favesweep runs.
//!
//! Every field is optional so a partial file overrides only what it
//! names; a missing or malformed file falls back to defaults with a
//! warning rather than failing the run.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use serde::Deserialize;

use favesweep_core::HarvestMode;
use favesweep_engine::{RunSettings, Selectors};

const CONFIG_FILENAME: &str = "favesweep.ron";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub max_idle_scrolls: Option<u32>,
    pub scroll_delay_ms: Option<u64>,
    pub analysis_delay_ms: Option<u64>,
    pub unfavorite_delay_ms: Option<u64>,
    pub item_selector: Option<String>,
    pub sweep_item_selector: Option<String>,
    pub action_control_selector: Option<String>,
    /// Default harvest mode (`images`, `videos` or `all`); the `--mode`
    /// flag wins over this.
    pub mode: Option<String>,
    /// Root URL of the analysis/removal service. Without one, runs use
    /// the offline stand-ins.
    pub service_base_url: Option<String>,
    pub service_token: Option<String>,
}

impl AppConfig {
    pub fn harvest_mode(&self) -> Option<HarvestMode> {
        match self.mode.as_deref() {
            Some("images") => Some(HarvestMode::Images),
            Some("videos") => Some(HarvestMode::Videos),
            Some("all") => Some(HarvestMode::All),
            Some(other) => {
                engine_warn!("Ignoring unknown mode {other:?} in config");
                None
            }
            None => None,
        }
    }

    pub fn run_settings(&self) -> RunSettings {
        let defaults = RunSettings::default();
        let mut selectors = Selectors::default();
        if let Some(item) = &self.item_selector {
            selectors.item = item.clone();
        }
        if let Some(sweep_item) = &self.sweep_item_selector {
            selectors.sweep_item = sweep_item.clone();
        }
        if let Some(action) = &self.action_control_selector {
            selectors.action_control = action.clone();
        }

        RunSettings {
            max_idle_scrolls: self.max_idle_scrolls.unwrap_or(defaults.max_idle_scrolls),
            scroll_delay: self
                .scroll_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.scroll_delay),
            analysis_delay: self
                .analysis_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.analysis_delay),
            unfavorite_delay: self
                .unfavorite_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.unfavorite_delay),
            selectors,
        }
    }
}

/// Loads configuration from `path`, or `./favesweep.ron` when no path is
/// given. A missing file is normal and silent.
pub(crate) fn load(path: Option<&Path>) -> AppConfig {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            engine_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            engine_info!("Loaded configuration from {:?}", path);
            config
        }
        Err(err) => {
            engine_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
