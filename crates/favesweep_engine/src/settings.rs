use std::time::Duration;

/// CSS selectors handed to the page binding. Defaults match the favorites
/// feed markup; other feeds override them through configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    /// Item elements enumerated during a harvest scan.
    pub item: String,
    /// Item elements enumerated during a sweep pass.
    pub sweep_item: String,
    /// Per-item action control tried before the removal fallback.
    pub action_control: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            item: "[data-item-id]".to_string(),
            sweep_item: "[data-item-id]".to_string(),
            action_control: "[data-action=unfavorite]".to_string(),
        }
    }
}

/// HTTP knobs for the remote analysis and removal clients.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Timing and termination knobs shared by harvest and sweep runs.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Consecutive unchanged extent measurements that end the scroll phase.
    pub max_idle_scrolls: u32,
    /// Settle time after each scroll advance, before re-measuring.
    pub scroll_delay: Duration,
    /// Pacing between analysis requests, applied after failures too.
    pub analysis_delay: Duration,
    /// Pacing after a fallback removal call.
    pub unfavorite_delay: Duration,
    pub selectors: Selectors,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            max_idle_scrolls: 3,
            scroll_delay: Duration::from_millis(800),
            analysis_delay: Duration::from_millis(1000),
            unfavorite_delay: Duration::from_millis(200),
            selectors: Selectors::default(),
        }
    }
}
