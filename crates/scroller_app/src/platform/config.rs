//! Optional ron file overriding overlay timings and locator thresholds.
//!
//! Every field is optional; durations are in milliseconds.
//!
//! ```ron
//! (message_debounce_ms: Some(100), locator: (scroll_slack_px: Some(20.0)))
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use scroller_engine::{LocatorConfig, OverlaySettings};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub conversation_debounce_ms: Option<u64>,
    pub message_debounce_ms: Option<u64>,
    pub scroll_debounce_ms: Option<u64>,
    pub reconcile_interval_ms: Option<u64>,
    pub chat_open_interval_ms: Option<u64>,
    pub settle_delay_ms: Option<u64>,
    pub startup_timeout_ms: Option<u64>,
    pub toast_duration_ms: Option<u64>,
    pub combo_close_grace_ms: Option<u64>,
    pub locator: LocatorOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LocatorOverrides {
    pub scroll_slack_px: Option<f64>,
    pub list_child_threshold: Option<usize>,
    pub wrapped_child_threshold: Option<usize>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        ron::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn apply(&self, mut settings: OverlaySettings) -> OverlaySettings {
        let fields = [
            (self.conversation_debounce_ms, &mut settings.conversation_debounce),
            (self.message_debounce_ms, &mut settings.message_debounce),
            (self.scroll_debounce_ms, &mut settings.scroll_debounce),
            (self.reconcile_interval_ms, &mut settings.reconcile_interval),
            (self.chat_open_interval_ms, &mut settings.chat_open_interval),
            (self.settle_delay_ms, &mut settings.settle_delay),
            (self.startup_timeout_ms, &mut settings.startup_timeout),
            (self.toast_duration_ms, &mut settings.toast_duration),
            (self.combo_close_grace_ms, &mut settings.combo_close_grace),
        ];
        for (value, slot) in fields {
            if let Some(ms) = value {
                *slot = Duration::from_millis(ms);
            }
        }
        settings.locator = self.locator.apply(settings.locator);
        settings
    }
}

impl LocatorOverrides {
    fn apply(&self, mut locator: LocatorConfig) -> LocatorConfig {
        if let Some(slack) = self.scroll_slack_px {
            locator.scroll_slack_px = slack;
        }
        if let Some(threshold) = self.list_child_threshold {
            locator.list_child_threshold = threshold;
        }
        if let Some(threshold) = self.wrapped_child_threshold {
            locator.wrapped_child_threshold = threshold;
        }
        locator
    }
}
