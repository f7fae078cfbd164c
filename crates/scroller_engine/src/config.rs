use std::time::Duration;

/// Thresholds used by landmark discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorConfig {
    /// Content must overflow the viewport by more than this to count as scrollable.
    pub scroll_slack_px: f64,
    /// A direct child of the container with more children than this is the list host.
    pub list_child_threshold: usize,
    /// Threshold for the single-wrapper fallback one level deeper.
    pub wrapped_child_threshold: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            scroll_slack_px: 50.0,
            list_child_threshold: 5,
            wrapped_child_threshold: 10,
        }
    }
}

/// Every timing the overlay runtime uses.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    pub conversation_debounce: Duration,
    pub message_debounce: Duration,
    pub scroll_debounce: Duration,
    pub reconcile_interval: Duration,
    pub chat_open_interval: Duration,
    pub settle_delay: Duration,
    pub startup_timeout: Duration,
    pub toast_duration: Duration,
    pub combo_close_grace: Duration,
    pub locator: LocatorConfig,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            conversation_debounce: Duration::from_millis(300),
            message_debounce: Duration::from_millis(200),
            scroll_debounce: Duration::from_millis(50),
            reconcile_interval: Duration::from_millis(2000),
            chat_open_interval: Duration::from_millis(3000),
            settle_delay: Duration::from_millis(500),
            startup_timeout: Duration::from_secs(30),
            toast_duration: Duration::from_millis(2500),
            combo_close_grace: Duration::from_millis(150),
            locator: LocatorConfig::default(),
        }
    }
}
