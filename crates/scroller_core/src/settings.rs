use crate::names::NameList;

pub const DEFAULT_BASE_SPEED: f64 = 2.0;
pub const DEFAULT_IMPORTANT_SPEED: f64 = 0.4;
pub const DEFAULT_PANEL_MINIMIZED: bool = true;

/// User settings shared by every conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub important_people: NameList,
    pub hidden_users: NameList,
    /// Pixels per frame while an important sender is in view.
    pub important_speed: f64,
    /// Pixels per frame otherwise.
    pub base_speed: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            important_people: NameList::new(),
            hidden_users: NameList::new(),
            important_speed: DEFAULT_IMPORTANT_SPEED,
            base_speed: DEFAULT_BASE_SPEED,
        }
    }
}
