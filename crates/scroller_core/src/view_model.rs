use crate::{ComboItem, ComboState, Point};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelViewModel {
    pub playing: bool,
    pub base_speed: f64,
    pub important_speed: f64,
    pub important_people: Vec<String>,
    pub hidden_users: Vec<String>,
    pub minimized: bool,
    pub position: Option<Point>,
    pub chat_open: bool,
    pub important_combo: ComboView,
    pub hidden_combo: ComboView,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComboView {
    pub query: String,
    pub open: bool,
    pub items: Vec<ComboItem>,
    pub active_index: Option<usize>,
    pub hint: Option<String>,
}

impl ComboView {
    pub fn from_state(state: &ComboState) -> Self {
        Self {
            query: state.query().to_string(),
            open: state.is_open(),
            items: state.items().to_vec(),
            active_index: state.active_index(),
            hint: state.hint().map(|hint| hint.text()),
        }
    }
}

/// Slider label text, e.g. `2x` or `0.4x`.
pub fn speed_label(speed: f64) -> String {
    format!("{speed}x")
}
