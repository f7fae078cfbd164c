use crate::settings::DEFAULT_PANEL_MINIMIZED;
use crate::view_model::{ComboView, PanelViewModel};
use crate::{ComboState, ComboTarget, DragState, Point, ScrollState, Settings};

/// Everything the overlay knows, owned by one engine context.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    settings: Settings,
    conversation_title: String,
    participants: Vec<String>,
    scroll: ScrollState,
    panel_minimized: bool,
    panel_position: Option<Point>,
    chat_open: bool,
    drag: DragState,
    important_combo: ComboState,
    hidden_combo: ComboState,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            conversation_title: String::new(),
            participants: Vec::new(),
            scroll: ScrollState::new(),
            panel_minimized: DEFAULT_PANEL_MINIMIZED,
            panel_position: None,
            chat_open: true,
            drag: DragState::default(),
            important_combo: ComboState::new(),
            hidden_combo: ComboState::new(),
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> PanelViewModel {
        PanelViewModel {
            playing: self.scroll.is_running(),
            base_speed: self.settings.base_speed,
            important_speed: self.settings.important_speed,
            important_people: self.settings.important_people.to_vec(),
            hidden_users: self.settings.hidden_users.to_vec(),
            minimized: self.panel_minimized,
            position: self.panel_position,
            chat_open: self.chat_open,
            important_combo: ComboView::from_state(&self.important_combo),
            hidden_combo: ComboView::from_state(&self.hidden_combo),
        }
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn conversation_title(&self) -> &str {
        &self.conversation_title
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn combo(&self, target: ComboTarget) -> &ComboState {
        match target {
            ComboTarget::Important => &self.important_combo,
            ComboTarget::Hidden => &self.hidden_combo,
        }
    }

    /// Participants not yet on the list the combo edits.
    pub fn candidates_for(&self, target: ComboTarget) -> Vec<String> {
        let list = match target {
            ComboTarget::Important => &self.settings.important_people,
            ComboTarget::Hidden => &self.settings.hidden_users,
        };
        self.participants
            .iter()
            .filter(|name| !list.contains(name))
            .cloned()
            .collect()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub(crate) fn replace_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub(crate) fn set_conversation_title(&mut self, title: String) {
        self.conversation_title = title;
    }

    pub(crate) fn set_participants(&mut self, participants: Vec<String>) -> bool {
        if self.participants == participants {
            return false;
        }
        self.participants = participants;
        true
    }

    pub(crate) fn scroll_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }

    pub(crate) fn set_panel_minimized(&mut self, minimized: bool) {
        self.panel_minimized = minimized;
    }

    pub(crate) fn set_panel_position(&mut self, position: Point) {
        self.panel_position = Some(position);
    }

    pub(crate) fn set_chat_open(&mut self, open: bool) -> bool {
        if self.chat_open == open {
            return false;
        }
        self.chat_open = open;
        true
    }

    pub(crate) fn drag_mut(&mut self) -> &mut DragState {
        &mut self.drag
    }

    pub(crate) fn combo_mut(&mut self, target: ComboTarget) -> &mut ComboState {
        match target {
            ComboTarget::Important => &mut self.important_combo,
            ComboTarget::Hidden => &mut self.hidden_combo,
        }
    }

    /// Clears both combo inputs and closes their lists.
    pub(crate) fn reset_combos(&mut self) {
        self.important_combo.reset();
        self.hidden_combo.reset();
    }
}
