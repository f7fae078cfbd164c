use std::collections::BTreeMap;

use scroller_core::{ComboView, Point};
use scroller_engine::{ControlId, PanelCommand};

/// In-memory stand-in for the panel widgets; applies render commands the way
/// the page would and keeps the result for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessPanel {
    pub root_visible: bool,
    pub minimized: bool,
    pub play_glyph: &'static str,
    pub play_title: &'static str,
    pub playing: bool,
    pub labels: BTreeMap<ControlId, String>,
    pub sliders: BTreeMap<ControlId, f64>,
    pub lists: BTreeMap<ControlId, Vec<String>>,
    pub combos: BTreeMap<ControlId, ComboView>,
    pub position: Option<Point>,
    pub toast: Option<String>,
    pub toasts_shown: usize,
}

impl Default for HeadlessPanel {
    fn default() -> Self {
        Self {
            root_visible: true,
            minimized: true,
            play_glyph: "",
            play_title: "",
            playing: false,
            labels: BTreeMap::new(),
            sliders: BTreeMap::new(),
            lists: BTreeMap::new(),
            combos: BTreeMap::new(),
            position: None,
            toast: None,
            toasts_shown: 0,
        }
    }
}

impl HeadlessPanel {
    pub fn apply<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = PanelCommand>,
    {
        for command in commands {
            match command {
                PanelCommand::SetRootVisible(visible) => self.root_visible = visible,
                PanelCommand::SetMinimized(minimized) => self.minimized = minimized,
                PanelCommand::SetPlayButton {
                    glyph,
                    title,
                    playing,
                } => {
                    self.play_glyph = glyph;
                    self.play_title = title;
                    self.playing = playing;
                }
                PanelCommand::SetSpeed {
                    slider,
                    label,
                    value,
                    text,
                } => {
                    self.sliders.insert(slider, value);
                    self.labels.insert(label, text);
                }
                PanelCommand::SetList { list, names } => {
                    self.lists.insert(list, names);
                }
                PanelCommand::SetCombo { combo, view } => {
                    self.combos.insert(combo, view);
                }
                PanelCommand::MovePanel(position) => self.position = Some(position),
                PanelCommand::ShowToast(text) => {
                    self.toast = Some(text);
                    self.toasts_shown += 1;
                }
                PanelCommand::HideToast => self.toast = None,
            }
        }
    }

    /// One line per visible piece of the panel.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.root_visible {
            lines.push("panel: hidden (no chat open)".to_string());
            return lines;
        }
        lines.push(format!(
            "panel: {}",
            if self.minimized { "minimized" } else { "open" }
        ));
        lines.push(format!(
            "play: {} ({}{})",
            self.play_glyph,
            self.play_title,
            if self.playing { ", scrolling" } else { "" }
        ));
        for (label, slider, text) in [
            ("speed", ControlId::SpeedSlider, ControlId::SpeedLabel),
            (
                "important speed",
                ControlId::ImportantSpeedSlider,
                ControlId::ImportantSpeedLabel,
            ),
        ] {
            match (self.labels.get(&text), self.sliders.get(&slider)) {
                (Some(text), _) => lines.push(format!("{label}: {text}")),
                (None, Some(value)) => lines.push(format!("{label}: {value}")),
                (None, None) => {}
            }
        }
        for (label, id) in [
            ("important", ControlId::ImportantList),
            ("hidden", ControlId::HiddenList),
        ] {
            if let Some(names) = self.lists.get(&id) {
                lines.push(format!("{label}: [{}]", names.join(", ")));
            }
        }
        for (label, id) in [
            ("important combo", ControlId::ImportantCombo),
            ("hidden combo", ControlId::HiddenCombo),
        ] {
            if let Some(view) = self.combos.get(&id).filter(|view| view.open) {
                lines.push(format!("{label}: open, {} suggestions", view.items.len()));
            }
        }
        if let Some(position) = self.position {
            lines.push(format!("position: {}, {}", position.x, position.y));
        }
        if let Some(toast) = &self.toast {
            lines.push(format!("toast: {toast}"));
        }
        lines
    }
}
