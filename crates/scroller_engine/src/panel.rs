//! Panel widget contract: control ids, render commands and user actions.
//!
//! The panel markup is supplied by the host. Binding checks which controls
//! it provides; rendering turns a view model into commands for the controls
//! that exist.

use std::collections::BTreeSet;

use scraper::{Html, Selector};
use scroller_core::{speed_label, ComboEvent, ComboTarget, ComboView, Msg, PanelViewModel, Point};
use thiserror::Error;

pub const PLAY_GLYPH: &str = "\u{25B6}";
pub const PAUSE_GLYPH: &str = "\u{25AE}\u{25AE}";
pub const PLAYING_CLASS: &str = "wa-playing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlId {
    Root,
    Panel,
    Fab,
    Header,
    Minimize,
    PlayButton,
    SpeedSlider,
    SpeedLabel,
    ImportantSpeedSlider,
    ImportantSpeedLabel,
    ImportantCombo,
    HiddenCombo,
    ImportantList,
    HiddenList,
}

impl ControlId {
    /// Controls looked up inside the supplied markup. The root wraps the
    /// markup and is created by the overlay itself.
    pub const IN_MARKUP: [ControlId; 13] = [
        ControlId::Panel,
        ControlId::Fab,
        ControlId::Header,
        ControlId::Minimize,
        ControlId::PlayButton,
        ControlId::SpeedSlider,
        ControlId::SpeedLabel,
        ControlId::ImportantSpeedSlider,
        ControlId::ImportantSpeedLabel,
        ControlId::ImportantCombo,
        ControlId::HiddenCombo,
        ControlId::ImportantList,
        ControlId::HiddenList,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ControlId::Root => "wa-scroller-root",
            ControlId::Panel => "wa-scroller-panel",
            ControlId::Fab => "wa-scroller-fab",
            ControlId::Header => "wa-panel-header",
            ControlId::Minimize => "wa-panel-minimize",
            ControlId::PlayButton => "wa-play-btn",
            ControlId::SpeedSlider => "wa-speed-slider",
            ControlId::SpeedLabel => "wa-speed-label",
            ControlId::ImportantSpeedSlider => "wa-important-speed-slider",
            ControlId::ImportantSpeedLabel => "wa-important-speed-label",
            ControlId::ImportantCombo => "wa-important-combo",
            ControlId::HiddenCombo => "wa-hidden-combo",
            ControlId::ImportantList => "wa-important-list",
            ControlId::HiddenList => "wa-hidden-list",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("panel markup has no #{0} element")]
    MissingControl(&'static str),
    #[error("invalid selector {selector}: {message}")]
    Selector { selector: String, message: String },
}

/// A change the panel surface must apply.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    /// Show or hide the whole overlay root.
    SetRootVisible(bool),
    /// Minimized hides the panel and shows the fab; restored is the reverse.
    SetMinimized(bool),
    SetPlayButton {
        glyph: &'static str,
        title: &'static str,
        playing: bool,
    },
    SetSpeed {
        slider: ControlId,
        label: ControlId,
        value: f64,
        text: String,
    },
    SetList {
        list: ControlId,
        names: Vec<String>,
    },
    SetCombo {
        combo: ControlId,
        view: ComboView,
    },
    MovePanel(Point),
    ShowToast(String),
    HideToast,
}

/// Controls found in the panel markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelBindings {
    present: BTreeSet<ControlId>,
}

impl PanelBindings {
    /// Binds to `markup`. The panel and fab are required; any other missing
    /// control is simply never rendered.
    pub fn from_markup(markup: &str) -> Result<Self, PanelError> {
        let fragment = Html::parse_fragment(markup);
        let mut present = BTreeSet::from([ControlId::Root]);
        for control in ControlId::IN_MARKUP {
            let selector_text = format!("#{}", control.id());
            let selector = Selector::parse(&selector_text).map_err(|e| PanelError::Selector {
                selector: selector_text.clone(),
                message: e.to_string(),
            })?;
            if fragment.select(&selector).next().is_some() {
                present.insert(control);
            }
        }
        for required in [ControlId::Panel, ControlId::Fab] {
            if !present.contains(&required) {
                return Err(PanelError::MissingControl(required.id()));
            }
        }
        Ok(Self { present })
    }

    pub fn has(&self, control: ControlId) -> bool {
        self.present.contains(&control)
    }

    pub fn render(&self, view: &PanelViewModel) -> Vec<PanelCommand> {
        let mut commands = vec![
            PanelCommand::SetRootVisible(view.chat_open),
            PanelCommand::SetMinimized(view.minimized),
        ];
        if self.has(ControlId::PlayButton) {
            commands.push(if view.playing {
                PanelCommand::SetPlayButton {
                    glyph: PAUSE_GLYPH,
                    title: "Pause",
                    playing: true,
                }
            } else {
                PanelCommand::SetPlayButton {
                    glyph: PLAY_GLYPH,
                    title: "Play",
                    playing: false,
                }
            });
        }
        self.push_speed(
            &mut commands,
            ControlId::SpeedSlider,
            ControlId::SpeedLabel,
            view.base_speed,
        );
        self.push_speed(
            &mut commands,
            ControlId::ImportantSpeedSlider,
            ControlId::ImportantSpeedLabel,
            view.important_speed,
        );
        for (list, names) in [
            (ControlId::ImportantList, &view.important_people),
            (ControlId::HiddenList, &view.hidden_users),
        ] {
            if self.has(list) {
                commands.push(PanelCommand::SetList {
                    list,
                    names: names.clone(),
                });
            }
        }
        for (combo, combo_view) in [
            (ControlId::ImportantCombo, &view.important_combo),
            (ControlId::HiddenCombo, &view.hidden_combo),
        ] {
            if self.has(combo) {
                commands.push(PanelCommand::SetCombo {
                    combo,
                    view: combo_view.clone(),
                });
            }
        }
        if let Some(position) = view.position {
            commands.push(PanelCommand::MovePanel(position));
        }
        commands
    }

    fn push_speed(
        &self,
        commands: &mut Vec<PanelCommand>,
        slider: ControlId,
        label: ControlId,
        value: f64,
    ) {
        if self.has(slider) || self.has(label) {
            commands.push(PanelCommand::SetSpeed {
                slider,
                label,
                value,
                text: speed_label(value),
            });
        }
    }
}

/// User interaction reported by the panel surface.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    Play,
    Minimize,
    /// Click on the fab.
    Restore,
    BaseSpeed(f64),
    ImportantSpeed(f64),
    Combo {
        target: ComboTarget,
        event: ComboEvent,
    },
    Remove {
        target: ComboTarget,
        name: String,
    },
    HeaderPointerDown {
        pointer: Point,
        panel_origin: Point,
        on_button: bool,
    },
    PointerMoved(Point),
    PointerUp,
}

impl From<PanelAction> for Msg {
    fn from(action: PanelAction) -> Self {
        match action {
            PanelAction::Play => Msg::PlayClicked,
            PanelAction::Minimize => Msg::MinimizeClicked,
            PanelAction::Restore => Msg::RestoreClicked,
            PanelAction::BaseSpeed(speed) => Msg::BaseSpeedChanged(speed),
            PanelAction::ImportantSpeed(speed) => Msg::ImportantSpeedChanged(speed),
            PanelAction::Combo { target, event } => Msg::Combo { target, event },
            PanelAction::Remove {
                target: ComboTarget::Important,
                name,
            } => Msg::ImportantRemoved(name),
            PanelAction::Remove {
                target: ComboTarget::Hidden,
                name,
            } => Msg::HiddenRemoved(name),
            PanelAction::HeaderPointerDown {
                pointer,
                panel_origin,
                on_button,
            } => Msg::DragStarted {
                pointer,
                panel_origin,
                on_button,
            },
            PanelAction::PointerMoved(pointer) => Msg::DragMoved(pointer),
            PanelAction::PointerUp => Msg::DragEnded,
        }
    }
}
