use crate::{ComboEvent, FrameTicket, LoadReason, Point, ScrollMetrics, Settings};

/// Which of the two panel combos an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComboTarget {
    Important,
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Startup finished discovery; `title` is the conversation open right now.
    Started { title: String },
    /// Settings were read from the store (or defaults if the store failed).
    SettingsLoaded {
        settings: Settings,
        reason: LoadReason,
    },
    PanelStateLoaded { minimized: bool },
    /// Debounced document-wide change fired; carries the current title.
    ConversationObserved(String),
    /// Post-switch settle delay elapsed.
    SettleElapsed,
    ParticipantsScanned(Vec<String>),
    /// Debounced child-list change on the message-list host.
    MessagesChanged,
    /// Debounced scroll on the subscribed container.
    Scrolled,
    /// Periodic "is a conversation open" check.
    ChatOpenChecked(bool),
    PlayClicked,
    /// Animation frame for a scheduled scroll step.
    Frame {
        ticket: FrameTicket,
        container: Option<ScrollMetrics>,
        important_in_view: bool,
    },
    BaseSpeedChanged(f64),
    ImportantSpeedChanged(f64),
    ImportantCommitted(String),
    HiddenCommitted(String),
    ImportantRemoved(String),
    HiddenRemoved(String),
    Combo {
        target: ComboTarget,
        event: ComboEvent,
    },
    MinimizeClicked,
    /// The re-open affordance was clicked.
    RestoreClicked,
    DragStarted {
        pointer: Point,
        panel_origin: Point,
        on_button: bool,
    },
    DragMoved(Point),
    DragEnded,
}
