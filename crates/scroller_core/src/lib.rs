//! Scroller core: pure state machine, matching rules and view-model helpers.
mod combo;
mod drag;
mod effect;
mod geometry;
mod msg;
mod names;
mod schedule;
mod scroll;
mod settings;
mod state;
mod update;
mod view_model;

pub use combo::{
    highlight_span, CandidateSource, ComboEvent, ComboHint, ComboItem, ComboKey, ComboOutcome,
    ComboState, NO_CANDIDATES_HINT,
};
pub use drag::DragState;
pub use effect::{Effect, LoadReason, REACHED_END_TOAST};
pub use geometry::{Point, Rect, ScrollMetrics};
pub use msg::{ComboTarget, Msg};
pub use names::{is_invisible_mark, matches_any, normalize, strip_invisible, NameList};
pub use schedule::{Deadline, Debouncer, Interval, Timer};
pub use scroll::{
    FrameTicket, ScrollPhase, ScrollState, StepOutcome, StopReason, END_SLACK_PX, SPEED_LERP,
};
pub use settings::{
    Settings, DEFAULT_BASE_SPEED, DEFAULT_IMPORTANT_SPEED, DEFAULT_PANEL_MINIMIZED,
};
pub use state::AppState;
pub use update::update;
pub use view_model::{speed_label, ComboView, PanelViewModel};
