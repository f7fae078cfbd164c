use crate::{ComboTarget, FrameTicket, Settings, StopReason};

pub const REACHED_END_TOAST: &str = "Reached end of chat";

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run a scroll step on the next animation frame.
    RequestFrame(FrameTicket),
    /// Write the scroll container's offset.
    SetScrollTop(f64),
    ScrollStopped(StopReason),
    ShowToast(String),
    LoadSettings(LoadReason),
    LoadPanelState,
    PersistSettings(Settings),
    PersistPanelState { minimized: bool },
    /// Arm the post-switch settle delay.
    ScheduleSettle,
    /// Arm the blur grace delay of a combo.
    ScheduleComboClose(ComboTarget),
    RescanParticipants,
    ApplyBlur,
    RefreshImportant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadReason {
    Startup,
    ConversationSwitch,
}
