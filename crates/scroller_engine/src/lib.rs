//! Scroller engine: host document access, discovery, classification and the
//! overlay runtime that executes core effects.
mod classify;
mod config;
mod decode;
mod dom;
mod locate;
mod overlay;
mod panel;
mod persist;
mod sender;
mod snapshot;
mod store;
mod tree;
mod watch;

pub use classify::{
    apply_blur, refresh_important, reveal, Classification, MessageGroupView, BADGE_CLASS,
    BLURRED_CLASS, BLUR_LABEL_CLASS, BLUR_OVERLAY_CLASS, IMPORTANT_CLASS, REVEALED_CLASS,
    REVEAL_BUTTON_CLASS,
};
pub use config::{LocatorConfig, OverlaySettings};
pub use decode::{decode_markup, DecodeError, DecodedMarkup};
pub use dom::{
    DecorationSpec, HostDocument, HostSignal, InsertPosition, Mutation, MutationKind, Overflow,
};
pub use ego_tree::NodeId;
pub use locate::{Landmarks, Locator, Strategy, StrategyChain};
pub use overlay::Overlay;
pub use panel::{
    ControlId, PanelAction, PanelBindings, PanelCommand, PanelError, PAUSE_GLYPH, PLAYING_CLASS,
    PLAY_GLYPH,
};
pub use persist::{ensure_dir, AtomicFile, PersistError};
pub use sender::{conversation_title, scan_participants, sender_of, SENDER_LABEL_PREFIX};
pub use store::{
    decode_panel_minimized, decode_settings, encode_panel_state, encode_settings, MemoryStore,
    SettingsStore, StoreError, StoreMap, KEY_BASE_SPEED, KEY_HIDDEN_USERS, KEY_IMPORTANT_PEOPLE,
    KEY_IMPORTANT_SPEED, KEY_PANEL_MINIMIZED, SETTINGS_KEYS,
};
pub use tree::{DomTree, ElementData, HostNode};
pub use watch::{ChangeScope, ChangeWatcher, ConversationWatcher, MessageEvents, MessageWatcher};
