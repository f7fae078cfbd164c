mod common;

use std::time::{Duration, Instant};

use common::{
    conversation, group, init_logging, ms, node, step, team_a, EMPTY_APP, PANEL_MARKUP,
};
use pretty_assertions::assert_eq;
use scroller_core::{ComboEvent, ComboKey, ComboTarget, Point, REACHED_END_TOAST};
use scroller_engine::{
    encode_settings, ControlId, DomTree, HostDocument, MemoryStore, Overlay, OverlaySettings,
    PanelAction, PanelCommand, SettingsStore, StoreError, StoreMap, BLURRED_CLASS,
    IMPORTANT_CLASS, KEY_BASE_SPEED, KEY_HIDDEN_USERS, KEY_PANEL_MINIMIZED, PAUSE_GLYPH,
    PLAY_GLYPH, REVEALED_CLASS, REVEAL_BUTTON_CLASS,
};
use serde_json::{json, Value};

type TestOverlay<S = MemoryStore> = Overlay<DomTree, S>;

fn stored(value: Value) -> MemoryStore {
    match value {
        Value::Object(map) => MemoryStore::with_values(map),
        _ => unreachable!(),
    }
}

fn started(dom: DomTree, store: MemoryStore, start: Instant) -> TestOverlay {
    init_logging();
    let mut overlay = Overlay::new(dom, store, OverlaySettings::default(), PANEL_MARKUP, start);
    overlay.tick(start);
    assert!(overlay.is_started());
    overlay
}

/// Runs frames 16ms apart until automation stops or `limit` frames pass.
fn run_frames<S: SettingsStore>(
    overlay: &mut TestOverlay<S>,
    from: Instant,
    limit: u32,
) -> (Instant, u32) {
    let mut now = from;
    let mut count = 0;
    while count < limit && overlay.frame(now) {
        count += 1;
        now += ms(16);
    }
    (now, count)
}

fn shown_toasts(commands: &[PanelCommand]) -> Vec<&str> {
    commands
        .iter()
        .filter_map(|c| match c {
            PanelCommand::ShowToast(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn last_play_button(commands: &[PanelCommand]) -> Option<(&'static str, &'static str, bool)> {
    commands.iter().rev().find_map(|c| match c {
        PanelCommand::SetPlayButton {
            glyph,
            title,
            playing,
        } => Some((*glyph, *title, *playing)),
        _ => None,
    })
}

fn speed_text(commands: &[PanelCommand], label: ControlId) -> Option<String> {
    commands.iter().rev().find_map(|c| match c {
        PanelCommand::SetSpeed { label: l, text, .. } if *l == label => Some(text.clone()),
        _ => None,
    })
}

#[test]
fn startup_waits_for_the_first_message() {
    init_logging();
    let start = Instant::now();
    let mut overlay: TestOverlay = Overlay::new(
        DomTree::parse(EMPTY_APP),
        MemoryStore::new(),
        OverlaySettings::default(),
        PANEL_MARKUP,
        start,
    );
    overlay.tick(step(start, 1000));
    assert!(!overlay.is_started());
    assert!(overlay.take_commands().is_empty());

    let app = node(overlay.document(), "app");
    overlay
        .document_mut()
        .append_html(app, &conversation("Team A", &common::TEAM_A));
    overlay.tick(step(start, 1100));
    assert!(overlay.is_started());
    assert_eq!(overlay.state().conversation_title(), "Team A");
    assert_eq!(
        overlay.state().participants(),
        ["Alice", "Bob", "Carol", "Dana", "Eve"]
    );
    assert_eq!(
        overlay.watched_container(),
        Some(node(overlay.document(), "scroller"))
    );
}

#[test]
fn startup_gives_up_waiting_after_timeout() {
    init_logging();
    let start = Instant::now();
    let mut overlay: TestOverlay = Overlay::new(
        DomTree::parse(EMPTY_APP),
        MemoryStore::new(),
        OverlaySettings::default(),
        PANEL_MARKUP,
        start,
    );
    overlay.tick(step(start, 29_999));
    assert!(!overlay.is_started());
    overlay.tick(step(start, 30_000));
    assert!(overlay.is_started());
    assert_eq!(overlay.state().conversation_title(), "");
    assert_eq!(overlay.watched_container(), None);

    // The periodic check hides the overlay while no chat is open.
    overlay.take_commands();
    overlay.tick(step(start, 33_000));
    let commands = overlay.take_commands();
    assert!(commands.contains(&PanelCommand::SetRootVisible(false)));
    assert!(!overlay.state().view().chat_open);
}

#[test]
fn huge_timing_overrides_never_come_due() {
    init_logging();
    let forever = Duration::from_millis(u64::MAX);
    let huge = OverlaySettings {
        conversation_debounce: forever,
        message_debounce: forever,
        scroll_debounce: forever,
        reconcile_interval: forever,
        chat_open_interval: forever,
        settle_delay: forever,
        startup_timeout: forever,
        toast_duration: forever,
        combo_close_grace: forever,
        ..OverlaySettings::default()
    };
    let start = Instant::now();
    let a_day_later = start + Duration::from_secs(24 * 3600);

    let mut waiting: TestOverlay = Overlay::new(
        DomTree::parse(EMPTY_APP),
        MemoryStore::new(),
        huge.clone(),
        PANEL_MARKUP,
        start,
    );
    waiting.tick(a_day_later);
    assert!(!waiting.is_started());

    let mut overlay: TestOverlay =
        Overlay::new(team_a(), MemoryStore::new(), huge, PANEL_MARKUP, start);
    overlay.tick(start);
    assert!(overlay.is_started());
    overlay.handle_panel(
        PanelAction::Combo {
            target: ComboTarget::Hidden,
            event: ComboEvent::Blurred,
        },
        start,
    );
    overlay.tick(a_day_later);
    assert_eq!(overlay.state().conversation_title(), "Team A");
}

#[test]
fn stored_settings_drive_the_first_pass() {
    let start = Instant::now();
    let store = stored(json!({
        "hidden_users": ["Bob"],
        "important_people": ["Alice"],
        "base_speed": 3,
        "panel_minimized": false,
    }));
    let mut overlay = started(team_a(), store, start);
    let dom = overlay.document();
    assert!(dom.has_class(node(dom, "g1"), BLURRED_CLASS));
    assert!(dom.has_class(node(dom, "g5"), BLURRED_CLASS));
    assert!(!dom.has_class(node(dom, "g0"), BLURRED_CLASS));

    let commands = overlay.take_commands();
    assert!(commands.contains(&PanelCommand::SetMinimized(false)));
    assert!(commands.contains(&PanelCommand::SetList {
        list: ControlId::HiddenList,
        names: vec!["Bob".to_string()],
    }));
    assert_eq!(
        speed_text(&commands, ControlId::SpeedLabel).as_deref(),
        Some("3x")
    );
    assert_eq!(
        last_play_button(&commands),
        Some((PLAY_GLYPH, "Play", false))
    );
}

#[test]
fn play_scrolls_and_slows_for_important_senders() {
    let start = Instant::now();
    let store = stored(json!({ "important_people": ["Alice"] }));
    let mut overlay = started(team_a(), store, start);

    overlay.handle_panel(PanelAction::Play, start);
    assert_eq!(
        last_play_button(&overlay.take_commands()),
        Some((PAUSE_GLYPH, "Pause", true))
    );

    let (_, frames) = run_frames(&mut overlay, start, 10);
    assert_eq!(frames, 10);
    let scroller = node(overlay.document(), "scroller");
    let top = overlay.document().scroll_metrics(scroller).scroll_top;
    // Alice is on screen, so every step is below the 2px base speed.
    assert!(top > 10.0 && top < 20.0, "scrolled {top}");
    assert!(overlay.classification().important_in_view);
    assert!(overlay
        .document()
        .has_class(node(overlay.document(), "g0"), IMPORTANT_CLASS));

    overlay.handle_panel(PanelAction::Play, start);
    assert!(!overlay.frame_pending());
    assert!(!overlay.frame(start));
}

#[test]
fn reaching_the_end_toasts_exactly_once() {
    let start = Instant::now();
    let mut overlay = started(team_a(), MemoryStore::new(), start);
    overlay.take_commands();

    overlay.handle_panel(PanelAction::Play, start);
    let (end, frames) = run_frames(&mut overlay, start, 5000);
    assert!(frames < 5000, "never reached the end");
    assert!(!overlay.state().view().playing);

    let scroller = node(overlay.document(), "scroller");
    let metrics = overlay.document().scroll_metrics(scroller);
    assert!(metrics.at_end(5.0));

    // More frames do nothing once stopped.
    assert_eq!(run_frames(&mut overlay, end, 100).1, 0);

    let commands = overlay.take_commands();
    assert_eq!(shown_toasts(&commands), vec![REACHED_END_TOAST]);
    assert_eq!(overlay.toast(), Some(REACHED_END_TOAST));

    // The toast went up during the last frame that ran.
    let shown_at = end - ms(16);
    overlay.tick(shown_at + ms(2499));
    assert_eq!(overlay.toast(), Some(REACHED_END_TOAST));
    overlay.tick(shown_at + ms(2500));
    assert_eq!(overlay.toast(), None);
    assert!(overlay.take_commands().contains(&PanelCommand::HideToast));
}

#[test]
fn conversation_switch_reloads_and_rescans_for_the_new_chat() {
    let start = Instant::now();
    let mut overlay = started(team_a(), stored(json!({ "hidden_users": ["Gil"] })), start);
    overlay.handle_panel(PanelAction::Play, start);
    run_frames(&mut overlay, start, 3);
    assert!(overlay.frame_pending());

    // The host swaps the whole conversation.
    let dom = overlay.document_mut();
    let app = node(dom, "app");
    for child in dom.children(app) {
        dom.remove(child);
    }
    dom.append_html(
        app,
        &conversation("Team B", &["Gil", "Hana", "Ido", "Hana", "Gil", "Hana"]),
    );

    overlay.tick(step(start, 1000));
    assert_eq!(overlay.state().conversation_title(), "Team A");
    overlay.tick(step(start, 1300));
    assert_eq!(overlay.state().conversation_title(), "Team B");
    assert!(!overlay.state().view().playing);
    assert!(!overlay.frame_pending());

    // Participants are only rescanned after the settle delay.
    assert!(overlay.state().participants().contains(&"Alice".to_string()));
    overlay.tick(step(start, 1799));
    assert!(overlay.state().participants().contains(&"Alice".to_string()));
    overlay.tick(step(start, 1800));
    assert_eq!(overlay.state().participants(), ["Gil", "Hana", "Ido"]);
    let dom = overlay.document();
    assert!(dom.has_class(node(dom, "g0"), BLURRED_CLASS));
    assert!(!dom.has_class(node(dom, "g1"), BLURRED_CLASS));

    // Reconciliation moves the message watcher onto the new container.
    overlay.tick(step(start, 2000));
    assert_eq!(
        overlay.watched_container(),
        Some(node(overlay.document(), "scroller"))
    );
}

#[test]
fn unchanged_title_is_not_a_switch() {
    let start = Instant::now();
    let mut overlay = started(team_a(), MemoryStore::new(), start);
    overlay.handle_panel(PanelAction::Play, start);

    let list = node(overlay.document(), "list");
    overlay
        .document_mut()
        .append_html(list, &group("g8", "Frank", 800.0));
    overlay.tick(step(start, 10));
    overlay.tick(step(start, 400));
    assert!(overlay.state().view().playing);
    assert!(overlay.frame_pending());
}

#[test]
fn new_messages_are_blurred_and_scanned() {
    let start = Instant::now();
    let mut overlay = started(team_a(), stored(json!({ "hidden_users": ["frank"] })), start);

    let list = node(overlay.document(), "list");
    overlay
        .document_mut()
        .append_html(list, &group("g8", "Frank", 800.0));
    overlay.tick(step(start, 10));
    assert!(!overlay
        .document()
        .has_class(node(overlay.document(), "g8"), BLURRED_CLASS));

    overlay.tick(step(start, 210));
    let dom = overlay.document();
    assert!(dom.has_class(node(dom, "g8"), BLURRED_CLASS));
    assert!(overlay.state().participants().contains(&"Frank".to_string()));
}

#[test]
fn reveal_button_uncovers_one_group() {
    let start = Instant::now();
    let mut overlay = started(team_a(), stored(json!({ "hidden_users": ["Bob"] })), start);
    let g1 = node(overlay.document(), "g1");
    let button = overlay
        .document()
        .find_descendant(g1, |doc, n| doc.has_class(n, REVEAL_BUTTON_CLASS))
        .unwrap();
    assert!(overlay.reveal_clicked(button));
    let dom = overlay.document();
    assert!(dom.has_class(g1, REVEALED_CLASS));
    assert!(!dom.has_class(node(dom, "g5"), REVEALED_CLASS));
}

#[test]
fn combo_commit_persists_once_and_rejects_duplicates() {
    let start = Instant::now();
    let mut overlay = started(team_a(), MemoryStore::new(), start);

    let commit = |overlay: &mut TestOverlay, text: &str| {
        for event in [
            ComboEvent::Focused,
            ComboEvent::InputChanged(text.to_string()),
            ComboEvent::Key(ComboKey::Enter),
        ] {
            overlay.handle_panel(
                PanelAction::Combo {
                    target: ComboTarget::Hidden,
                    event,
                },
                start,
            );
        }
    };

    commit(&mut overlay, "Eve");
    let after_first = overlay.store().clone();
    assert_eq!(after_first.values()[KEY_HIDDEN_USERS], json!(["Eve"]));
    assert!(overlay
        .document()
        .has_class(node(overlay.document(), "g4"), BLURRED_CLASS));

    commit(&mut overlay, "Eve");
    assert_eq!(overlay.store(), &after_first);
    assert_eq!(overlay.state().settings().hidden_users.len(), 1);
}

#[test]
fn combo_closes_only_after_grace_delay() {
    let start = Instant::now();
    let mut overlay = started(team_a(), MemoryStore::new(), start);
    for event in [ComboEvent::Focused, ComboEvent::Blurred] {
        overlay.handle_panel(
            PanelAction::Combo {
                target: ComboTarget::Important,
                event,
            },
            start,
        );
    }
    assert!(overlay.state().combo(ComboTarget::Important).is_open());
    overlay.tick(step(start, 149));
    assert!(overlay.state().combo(ComboTarget::Important).is_open());
    overlay.tick(step(start, 150));
    assert!(!overlay.state().combo(ComboTarget::Important).is_open());
}

#[test]
fn removing_a_name_unblurs_and_persists() {
    let start = Instant::now();
    let mut overlay = started(team_a(), stored(json!({ "hidden_users": ["Bob", "Eve"] })), start);
    overlay.handle_panel(
        PanelAction::Remove {
            target: ComboTarget::Hidden,
            name: "Bob".to_string(),
        },
        start,
    );
    assert_eq!(overlay.store().values()[KEY_HIDDEN_USERS], json!(["Eve"]));
    let dom = overlay.document();
    assert!(!dom.has_class(node(dom, "g1"), BLURRED_CLASS));
    assert!(dom.has_class(node(dom, "g4"), BLURRED_CLASS));
}

#[test]
fn slider_and_panel_state_are_persisted() {
    let start = Instant::now();
    let mut overlay = started(team_a(), MemoryStore::new(), start);
    overlay.take_commands();

    overlay.handle_panel(PanelAction::BaseSpeed(3.5), start);
    overlay.handle_panel(PanelAction::Restore, start);
    let commands = overlay.take_commands();
    assert_eq!(
        speed_text(&commands, ControlId::SpeedLabel).as_deref(),
        Some("3.5x")
    );
    assert!(commands.contains(&PanelCommand::SetMinimized(false)));
    assert_eq!(overlay.store().values()[KEY_BASE_SPEED], json!(3.5));
    assert_eq!(overlay.store().values()[KEY_PANEL_MINIMIZED], json!(false));
}

#[test]
fn dragging_moves_the_panel() {
    let start = Instant::now();
    let mut overlay = started(team_a(), MemoryStore::new(), start);
    overlay.take_commands();
    overlay.handle_panel(
        PanelAction::HeaderPointerDown {
            pointer: Point::new(110.0, 60.0),
            panel_origin: Point::new(100.0, 50.0),
            on_button: false,
        },
        start,
    );
    overlay.handle_panel(PanelAction::PointerMoved(Point::new(5.0, 300.0)), start);
    overlay.handle_panel(PanelAction::PointerUp, start);
    overlay.handle_panel(PanelAction::PointerMoved(Point::new(400.0, 400.0)), start);
    let moves: Vec<_> = overlay
        .take_commands()
        .into_iter()
        .filter_map(|c| match c {
            PanelCommand::MovePanel(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(moves, vec![Point::new(0.0, 290.0)]);
}

#[test]
fn missing_panel_markup_leaves_automation_working() {
    init_logging();
    let start = Instant::now();
    let mut overlay: TestOverlay = Overlay::new(
        team_a(),
        MemoryStore::new(),
        OverlaySettings::default(),
        "<div>no controls</div>",
        start,
    );
    overlay.tick(start);
    assert!(!overlay.panel_bound());
    assert!(overlay.take_commands().is_empty());

    overlay.handle_panel(PanelAction::Play, start);
    let (_, frames) = run_frames(&mut overlay, start, 5000);
    assert!(frames > 0);
    assert_eq!(
        shown_toasts(&overlay.take_commands()),
        vec![REACHED_END_TOAST]
    );
}

struct BrokenStore;

impl SettingsStore for BrokenStore {
    fn get(&self, _: &[&str]) -> Result<StoreMap, StoreError> {
        Err(StoreError::Unavailable("extension context invalidated".into()))
    }

    fn set(&mut self, _: StoreMap) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("extension context invalidated".into()))
    }
}

#[test]
fn store_failures_degrade_to_in_memory_settings() {
    init_logging();
    let start = Instant::now();
    let mut overlay = Overlay::new(
        team_a(),
        BrokenStore,
        OverlaySettings::default(),
        PANEL_MARKUP,
        start,
    );
    overlay.tick(start);
    assert!(overlay.is_started());
    assert_eq!(overlay.state().settings().base_speed, 2.0);

    overlay.handle_panel(
        PanelAction::Combo {
            target: ComboTarget::Hidden,
            event: ComboEvent::InputChanged("Carol".into()),
        },
        start,
    );
    overlay.handle_panel(
        PanelAction::Combo {
            target: ComboTarget::Hidden,
            event: ComboEvent::Key(ComboKey::Enter),
        },
        start,
    );
    assert_eq!(overlay.state().settings().hidden_users.len(), 1);
    assert!(overlay
        .document()
        .has_class(node(overlay.document(), "g6"), BLURRED_CLASS));
}

#[test]
fn settings_written_by_one_overlay_are_read_by_the_next() {
    let start = Instant::now();
    let mut first = started(team_a(), MemoryStore::new(), start);
    first.handle_panel(PanelAction::ImportantSpeed(0.8), start);
    let store = first.store().clone();

    let mut settings = scroller_core::Settings::default();
    settings.important_speed = 0.8;
    let expected = encode_settings(&settings);
    for (key, value) in &expected {
        assert_eq!(&store.values()[key], value);
    }

    let second = started(team_a(), store, start);
    assert_eq!(second.state().settings().important_speed, 0.8);
}
