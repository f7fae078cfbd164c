use crate::effect::REACHED_END_TOAST;
use crate::{
    AppState, ComboOutcome, ComboTarget, Effect, LoadReason, Msg, StepOutcome, StopReason,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started { title } => {
            state.set_conversation_title(title);
            vec![Effect::LoadSettings(LoadReason::Startup), Effect::LoadPanelState]
        }
        Msg::SettingsLoaded { settings, reason } => {
            state.replace_settings(settings);
            state.reset_combos();
            state.mark_dirty();
            match reason {
                LoadReason::Startup => vec![Effect::RescanParticipants, Effect::ApplyBlur],
                // Give the new conversation's messages time to mount.
                LoadReason::ConversationSwitch => vec![Effect::ScheduleSettle],
            }
        }
        Msg::PanelStateLoaded { minimized } => {
            state.set_panel_minimized(minimized);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ConversationObserved(title) => {
            if title.is_empty() || title == state.conversation_title() {
                return (state, Vec::new());
            }
            state.set_conversation_title(title);
            state.mark_dirty();
            let mut effects = Vec::with_capacity(2);
            if state.scroll_mut().stop() {
                effects.push(Effect::ScrollStopped(StopReason::ConversationSwitched));
            }
            effects.push(Effect::LoadSettings(LoadReason::ConversationSwitch));
            effects
        }
        Msg::SettleElapsed => vec![Effect::RescanParticipants, Effect::ApplyBlur],
        Msg::ParticipantsScanned(mut names) => {
            names.sort();
            names.dedup();
            if state.set_participants(names) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::MessagesChanged => vec![
            Effect::ApplyBlur,
            Effect::RescanParticipants,
            Effect::RefreshImportant,
        ],
        Msg::Scrolled => vec![Effect::RefreshImportant],
        Msg::ChatOpenChecked(open) => {
            if state.set_chat_open(open) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PlayClicked => {
            state.mark_dirty();
            if state.scroll().is_running() {
                state.scroll_mut().stop();
                vec![Effect::ScrollStopped(StopReason::Toggled)]
            } else {
                let base_speed = state.settings().base_speed;
                match state.scroll_mut().start(base_speed) {
                    Some(ticket) => vec![Effect::RequestFrame(ticket)],
                    None => Vec::new(),
                }
            }
        }
        Msg::Frame {
            ticket,
            container,
            important_in_view,
        } => {
            let target = if important_in_view {
                state.settings().important_speed
            } else {
                state.settings().base_speed
            };
            match state.scroll_mut().step(ticket, container, target) {
                StepOutcome::Stale => Vec::new(),
                StepOutcome::ContainerLost => {
                    state.mark_dirty();
                    vec![Effect::ScrollStopped(StopReason::ContainerLost)]
                }
                StepOutcome::Advanced { scroll_top, next } => {
                    vec![Effect::SetScrollTop(scroll_top), Effect::RequestFrame(next)]
                }
                StepOutcome::ReachedEnd { scroll_top } => {
                    state.mark_dirty();
                    vec![
                        Effect::SetScrollTop(scroll_top),
                        Effect::ScrollStopped(StopReason::ReachedEnd),
                        Effect::ShowToast(REACHED_END_TOAST.to_string()),
                    ]
                }
            }
        }
        Msg::BaseSpeedChanged(speed) => {
            if !is_valid_speed(speed) {
                return (state, Vec::new());
            }
            state.settings_mut().base_speed = speed;
            state.mark_dirty();
            vec![Effect::PersistSettings(state.settings().clone())]
        }
        Msg::ImportantSpeedChanged(speed) => {
            if !is_valid_speed(speed) {
                return (state, Vec::new());
            }
            state.settings_mut().important_speed = speed;
            state.mark_dirty();
            vec![Effect::PersistSettings(state.settings().clone())]
        }
        Msg::ImportantCommitted(name) => commit_name(&mut state, ComboTarget::Important, &name),
        Msg::HiddenCommitted(name) => commit_name(&mut state, ComboTarget::Hidden, &name),
        Msg::ImportantRemoved(name) => remove_name(&mut state, ComboTarget::Important, &name),
        Msg::HiddenRemoved(name) => remove_name(&mut state, ComboTarget::Hidden, &name),
        Msg::Combo { target, event } => {
            let candidates = state.candidates_for(target);
            let source = || candidates.clone();
            let outcome = state.combo_mut(target).handle(event, &source);
            state.mark_dirty();
            match outcome {
                ComboOutcome::None => Vec::new(),
                ComboOutcome::ScheduleClose => vec![Effect::ScheduleComboClose(target)],
                ComboOutcome::Commit(name) => commit_name(&mut state, target, &name),
            }
        }
        Msg::MinimizeClicked => {
            state.set_panel_minimized(true);
            state.mark_dirty();
            vec![Effect::PersistPanelState { minimized: true }]
        }
        Msg::RestoreClicked => {
            state.set_panel_minimized(false);
            state.mark_dirty();
            vec![Effect::PersistPanelState { minimized: false }]
        }
        Msg::DragStarted {
            pointer,
            panel_origin,
            on_button,
        } => {
            state.drag_mut().begin(pointer, panel_origin, on_button);
            Vec::new()
        }
        Msg::DragMoved(pointer) => {
            if let Some(position) = state.drag_mut().move_to(pointer) {
                state.set_panel_position(position);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DragEnded => {
            state.drag_mut().end();
            Vec::new()
        }
    };

    (state, effects)
}

/// Appends to the list behind `target`. Blank and duplicate names are
/// dropped without touching state or storage.
fn commit_name(state: &mut AppState, target: ComboTarget, name: &str) -> Vec<Effect> {
    let settings = state.settings_mut();
    let inserted = match target {
        ComboTarget::Important => settings.important_people.insert(name),
        ComboTarget::Hidden => settings.hidden_users.insert(name),
    };
    if !inserted {
        return Vec::new();
    }
    state.reset_combos();
    state.mark_dirty();
    vec![
        Effect::PersistSettings(state.settings().clone()),
        reclassify(target),
    ]
}

fn remove_name(state: &mut AppState, target: ComboTarget, name: &str) -> Vec<Effect> {
    let settings = state.settings_mut();
    let removed = match target {
        ComboTarget::Important => settings.important_people.remove(name),
        ComboTarget::Hidden => settings.hidden_users.remove(name),
    };
    if !removed {
        return Vec::new();
    }
    state.reset_combos();
    state.mark_dirty();
    vec![
        Effect::PersistSettings(state.settings().clone()),
        reclassify(target),
    ]
}

fn reclassify(target: ComboTarget) -> Effect {
    match target {
        ComboTarget::Important => Effect::RefreshImportant,
        ComboTarget::Hidden => Effect::ApplyBlur,
    }
}

fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed >= 0.0
}
