use std::collections::VecDeque;
use std::time::Instant;

use engine_logging::{
    engine_debug, engine_error, engine_info, engine_trace, engine_warn, frame_trace, set_frame,
};
use scroller_core::{
    update, AppState, ComboEvent, ComboTarget, Deadline, Effect, FrameTicket, Interval, Msg, Timer,
};

use crate::classify::{apply_blur, refresh_important, reveal, Classification};
use crate::config::OverlaySettings;
use crate::dom::{HostDocument, HostSignal};
use crate::locate::Locator;
use crate::panel::{PanelAction, PanelBindings, PanelCommand};
use crate::sender::{conversation_title, scan_participants};
use crate::store::{
    decode_panel_minimized, decode_settings, encode_panel_state, encode_settings, SettingsStore,
    KEY_PANEL_MINIMIZED, SETTINGS_KEYS,
};
use crate::watch::{ConversationWatcher, MessageWatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    WaitingForMessages { deadline: Deadline },
    Running,
}

#[derive(Debug, Default)]
struct Toast {
    text: Option<String>,
    timer: Timer,
}

/// The engine context: owns the host document, the settings store and every
/// timer, and executes the effects the pure core asks for.
///
/// The host drives it with [`tick`](Overlay::tick) from its task queue and
/// [`frame`](Overlay::frame) from its animation callback.
pub struct Overlay<D: HostDocument, S: SettingsStore> {
    doc: D,
    store: S,
    config: OverlaySettings,
    locator: Locator<D>,
    state: AppState,
    phase: Phase,
    panel: Option<PanelBindings>,
    conversation: ConversationWatcher<D::Node>,
    messages: MessageWatcher<D::Node>,
    chat_open: Interval,
    settle: Timer,
    important_close: Timer,
    hidden_close: Timer,
    toast: Toast,
    pending_frame: Option<FrameTicket>,
    frames: u64,
    classification: Classification<D::Node>,
    inbox: VecDeque<Msg>,
    commands: Vec<PanelCommand>,
}

impl<D: HostDocument, S: SettingsStore> Overlay<D, S> {
    pub fn new(
        doc: D,
        store: S,
        config: OverlaySettings,
        panel_markup: &str,
        now: Instant,
    ) -> Self {
        let panel = match PanelBindings::from_markup(panel_markup) {
            Ok(bindings) => Some(bindings),
            Err(err) => {
                engine_error!("Panel unavailable: {}", err);
                None
            }
        };
        Self {
            locator: Locator::new(config.locator.clone()),
            conversation: ConversationWatcher::new(config.conversation_debounce),
            messages: MessageWatcher::new(
                config.message_debounce,
                config.scroll_debounce,
                config.reconcile_interval,
                now,
            ),
            chat_open: Interval::new(config.chat_open_interval, now),
            phase: Phase::WaitingForMessages {
                deadline: Deadline::after(now, config.startup_timeout),
            },
            doc,
            store,
            config,
            state: AppState::new(),
            panel,
            settle: Timer::new(),
            important_close: Timer::new(),
            hidden_close: Timer::new(),
            toast: Toast::default(),
            pending_frame: None,
            frames: 0,
            classification: Classification::default(),
            inbox: VecDeque::new(),
            commands: Vec::new(),
        }
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Mutable host access, for hosts that change the page between ticks.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn locator(&self) -> &Locator<D> {
        &self.locator
    }

    pub fn is_started(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn panel_bound(&self) -> bool {
        self.panel.is_some()
    }

    pub fn frame_pending(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.text.as_deref()
    }

    /// Container the message watcher is subscribed to.
    pub fn watched_container(&self) -> Option<D::Node> {
        self.messages.container()
    }

    /// Result of the latest important-sender pass.
    pub fn classification(&self) -> &Classification<D::Node> {
        &self.classification
    }

    pub fn take_commands(&mut self) -> Vec<PanelCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Runs startup, drains host signals and fires due timers.
    pub fn tick(&mut self, now: Instant) {
        if let Phase::WaitingForMessages { deadline } = self.phase {
            if self.locator.find_anchor(&self.doc).is_some() {
                self.start(now);
            } else if deadline.reached(now) {
                engine_warn!(
                    "No message element after {:?}; starting without a conversation",
                    self.config.startup_timeout
                );
                self.start(now);
            } else {
                self.doc.drain_signals();
                return;
            }
        }
        self.pump_signals(now);
        self.poll_timers(now);
    }

    /// Runs the pending scroll step, if any. Returns whether one ran.
    pub fn frame(&mut self, now: Instant) -> bool {
        let Some(ticket) = self.pending_frame.take() else {
            return false;
        };
        self.frames += 1;
        set_frame(self.frames);
        let container = self
            .locator
            .container(&self.doc)
            .map(|node| self.doc.scroll_metrics(node));
        let important_in_view = self.reclassify_important();
        frame_trace!(
            "step {:?} container {:?} important_in_view {}",
            ticket,
            container,
            important_in_view
        );
        self.dispatch(
            Msg::Frame {
                ticket,
                container,
                important_in_view,
            },
            now,
        );
        true
    }

    pub fn handle_panel(&mut self, action: PanelAction, now: Instant) {
        engine_debug!("Panel action {:?}", action);
        self.dispatch(action.into(), now);
    }

    /// Click on a blur overlay's reveal button.
    pub fn reveal_clicked(&mut self, button: D::Node) -> bool {
        reveal(&mut self.doc, button)
    }

    fn start(&mut self, now: Instant) {
        self.phase = Phase::Running;
        self.messages = MessageWatcher::new(
            self.config.message_debounce,
            self.config.scroll_debounce,
            self.config.reconcile_interval,
            now,
        );
        self.chat_open = Interval::new(self.config.chat_open_interval, now);
        self.doc.drain_signals();

        let title = conversation_title(&self.doc);
        engine_info!("Overlay starting in conversation '{}'", title);
        self.conversation.start(&self.doc);
        self.messages.reconcile(&self.doc, &self.locator);
        self.dispatch(Msg::Started { title }, now);
    }

    fn pump_signals(&mut self, now: Instant) {
        for signal in self.doc.drain_signals() {
            match signal {
                HostSignal::Mutation(mutation) => {
                    self.conversation.observe(&self.doc, &mutation, now);
                    self.messages.observe(&self.doc, &mutation, now);
                }
                HostSignal::Scroll(node) => {
                    self.messages.observe_scroll(node, now);
                }
            }
        }
    }

    fn poll_timers(&mut self, now: Instant) {
        if self.conversation.poll(now) {
            let title = conversation_title(&self.doc);
            engine_debug!("Document settled; current title '{}'", title);
            self.dispatch(Msg::ConversationObserved(title), now);
        }

        let events = self.messages.poll(&self.doc, &self.locator, now);
        if events.messages_changed {
            self.dispatch(Msg::MessagesChanged, now);
        }
        if events.scrolled {
            self.dispatch(Msg::Scrolled, now);
        }

        if self.chat_open.poll(now) {
            let open = self.locator.container(&self.doc).is_some();
            self.dispatch(Msg::ChatOpenChecked(open), now);
        }
        if self.settle.poll(now) {
            self.dispatch(Msg::SettleElapsed, now);
        }
        if self.important_close.poll(now) {
            self.close_combo(ComboTarget::Important, now);
        }
        if self.hidden_close.poll(now) {
            self.close_combo(ComboTarget::Hidden, now);
        }
        if self.toast.timer.poll(now) {
            self.toast.text = None;
            self.commands.push(PanelCommand::HideToast);
        }
    }

    fn close_combo(&mut self, target: ComboTarget, now: Instant) {
        self.dispatch(
            Msg::Combo {
                target,
                event: ComboEvent::CloseElapsed,
            },
            now,
        );
    }

    /// Applies `msg` and everything it causes, then renders once if dirty.
    fn dispatch(&mut self, msg: Msg, now: Instant) {
        self.inbox.push_back(msg);
        while let Some(msg) = self.inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                self.run_effect(effect, now);
            }
        }
        if self.state.consume_dirty() {
            if let Some(panel) = &self.panel {
                self.commands.extend(panel.render(&self.state.view()));
            }
        }
    }

    fn run_effect(&mut self, effect: Effect, now: Instant) {
        match effect {
            Effect::RequestFrame(ticket) => self.pending_frame = Some(ticket),
            Effect::SetScrollTop(scroll_top) => {
                if let Some(container) = self.locator.container(&self.doc) {
                    self.doc.set_scroll_top(container, scroll_top);
                }
            }
            Effect::ScrollStopped(reason) => {
                self.pending_frame = None;
                engine_info!("Auto-scroll stopped: {:?}", reason);
            }
            Effect::ShowToast(text) => {
                self.toast.timer.arm(now, self.config.toast_duration);
                self.toast.text = Some(text.clone());
                self.commands.push(PanelCommand::ShowToast(text));
            }
            Effect::LoadSettings(reason) => {
                let settings = match self.store.get(&SETTINGS_KEYS) {
                    Ok(values) => decode_settings(&values),
                    Err(err) => {
                        engine_error!("Loading settings failed, keeping current ones: {}", err);
                        self.state.settings().clone()
                    }
                };
                self.inbox.push_back(Msg::SettingsLoaded { settings, reason });
            }
            Effect::LoadPanelState => match self.store.get(&[KEY_PANEL_MINIMIZED]) {
                Ok(values) => self.inbox.push_back(Msg::PanelStateLoaded {
                    minimized: decode_panel_minimized(&values),
                }),
                Err(err) => engine_error!("Loading panel state failed: {}", err),
            },
            Effect::PersistSettings(settings) => {
                if let Err(err) = self.store.set(encode_settings(&settings)) {
                    engine_error!("Saving settings failed: {}", err);
                }
            }
            Effect::PersistPanelState { minimized } => {
                if let Err(err) = self.store.set(encode_panel_state(minimized)) {
                    engine_error!("Saving panel state failed: {}", err);
                }
            }
            Effect::ScheduleSettle => self.settle.arm(now, self.config.settle_delay),
            Effect::ScheduleComboClose(ComboTarget::Important) => {
                self.important_close.arm(now, self.config.combo_close_grace)
            }
            Effect::ScheduleComboClose(ComboTarget::Hidden) => {
                self.hidden_close.arm(now, self.config.combo_close_grace)
            }
            Effect::RescanParticipants => {
                let names = scan_participants(&self.doc);
                self.inbox.push_back(Msg::ParticipantsScanned(names));
            }
            Effect::ApplyBlur => {
                let groups = self.locator.message_groups(&self.doc);
                let hidden = &self.state.settings().hidden_users;
                let blurred = apply_blur(&mut self.doc, &groups, hidden);
                engine_trace!("Blur pass: {} of {} groups hidden", blurred, groups.len());
            }
            Effect::RefreshImportant => {
                self.reclassify_important();
            }
        }
    }

    fn reclassify_important(&mut self) -> bool {
        let Some(landmarks) = self.locator.locate(&self.doc) else {
            self.classification = Classification::default();
            return false;
        };
        let viewport = self.doc.bounding_rect(landmarks.container);
        let groups = self.doc.children(landmarks.host);
        self.classification = refresh_important(
            &mut self.doc,
            &groups,
            &self.state.settings().important_people,
            viewport,
        );
        self.classification.important_in_view
    }
}
