use std::time::{Duration, Instant};

use engine_logging::{engine_debug, engine_info};
use scroller_core::{Debouncer, Interval};

use crate::dom::{HostDocument, Mutation, MutationKind};
use crate::locate::Locator;

/// Which mutations a subscription reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeScope {
    /// Child-list and text changes anywhere under the target.
    Subtree,
    /// Child-list changes on the target itself that add nodes.
    AddedChildren,
}

/// A debounced change subscription bound to one target node.
///
/// Matching mutations restart the debounce window; [`poll`] reports one
/// fire per quiet window.
///
/// [`poll`]: ChangeWatcher::poll
#[derive(Debug, Clone)]
pub struct ChangeWatcher<N> {
    scope: ChangeScope,
    target: Option<N>,
    debouncer: Debouncer,
}

impl<N: Copy + Eq + std::fmt::Debug> ChangeWatcher<N> {
    pub fn new(scope: ChangeScope, delay: Duration) -> Self {
        Self {
            scope,
            target: None,
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn subscribe(&mut self, target: N) {
        self.target = Some(target);
        self.debouncer.cancel();
    }

    /// Drops the target and any pending fire.
    pub fn unsubscribe(&mut self) {
        self.target = None;
        self.debouncer.cancel();
    }

    pub fn target(&self) -> Option<N> {
        self.target
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Feeds one mutation; returns whether it matched this subscription.
    pub fn observe<D>(&mut self, doc: &D, mutation: &Mutation<N>, now: Instant) -> bool
    where
        D: HostDocument<Node = N>,
    {
        let Some(target) = self.target else {
            return false;
        };
        let matched = match self.scope {
            ChangeScope::Subtree => {
                !matches!(mutation.kind, MutationKind::Attributes)
                    && doc.contains(target, mutation.target)
            }
            ChangeScope::AddedChildren => {
                mutation.target == target
                    && matches!(mutation.kind, MutationKind::ChildList { added, .. } if added > 0)
            }
        };
        if matched {
            self.debouncer.trigger(now);
        }
        matched
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        self.target.is_some() && self.debouncer.poll(now)
    }
}

/// Watches the app root for conversation switches.
#[derive(Debug, Clone)]
pub struct ConversationWatcher<N> {
    changes: ChangeWatcher<N>,
}

impl<N: Copy + Eq + std::fmt::Debug> ConversationWatcher<N> {
    pub fn new(delay: Duration) -> Self {
        Self {
            changes: ChangeWatcher::new(ChangeScope::Subtree, delay),
        }
    }

    /// Subscribes to `#app`, else `body`, else the document itself.
    pub fn start<D>(&mut self, doc: &D)
    where
        D: HostDocument<Node = N>,
    {
        let root = doc.root();
        let target = doc
            .first_by_id("app")
            .or_else(|| doc.find_descendant(root, |doc, node| doc.tag(node) == "body"))
            .unwrap_or(root);
        engine_debug!("Conversation watcher subscribed to {:?}", target);
        self.changes.subscribe(target);
    }

    pub fn stop(&mut self) {
        self.changes.unsubscribe();
    }

    pub fn observe<D>(&mut self, doc: &D, mutation: &Mutation<N>, now: Instant) -> bool
    where
        D: HostDocument<Node = N>,
    {
        self.changes.observe(doc, mutation, now)
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        self.changes.poll(now)
    }
}

/// What the message watcher wants the runtime to do after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageEvents {
    pub messages_changed: bool,
    pub scrolled: bool,
}

/// Watches the message-list host for new messages and the scroll container
/// for manual scrolling, re-subscribing when the container is replaced.
#[derive(Debug, Clone)]
pub struct MessageWatcher<N> {
    messages: ChangeWatcher<N>,
    container: Option<N>,
    scroll: Debouncer,
    reconcile: Interval,
}

impl<N: Copy + Eq + std::fmt::Debug> MessageWatcher<N> {
    pub fn new(
        message_delay: Duration,
        scroll_delay: Duration,
        reconcile_every: Duration,
        now: Instant,
    ) -> Self {
        Self {
            messages: ChangeWatcher::new(ChangeScope::AddedChildren, message_delay),
            container: None,
            scroll: Debouncer::new(scroll_delay),
            reconcile: Interval::new(reconcile_every, now),
        }
    }

    pub fn container(&self) -> Option<N> {
        self.container
    }

    pub fn host(&self) -> Option<N> {
        self.messages.target()
    }

    /// Re-subscribes when the discoverable container differs from the one
    /// being watched. A vanished container keeps the old subscription.
    /// Returns whether a switch happened.
    pub fn reconcile<D>(&mut self, doc: &D, locator: &Locator<D>) -> bool
    where
        D: HostDocument<Node = N>,
    {
        let Some(landmarks) = locator.locate(doc) else {
            return false;
        };
        if self.container == Some(landmarks.container) {
            return false;
        }
        engine_info!(
            "Message container changed {:?} -> {:?}; watching host {:?}",
            self.container,
            landmarks.container,
            landmarks.host
        );
        self.messages.unsubscribe();
        self.scroll.cancel();
        self.container = Some(landmarks.container);
        self.messages.subscribe(landmarks.host);
        true
    }

    pub fn observe<D>(&mut self, doc: &D, mutation: &Mutation<N>, now: Instant) -> bool
    where
        D: HostDocument<Node = N>,
    {
        self.messages.observe(doc, mutation, now)
    }

    pub fn observe_scroll(&mut self, node: N, now: Instant) -> bool {
        if self.container != Some(node) {
            return false;
        }
        self.scroll.trigger(now);
        true
    }

    /// Runs the reconciliation interval and both debouncers.
    pub fn poll<D>(&mut self, doc: &D, locator: &Locator<D>, now: Instant) -> MessageEvents
    where
        D: HostDocument<Node = N>,
    {
        if self.reconcile.poll(now) {
            self.reconcile(doc, locator);
        }
        MessageEvents {
            messages_changed: self.messages.poll(now),
            scrolled: self.scroll.poll(now),
        }
    }
}
