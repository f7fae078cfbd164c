#![allow(dead_code)]

use std::sync::Once;
use std::time::{Duration, Instant};

use scroller_engine::{DomTree, HostDocument, NodeId};

pub const GROUP_HEIGHT: f64 = 100.0;
pub const VIEWPORT_TOP: f64 = 100.0;
pub const VIEWPORT_HEIGHT: f64 = 400.0;

pub const PANEL_MARKUP: &str = r#"
<div id="wa-scroller-panel">
  <div id="wa-panel-header"><span>Scroller</span><button id="wa-panel-minimize">_</button></div>
  <button id="wa-play-btn">&#9654;</button>
  <input id="wa-speed-slider" type="range"><span id="wa-speed-label"></span>
  <input id="wa-important-speed-slider" type="range"><span id="wa-important-speed-label"></span>
  <div id="wa-important-combo" class="wa-combo"><input class="wa-combo-input"><div class="wa-combo-list"></div></div>
  <ul id="wa-important-list"></ul>
  <div id="wa-hidden-combo" class="wa-combo"><input class="wa-combo-input"><div class="wa-combo-list"></div></div>
  <ul id="wa-hidden-list"></ul>
</div>
<button id="wa-scroller-fab">WA</button>
"#;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Markup for one message group: avatar label, in-bubble name, text.
pub fn group(id: &str, sender: &str, top: f64) -> String {
    format!(
        r#"<div id="{id}" data-top="{top}" data-height="{GROUP_HEIGHT}"><div data-id="{id}-msg"><span aria-label="Open chat details for {sender}"></span><div role=""><span dir="auto">{sender}</span></div><span class="text">message from {sender}</span></div></div>"#
    )
}

/// Header plus a scroll container whose groups are stacked every
/// `GROUP_HEIGHT` pixels; the content of `#app` when a chat is open.
pub fn conversation(title: &str, senders: &[&str]) -> String {
    let groups: String = senders
        .iter()
        .enumerate()
        .map(|(i, sender)| group(&format!("g{i}"), sender, i as f64 * GROUP_HEIGHT))
        .collect();
    format!(
        r#"<header><span title="{title}">{title}</span></header><div id="pane"><div id="scroller" style="overflow-y: auto" data-top="{VIEWPORT_TOP}" data-height="{VIEWPORT_HEIGHT}"><div id="list">{groups}</div></div></div>"#
    )
}

pub fn chat_page(title: &str, senders: &[&str]) -> String {
    format!(
        r#"<html><body><div id="app">{}</div></body></html>"#,
        conversation(title, senders)
    )
}

pub const EMPTY_APP: &str = r#"<html><body><div id="app"><div id="landing">Select a chat</div></div></body></html>"#;

pub const TEAM_A: [&str; 8] = ["Alice", "Bob", "~ Maybe: Dana", "Alice", "Eve", "Bob", "Carol", "Alice"];

pub fn team_a() -> DomTree {
    DomTree::parse(&chat_page("Team A", &TEAM_A))
}

pub fn node(dom: &DomTree, id: &str) -> NodeId {
    dom.first_by_id(id)
        .unwrap_or_else(|| panic!("fixture has no #{id}"))
}

pub fn step(start: Instant, at_ms: u64) -> Instant {
    start + ms(at_ms)
}
