mod common;

use common::{chat_page, node, team_a};
use scroller_engine::{DomTree, HostDocument, Locator, LocatorConfig, NodeId, StrategyChain};

fn locator() -> Locator<DomTree> {
    Locator::new(LocatorConfig::default())
}

#[test]
fn finds_container_and_host_from_first_message() {
    let dom = team_a();
    let landmarks = locator().locate(&dom).expect("conversation open");
    assert_eq!(landmarks.container, node(&dom, "scroller"));
    assert_eq!(landmarks.host, node(&dom, "list"));
    assert_eq!(locator().message_groups(&dom).len(), 8);
}

#[test]
fn no_message_element_means_no_conversation() {
    let dom = DomTree::parse(
        r#"<html><body><div id="app"><div style="overflow-y: scroll" data-height="100"><div data-height="900"></div></div></div></body></html>"#,
    );
    assert!(locator().find_anchor(&dom).is_none());
    assert!(locator().locate(&dom).is_none());
    assert!(locator().message_groups(&dom).is_empty());
}

#[test]
fn overflow_within_slack_is_not_scrollable() {
    // Content overflows by 40px, below the 50px slack.
    let dom = DomTree::parse(
        r#"<html><body><div id="c" style="overflow-y: auto" data-height="400"><div data-id="m" data-height="440"></div></div></body></html>"#,
    );
    assert!(locator().container(&dom).is_none());

    let generous = Locator::<DomTree>::new(LocatorConfig {
        scroll_slack_px: 10.0,
        ..LocatorConfig::default()
    });
    assert_eq!(generous.container(&dom), Some(node(&dom, "c")));
}

#[test]
fn hidden_overflow_is_skipped_for_an_outer_scroller() {
    let dom = DomTree::parse(
        r#"<html><body><div id="outer" style="overflow: scroll" data-height="300"><div id="inner" style="overflow-y: hidden" data-height="200"><div data-id="m" data-height="900"></div></div></div></body></html>"#,
    );
    // `inner` clips its content, so `outer` never overflows.
    assert!(locator().container(&dom).is_none());

    let dom = DomTree::parse(
        r#"<html><body><div id="outer" style="overflow: scroll" data-height="300"><div id="inner" style="overflow-y: hidden"><div data-id="m" data-height="900"></div></div></div></body></html>"#,
    );
    assert_eq!(locator().container(&dom), Some(node(&dom, "outer")));
}

#[test]
fn wrapped_list_is_found_one_level_down() {
    let items: String = (0..11)
        .map(|i| format!(r#"<div data-id="m{i}" data-top="{}" data-height="100"></div>"#, i * 100))
        .collect();
    let dom = DomTree::parse(&format!(
        r#"<html><body><div id="c" style="overflow-y: auto" data-height="300"><div id="wrapper"><div id="rows">{items}</div></div></div></body></html>"#
    ));
    let landmarks = locator().locate(&dom).unwrap();
    assert_eq!(landmarks.container, node(&dom, "c"));
    assert_eq!(landmarks.host, node(&dom, "rows"));
}

#[test]
fn short_lists_fall_back_to_the_container() {
    let dom = DomTree::parse(&chat_page("Small", &["Alice", "Bob", "Carol", "Dana", "Eve"]));
    let landmarks = locator().locate(&dom).unwrap();
    assert_eq!(landmarks.host, landmarks.container);
    // Fallback host's children are the wrapper, not the groups.
    assert_eq!(dom.children(landmarks.host), vec![node(&dom, "list")]);
}

#[test]
fn strategy_chains_are_replaceable() {
    fn by_marker(doc: &DomTree, _: &LocatorConfig, root: NodeId) -> Option<NodeId> {
        doc.find_descendant(root, |doc, node| doc.has_class(node, "message"))
    }
    fn nearest_scroller(doc: &DomTree, _: &LocatorConfig, anchor: NodeId) -> Option<NodeId> {
        doc.ancestors(anchor)
            .into_iter()
            .find(|node| doc.overflow_y(*node).scrolls())
    }

    let chain = StrategyChain::new("anchor").with("message-class", by_marker);
    assert_eq!(chain.names(), vec!["message-class"]);

    let locator = Locator::with_chains(
        LocatorConfig::default(),
        chain,
        StrategyChain::new("container").with("nearest-scroller", nearest_scroller),
        StrategyChain::new("host"),
    );
    let dom = DomTree::parse(
        r#"<html><body><div id="c" style="overflow: auto" data-height="50"><p class="message">hi</p></div></body></html>"#,
    );
    let landmarks = locator.locate(&dom).unwrap();
    assert_eq!(landmarks.container, node(&dom, "c"));
    assert_eq!(landmarks.host, landmarks.container);
}
