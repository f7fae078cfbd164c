use scroller_core::{NameList, Rect};

use crate::dom::{DecorationSpec, HostDocument, InsertPosition};
use crate::sender::sender_of;

pub const BLURRED_CLASS: &str = "wa-blurred";
pub const REVEALED_CLASS: &str = "wa-revealed";
pub const BLUR_OVERLAY_CLASS: &str = "wa-blur-overlay";
pub const BLUR_LABEL_CLASS: &str = "wa-blur-label";
pub const REVEAL_BUTTON_CLASS: &str = "wa-blur-show-btn";
pub const IMPORTANT_CLASS: &str = "wa-important";
pub const BADGE_CLASS: &str = "wa-important-badge";

/// Per-pass view of one message group. Never cached between passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageGroupView<N> {
    pub node: N,
    pub sender: Option<String>,
    pub highlighted: bool,
    pub blurred: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<N> {
    pub important_in_view: bool,
    pub groups: Vec<MessageGroupView<N>>,
}

impl<N> Default for Classification<N> {
    fn default() -> Self {
        Self {
            important_in_view: false,
            groups: Vec::new(),
        }
    }
}

fn blur_overlay() -> DecorationSpec {
    DecorationSpec::new("div", BLUR_OVERLAY_CLASS)
        .with_child(DecorationSpec::new("span", BLUR_LABEL_CLASS).with_text("Hidden"))
        .with_child(DecorationSpec::new("button", REVEAL_BUTTON_CLASS).with_text("Click to show"))
}

fn important_badge() -> DecorationSpec {
    DecorationSpec::new("span", BADGE_CLASS).with_text("IMPORTANT")
}

/// Blurs groups whose sender is on the hidden list and clears the rest.
/// Returns how many groups are blurred afterwards.
pub fn apply_blur<D: HostDocument>(doc: &mut D, groups: &[D::Node], hidden: &NameList) -> usize {
    let mut blurred = 0;
    for &group in groups {
        let hide = sender_of(doc, group).is_some_and(|sender| hidden.matches(&sender));
        if hide {
            blurred += 1;
            if !doc.has_class(group, BLURRED_CLASS) {
                doc.add_class(group, BLURRED_CLASS);
                doc.remove_class(group, REVEALED_CLASS);
                add_blur_overlay(doc, group);
            }
        } else {
            doc.remove_class(group, BLURRED_CLASS);
            doc.remove_class(group, REVEALED_CLASS);
            remove_decoration(doc, group, BLUR_OVERLAY_CLASS);
        }
    }
    blurred
}

fn add_blur_overlay<D: HostDocument>(doc: &mut D, group: D::Node) {
    if find_class(doc, group, BLUR_OVERLAY_CLASS).is_none() {
        doc.insert_decoration(group, &blur_overlay(), InsertPosition::First);
    }
}

/// Handles a click on a reveal button: uncovers its blurred group.
pub fn reveal<D: HostDocument>(doc: &mut D, button: D::Node) -> bool {
    if !doc.has_class(button, REVEAL_BUTTON_CLASS) {
        return false;
    }
    let group = doc
        .ancestors(button)
        .into_iter()
        .find(|node| doc.has_class(*node, BLURRED_CLASS));
    match group {
        Some(group) => {
            doc.add_class(group, REVEALED_CLASS);
            true
        }
        None => false,
    }
}

/// Tags important senders whose group overlaps `viewport` and reports
/// whether any did. Groups that are off screen or no longer match lose the tag.
pub fn refresh_important<D: HostDocument>(
    doc: &mut D,
    groups: &[D::Node],
    important: &NameList,
    viewport: Rect,
) -> Classification<D::Node> {
    let mut classification = Classification::default();
    for &group in groups {
        let sender = sender_of(doc, group);
        let highlighted = sender.as_deref().is_some_and(|s| important.matches(s))
            && doc.bounding_rect(group).intersects(&viewport);
        if highlighted {
            doc.add_class(group, IMPORTANT_CLASS);
            add_badge(doc, group);
            classification.important_in_view = true;
        } else {
            doc.remove_class(group, IMPORTANT_CLASS);
            remove_decoration(doc, group, BADGE_CLASS);
        }
        classification.groups.push(MessageGroupView {
            node: group,
            sender,
            highlighted,
            blurred: doc.has_class(group, BLURRED_CLASS),
        });
    }
    classification
}

fn add_badge<D: HostDocument>(doc: &mut D, group: D::Node) {
    if find_class(doc, group, BADGE_CLASS).is_some() {
        return;
    }
    let Some(name_label) = in_bubble_name(doc, group) else {
        return;
    };
    let Some(parent) = doc.parent(name_label) else {
        return;
    };
    doc.set_style(parent, "position", "relative");
    doc.insert_decoration(parent, &important_badge(), InsertPosition::Last);
}

/// The sender name printed inside the bubble, not the avatar label.
fn in_bubble_name<D: HostDocument>(doc: &D, group: D::Node) -> Option<D::Node> {
    doc.find_descendant(group, |doc, node| {
        doc.tag(node) == "span" && doc.has_class(node, "_ahxt")
    })
    .or_else(|| {
        doc.find_descendant(group, |doc, node| {
            doc.tag(node) == "span"
                && doc.attr(node, "dir") == Some("auto")
                && doc
                    .parent(node)
                    .is_some_and(|p| doc.tag(p) == "div" && doc.attr(p, "role") == Some(""))
        })
    })
}

fn find_class<D: HostDocument>(doc: &D, group: D::Node, class: &str) -> Option<D::Node> {
    doc.find_descendant(group, |doc, node| doc.has_class(node, class))
}

fn remove_decoration<D: HostDocument>(doc: &mut D, group: D::Node, class: &str) {
    if let Some(node) = find_class(doc, group, class) {
        doc.remove(node);
    }
}
