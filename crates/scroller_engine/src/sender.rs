use std::collections::BTreeSet;

use crate::dom::HostDocument;

pub const SENDER_LABEL_PREFIX: &str = "Open chat details for ";

/// Sender of a message group, from the avatar's accessible label.
pub fn sender_of<D: HostDocument>(doc: &D, group: D::Node) -> Option<String> {
    let label = doc.find_descendant(group, |doc, node| sender_label(doc, node).is_some())?;
    sender_label(doc, label)
        .map(strip_unverified_marker)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Title of the open conversation, or an empty string while none is shown.
pub fn conversation_title<D: HostDocument>(doc: &D) -> String {
    let root = doc.root();
    let header_title = doc.find_descendant(root, |doc, node| {
        doc.tag(node) == "span"
            && doc.attr(node, "title").is_some()
            && doc.ancestors(node).into_iter().skip(1).any(|a| doc.tag(a) == "header")
    });
    if let Some(title) = header_title.and_then(|node| doc.attr(node, "title")) {
        return title.to_string();
    }

    doc.find_descendant(root, |doc, node| {
        doc.tag(node) == "span"
            && doc
                .ancestors(node)
                .into_iter()
                .skip(1)
                .any(|a| doc.has_class(a, "_ak8q"))
    })
    .map(|node| doc.text(node).trim().to_string())
    .unwrap_or_default()
}

/// Every distinct sender label currently mounted, sorted.
///
/// Only rendered messages are visible here, so a virtualized list yields a
/// partial roster.
pub fn scan_participants<D: HostDocument>(doc: &D) -> Vec<String> {
    let names: BTreeSet<String> = doc
        .find_all(doc.root(), |doc, node| sender_label(doc, node).is_some())
        .into_iter()
        .filter_map(|node| sender_label(doc, node))
        .map(strip_unverified_marker)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    names.into_iter().collect()
}

fn sender_label<D: HostDocument>(doc: &D, node: D::Node) -> Option<&str> {
    doc.attr(node, "aria-label")?.strip_prefix(SENDER_LABEL_PREFIX)
}

/// Drops the `~` / `~ Maybe:` marker shown for contacts not in the address book.
fn strip_unverified_marker(name: &str) -> &str {
    let Some(rest) = name.strip_prefix('~') else {
        return name;
    };
    let rest = rest.trim_start();
    const MAYBE: &str = "maybe:";
    match rest.get(..MAYBE.len()) {
        Some(head) if head.eq_ignore_ascii_case(MAYBE) => rest[MAYBE.len()..].trim_start(),
        _ => rest,
    }
}
