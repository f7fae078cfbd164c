use std::collections::BTreeMap;
use std::fmt::Write as _;

use ego_tree::{NodeId, NodeRef, Tree};
use scroller_core::{Rect, ScrollMetrics};

use crate::dom::{
    DecorationSpec, HostDocument, HostSignal, InsertPosition, Mutation, MutationKind, Overflow,
};

#[derive(Debug, Clone, PartialEq)]
pub enum HostNode {
    Document,
    Element(ElementData),
    Text(String),
}

/// An element with its attributes, parsed inline style and scroll offset.
///
/// Layout comes from two attributes: `data-top` (offset inside the parent's
/// content box) and `data-height`. An element without `data-height` is as
/// tall as its content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementData {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub scroll_top: f64,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn from_attrs<'a, I>(tag: &str, attrs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut element = Self::new(tag);
        for (name, value) in attrs {
            if name.eq_ignore_ascii_case("style") {
                element.style = parse_style(value);
            } else {
                element.attrs.insert(name.to_ascii_lowercase(), value.to_string());
            }
        }
        element
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        let list = self.attrs.entry("class".to_string()).or_default();
        if !list.is_empty() {
            list.push(' ');
        }
        list.push_str(class);
        true
    }

    fn remove_class(&mut self, class: &str) -> bool {
        let Some(list) = self.attrs.get_mut("class") else {
            return false;
        };
        let kept: Vec<&str> = list.split_whitespace().filter(|c| *c != class).collect();
        if kept.len() == list.split_whitespace().count() {
            return false;
        }
        *list = kept.join(" ");
        true
    }

    fn number(&self, name: &str) -> Option<f64> {
        self.attrs
            .get(name)
            .and_then(|raw| raw.trim().trim_end_matches("px").parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }
}

fn parse_style(raw: &str) -> BTreeMap<String, String> {
    raw.split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            (!name.is_empty() && !value.is_empty()).then(|| (name, value.to_string()))
        })
        .collect()
}

/// In-memory host document backed by an `ego_tree` arena.
///
/// Every write goes through the journal so watchers see the same change
/// notifications a live page would produce.
///
/// Removal only detaches: `ego_tree` never frees arena slots, so nodes that
/// are inserted and removed repeatedly (badges, reveal overlays) keep
/// growing the arena until the document is parsed again. A detached node is
/// unreachable from the root and invisible to every query.
#[derive(Debug, Clone)]
pub struct DomTree {
    tree: Tree<HostNode>,
    signals: Vec<HostSignal<NodeId>>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    pub fn new() -> Self {
        Self {
            tree: Tree::new(HostNode::Document),
            signals: Vec::new(),
        }
    }

    pub(crate) fn from_tree(tree: Tree<HostNode>) -> Self {
        Self {
            tree,
            signals: Vec::new(),
        }
    }

    pub fn tree(&self) -> &Tree<HostNode> {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut Tree<HostNode> {
        &mut self.tree
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.tree.get(id)?.value() {
            HostNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Runs `edit` on the element at `id`. Text nodes and unknown ids
    /// yield `None`.
    fn edit_element<R>(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut ElementData) -> R,
    ) -> Option<R> {
        let mut node = self.tree.get_mut(id)?;
        match node.value() {
            HostNode::Element(element) => Some(edit(element)),
            _ => None,
        }
    }

    fn record(&mut self, target: NodeId, kind: MutationKind) {
        self.signals
            .push(HostSignal::Mutation(Mutation { target, kind }));
    }

    fn offset_top(&self, id: NodeId) -> f64 {
        self.element(id)
            .and_then(|element| element.number("data-top"))
            .unwrap_or(0.0)
    }

    fn height(&self, id: NodeId) -> f64 {
        self.element(id)
            .and_then(|element| element.number("data-height"))
            .unwrap_or_else(|| self.content_extent(id))
    }

    fn content_extent(&self, id: NodeId) -> f64 {
        self.children(id)
            .into_iter()
            .map(|child| self.offset_top(child) + self.height(child))
            .fold(0.0, f64::max)
    }

    /// Parses `fragment` and appends its top-level nodes to `parent`.
    /// Returns the inserted element ids.
    pub fn append_html(&mut self, parent: NodeId, fragment: &str) -> Vec<NodeId> {
        let html = scraper::Html::parse_fragment(fragment);
        let inserted = crate::snapshot::graft(&mut self.tree, parent, *html.root_element());
        let added: Vec<NodeId> = inserted
            .into_iter()
            .filter(|id| self.element(*id).is_some())
            .collect();
        if !added.is_empty() {
            self.record(
                parent,
                MutationKind::ChildList {
                    added: added.len(),
                    removed: 0,
                },
            );
        }
        added
    }

    /// Replaces the text content of an element.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let Some(mut node) = self.tree.get_mut(id) else {
            return;
        };
        while let Some(mut child) = node.first_child() {
            child.detach();
        }
        node.append(HostNode::Text(text.to_string()));
        self.record(id, MutationKind::CharacterData);
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        let updated = self.edit_element(id, |element| {
            element.attrs.insert(name, value.to_string());
        });
        if updated.is_some() {
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Serializes `id` and its subtree.
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.tree.get(id) {
            write_markup(node, &mut out);
        }
        out
    }

    fn build_decoration(
        &mut self,
        parent: NodeId,
        spec: &DecorationSpec,
        position: InsertPosition,
    ) -> Option<NodeId> {
        let mut element = ElementData::new(&spec.tag);
        element.attrs.insert("class".to_string(), spec.class.clone());
        let id = {
            let mut parent_node = self.tree.get_mut(parent)?;
            match position {
                InsertPosition::First => parent_node.prepend(HostNode::Element(element)).id(),
                InsertPosition::Last => parent_node.append(HostNode::Element(element)).id(),
            }
        };
        if let Some(text) = &spec.text {
            if let Some(mut node) = self.tree.get_mut(id) {
                node.append(HostNode::Text(text.clone()));
            }
        }
        for child in &spec.children {
            self.build_decoration(id, child, InsertPosition::Last);
        }
        Some(id)
    }
}

fn write_markup(node: NodeRef<'_, HostNode>, out: &mut String) {
    match node.value() {
        HostNode::Document => {
            for child in node.children() {
                write_markup(child, out);
            }
        }
        HostNode::Text(text) => out.push_str(text),
        HostNode::Element(element) => {
            let _ = write!(out, "<{}", element.tag);
            for (name, value) in &element.attrs {
                let _ = write!(out, " {name}=\"{value}\"");
            }
            if !element.style.is_empty() {
                let style: Vec<String> = element
                    .style
                    .iter()
                    .map(|(name, value)| format!("{name}: {value}"))
                    .collect();
                let _ = write!(out, " style=\"{}\"", style.join("; "));
            }
            out.push('>');
            for child in node.children() {
                write_markup(child, out);
            }
            let _ = write!(out, "</{}>", element.tag);
        }
    }
}

impl HostDocument for DomTree {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.get(node)?.parent().map(|parent| parent.id())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .get(node)
            .map(|n| {
                n.children()
                    .filter(|child| matches!(child.value(), HostNode::Element(_)))
                    .map(|child| child.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .get(node)
            .map(|n| {
                n.descendants()
                    .skip(1)
                    .filter(|d| matches!(d.value(), HostNode::Element(_)))
                    .map(|d| d.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn tag(&self, node: NodeId) -> &str {
        self.element(node).map(|e| e.tag.as_str()).unwrap_or("")
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attrs.get(name).map(String::as_str)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|e| e.has_class(class))
    }

    fn text(&self, node: NodeId) -> String {
        let Some(node) = self.tree.get(node) else {
            return String::new();
        };
        node.descendants()
            .filter_map(|d| match d.value() {
                HostNode::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?.style.get(property).map(String::as_str)
    }

    fn overflow_y(&self, node: NodeId) -> Overflow {
        self.style(node, "overflow-y")
            .or_else(|| self.style(node, "overflow"))
            .map(Overflow::parse)
            .unwrap_or_default()
    }

    fn scroll_metrics(&self, node: NodeId) -> ScrollMetrics {
        let client_height = self.height(node);
        ScrollMetrics {
            scroll_top: self.element(node).map(|e| e.scroll_top).unwrap_or(0.0),
            scroll_height: client_height.max(self.content_extent(node)),
            client_height,
        }
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        let mut top = self.offset_top(node);
        let mut current = self.parent(node);
        while let Some(ancestor) = current {
            top += self.offset_top(ancestor);
            top -= self.element(ancestor).map(|e| e.scroll_top).unwrap_or(0.0);
            current = self.parent(ancestor);
        }
        Rect::new(top, top + self.height(node))
    }

    fn set_scroll_top(&mut self, node: NodeId, scroll_top: f64) {
        let max = self.scroll_metrics(node).max_scroll_top();
        let clamped = scroll_top.clamp(0.0, max);
        let moved = self.edit_element(node, |element| {
            let moved = element.scroll_top != clamped;
            element.scroll_top = clamped;
            moved
        });
        if moved == Some(true) {
            self.signals.push(HostSignal::Scroll(node));
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if self.edit_element(node, |e| e.add_class(class)) == Some(true) {
            self.record(node, MutationKind::Attributes);
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if self.edit_element(node, |e| e.remove_class(class)) == Some(true) {
            self.record(node, MutationKind::Attributes);
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let changed = self.edit_element(node, |element| {
            if element.style.get(property).map(String::as_str) == Some(value) {
                return false;
            }
            element.style.insert(property.to_string(), value.to_string());
            true
        });
        if changed == Some(true) {
            self.record(node, MutationKind::Attributes);
        }
    }

    fn insert_decoration(
        &mut self,
        parent: NodeId,
        spec: &DecorationSpec,
        position: InsertPosition,
    ) -> Option<NodeId> {
        let id = self.build_decoration(parent, spec, position)?;
        self.record(parent, MutationKind::ChildList { added: 1, removed: 0 });
        Some(id)
    }

    fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(mut target) = self.tree.get_mut(node) {
            target.detach();
        }
        self.record(parent, MutationKind::ChildList { added: 0, removed: 1 });
    }

    fn drain_signals(&mut self) -> Vec<HostSignal<NodeId>> {
        std::mem::take(&mut self.signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_list_edits_are_idempotent() {
        let mut element = ElementData::new("div");
        assert!(element.add_class("a"));
        assert!(!element.add_class("a"));
        assert!(element.add_class("b"));
        assert_eq!(element.attrs["class"], "a b");
        assert!(element.remove_class("a"));
        assert!(!element.remove_class("a"));
        assert_eq!(element.attrs["class"], "b");
    }

    #[test]
    fn style_attribute_is_split_into_declarations() {
        let element = ElementData::from_attrs(
            "DIV",
            [("style", "overflow-y: auto; Position:relative;;"), ("id", "x")],
        );
        assert_eq!(element.tag, "div");
        assert_eq!(element.style["overflow-y"], "auto");
        assert_eq!(element.style["position"], "relative");
        assert!(!element.attrs.contains_key("style"));
    }

    #[test]
    fn removed_decorations_are_unreachable() {
        let mut dom = DomTree::parse(r#"<html><body><div id="g0">hi</div></body></html>"#);
        let group = dom.first_by_id("g0").unwrap();
        let badge = dom
            .insert_decoration(group, &DecorationSpec::new("span", "badge"), InsertPosition::Last)
            .unwrap();
        dom.drain_signals();

        dom.remove(badge);
        assert_eq!(dom.parent(badge), None);
        assert!(dom.find_all(dom.root(), |d, n| d.has_class(n, "badge")).is_empty());
        assert_eq!(
            dom.drain_signals(),
            vec![HostSignal::Mutation(Mutation {
                target: group,
                kind: MutationKind::ChildList { added: 0, removed: 1 },
            })]
        );

        // Edits on a text node are ignored and leave the journal empty.
        let text = dom.children(group)[0];
        dom.add_class(text, "x");
        assert!(dom.drain_signals().is_empty());
    }
}
