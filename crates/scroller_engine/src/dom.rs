use std::fmt::Debug;
use std::hash::Hash;

use scroller_core::{Rect, ScrollMetrics};

/// Computed `overflow-y` of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
    Auto,
}

impl Overflow {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "scroll" => Self::Scroll,
            "auto" => Self::Auto,
            "hidden" | "clip" => Self::Hidden,
            _ => Self::Visible,
        }
    }

    pub fn scrolls(self) -> bool {
        matches!(self, Self::Scroll | Self::Auto)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    First,
    Last,
}

/// Markup the overlay inserts into host elements (blur overlay, badge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationSpec {
    pub tag: String,
    pub class: String,
    pub text: Option<String>,
    pub children: Vec<DecorationSpec>,
}

impl DecorationSpec {
    pub fn new(tag: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: class.into(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: DecorationSpec) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    ChildList { added: usize, removed: usize },
    CharacterData,
    Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation<N> {
    pub target: N,
    pub kind: MutationKind,
}

/// Notifications the host queues for the overlay to drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSignal<N> {
    Mutation(Mutation<N>),
    Scroll(N),
}

/// The live document the overlay reads from and decorates.
///
/// Only elements are exposed as nodes; text is reachable through [`text`].
/// Writes are limited to marker classes, decoration subtrees, inline style
/// and a scroll offset.
///
/// [`text`]: HostDocument::text
pub trait HostDocument {
    type Node: Copy + Eq + Hash + Debug;

    fn root(&self) -> Self::Node;
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    /// Element children in document order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;
    fn tag(&self, node: Self::Node) -> &str;
    fn attr(&self, node: Self::Node, name: &str) -> Option<&str>;
    fn has_class(&self, node: Self::Node, class: &str) -> bool;
    /// Concatenated descendant text.
    fn text(&self, node: Self::Node) -> String;
    fn style(&self, node: Self::Node, property: &str) -> Option<&str>;
    fn overflow_y(&self, node: Self::Node) -> Overflow;
    fn scroll_metrics(&self, node: Self::Node) -> ScrollMetrics;
    fn bounding_rect(&self, node: Self::Node) -> Rect;

    fn set_scroll_top(&mut self, node: Self::Node, scroll_top: f64);
    fn add_class(&mut self, node: Self::Node, class: &str);
    fn remove_class(&mut self, node: Self::Node, class: &str);
    fn set_style(&mut self, node: Self::Node, property: &str, value: &str);
    fn insert_decoration(
        &mut self,
        parent: Self::Node,
        spec: &DecorationSpec,
        position: InsertPosition,
    ) -> Option<Self::Node>;
    fn remove(&mut self, node: Self::Node);
    fn drain_signals(&mut self) -> Vec<HostSignal<Self::Node>>;

    /// Descendants of `node` in document order, excluding `node`.
    fn descendants(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(node).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    fn find_descendant<P>(&self, node: Self::Node, mut predicate: P) -> Option<Self::Node>
    where
        Self: Sized,
        P: FnMut(&Self, Self::Node) -> bool,
    {
        self.descendants(node)
            .into_iter()
            .find(|candidate| predicate(self, *candidate))
    }

    fn find_all<P>(&self, node: Self::Node, mut predicate: P) -> Vec<Self::Node>
    where
        Self: Sized,
        P: FnMut(&Self, Self::Node) -> bool,
    {
        self.descendants(node)
            .into_iter()
            .filter(|candidate| predicate(self, *candidate))
            .collect()
    }

    /// `node` and its ancestors, nearest first.
    fn ancestors(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = vec![node];
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            out.push(parent);
            current = parent;
        }
        out
    }

    /// True when `node` is `ancestor` or lies beneath it.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    fn first_by_id(&self, id: &str) -> Option<Self::Node>
    where
        Self: Sized,
    {
        self.find_descendant(self.root(), |doc, node| doc.attr(node, "id") == Some(id))
    }
}
