use engine_logging::{engine_debug, engine_trace};

use crate::config::LocatorConfig;
use crate::dom::HostDocument;

/// One named discovery heuristic: maps an input node to a landmark.
pub struct Strategy<D: HostDocument> {
    pub name: &'static str,
    pub run: fn(&D, &LocatorConfig, D::Node) -> Option<D::Node>,
}

impl<D: HostDocument> Clone for Strategy<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            run: self.run,
        }
    }
}

/// Ordered strategies; the first one that produces a node wins.
pub struct StrategyChain<D: HostDocument> {
    label: &'static str,
    strategies: Vec<Strategy<D>>,
}

impl<D: HostDocument> Clone for StrategyChain<D> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            strategies: self.strategies.clone(),
        }
    }
}

impl<D: HostDocument> StrategyChain<D> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            strategies: Vec::new(),
        }
    }

    pub fn with(
        mut self,
        name: &'static str,
        run: fn(&D, &LocatorConfig, D::Node) -> Option<D::Node>,
    ) -> Self {
        self.strategies.push(Strategy { name, run });
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name).collect()
    }

    /// Runs strategies in order, returning the winner's name and result.
    pub fn run(
        &self,
        doc: &D,
        config: &LocatorConfig,
        input: D::Node,
    ) -> Option<(&'static str, D::Node)> {
        for strategy in &self.strategies {
            if let Some(found) = (strategy.run)(doc, config, input) {
                engine_trace!("{}: '{}' matched {:?}", self.label, strategy.name, found);
                return Some((strategy.name, found));
            }
        }
        engine_trace!("{}: no strategy matched", self.label);
        None
    }
}

/// The scrollable message region and the element whose children are message groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landmarks<N> {
    pub container: N,
    pub host: N,
}

pub struct Locator<D: HostDocument> {
    config: LocatorConfig,
    anchor: StrategyChain<D>,
    container: StrategyChain<D>,
    host: StrategyChain<D>,
}

impl<D: HostDocument> Clone for Locator<D> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            anchor: self.anchor.clone(),
            container: self.container.clone(),
            host: self.host.clone(),
        }
    }
}

impl<D: HostDocument> Locator<D> {
    pub fn new(config: LocatorConfig) -> Self {
        Self::with_chains(
            config,
            StrategyChain::new("anchor").with("first-data-id", first_data_id::<D>),
            StrategyChain::new("container")
                .with("scrollable-ancestor", scrollable_ancestor::<D>),
            StrategyChain::new("host")
                .with("list-like-child", list_like_child::<D>)
                .with("wrapped-list", wrapped_list::<D>)
                .with("container-itself", container_itself::<D>),
        )
    }

    pub fn with_chains(
        config: LocatorConfig,
        anchor: StrategyChain<D>,
        container: StrategyChain<D>,
        host: StrategyChain<D>,
    ) -> Self {
        Self {
            config,
            anchor,
            container,
            host,
        }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// First message element in the document.
    pub fn find_anchor(&self, doc: &D) -> Option<D::Node> {
        self.anchor
            .run(doc, &self.config, doc.root())
            .map(|(_, node)| node)
    }

    pub fn find_scroll_container(&self, doc: &D, anchor: D::Node) -> Option<D::Node> {
        self.container
            .run(doc, &self.config, anchor)
            .map(|(_, node)| node)
    }

    /// Falls back to the container itself when no strategy matches.
    pub fn find_message_list_host(&self, doc: &D, container: D::Node) -> D::Node {
        self.host
            .run(doc, &self.config, container)
            .map(|(_, node)| node)
            .unwrap_or(container)
    }

    /// Current scroll container, or `None` when no conversation is open.
    pub fn container(&self, doc: &D) -> Option<D::Node> {
        let anchor = self.find_anchor(doc)?;
        self.find_scroll_container(doc, anchor)
    }

    pub fn locate(&self, doc: &D) -> Option<Landmarks<D::Node>> {
        let Some(container) = self.container(doc) else {
            engine_debug!("No scroll container discoverable");
            return None;
        };
        Some(Landmarks {
            container,
            host: self.find_message_list_host(doc, container),
        })
    }

    /// Direct children of the message-list host; empty without a container.
    pub fn message_groups(&self, doc: &D) -> Vec<D::Node> {
        self.locate(doc)
            .map(|landmarks| doc.children(landmarks.host))
            .unwrap_or_default()
    }
}

fn first_data_id<D: HostDocument>(doc: &D, _: &LocatorConfig, root: D::Node) -> Option<D::Node> {
    doc.descendants(root)
        .into_iter()
        .find(|node| doc.tag(*node) == "div" && doc.attr(*node, "data-id").is_some())
}

/// Nearest ancestor-or-self below `body` that scrolls and overflows by more than the slack.
fn scrollable_ancestor<D: HostDocument>(
    doc: &D,
    config: &LocatorConfig,
    anchor: D::Node,
) -> Option<D::Node> {
    doc.ancestors(anchor)
        .into_iter()
        .take_while(|node| doc.tag(*node) != "body" && doc.parent(*node).is_some())
        .find(|node| {
            let metrics = doc.scroll_metrics(*node);
            doc.overflow_y(*node).scrolls()
                && metrics.scroll_height > metrics.client_height + config.scroll_slack_px
        })
}

fn list_like_child<D: HostDocument>(
    doc: &D,
    config: &LocatorConfig,
    container: D::Node,
) -> Option<D::Node> {
    doc.children(container)
        .into_iter()
        .find(|child| doc.children(*child).len() > config.list_child_threshold)
}

fn wrapped_list<D: HostDocument>(
    doc: &D,
    config: &LocatorConfig,
    container: D::Node,
) -> Option<D::Node> {
    let children = doc.children(container);
    let [only] = children.as_slice() else {
        return None;
    };
    doc.children(*only)
        .into_iter()
        .find(|grandchild| doc.children(*grandchild).len() > config.wrapped_child_threshold)
}

fn container_itself<D: HostDocument>(
    _: &D,
    _: &LocatorConfig,
    container: D::Node,
) -> Option<D::Node> {
    Some(container)
}
