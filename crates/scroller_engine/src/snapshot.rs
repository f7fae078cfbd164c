use ego_tree::{NodeId, NodeRef, Tree};
use scraper::node::Node;
use scraper::Html;

use crate::decode::{decode_markup, DecodeError};
use crate::tree::{DomTree, ElementData, HostNode};

impl DomTree {
    /// Builds a host document from an HTML snapshot.
    ///
    /// Comments, doctypes and whitespace-only text are dropped; everything
    /// else keeps document order.
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let mut dom = DomTree::from_tree(Tree::new(HostNode::Document));
        let root = dom.tree().root().id();
        graft(dom.tree_mut(), root, html.tree.root());
        dom
    }

    /// Decodes raw snapshot bytes, then parses them.
    pub fn parse_bytes(bytes: &[u8], content_type: Option<&str>) -> Result<Self, DecodeError> {
        let decoded = decode_markup(bytes, content_type)?;
        Ok(Self::parse(&decoded.markup))
    }
}

/// Copies the children of `source` under `parent`, returning the ids of the
/// top-level nodes that were inserted.
pub(crate) fn graft(
    tree: &mut Tree<HostNode>,
    parent: NodeId,
    source: NodeRef<'_, Node>,
) -> Vec<NodeId> {
    let mut inserted = Vec::new();
    for child in source.children() {
        let value = match child.value() {
            Node::Element(element) => {
                HostNode::Element(ElementData::from_attrs(element.name(), element.attrs()))
            }
            Node::Text(text) => {
                let content: &str = text;
                if content.trim().is_empty() {
                    continue;
                }
                HostNode::Text(content.to_string())
            }
            _ => continue,
        };
        let Some(mut parent_node) = tree.get_mut(parent) else {
            break;
        };
        let id = parent_node.append(value).id();
        inserted.push(id);
        graft(tree, id, child);
    }
    inserted
}
