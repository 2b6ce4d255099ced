//! Sanitizing tree builder.
//!
//! Turns a raw markup tree into one that only carries allowlisted elements
//! and attributes. Nothing here fails: unsupported markup is unwrapped so its
//! content survives, unknown attributes are dropped.

use indexmap::IndexMap;
use tracing::trace;

use crate::allowlist;
use crate::node::{Element, Node};

/// Tag of the inert element that groups the lifted children of an
/// unwrapped element.
pub const GROUPING_TAG: &str = "span";

/// Sanitize a sequence of top-level nodes.
pub fn sanitize(nodes: Vec<Node>) -> Vec<Node> {
    sanitize_children(nodes, None)
}

fn sanitize_children(nodes: Vec<Node>, parent: Option<&str>) -> Vec<Node> {
    nodes
        .into_iter()
        .flat_map(|node| sanitize_node(node, parent))
        .collect()
}

fn sanitize_node(node: Node, parent: Option<&str>) -> Vec<Node> {
    match node {
        Node::Text(text) => {
            let text = text.replace('\r', "");
            if text.is_empty() {
                Vec::new()
            } else {
                vec![Node::Text(text)]
            }
        }
        Node::Element(element) => {
            let name = element.name.to_ascii_lowercase();

            if !allowlist::is_allowed_element(&name) {
                trace!(tag = %name, "unwrapping disallowed element");
                return unwrap(element.children, parent);
            }

            // List items only mean something directly inside a list
            if name == "li" && !is_list(parent) {
                trace!(parent = ?parent, "unwrapping list item outside a list");
                return unwrap(element.children, parent);
            }

            let attributes = filter_attributes(&name, element.attributes);
            let children = sanitize_children(element.children, Some(&name));
            vec![Node::Element(Element {
                name,
                attributes,
                children,
            })]
        }
    }
}

fn is_list(parent: Option<&str>) -> bool {
    matches!(parent, Some("ul" | "ol"))
}

/// Lift the sanitized children of a dropped element into its position.
///
/// Inside a list the children are spliced into the list itself so any
/// `li` among them stays a direct child of `ul`/`ol`.
fn unwrap(children: Vec<Node>, parent: Option<&str>) -> Vec<Node> {
    let lifted = sanitize_children(children, parent);
    if lifted.len() == 1 || is_list(parent) {
        return lifted;
    }
    vec![Node::Element(Element {
        name: GROUPING_TAG.to_string(),
        attributes: IndexMap::new(),
        children: lifted,
    })]
}

fn filter_attributes(tag: &str, attributes: IndexMap<String, String>) -> IndexMap<String, String> {
    attributes
        .into_iter()
        .filter(|(key, _)| allowlist::is_allowed_attribute(tag, key))
        .collect()
}
