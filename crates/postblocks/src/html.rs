//! HTML parsing support.
//!
//! This module parses an HTML fragment with scraper and mirrors the
//! resulting DOM into the [`Node`] structure used by the rest of the
//! pipeline. No filtering happens here; see [`sanitize`](crate::sanitize).

use postblocks_core::DEFAULT_MAX_NESTING_DEPTH;
use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::{Element, Node};

/// A parsed fragment: its top-level nodes plus any diagnostics the parser
/// recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub nodes: Vec<Node>,
    pub errors: Vec<String>,
    /// Number of elements past the depth limit that were replaced by their
    /// text
    pub flattened: usize,
}

/// Parse a body-level HTML fragment into raw nodes.
///
/// # Example
///
/// ```rust
/// use postblocks::parse_fragment;
///
/// let fragment = parse_fragment("<p>Hello <em>World</em></p>");
/// assert_eq!(fragment.nodes.len(), 1);
/// assert_eq!(fragment.nodes[0].tag_name(), Some("p"));
/// ```
pub fn parse_fragment(html: &str) -> Fragment {
    parse_fragment_with_depth(html, DEFAULT_MAX_NESTING_DEPTH)
}

/// Parse a fragment, replacing every element nested more than `max_depth`
/// levels deep with a text node holding its text content.
///
/// The returned tree is at most `max_depth` elements deep, which bounds the
/// recursion of every later stage.
pub fn parse_fragment_with_depth(html: &str, max_depth: usize) -> Fragment {
    let document = Html::parse_fragment(html);

    let mut mirror = Mirror {
        max_depth,
        flattened: 0,
    };
    let nodes = mirror.collect_children(document.root_element(), 0);

    Fragment {
        nodes,
        errors: document.errors.iter().map(|e| e.to_string()).collect(),
        flattened: mirror.flattened,
    }
}

struct Mirror {
    max_depth: usize,
    flattened: usize,
}

impl Mirror {
    /// Convert the children of a scraper element sitting at `depth`,
    /// skipping comments and other non-content nodes.
    fn collect_children(&mut self, element: ElementRef, depth: usize) -> Vec<Node> {
        let mut nodes = Vec::new();

        for child in element.children() {
            match child.value() {
                ScraperNode::Text(text) => {
                    nodes.push(Node::text(text.text.to_string()));
                }
                ScraperNode::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        nodes.push(self.scraper_to_node(child_element, depth + 1));
                    }
                }
                _ => {}
            }
        }

        nodes
    }

    /// Convert a scraper ElementRef to our Node structure
    fn scraper_to_node(&mut self, element: ElementRef, depth: usize) -> Node {
        if depth > self.max_depth {
            self.flattened += 1;
            return Node::text(element.text().collect::<String>());
        }

        let value = element.value();
        let mut node = Element::with_attrs(value.name(), value.attrs());
        node.children = self.collect_children(element, depth);
        Node::Element(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_html() {
        let fragment = parse_fragment("<p>Hello World</p>");
        assert_eq!(
            fragment.nodes,
            vec![Node::element("p").with_child(Node::text("Hello World"))]
        );
    }

    #[test]
    fn test_parse_keeps_attributes() {
        let fragment = parse_fragment(r#"<ol start="3"><li>a</li></ol>"#);
        let ol = fragment.nodes[0].as_element().unwrap();
        assert_eq!(ol.name, "ol");
        assert_eq!(ol.attr("start"), Some("3"));
    }

    #[test]
    fn test_parse_decodes_entities() {
        let fragment = parse_fragment("<p>a &amp; b</p>");
        assert_eq!(fragment.nodes[0].text_content(), "a & b");
    }

    #[test]
    fn test_parse_skips_comments() {
        let fragment = parse_fragment("<!-- note --><p>x</p>");
        assert_eq!(fragment.nodes.len(), 1);
        assert_eq!(fragment.nodes[0].tag_name(), Some("p"));
    }

    #[test]
    fn test_parse_top_level_text() {
        let fragment = parse_fragment("just text");
        assert_eq!(fragment.nodes, vec![Node::text("just text")]);
    }

    #[test]
    fn test_elements_past_depth_limit_become_text() {
        let fragment = parse_fragment_with_depth("<p><em><b>deep</b> text</em></p>", 1);
        assert_eq!(
            fragment.nodes,
            vec![Node::element("p").with_child(Node::text("deep text"))]
        );
        assert_eq!(fragment.flattened, 1);
    }

    #[test]
    fn test_depth_limit_not_reached() {
        let fragment = parse_fragment_with_depth("<p><em>x</em></p>", 2);
        assert_eq!(
            fragment.nodes,
            vec![Node::element("p").with_child(Node::element("em").with_child(Node::text("x")))]
        );
        assert_eq!(fragment.flattened, 0);
    }

    #[test]
    fn test_parse_clean_fragment_has_no_errors() {
        let fragment = parse_fragment("<p>fine</p>");
        assert!(fragment.errors.is_empty());
    }
}
