//! Markup tree used between parsing, sanitizing and block accumulation.
//!
//! The same structure carries both the raw DOM mirror produced by the HTML
//! parser and the filtered tree produced by [`sanitize`](crate::sanitize).
//! Any parser can build it, which keeps the rest of the pipeline parser
//! agnostic.

use std::fmt;

use indexmap::IndexMap;

/// One node of a markup tree.
///
/// A strict tree: every node is owned by exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Character data (leaf)
    Text(String),
    /// An element with its attributes and children
    Element(Element),
}

/// An element node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name, lowercase
    pub name: String,
    /// Attributes in source order
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    /// Create a new element node without attributes or children
    pub fn element(tag_name: &str) -> Self {
        Node::Element(Element::new(tag_name))
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs<K, V>(tag_name: &str, attrs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Node::Element(Element::with_attrs(tag_name, attrs))
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Get the tag name, or `None` for text nodes
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Node::Element(element) => Some(&element.name),
            Node::Text(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Add a child node. Text nodes are leaves and ignore children.
    pub fn add_child(&mut self, child: Node) {
        if let Node::Element(element) = self {
            element.children.push(child);
        }
    }

    /// Builder form of [`add_child`](Self::add_child)
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl Element {
    pub fn new(tag_name: &str) -> Self {
        Self {
            name: tag_name.to_ascii_lowercase(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attrs<K, V>(tag_name: &str, attrs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: tag_name.to_ascii_lowercase(),
            attributes: attrs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            children: Vec::new(),
        }
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(text) => write!(f, "TEXT: {:?}", text),
            Node::Element(element) => write!(
                f,
                "<{} {:?}> ({} children)",
                element.name,
                element.attributes,
                element.children.len()
            ),
        }
    }
}
