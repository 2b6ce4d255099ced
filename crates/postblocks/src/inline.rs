//! Inline serializer.
//!
//! Renders an inline subtree (emphasis, strikethrough, code, links, line
//! breaks) as a Markdown-escaped string.

use once_cell::sync::Lazy;
use postblocks_core::Options;
use regex::Regex;

use crate::allowlist;
use crate::node::{Element, Node};

/// Leading link noise stripped before display. Alternation order matters:
/// only the first match is removed.
static LINK_DISPLAY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:https://|http://|www\\\.|www\.)").expect("valid link prefix regex"));

/// Serialize a sequence of nodes.
pub fn serialize(nodes: &[Node], options: &Options) -> String {
    let mut out = String::new();
    for node in nodes {
        serialize_node(node, options, &mut out);
    }
    out
}

fn serialize_node(node: &Node, options: &Options, out: &mut String) {
    match node {
        Node::Text(text) => escape_markdown_into(text, out),
        Node::Element(element) if !allowlist::is_inline(&element.name) => {
            for child in &element.children {
                serialize_node(child, options, out);
            }
        }
        Node::Element(element) => serialize_inline(element, options, out),
    }
}

fn serialize_inline(element: &Element, options: &Options, out: &mut String) {
    let content = serialize(&element.children, options);

    match element.name.as_str() {
        "strong" | "b" => {
            out.push_str("**");
            out.push_str(&content);
            out.push_str("**");
        }
        "em" | "i" => {
            out.push('_');
            out.push_str(&content);
            out.push('_');
        }
        // No underline in Markdown
        "u" => out.push_str(&content),
        "del" | "s" => {
            out.push_str("~~");
            out.push_str(&content);
            out.push_str("~~");
        }
        "code" => {
            let fenced = element
                .attr("class")
                .is_some_and(|class| class.contains("language-"));
            if fenced {
                out.push('\n');
                out.push_str(&content);
                out.push('\n');
            } else {
                out.push_str(&content);
            }
        }
        "a" => {
            let href = element.attr("href").unwrap_or("#");
            out.push('[');
            out.push_str(&trim_for_display(&content, options));
            out.push_str("](");
            out.push_str(href);
            out.push(')');
        }
        "br" => out.push_str("  \n"),
        other => unreachable!("`{other}` passed the inline check but has no inline rendering"),
    }
}

/// Escape Markdown special characters in text
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_markdown_into(text, &mut out);
    out
}

fn escape_markdown_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '{' | '}' | '[' | ']' | '(' | ')' | '#' | '+' | '-' | '.'
            | '!' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
}

/// Shorten link text for display.
///
/// Strips one leading `https://`, `http://`, `www\.` or `www.`, then
/// truncates to `options.link_display_max_len` characters followed by
/// `options.ellipsis`.
pub fn trim_for_display(text: &str, options: &Options) -> String {
    let stripped = LINK_DISPLAY_PREFIX.replace(text, "");
    let max = options.link_display_max_len;

    if stripped.chars().count() > max {
        let mut truncated: String = stripped.chars().take(max).collect();
        truncated.push_str(&options.ellipsis);
        truncated
    } else {
        stripped.into_owned()
    }
}
