//! Block accumulation engine.
//!
//! Walks a sanitized [`Node`] tree and builds a flat, ordered list of
//! [`ContentBlock`]s. Inline content is gathered into transient
//! accumulators which are finalized once their structural scope closes.
//!
//! Nesting is recorded on each row as a list of [`NestedFormat`] tags:
//!
//! - a blockquote gives its rows `TopLevelBlockquote` when it is the
//!   outermost scope, `SubordinateBlockquote` otherwise
//! - a list item gives its rows one `ListLevel`, or two when the child is
//!   itself a blockquote so the quote bar clears the list marker

use postblocks_core::{
    Blockquote, ContentBlock, ContentRow, InlineElement, InlineKind, NestedFormat, Options,
    RowStyle,
};
use tracing::debug;

use crate::allowlist;
use crate::inline;
use crate::node::{Element, Node};

/// Build content blocks from a sanitized tree.
///
/// # Panics
///
/// Panics if a `li` element appears outside a `ul`/`ol`. The sanitizer
/// never produces such a tree.
pub fn accumulate(nodes: &[Node], options: &Options) -> Vec<ContentBlock> {
    walk(nodes, Accumulator::paragraph(), options)
        .into_iter()
        .flat_map(Accumulator::into_content_blocks)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowKind {
    Paragraph,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CompositeKind {
    Blockquote,
    ListItem { prefix: String },
}

/// Characters stripped from both ends of text appended to an accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrimSet {
    Nothing,
    Newlines,
    WhitespaceAndNewlines,
}

impl TrimSet {
    fn apply(self, text: &str) -> &str {
        match self {
            TrimSet::Nothing => text,
            TrimSet::Newlines => text.trim_matches(is_newline),
            TrimSet::WhitespaceAndNewlines => text.trim(),
        }
    }
}

fn is_newline(c: char) -> bool {
    matches!(
        c,
        '\n' | '\u{b}' | '\u{c}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

#[derive(Debug)]
enum Accumulator {
    /// One run of inline content
    Flow {
        kind: FlowKind,
        elements: Vec<InlineElement>,
    },
    /// A structural container holding child accumulators
    Composite {
        kind: CompositeKind,
        children: Vec<Accumulator>,
    },
}

impl Accumulator {
    fn paragraph() -> Self {
        Self::flow(FlowKind::Paragraph)
    }

    fn flow(kind: FlowKind) -> Self {
        Accumulator::Flow {
            kind,
            elements: Vec::new(),
        }
    }

    fn composite(kind: CompositeKind, children: Vec<Accumulator>) -> Self {
        Accumulator::Composite { kind, children }
    }

    fn is_blockquote(&self) -> bool {
        matches!(
            self,
            Accumulator::Composite {
                kind: CompositeKind::Blockquote,
                ..
            }
        )
    }

    fn trim_set(&self) -> TrimSet {
        match self {
            Accumulator::Flow {
                kind: FlowKind::Paragraph,
                ..
            } => TrimSet::Newlines,
            Accumulator::Flow {
                kind: FlowKind::Code,
                ..
            } => TrimSet::Nothing,
            Accumulator::Composite {
                kind: CompositeKind::Blockquote,
                ..
            } => TrimSet::Newlines,
            Accumulator::Composite {
                kind: CompositeKind::ListItem { .. },
                ..
            } => TrimSet::WhitespaceAndNewlines,
        }
    }

    fn append_inline(&mut self, element: InlineElement) {
        match self {
            Accumulator::Flow { elements, .. } => elements.push(element),
            Accumulator::Composite { children, .. } => match children.last_mut() {
                Some(last @ Accumulator::Flow { .. }) => last.append_inline(element),
                _ => children.push(Accumulator::Flow {
                    kind: FlowKind::Paragraph,
                    elements: vec![element],
                }),
            },
        }
    }

    /// Trim `text` with this accumulator's trim set and append it, unless
    /// nothing is left.
    fn append_trimmed(&mut self, kind: InlineKind, text: &str) {
        let trimmed = self.trim_set().apply(text);
        if !trimmed.is_empty() {
            self.append_inline(InlineElement::new(kind, trimmed));
        }
    }

    fn can_append_blocks(&self) -> bool {
        matches!(self, Accumulator::Composite { .. })
    }

    /// Attach a child block. Flow accumulators refuse and hand it back.
    fn append_block(&mut self, block: Accumulator) -> Result<(), Accumulator> {
        match self {
            Accumulator::Flow { .. } => Err(block),
            Accumulator::Composite { children, .. } => {
                children.push(block);
                Ok(())
            }
        }
    }

    fn child_formatting(
        kind: &CompositeKind,
        inherited: &[NestedFormat],
        child: &Accumulator,
    ) -> Vec<NestedFormat> {
        let mut formatting = inherited.to_vec();
        match kind {
            CompositeKind::Blockquote if inherited.is_empty() => {
                formatting.push(NestedFormat::TopLevelBlockquote);
            }
            CompositeKind::Blockquote => formatting.push(NestedFormat::SubordinateBlockquote),
            CompositeKind::ListItem { .. } => {
                formatting.push(NestedFormat::ListLevel);
                if child.is_blockquote() {
                    formatting.push(NestedFormat::ListLevel);
                }
            }
        }
        formatting
    }

    /// Finalize into rows carrying `inherited` formatting.
    fn into_rows(self, inherited: &[NestedFormat], prefix: Option<&str>) -> Vec<ContentRow> {
        match self {
            Accumulator::Flow { elements, .. } if elements.is_empty() => Vec::new(),
            Accumulator::Flow { kind, elements } => {
                let style = match kind {
                    FlowKind::Paragraph => RowStyle::Paragraph,
                    FlowKind::Code => RowStyle::Code,
                };
                vec![ContentRow::new(
                    style,
                    prefix.map(str::to_string),
                    inherited.to_vec(),
                    elements,
                )]
            }
            Accumulator::Composite { kind, children } => {
                let child_prefix = match &kind {
                    CompositeKind::Blockquote => None,
                    CompositeKind::ListItem { prefix } => Some(prefix.as_str()),
                };
                children
                    .into_iter()
                    .flat_map(|child| {
                        let formatting = Self::child_formatting(&kind, inherited, &child);
                        child.into_rows(&formatting, child_prefix)
                    })
                    .collect()
            }
        }
    }

    /// Finalize at top level. Blockquotes become one block, everything else
    /// contributes plain rows.
    fn into_content_blocks(self) -> Vec<ContentBlock> {
        if self.is_blockquote() {
            let rows = self.into_rows(&[], None);
            if rows.is_empty() {
                return Vec::new();
            }
            return vec![ContentBlock::Blockquote(Blockquote::new(rows))];
        }

        self.into_rows(&[], None)
            .into_iter()
            .map(ContentBlock::Row)
            .collect()
    }
}

/// Walk `nodes` starting from `start` and return every accumulator
/// produced, in document order.
///
/// A composite `start` absorbs all content, so the result is just that
/// accumulator. A flow `start` is handed back first, followed by whatever
/// blocks were opened after it.
fn walk(nodes: &[Node], start: Accumulator, options: &Options) -> Vec<Accumulator> {
    let mut finished = Vec::new();
    let mut current = start;

    for node in nodes {
        let element = match node {
            Node::Text(text) => {
                current.append_trimmed(InlineKind::Text, text);
                continue;
            }
            Node::Element(element) => element,
        };

        let tag = element.name.as_str();

        if allowlist::is_inline(tag) {
            if tag == "br" {
                current.append_inline(InlineElement::text("\n"));
            } else {
                let kind = if tag == "code" {
                    InlineKind::Code
                } else {
                    InlineKind::Text
                };
                let rendered = inline::serialize(std::slice::from_ref(node), options);
                current.append_trimmed(kind, &rendered);
            }
            continue;
        }

        match tag {
            "p" | "pre" => {
                let kind = if tag == "pre" {
                    FlowKind::Code
                } else {
                    FlowKind::Paragraph
                };
                let mut opened = walk(&element.children, Accumulator::flow(kind), options);

                if current.can_append_blocks() {
                    for block in opened {
                        attach(&mut current, &mut finished, block);
                    }
                } else {
                    finished.push(std::mem::replace(&mut current, Accumulator::paragraph()));
                    if let Some(last) = opened.pop() {
                        finished.append(&mut opened);
                        current = last;
                    }
                }
            }
            "blockquote" => {
                let children = walk(&element.children, Accumulator::paragraph(), options);
                let quote = Accumulator::composite(CompositeKind::Blockquote, children);
                attach(&mut current, &mut finished, quote);
            }
            "ul" | "ol" => {
                for item in list_items(element, options) {
                    attach(&mut current, &mut finished, item);
                }
            }
            "li" => panic!("list item reached outside list handling"),
            _ => {
                let rendered = inline::serialize(std::slice::from_ref(node), options);
                current.append_trimmed(InlineKind::Text, &rendered);
            }
        }
    }

    finished.push(current);
    finished
}

/// Attach a completed block to `current`, or close `current` and emit the
/// block as its sibling.
fn attach(current: &mut Accumulator, finished: &mut Vec<Accumulator>, block: Accumulator) {
    if let Err(block) = current.append_block(block) {
        finished.push(std::mem::replace(current, Accumulator::paragraph()));
        finished.push(block);
    }
}

/// One list item accumulator per `li` child, numbered independently of any
/// other list.
fn list_items(list: &Element, options: &Options) -> Vec<Accumulator> {
    let ordered = list.name == "ol";
    let mut index = if ordered { start_index(list) } else { 1 };
    let mut items = Vec::new();

    for child in &list.children {
        let Node::Element(li) = child else {
            continue;
        };
        if li.name != "li" {
            continue;
        }

        let prefix = if ordered {
            options.ordered_prefix(index)
        } else {
            options.bullet_prefix.clone()
        };
        index = index.saturating_add(1);

        let item = Accumulator::composite(CompositeKind::ListItem { prefix }, Vec::new());
        items.extend(walk(&li.children, item, options));
    }

    items
}

fn start_index(list: &Element) -> i64 {
    match list.attr("start") {
        None => 1,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            debug!(start = raw, "unparsable list start, numbering from 1");
            1
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use postblocks_core::NestedFormat::{ListLevel, SubordinateBlockquote, TopLevelBlockquote};

    fn blocks(nodes: Vec<Node>) -> Vec<ContentBlock> {
        accumulate(&nodes, &Options::default())
    }

    fn text(s: &str) -> Node {
        Node::text(s)
    }

    fn el(tag: &str, children: Vec<Node>) -> Node {
        children
            .into_iter()
            .fold(Node::element(tag), |parent, child| parent.with_child(child))
    }

    fn row(prefix: Option<&str>, formatting: Vec<NestedFormat>, contents: &[&str]) -> ContentRow {
        ContentRow::new(
            RowStyle::Paragraph,
            prefix.map(str::to_string),
            formatting,
            contents.iter().map(|c| InlineElement::text(*c)).collect(),
        )
    }

    #[test]
    fn test_paragraph_with_strong() {
        let result = blocks(vec![el(
            "p",
            vec![text("Hello "), el("strong", vec![text("world")])],
        )]);
        assert_eq!(
            result,
            vec![ContentBlock::Row(row(None, vec![], &["Hello ", "**world**"]))]
        );
    }

    #[test]
    fn test_bare_text_becomes_paragraph() {
        assert_eq!(
            blocks(vec![text("plain")]),
            vec![ContentBlock::Row(row(None, vec![], &["plain"]))]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(blocks(vec![]).is_empty());
        assert!(blocks(vec![el("p", vec![])]).is_empty());
    }

    #[test]
    fn test_paragraph_trims_newlines_only() {
        let result = blocks(vec![el("p", vec![text("\n  indented \n")])]);
        assert_eq!(result, vec![ContentBlock::Row(row(None, vec![], &["  indented "]))]);
    }

    #[test]
    fn test_whitespace_between_blocks_is_dropped() {
        let result = blocks(vec![
            el("p", vec![text("a")]),
            text("\n"),
            el("p", vec![text("b")]),
        ]);
        assert_eq!(
            result,
            vec![
                ContentBlock::Row(row(None, vec![], &["a"])),
                ContentBlock::Row(row(None, vec![], &["b"])),
            ]
        );
    }

    #[test]
    fn test_line_break() {
        let result = blocks(vec![el(
            "p",
            vec![text("one"), el("br", vec![]), text("two")],
        )]);
        assert_eq!(
            result,
            vec![ContentBlock::Row(row(None, vec![], &["one", "\n", "two"]))]
        );
    }

    #[test]
    fn test_inline_code_kind() {
        let result = blocks(vec![el("p", vec![el("code", vec![text("x")])])]);
        let expected = ContentRow::new(
            RowStyle::Paragraph,
            None,
            vec![],
            vec![InlineElement::code("x")],
        );
        assert_eq!(result, vec![ContentBlock::Row(expected)]);
    }

    #[test]
    fn test_pre_is_verbatim_code() {
        let result = blocks(vec![el("pre", vec![text("\nlet x = 1;\n")])]);
        let expected = ContentRow::new(
            RowStyle::Code,
            None,
            vec![],
            vec![InlineElement::text("\nlet x = 1;\n")],
        );
        assert_eq!(result, vec![ContentBlock::Row(expected)]);
    }

    #[test]
    fn test_ordered_list_with_start() {
        let list = Node::element_with_attrs("ol", vec![("start", "3")])
            .with_child(el("li", vec![text("a")]))
            .with_child(el("li", vec![text("b")]));
        assert_eq!(
            blocks(vec![list]),
            vec![
                ContentBlock::Row(row(Some("3. "), vec![ListLevel], &["a"])),
                ContentBlock::Row(row(Some("4. "), vec![ListLevel], &["b"])),
            ]
        );
    }

    #[test]
    fn test_unparsable_start_falls_back_to_one() {
        let list = Node::element_with_attrs("ol", vec![("start", "three")])
            .with_child(el("li", vec![text("a")]));
        assert_eq!(
            blocks(vec![list]),
            vec![ContentBlock::Row(row(Some("1. "), vec![ListLevel], &["a"]))]
        );
    }

    #[test]
    fn test_unordered_list_ignores_start() {
        let list = Node::element_with_attrs("ul", vec![("start", "7")])
            .with_child(el("li", vec![text(" a \n")]));
        assert_eq!(
            blocks(vec![list]),
            vec![ContentBlock::Row(row(Some("• "), vec![ListLevel], &["a"]))]
        );
    }

    #[test]
    fn test_nested_lists_number_independently() {
        let inner = el(
            "ol",
            vec![el("li", vec![text("x")]), el("li", vec![text("y")])],
        );
        let outer = el(
            "ol",
            vec![
                el("li", vec![text("a"), inner]),
                el("li", vec![text("b")]),
            ],
        );
        assert_eq!(
            blocks(vec![outer]),
            vec![
                ContentBlock::Row(row(Some("1. "), vec![ListLevel], &["a"])),
                ContentBlock::Row(row(Some("1. "), vec![ListLevel, ListLevel], &["x"])),
                ContentBlock::Row(row(Some("2. "), vec![ListLevel, ListLevel], &["y"])),
                ContentBlock::Row(row(Some("2. "), vec![ListLevel], &["b"])),
            ]
        );
    }

    #[test]
    fn test_nested_blockquotes() {
        let tree = el(
            "blockquote",
            vec![
                el("p", vec![text("x")]),
                el("blockquote", vec![text("y")]),
            ],
        );
        assert_eq!(
            blocks(vec![tree]),
            vec![ContentBlock::Blockquote(Blockquote::new(vec![
                row(None, vec![TopLevelBlockquote], &["x"]),
                row(None, vec![TopLevelBlockquote, SubordinateBlockquote], &["y"]),
            ]))]
        );
    }

    #[test]
    fn test_text_after_blockquote_is_new_paragraph() {
        let result = blocks(vec![
            el("p", vec![text("before")]),
            el("blockquote", vec![text("quoted")]),
            text("after"),
        ]);
        assert_eq!(
            result,
            vec![
                ContentBlock::Row(row(None, vec![], &["before"])),
                ContentBlock::Blockquote(Blockquote::new(vec![row(
                    None,
                    vec![TopLevelBlockquote],
                    &["quoted"]
                )])),
                ContentBlock::Row(row(None, vec![], &["after"])),
            ]
        );
    }

    #[test]
    fn test_empty_blockquote_is_dropped() {
        assert!(blocks(vec![el("blockquote", vec![text("\n")])]).is_empty());
    }

    // The quote keeps its own tag after the two list levels, so the renderer
    // still draws a bar.
    #[test]
    fn test_blockquote_in_list_item_gets_double_indent() {
        let list = el("ul", vec![el("li", vec![el("blockquote", vec![text("q")])])]);
        assert_eq!(
            blocks(vec![list]),
            vec![ContentBlock::Row(row(
                None,
                vec![ListLevel, ListLevel, SubordinateBlockquote],
                &["q"]
            ))]
        );
    }

    #[test]
    fn test_content_after_nested_block_stays_in_item() {
        let list = el(
            "ul",
            vec![el(
                "li",
                vec![el("blockquote", vec![text("q")]), text("after")],
            )],
        );
        assert_eq!(
            blocks(vec![list]),
            vec![
                ContentBlock::Row(row(
                    None,
                    vec![ListLevel, ListLevel, SubordinateBlockquote],
                    &["q"]
                )),
                ContentBlock::Row(row(Some("• "), vec![ListLevel], &["after"])),
            ]
        );
    }

    #[test]
    fn test_numbering_saturates_at_max_start() {
        let list = Node::element_with_attrs("ol", vec![("start", "9223372036854775807")])
            .with_child(el("li", vec![text("a")]))
            .with_child(el("li", vec![text("b")]));
        let max = format!("{}. ", i64::MAX);
        assert_eq!(
            blocks(vec![list]),
            vec![
                ContentBlock::Row(row(Some(max.as_str()), vec![ListLevel], &["a"])),
                ContentBlock::Row(row(Some(max.as_str()), vec![ListLevel], &["b"])),
            ]
        );
    }

    #[test]
    fn test_list_items_spliced_from_unwrapped_wrapper() {
        let list = el(
            "ul",
            vec![el(
                "div",
                vec![el("li", vec![text("alpha")]), el("li", vec![text("beta")])],
            )],
        );
        assert_eq!(
            blocks(crate::sanitize::sanitize(vec![list])),
            vec![
                ContentBlock::Row(row(Some("• "), vec![ListLevel], &["alpha"])),
                ContentBlock::Row(row(Some("• "), vec![ListLevel], &["beta"])),
            ]
        );
    }

    #[test]
    fn test_paragraphs_inside_list_item_share_prefix() {
        let list = el(
            "ul",
            vec![el(
                "li",
                vec![el("p", vec![text("one")]), el("p", vec![text("two")])],
            )],
        );
        assert_eq!(
            blocks(vec![list]),
            vec![
                ContentBlock::Row(row(Some("• "), vec![ListLevel], &["one"])),
                ContentBlock::Row(row(Some("• "), vec![ListLevel], &["two"])),
            ]
        );
    }

    #[test]
    fn test_list_inside_blockquote() {
        let tree = el(
            "blockquote",
            vec![el("ul", vec![el("li", vec![text("item")])])],
        );
        assert_eq!(
            blocks(vec![tree]),
            vec![ContentBlock::Blockquote(Blockquote::new(vec![row(
                Some("• "),
                vec![TopLevelBlockquote, ListLevel],
                &["item"]
            )]))]
        );
    }

    #[test]
    fn test_unknown_element_is_inline_text() {
        let result = blocks(vec![el(
            "span",
            vec![text("a"), el("em", vec![text("b")])],
        )]);
        assert_eq!(result, vec![ContentBlock::Row(row(None, vec![], &["a_b_"]))]);
    }

    #[test]
    #[should_panic(expected = "list item reached outside list handling")]
    fn test_stray_list_item_is_fatal() {
        blocks(vec![el("li", vec![text("x")])]);
    }

    #[test]
    fn test_rows_are_never_empty() {
        let tree = vec![
            el("p", vec![]),
            el("blockquote", vec![el("p", vec![]), text("\n")]),
            el("ul", vec![el("li", vec![text("  ")])]),
            el("pre", vec![]),
        ];
        for block in blocks(tree) {
            for row in block.rows() {
                assert!(!row.contents.is_empty());
            }
        }
    }
}
