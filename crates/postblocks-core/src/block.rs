//! Content block model
//!
//! The immutable output of the conversion pipeline. A renderer iterates a
//! `Vec<ContentBlock>` in order and never needs to look back into the
//! markup that produced it.

/// A top-level unit of rendered content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// One paragraph or code line
    Row(ContentRow),

    /// A quoted reply with its own rows
    Blockquote(Blockquote),
}

impl ContentBlock {
    /// All rows carried by this block, in order.
    ///
    /// A row yields itself, a blockquote yields the rows it wraps.
    pub fn rows(&self) -> &[ContentRow] {
        match self {
            ContentBlock::Row(row) => std::slice::from_ref(row),
            ContentBlock::Blockquote(quote) => &quote.contents,
        }
    }

    pub fn as_row(&self) -> Option<&ContentRow> {
        match self {
            ContentBlock::Row(row) => Some(row),
            ContentBlock::Blockquote(_) => None,
        }
    }

    pub fn as_blockquote(&self) -> Option<&Blockquote> {
        match self {
            ContentBlock::Blockquote(quote) => Some(quote),
            ContentBlock::Row(_) => None,
        }
    }
}

impl From<ContentRow> for ContentBlock {
    fn from(row: ContentRow) -> Self {
        ContentBlock::Row(row)
    }
}

impl From<Blockquote> for ContentBlock {
    fn from(quote: Blockquote) -> Self {
        ContentBlock::Blockquote(quote)
    }
}

/// How a row's text should be set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowStyle {
    /// Proportional body text, Markdown-escaped
    #[default]
    Paragraph,
    /// Preformatted text, taken verbatim
    Code,
}

/// One level of visual nesting applied to a row.
///
/// A row's formatting list is ordered outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedFormat {
    /// The outermost quote; the renderer's quote glyph covers it, no bar
    TopLevelBlockquote,
    /// A quote inside another quote; drawn with a vertical bar
    SubordinateBlockquote,
    /// One list indent unit
    ListLevel,
}

impl NestedFormat {
    /// Whether a renderer draws a vertical quote bar for this level.
    pub fn draws_bar(self) -> bool {
        matches!(self, NestedFormat::SubordinateBlockquote)
    }
}

/// Kind of an inline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InlineKind {
    #[default]
    Text,
    Code,
}

/// A run of inline content inside a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineElement {
    pub kind: InlineKind,
    pub contents: String,
}

impl InlineElement {
    pub fn new(kind: InlineKind, contents: impl Into<String>) -> Self {
        Self {
            kind,
            contents: contents.into(),
        }
    }

    pub fn text(contents: impl Into<String>) -> Self {
        Self::new(InlineKind::Text, contents)
    }

    pub fn code(contents: impl Into<String>) -> Self {
        Self::new(InlineKind::Code, contents)
    }
}

/// A single paragraph or code line, ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRow {
    pub style: RowStyle,

    /// Marker drawn before the row, e.g. `"3. "` or `"• "`
    pub list_item_prefix: Option<String>,

    /// Nesting levels, outermost first
    pub nested_formatting: Vec<NestedFormat>,

    /// Never empty for rows produced by the converter
    pub contents: Vec<InlineElement>,
}

impl ContentRow {
    pub fn new(
        style: RowStyle,
        list_item_prefix: Option<String>,
        nested_formatting: Vec<NestedFormat>,
        contents: Vec<InlineElement>,
    ) -> Self {
        Self {
            style,
            list_item_prefix,
            nested_formatting,
            contents,
        }
    }

    /// Concatenated contents of every inline element
    pub fn plain_text(&self) -> String {
        self.contents.iter().map(|e| e.contents.as_str()).collect()
    }

    /// Number of list indent units to apply
    pub fn indent_level(&self) -> usize {
        self.nested_formatting
            .iter()
            .filter(|f| **f == NestedFormat::ListLevel)
            .count()
    }

    /// Number of quote bars to draw
    pub fn bar_count(&self) -> usize {
        self.nested_formatting.iter().filter(|f| f.draws_bar()).count()
    }
}

/// A quoted reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blockquote {
    pub contents: Vec<ContentRow>,
}

impl Blockquote {
    pub fn new(contents: Vec<ContentRow>) -> Self {
        Self { contents }
    }
}
