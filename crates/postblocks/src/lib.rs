//! # postblocks
//!
//! Convert sanitized social-media post HTML into render-ready content blocks.
//!
//! ## Design
//!
//! Conversion runs in stages:
//!
//! - **Parse**: the fragment is parsed with scraper/html5ever and mirrored
//!   into a [`Node`] tree (`html` feature)
//! - **Sanitize**: only allowlisted tags and attributes survive; anything
//!   else is unwrapped so its text is kept
//! - **Accumulate**: the tree is walked into a flat list of
//!   [`ContentBlock`]s, recording quote and list nesting on every row
//!
//! Inline markup (bold, italic, strikethrough, code, links, line breaks) is
//! rendered to Markdown-escaped strings inside each row.
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use postblocks::{get_content_blocks, ContentBlock};
//!
//! let blocks = get_content_blocks("<p>Hello <strong>world</strong></p>").unwrap();
//! match &blocks[0] {
//!     ContentBlock::Row(row) => assert_eq!(row.plain_text(), "Hello **world**"),
//!     ContentBlock::Blockquote(_) => unreachable!(),
//! }
//! ```
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use postblocks::{accumulate, sanitize, Node, Options};
//!
//! let tree = Node::element("div").with_child(Node::text("plain text"));
//! let blocks = accumulate(&sanitize(vec![tree]), &Options::default());
//! assert_eq!(blocks[0].rows()[0].plain_text(), "plain text");
//! ```

mod accumulate;
pub mod allowlist;
#[cfg(feature = "html")]
pub mod html;
mod inline;
pub mod node;
mod sanitize;
#[cfg(feature = "html")]
mod service;

pub use accumulate::accumulate;
#[cfg(feature = "html")]
pub use html::{parse_fragment, parse_fragment_with_depth, Fragment};
pub use inline::{escape_markdown, serialize, trim_for_display};
pub use node::{Element, Node};
pub use postblocks_core::{
    Blockquote, ContentBlock, ContentRow, InlineElement, InlineKind, NestedFormat, Options,
    RowStyle,
};
pub use sanitize::{sanitize, GROUPING_TAG};
#[cfg(feature = "html")]
pub use service::ContentParser;

/// Error type for content block conversion
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Input too large: {len} bytes (limit {max})")]
    InputTooLarge { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, ContentError>;

/// Convert an HTML fragment into content blocks with default options.
#[cfg(feature = "html")]
pub fn get_content_blocks(html: &str) -> Result<Vec<ContentBlock>> {
    ContentParser::new().parse(html)
}
