//! postblocks-core - Content block model
//!
//! This crate provides the output data structures for post body conversion.
//! It is used by `postblocks` (which builds the blocks from HTML) and by
//! whatever UI layer renders them.
//!
//! # Architecture
//!
//! ```text
//! HTML String ──parse──▶ DOM ──sanitize──▶ Node tree ──accumulate──▶ ┌──────────────────┐
//!                                                                   │ Vec<ContentBlock>│ ──▶ renderer
//!                                                                   └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use postblocks_core::{ContentBlock, ContentRow, InlineElement, RowStyle};
//!
//! let blocks = vec![ContentBlock::Row(ContentRow::new(
//!     RowStyle::Paragraph,
//!     None,
//!     vec![],
//!     vec![InlineElement::text("Hello "), InlineElement::text("**world**")],
//! ))];
//!
//! for block in &blocks {
//!     match block {
//!         ContentBlock::Row(row) => assert_eq!(row.plain_text(), "Hello **world**"),
//!         ContentBlock::Blockquote(quote) => assert!(!quote.contents.is_empty()),
//!     }
//! }
//! ```

mod block;
mod options;

pub use block::{Blockquote, ContentBlock, ContentRow, InlineElement, InlineKind, NestedFormat, RowStyle};
pub use options::{Options, DEFAULT_MAX_NESTING_DEPTH};
