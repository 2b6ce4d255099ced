//! ContentParser - the main entry point for post body conversion.

use postblocks_core::{ContentBlock, Options};
use tracing::{debug, warn};

use crate::accumulate::accumulate;
use crate::html::parse_fragment_with_depth;
use crate::sanitize::sanitize;
use crate::{ContentError, Result};

/// Converts post HTML into content blocks.
///
/// Holds only configuration, so one parser can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ContentParser {
    options: Options,
}

impl ContentParser {
    /// Create a new ContentParser with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ContentParser with custom options
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    /// Get the current options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Parse, sanitize and accumulate an HTML fragment
    pub fn parse(&self, html: &str) -> Result<Vec<ContentBlock>> {
        if let Some(max) = self.options.max_input_len {
            if html.len() > max {
                return Err(ContentError::InputTooLarge {
                    len: html.len(),
                    max,
                });
            }
        }

        let fragment = parse_fragment_with_depth(html, self.options.max_nesting_depth);
        if !fragment.errors.is_empty() {
            if self.options.strict_parsing {
                return Err(ContentError::Parse(fragment.errors.join("; ")));
            }
            warn!(
                errors = fragment.errors.len(),
                first = %fragment.errors[0],
                "recovered from malformed markup"
            );
        }

        if fragment.flattened > 0 {
            warn!(
                flattened = fragment.flattened,
                max_depth = self.options.max_nesting_depth,
                "flattened markup nested past the depth limit"
            );
        }

        let nodes = sanitize(fragment.nodes);
        let blocks = accumulate(&nodes, &self.options);

        debug!(
            input_len = html.len(),
            node_count = nodes.len(),
            block_count = blocks.len(),
            "converted post body"
        );

        Ok(blocks)
    }
}
