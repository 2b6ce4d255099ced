//! Configuration options for block conversion

/// Default for [`Options::max_nesting_depth`]
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 100;

/// Options for converting post markup into content blocks
#[derive(Debug, Clone)]
pub struct Options {
    /// Maximum characters of link text shown before truncation
    pub link_display_max_len: usize,

    /// Appended to link text that was truncated
    pub ellipsis: String,

    /// Prefix for items of unordered lists
    pub bullet_prefix: String,

    /// Fail with a parse error when the HTML parser reports problems
    /// instead of recovering silently
    pub strict_parsing: bool,

    /// Reject inputs longer than this many bytes
    pub max_input_len: Option<usize>,

    /// Elements nested deeper than this are flattened to their text
    pub max_nesting_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            link_display_max_len: 30,
            ellipsis: "…".to_string(),
            bullet_prefix: "• ".to_string(),
            strict_parsing: false,
            max_input_len: None,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl Options {
    /// Prefix for the item at `index` of an ordered list
    pub fn ordered_prefix(&self, index: i64) -> String {
        format!("{}. ", index)
    }
}
