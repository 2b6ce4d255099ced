//! Tag and attribute allowlist for post markup.

/// Elements kept by the sanitizer. Anything else is unwrapped.
pub const ALLOWED_ELEMENTS: &[&str] = &[
    "p", "br", "span", "a", "del", "s", "pre", "blockquote", "code", "b",
    "strong", "u", "i", "em", "ul", "ol", "li", "ruby", "rt", "rp",
];

/// Attributes kept per element. Elements without an entry keep none.
pub const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "rel", "class", "translate"]),
    ("span", &["class", "translate"]),
    ("ol", &["start", "reversed"]),
    ("li", &["value"]),
    ("p", &["class"]),
];

/// Elements serialized in place rather than opening a block
pub const INLINE_ELEMENTS: &[&str] = &[
    "strong", "b", "em", "i", "u", "del", "s", "code", "a", "br",
];

/// Check if an element survives sanitizing
pub fn is_allowed_element(tag: &str) -> bool {
    ALLOWED_ELEMENTS.contains(&tag)
}

/// Attribute names kept for `tag`
pub fn allowed_attributes(tag: &str) -> &'static [&'static str] {
    ALLOWED_ATTRIBUTES
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, attrs)| *attrs)
        .unwrap_or(&[])
}

/// Check if an attribute survives sanitizing on `tag`
pub fn is_allowed_attribute(tag: &str, attr: &str) -> bool {
    allowed_attributes(tag).contains(&attr)
}

/// Check if a tag is an inline element
pub fn is_inline(tag: &str) -> bool {
    INLINE_ELEMENTS.contains(&tag)
}
