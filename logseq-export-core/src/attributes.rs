//! Page attribute (`key:: value`) parsing.
//!
//! Attributes are the leading run of `key:: value` lines of a page. The run
//! ends at the first line without `::`; one blank line right after a
//! non-empty run separates it from the body and is dropped.

use crate::models::AttributeMap;

const ATTRIBUTE_SEPARATOR: &str = "::";

/// Split raw page text into its attributes and the remaining body
///
/// # Example
///
/// ```
/// use logseq_export_core::attributes::split_attributes;
///
/// let (attributes, body) = split_attributes("public:: true\ntitle:: Hello\n\n- first\n");
/// assert_eq!(attributes["public"], "true");
/// assert_eq!(attributes["title"], "Hello");
/// assert_eq!(body, "- first\n");
/// ```
pub fn split_attributes(raw: &str) -> (AttributeMap, String) {
    let mut attributes = AttributeMap::new();
    let mut rest = raw;
    let mut in_block = false;

    while !rest.is_empty() {
        let (line, next) = match rest.find('\n') {
            Some(end) => (&rest[..end], &rest[end + 1..]),
            None => (rest, ""),
        };
        let Some((key, value)) = line.split_once(ATTRIBUTE_SEPARATOR) else {
            break;
        };

        in_block = true;
        if key.trim().is_empty() {
            tracing::debug!("Skipping attribute line without a key: {:?}", line);
        } else {
            attributes.insert(key.to_string(), value.trim_start().to_string());
        }
        rest = next;
    }

    if in_block {
        rest = rest.strip_prefix('\n').unwrap_or(rest);
    }

    (attributes, rest.to_string())
}

/// Parse only the attribute block of a page
pub fn parse_attributes(raw: &str) -> AttributeMap {
    split_attributes(raw).0
}

/// Return the page text with its attribute block removed
pub fn strip_attributes(raw: &str) -> String {
    split_attributes(raw).1
}
