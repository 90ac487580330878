//! Front matter rendering for exported pages.

use crate::models::AttributeMap;
use std::collections::BTreeSet;

const DELIMITER: &str = "---";
const LIST_SEPARATOR: &str = ", ";

/// Renders attributes as a `---` delimited front matter block
///
/// Keys are emitted in byte-wise ascending order. Values are double-quoted
/// unless the key is configured as unquoted; list keys are split on `", "`
/// and emitted as a quoted list.
#[derive(Debug, Clone, Default)]
pub struct FrontmatterRenderer {
    unquoted: BTreeSet<String>,
    lists: BTreeSet<String>,
}

impl FrontmatterRenderer {
    pub fn new<U, L>(unquoted: U, lists: L) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            unquoted: unquoted.into_iter().map(Into::into).collect(),
            lists: lists.into_iter().map(Into::into).collect(),
        }
    }

    /// Render the front matter followed by `body`, verbatim
    ///
    /// # Example
    ///
    /// ```
    /// use logseq_export_core::frontmatter::FrontmatterRenderer;
    /// use logseq_export_core::AttributeMap;
    ///
    /// let mut attributes = AttributeMap::new();
    /// attributes.insert("title".into(), "Hello".into());
    /// attributes.insert("tags".into(), "x, y".into());
    ///
    /// let renderer = FrontmatterRenderer::new(Vec::<String>::new(), ["tags"]);
    /// assert_eq!(
    ///     renderer.render(&attributes, "body"),
    ///     "---\ntags: [\"x\", \"y\"]\ntitle: \"Hello\"\n---\nbody"
    /// );
    /// ```
    pub fn render(&self, attributes: &AttributeMap, body: &str) -> String {
        let mut keys: Vec<&String> = attributes.keys().collect();
        keys.sort();

        let mut output = String::with_capacity(body.len() + 64);
        output.push_str(DELIMITER);
        output.push('\n');
        for key in keys {
            let value = &attributes[key];
            output.push_str(key);
            output.push_str(": ");
            output.push_str(&self.format_value(key, value));
            output.push('\n');
        }
        output.push_str(DELIMITER);
        output.push('\n');
        output.push_str(body);
        output
    }

    fn format_value(&self, key: &str, value: &str) -> String {
        if self.lists.contains(key) {
            let items: Vec<String> = value.split(LIST_SEPARATOR).map(quote).collect();
            format!("[{}]", items.join(", "))
        } else if self.unquoted.contains(key) {
            value.to_string()
        } else {
            quote(value)
        }
    }
}

/// YAML double-quoted scalar; backslashes are escaped before quotes
fn quote(value: &str) -> String {
    format!(
        "\"{}\"",
        value.replace('\\', "\\\\").replace('"', "\\\"")
    )
}
