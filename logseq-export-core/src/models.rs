//! Page model structs shared by the parsing and rendering stages.

use std::collections::{BTreeMap, HashMap};

/// Attribute name to value mapping.
///
/// Keys are case-sensitive and unique; iteration order is byte-wise ascending.
pub type AttributeMap = BTreeMap<String, String>;

/// A candidate page as read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// Path of the source file (absolute or relative to the graph root)
    pub path: String,

    /// File text with carriage returns removed
    pub content: String,
}

impl RawPage {
    pub fn new(path: impl Into<String>, content: &str) -> Self {
        Self {
            path: path.into(),
            content: content.replace('\r', ""),
        }
    }
}

/// Attributes, body and asset references of a single page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedContent {
    pub attributes: AttributeMap,

    /// Page body without the attribute block
    pub body: String,

    /// Relative asset references in order of appearance, duplicates included
    pub assets: Vec<String>,
}

/// A page ready to be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    pub original_path: String,

    /// Output file name relative to the pages folder (e.g. "2023-07-29-post.md")
    pub export_filename: String,

    pub content: ParsedContent,
}

impl ParsedPage {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.content.attributes.get(key).map(String::as_str)
    }

    pub fn slug(&self) -> Option<&str> {
        self.attribute("slug")
    }

    pub fn title(&self) -> Option<&str> {
        self.attribute("title")
    }

    /// Rewrite `[[page links]]` in the body against an index of published pages.
    pub fn resolve_links(&mut self, index: &LinkIndex, url_prefix: &str) {
        self.content.body =
            crate::markdown::links::rewrite_page_links(&self.content.body, index, url_prefix);
    }
}

/// Title to slug lookup across all exported pages
///
/// Titles are matched case-insensitively, the way the outliner resolves
/// page references.
#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    slugs: HashMap<String, String>,
}

impl LinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from page titles and their comma-separated aliases
    pub fn from_pages(pages: &[ParsedPage]) -> Self {
        let mut index = Self::new();
        for page in pages {
            let Some(slug) = page.slug() else {
                continue;
            };
            if let Some(title) = page.title() {
                index.insert(title, slug);
            }
            if let Some(aliases) = page.attribute("alias") {
                for alias in aliases.split(',').map(str::trim).filter(|a| !a.is_empty()) {
                    index.insert(alias, slug);
                }
            }
        }
        index
    }

    /// Register a title; an already registered title keeps its first slug
    pub fn insert(&mut self, title: &str, slug: &str) {
        let key = normalize_title(title);
        if let Some(existing) = self.slugs.get(&key) {
            if existing != slug {
                tracing::warn!(
                    "Title '{}' already points to '{}', ignoring '{}'",
                    title,
                    existing,
                    slug
                );
            }
            return;
        }
        self.slugs.insert(key, slug.to_string());
    }

    pub fn resolve(&self, title: &str) -> Option<&str> {
        self.slugs.get(&normalize_title(title)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, slug: &str, alias: Option<&str>) -> ParsedPage {
        let mut attributes = AttributeMap::new();
        attributes.insert("title".into(), title.into());
        attributes.insert("slug".into(), slug.into());
        if let Some(alias) = alias {
            attributes.insert("alias".into(), alias.into());
        }
        ParsedPage {
            original_path: format!("/pages/{}.md", title),
            export_filename: format!("{}.md", slug),
            content: ParsedContent {
                attributes,
                ..ParsedContent::default()
            },
        }
    }

    #[test]
    fn test_raw_page_strips_carriage_returns() {
        let raw = RawPage::new("/a.md", "public:: true\r\n- hello\r\n");
        assert_eq!(raw.content, "public:: true\n- hello\n");
        assert_eq!(raw.path, "/a.md");
    }

    #[test]
    fn test_link_index_is_case_insensitive() {
        let mut index = LinkIndex::new();
        index.insert("Environment Design", "environment-design");

        assert_eq!(index.resolve("environment design"), Some("environment-design"));
        assert_eq!(index.resolve("ENVIRONMENT DESIGN"), Some("environment-design"));
        assert_eq!(index.resolve("Automated testing"), None);
    }

    #[test]
    fn test_link_index_first_slug_wins() {
        let mut index = LinkIndex::new();
        index.insert("Hello", "first");
        index.insert("hello", "second");

        assert_eq!(index.resolve("Hello"), Some("first"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_link_index_from_pages_includes_aliases() {
        let pages = vec![
            page("Automated testing", "automated-testing", Some("Tests, QA")),
            page("Hello", "hello", None),
        ];
        let index = LinkIndex::from_pages(&pages);

        assert_eq!(index.resolve("automated testing"), Some("automated-testing"));
        assert_eq!(index.resolve("qa"), Some("automated-testing"));
        assert_eq!(index.resolve("Tests"), Some("automated-testing"));
        assert_eq!(index.resolve("hello"), Some("hello"));
        assert_eq!(index.len(), 4);
    }
}
