//! Page link (`[[Page title]]`) detection and rewriting.

use crate::models::LinkIndex;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PAGE_LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").unwrap());

/// All page link targets in `text`, in order of appearance
pub fn detect_page_links(text: &str) -> Vec<String> {
    PAGE_LINK_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Rewrite page links using `index`, see [`PageLinkRewriter`]
pub fn rewrite_page_links(text: &str, index: &LinkIndex, url_prefix: &str) -> String {
    PageLinkRewriter::new(index, url_prefix).rewrite(text)
}

/// Turns `[[Title]]` into markdown links to exported pages
///
/// Links to pages that are not exported lose their brackets and become plain
/// text. Fenced code blocks are copied verbatim.
pub struct PageLinkRewriter<'a> {
    index: &'a LinkIndex,
    url_prefix: String,
}

impl<'a> PageLinkRewriter<'a> {
    pub fn new(index: &'a LinkIndex, url_prefix: &str) -> Self {
        Self {
            index,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn rewrite(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut in_code_block = false;

        for line in text.split_inclusive('\n') {
            if is_fence(line) {
                in_code_block = !in_code_block;
                result.push_str(line);
                continue;
            }

            if in_code_block || !line.contains("[[") {
                result.push_str(line);
                continue;
            }

            let rewritten = PAGE_LINK_RE.replace_all(line, |caps: &Captures| self.link(&caps[1]));
            result.push_str(&rewritten);
        }

        result
    }

    fn link(&self, title: &str) -> String {
        match self.index.resolve(title) {
            Some(slug) => format!("[{}]({}/{})", title, self.url_prefix, slug),
            None => {
                tracing::debug!("Page link '{}' has no exported target", title);
                title.to_string()
            }
        }
    }
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}
