//! Page assembly: raw page text in, parsed page and rendered document out.

use crate::assets::rewrite_asset_references;
use crate::attributes::split_attributes;
use crate::frontmatter::FrontmatterRenderer;
use crate::markdown::BodyRewriter;
use crate::models::{ParsedContent, ParsedPage, RawPage};
use crate::slug::{derive_export_filename, ensure_slug, ensure_title};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PageError {
    #[error("Cannot derive a file name from path {0:?}")]
    MissingFileName(String),

    #[error("Attribute {key:?} value {value:?} would place the page outside the pages folder")]
    UnsafeName { key: String, value: String },
}

/// Options for [`PageParser`]
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// URL prefix for published assets (e.g. "/logseq-assets")
    pub asset_url_prefix: String,

    /// Percent-decode file names used as titles
    pub decode_titles: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            asset_url_prefix: String::from("/logseq-assets"),
            decode_titles: false,
        }
    }
}

/// Parses raw pages into [`ParsedPage`]s
#[derive(Debug, Clone, Default)]
pub struct PageParser {
    options: ParseOptions,
    rewriter: BodyRewriter,
}

impl PageParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            rewriter: BodyRewriter::new(),
        }
    }

    pub fn with_rewriter(mut self, rewriter: BodyRewriter) -> Self {
        self.rewriter = rewriter;
        self
    }

    /// Split, rewrite and name a page
    ///
    /// ```
    /// use logseq_export_core::{PageParser, ParseOptions, RawPage};
    ///
    /// let raw = RawPage::new("/pages/Hello world.md", "public:: true\n\n- ![a](../assets/a.png)\n");
    /// let page = PageParser::new(ParseOptions::default()).parse(&raw).unwrap();
    ///
    /// assert_eq!(page.export_filename, "Hello-world.md");
    /// assert_eq!(page.slug(), Some("Hello-world"));
    /// assert_eq!(page.title(), Some("Hello world"));
    /// assert_eq!(page.content.body, "\n![a](/logseq-assets/a.png)\n");
    /// assert_eq!(page.content.assets, vec!["../assets/a.png"]);
    /// ```
    pub fn parse(&self, raw: &RawPage) -> Result<ParsedPage, PageError> {
        let (mut attributes, body) = split_attributes(&raw.content);
        let body = self.rewriter.rewrite(&body);

        let export_filename = derive_export_filename(&raw.path, &attributes)?;
        ensure_slug(&mut attributes, &export_filename);
        ensure_title(&mut attributes, &raw.path, self.options.decode_titles)?;

        let rewrite = rewrite_asset_references(&body, &attributes, &self.options.asset_url_prefix);
        tracing::debug!(
            "Parsed {} -> {} ({} assets referenced)",
            raw.path,
            export_filename,
            rewrite.assets.len()
        );

        Ok(ParsedPage {
            original_path: raw.path.clone(),
            export_filename,
            content: ParsedContent {
                attributes: rewrite.attributes,
                body: rewrite.body,
                assets: rewrite.assets,
            },
        })
    }
}

/// Parse a page with default options
pub fn parse_page(raw: &RawPage) -> Result<ParsedPage, PageError> {
    PageParser::default().parse(raw)
}

/// Render a parsed page as front matter plus body
pub fn render(page: &ParsedPage, renderer: &FrontmatterRenderer) -> String {
    renderer.render(&page.content.attributes, &page.content.body)
}
